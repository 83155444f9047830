pub mod attempt_authentication;
