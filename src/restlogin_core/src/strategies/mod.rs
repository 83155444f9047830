pub mod auth_validator;
pub mod handlers;
