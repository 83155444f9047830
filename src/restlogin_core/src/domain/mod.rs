pub mod authentication;
pub mod credentials;
pub mod subject;
