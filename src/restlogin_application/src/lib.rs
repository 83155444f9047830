pub mod extract_credentials;
pub mod use_cases;

pub use extract_credentials::{
    CredentialExtractor, DEFAULT_PASSWORD_PARAMETER, DEFAULT_USERNAME_PARAMETER,
};
pub use use_cases::attempt_authentication::AttemptAuthenticationUseCase;
