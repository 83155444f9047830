//! Adapters for the login pipeline: the JSON response handlers, the
//! framework-agnostic login flow, an in-memory authority and settings.

pub mod config;
pub mod handlers;
pub mod persistence;

pub use self::config::{RestLoginSettings, ServerSettings, SettingsError};
pub use handlers::{
    FailureBody, FailureStatusPolicy, RestAuthenticationEntryPoint,
    RestAuthenticationFailureHandler, RestAuthenticationSuccessHandler, SuccessBody,
    UnauthorizedBody, handle_login,
};
pub use persistence::{InMemoryAuthority, UserRegistryError};
