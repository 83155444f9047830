//! Framework-agnostic login handlers.
//!
//! These contain the response-shaping logic without any framework
//! dependencies. Framework integrations wrap their request and response types
//! in the `restlogin_core` HTTP traits and call into this module.

pub mod entry_point;
pub mod failure;
pub mod login;
pub mod success;

pub use entry_point::{RestAuthenticationEntryPoint, UnauthorizedBody};
pub use failure::{FailureBody, FailureStatusPolicy, RestAuthenticationFailureHandler};
pub use login::handle_login;
pub use success::{RestAuthenticationSuccessHandler, SuccessBody};
