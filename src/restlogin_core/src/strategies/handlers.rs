//! Capability traits for the three response-shaping collaborators of the
//! login pipeline.
//!
//! Each handler writes through the framework-agnostic `AuthResponseBuilder`,
//! so the same implementation serves any web framework that provides the
//! HTTP abstraction traits.

use crate::{
    domain::authentication::Authentication,
    error::AuthenticationError,
    http_abstraction::{AuthRequest, AuthResponseBuilder},
};

/// Writes the response for a successful login.
pub trait AuthenticationSuccessHandler: Send + Sync + 'static {
    fn on_authentication_success<R, B>(
        &self,
        request: &mut R,
        builder: B,
        authentication: &Authentication,
    ) -> B::Response
    where
        R: AuthRequest + ?Sized,
        B: AuthResponseBuilder;
}

/// Writes the response for a failed login.
pub trait AuthenticationFailureHandler: Send + Sync + 'static {
    fn on_authentication_failure<R, B>(
        &self,
        request: &mut R,
        builder: B,
        error: &AuthenticationError,
    ) -> B::Response
    where
        R: AuthRequest + ?Sized,
        B: AuthResponseBuilder;
}

/// Starts authentication for an unauthenticated request to a protected resource.
pub trait AuthenticationEntryPoint: Send + Sync + 'static {
    fn commence<R, B>(&self, request: &R, builder: B, error: &AuthenticationError) -> B::Response
    where
        R: AuthRequest + ?Sized,
        B: AuthResponseBuilder;
}
