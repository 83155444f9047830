use restlogin_core::{
    AuthRequest, AuthResponseBuilder, AuthResponseHelpers, AuthenticationEntryPoint,
    AuthenticationError,
};
use serde::Serialize;

/// JSON body sent to an unauthenticated client of a protected resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnauthorizedBody {
    pub error: &'static str,
    pub message: String,
}

impl UnauthorizedBody {
    pub fn new(error: &AuthenticationError) -> Self {
        Self {
            error: "unauthenticated",
            message: error.to_string(),
        }
    }
}

/// Entry point answering with a JSON `401` instead of a login page.
#[derive(Debug, Clone, Copy)]
pub struct RestAuthenticationEntryPoint {
    status: u16,
}

impl Default for RestAuthenticationEntryPoint {
    fn default() -> Self {
        Self { status: 401 }
    }
}

impl RestAuthenticationEntryPoint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use another status, typically `403`.
    pub fn with_status(status: u16) -> Self {
        Self { status }
    }

    pub fn status(&self) -> u16 {
        self.status
    }
}

impl AuthenticationEntryPoint for RestAuthenticationEntryPoint {
    fn commence<R, B>(&self, request: &R, builder: B, error: &AuthenticationError) -> B::Response
    where
        R: AuthRequest + ?Sized,
        B: AuthResponseBuilder,
    {
        tracing::debug!(path = request.path(), status = self.status, "Commencing authentication");
        builder.json_with_status(self.status, &UnauthorizedBody::new(error))
    }
}
