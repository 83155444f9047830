use crate::{
    domain::authentication::Authentication, error::AuthenticationError,
    http_abstraction::{AuthRequest, AuthResponseBuilder},
};

/// Host hook run after a successful authentication and before the success
/// response is written (session fixation protection, session cookies, ...).
pub trait SessionAuthenticationStrategy: Send + Sync + 'static {
    /// Returning an error turns the attempt into a failure.
    fn on_authentication(
        &self,
        authentication: &Authentication,
        request: &dyn AuthRequest,
    ) -> Result<SessionDirectives, AuthenticationError>;
}

/// Headers a session strategy wants added to the success response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionDirectives {
    headers: Vec<(String, String)>,
}

impl SessionDirectives {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_cookie(self, cookie_value: impl Into<String>) -> Self {
        self.with_header("set-cookie", cookie_value)
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Write the collected headers onto a response builder.
    pub fn apply<B: AuthResponseBuilder>(&self, builder: B) -> B {
        self.headers
            .iter()
            .fold(builder, |builder, (name, value)| builder.header(name, value))
    }
}
