use restlogin_core::{
    AuthRequest, AuthResponseBuilder, AuthResponseHelpers, AuthenticationError,
    AuthenticationFailureHandler,
};
use serde::{Deserialize, Serialize};

/// JSON body of a failed login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureBody {
    pub error: String,
}

impl From<&AuthenticationError> for FailureBody {
    fn from(error: &AuthenticationError) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}

/// Which status a failed attempt is answered with.
///
/// `rejected` covers credential and account rejections, `bad_request` covers
/// unsupported methods, malformed bodies and authority outages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FailureStatusPolicy {
    pub rejected: u16,
    pub bad_request: u16,
}

impl Default for FailureStatusPolicy {
    fn default() -> Self {
        Self {
            rejected: 401,
            bad_request: 400,
        }
    }
}

impl FailureStatusPolicy {
    pub fn status_for(&self, error: &AuthenticationError) -> u16 {
        if error.is_service_error() {
            self.bad_request
        } else {
            self.rejected
        }
    }
}

/// Answers a failed login with `{"error": reason}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RestAuthenticationFailureHandler {
    policy: FailureStatusPolicy,
}

impl RestAuthenticationFailureHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: FailureStatusPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> FailureStatusPolicy {
        self.policy
    }
}

impl AuthenticationFailureHandler for RestAuthenticationFailureHandler {
    fn on_authentication_failure<R, B>(
        &self,
        request: &mut R,
        builder: B,
        error: &AuthenticationError,
    ) -> B::Response
    where
        R: AuthRequest + ?Sized,
        B: AuthResponseBuilder,
    {
        let status = self.policy.status_for(error);

        if error.is_service_error() {
            tracing::warn!(code = error.code(), status, path = request.path(), "Login attempt failed: {error}");
        } else {
            tracing::info!(code = error.code(), status, path = request.path(), "Login rejected: {error}");
        }

        request.stash_attempt_failure(error.clone());
        builder.json_with_status(status, &FailureBody::from(error))
    }
}
