use restlogin_core::{
    AuthRequest, AuthResponseBuilder, AuthResponseHelpers, Authentication,
    AuthenticationSuccessHandler, Subject,
};
use serde::Serialize;

/// JSON body of a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessBody {
    pub username: String,
    pub enabled: bool,
    pub credentials_non_expired: bool,
    pub expired: bool,
    pub locked: bool,
}

impl From<&Subject> for SuccessBody {
    fn from(subject: &Subject) -> Self {
        Self {
            username: subject.username().to_owned(),
            enabled: subject.is_enabled(),
            credentials_non_expired: subject.is_credentials_non_expired(),
            expired: subject.is_expired(),
            locked: subject.is_locked(),
        }
    }
}

/// Answers a successful login with `200` and the subject's account flags.
///
/// Never redirects.
#[derive(Debug, Clone, Copy, Default)]
pub struct RestAuthenticationSuccessHandler;

impl RestAuthenticationSuccessHandler {
    pub fn new() -> Self {
        Self
    }
}

impl AuthenticationSuccessHandler for RestAuthenticationSuccessHandler {
    fn on_authentication_success<R, B>(
        &self,
        request: &mut R,
        builder: B,
        authentication: &Authentication,
    ) -> B::Response
    where
        R: AuthRequest + ?Sized,
        B: AuthResponseBuilder,
    {
        // A failure from an earlier attempt on this request is stale now.
        request.take_attempt_failure();

        let subject = authentication.subject();
        tracing::info!(
            username = %subject.username(),
            remote_address = authentication.details().remote_address.as_deref(),
            authenticated_at = %authentication.authenticated_at(),
            "Login succeeded"
        );

        builder.ok_json(&SuccessBody::from(subject))
    }
}
