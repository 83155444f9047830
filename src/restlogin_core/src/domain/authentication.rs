use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{domain::subject::Subject, error::AuthenticationError, http_abstraction::AuthRequest};

/// Request metadata recorded alongside a successful authentication for audit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthenticationDetails {
    pub remote_address: Option<String>,
    pub session_id: Option<String>,
    pub user_agent: Option<String>,
}

/// Builds [`AuthenticationDetails`] for each login attempt.
///
/// The remote address is the peer address of the connection. `x-forwarded-for`
/// is client-controlled, so its first hop is only used when the deployment
/// sits behind a proxy that overwrites the header and
/// [`with_trust_forwarded_for`](Self::with_trust_forwarded_for) is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationDetailsSource {
    session_cookie_name: String,
    trust_forwarded_for: bool,
}

impl AuthenticationDetailsSource {
    pub fn new(session_cookie_name: impl Into<String>) -> Self {
        Self {
            session_cookie_name: session_cookie_name.into(),
            trust_forwarded_for: false,
        }
    }

    pub fn with_trust_forwarded_for(mut self, trust: bool) -> Self {
        self.trust_forwarded_for = trust;
        self
    }

    pub fn build_details<R: AuthRequest + ?Sized>(&self, request: &R) -> AuthenticationDetails {
        let forwarded = self
            .trust_forwarded_for
            .then(|| request.header("x-forwarded-for"))
            .flatten()
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|hop| !hop.is_empty())
            .map(String::from);

        AuthenticationDetails {
            remote_address: forwarded
                .or_else(|| request.peer_addr().map(|addr| addr.ip().to_string())),
            session_id: request.cookie(&self.session_cookie_name).map(String::from),
            user_agent: request.header("user-agent").map(String::from),
        }
    }
}

impl Default for AuthenticationDetailsSource {
    fn default() -> Self {
        Self::new("SESSION")
    }
}

/// A subject validated by the authority, together with request details.
#[derive(Debug, Clone)]
pub struct Authentication {
    subject: Subject,
    details: AuthenticationDetails,
    authenticated_at: DateTime<Utc>,
}

impl Authentication {
    pub fn new(subject: Subject, details: AuthenticationDetails) -> Self {
        Self {
            subject,
            details,
            authenticated_at: Utc::now(),
        }
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    pub fn details(&self) -> &AuthenticationDetails {
        &self.details
    }

    pub fn authenticated_at(&self) -> DateTime<Utc> {
        self.authenticated_at
    }
}

/// Result of a single login attempt.
#[derive(Debug)]
pub enum AuthenticationOutcome {
    Authenticated(Authentication),
    Rejected(AuthenticationError),
}

impl From<Result<Authentication, AuthenticationError>> for AuthenticationOutcome {
    fn from(result: Result<Authentication, AuthenticationError>) -> Self {
        match result {
            Ok(authentication) => Self::Authenticated(authentication),
            Err(error) => Self::Rejected(error),
        }
    }
}
