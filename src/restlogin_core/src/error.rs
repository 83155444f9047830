use thiserror::Error;

/// Reasons an authority gives for refusing otherwise well-formed credentials.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectionReason {
    #[error("Bad credentials")]
    BadCredentials,
    #[error("User is disabled")]
    Disabled,
    #[error("User account is locked")]
    Locked,
    #[error("User credentials have expired")]
    CredentialsExpired,
    #[error("User account has expired")]
    AccountExpired,
    /// Authority-specific reason, reported verbatim.
    #[error("{0}")]
    Other(String),
}

/// Errors raised by an `AuthenticationAuthority`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorityError {
    #[error(transparent)]
    Rejected(#[from] RejectionReason),
    #[error("{0}")]
    Unavailable(String),
}

/// Everything that can end a login attempt without a validated subject.
///
/// The `Display` output is what clients see in the `error` field, so variants
/// never carry parser or backend internals beyond the message an authority
/// chose to report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthenticationError {
    #[error("Authentication method not supported: {0}")]
    UnsupportedMethod(String),
    #[error("Authentication failed: request body is not valid JSON")]
    MalformedBody,
    #[error(transparent)]
    Rejected(RejectionReason),
    #[error("Authentication service error: {0}")]
    Service(String),
    #[error("Full authentication is required to access this resource")]
    InsufficientAuthentication,
}

impl AuthenticationError {
    /// Service-level failures, as opposed to credential rejections.
    pub fn is_service_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedMethod(_) | Self::MalformedBody | Self::Service(_)
        )
    }

    /// Stable machine-readable identifier, used as a log field.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedMethod(_) => "unsupported_method",
            Self::MalformedBody => "malformed_body",
            Self::Rejected(RejectionReason::BadCredentials) => "bad_credentials",
            Self::Rejected(RejectionReason::Disabled) => "disabled",
            Self::Rejected(RejectionReason::Locked) => "locked",
            Self::Rejected(RejectionReason::CredentialsExpired) => "credentials_expired",
            Self::Rejected(RejectionReason::AccountExpired) => "account_expired",
            Self::Rejected(RejectionReason::Other(_)) => "rejected",
            Self::Service(_) => "service_error",
            Self::InsufficientAuthentication => "unauthenticated",
        }
    }
}

impl From<AuthorityError> for AuthenticationError {
    fn from(error: AuthorityError) -> Self {
        match error {
            AuthorityError::Rejected(reason) => Self::Rejected(reason),
            AuthorityError::Unavailable(message) => Self::Service(message),
        }
    }
}
