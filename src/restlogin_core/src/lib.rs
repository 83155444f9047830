pub mod domain;
pub mod error;
pub mod http_abstraction;
pub mod matcher;
pub mod negotiation;
pub mod ports;
pub mod strategies;

// Re-export commonly used types for convenience
pub use domain::{
    authentication::{
        Authentication, AuthenticationDetails, AuthenticationDetailsSource, AuthenticationOutcome,
    },
    credentials::Credentials,
    subject::Subject,
};

pub use error::{AuthenticationError, AuthorityError, RejectionReason};

pub use ports::{
    authority::AuthenticationAuthority,
    session::{SessionAuthenticationStrategy, SessionDirectives},
};

pub use strategies::{
    auth_validator::AuthValidator,
    handlers::{AuthenticationEntryPoint, AuthenticationFailureHandler, AuthenticationSuccessHandler},
};

pub use http_abstraction::{AuthRequest, AuthResponseBuilder, AuthResponseHelpers};
pub use matcher::{AnyRequestMatcher, PathRequestMatcher, RequestMatcher};
pub use negotiation::{
    ContentNegotiationStrategy, FixedContentNegotiationStrategy, HeaderContentNegotiationStrategy,
    MediaType, MediaTypeRequestMatcher, NegotiationError,
};
