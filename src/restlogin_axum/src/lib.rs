//! Axum integration for the JSON login pipeline.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  restlogin_core: HTTP trait definitions  │
//! └──────────────┬───────────────────────────┘
//!                │
//!                ▼
//! ┌──────────────────────────────────────────┐
//! │  restlogin_axum: Axum implementations    │
//! │  - AxumRequest newtype wrapper           │
//! │  - AxumResponseBuilder                   │
//! │  - SecurityPipeline middleware           │
//! │  - LoginFilter + RestLoginConfigurer     │
//! └──────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use restlogin_axum::{RestLoginConfigurer, SecurityPipeline, ExceptionHandling, AuthorizationRules};
//!
//! let mut pipeline = SecurityPipeline::new(session_validator)
//!     .with_exception_handling(ExceptionHandling::new())
//!     .with_authorization(AuthorizationRules::new())
//!     .with_authority(authority);
//!
//! RestLoginConfigurer::new()
//!     .login_processing_url("/api/login")
//!     .apply(&mut pipeline)?;
//!
//! let app = pipeline.secure(Router::new().route("/api/orders", get(orders)));
//! ```

pub mod adapters;
pub mod configurer;
pub mod error;
pub mod filter;
pub mod login_filter;
pub mod pipeline;

// Re-export for convenience
pub use adapters::{AxumRequest, AxumResponseBuilder, LastAuthenticationFailure, response_builder};
pub use configurer::RestLoginConfigurer;
pub use error::ConfigurationError;
pub use filter::{FilterOutcome, FilterPosition, SecurityFilter};
pub use login_filter::LoginFilter;
pub use pipeline::{
    AuthorizationRules, EntryPointHandle, ExceptionHandling, SecurityPipeline, entry_point_handle,
    forbidden_entry_point,
};
