//! # RestLogin - JSON login endpoint for HTTP security pipelines
//!
//! This is a facade crate that re-exports all public APIs from the login
//! pipeline components. Use this crate to get access to everything in one place.
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! restlogin = { path = "../restlogin" }
//! ```
//!
//! ## Structure
//!
//! - **Core domain types**: `Credentials`, `Subject`, `Authentication`, ...
//! - **Ports**: `AuthenticationAuthority`, `SessionAuthenticationStrategy`, `AuthValidator`
//! - **Use cases**: `AttemptAuthenticationUseCase`, `CredentialExtractor`
//! - **Adapters**: JSON response handlers, `InMemoryAuthority`, settings
//! - **Axum integration**: `SecurityPipeline`, `LoginFilter`, `RestLoginConfigurer`
//! - **Service**: `LoginService` - router assembly and standalone runner

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types, matchers and content negotiation
pub mod core {
    pub use restlogin_core::*;
}

pub use restlogin_core::{
    Authentication, AuthenticationDetails, AuthenticationDetailsSource, AuthenticationError,
    AuthenticationOutcome,
    AuthorityError, Credentials, MediaType, RejectionReason, Subject,
};

// ============================================================================
// Ports
// ============================================================================

pub use restlogin_core::{
    AuthValidator, AuthenticationAuthority, AuthenticationEntryPoint,
    AuthenticationFailureHandler, AuthenticationSuccessHandler, SessionAuthenticationStrategy,
    SessionDirectives,
};

// ============================================================================
// Use Cases (Application Layer)
// ============================================================================

/// Application use cases
pub mod use_cases {
    pub use restlogin_application::*;
}

pub use restlogin_application::{AttemptAuthenticationUseCase, CredentialExtractor};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// Response handlers and the framework-agnostic login flow
    pub mod handlers {
        pub use restlogin_adapters::handlers::*;
    }

    /// Authority implementations
    pub mod persistence {
        pub use restlogin_adapters::persistence::*;
    }

    /// Configuration
    pub mod config {
        pub use restlogin_adapters::config::*;
    }
}

pub use restlogin_adapters::{
    FailureStatusPolicy, InMemoryAuthority, RestAuthenticationEntryPoint,
    RestAuthenticationFailureHandler, RestAuthenticationSuccessHandler, RestLoginSettings,
};

// ============================================================================
// Axum Integration
// ============================================================================

/// Axum pipeline, filter and configurer
pub mod axum_integration {
    pub use restlogin_axum::*;
}

pub use restlogin_axum::{
    AuthorizationRules, ConfigurationError, ExceptionHandling, LoginFilter, RestLoginConfigurer,
    SecurityPipeline,
};

// ============================================================================
// Login Service (Main Entry Point)
// ============================================================================

pub use restlogin_service::{LoginService, init_tracing};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing the port traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};

/// Re-export the web stack the pipeline is built on
pub use axum;
pub use http;
