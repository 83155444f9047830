//! Axum framework adapters for the login pipeline traits.
//!
//! `AuthRequest` and `AuthResponseBuilder` live in `restlogin_core`; they are
//! implemented here on newtype wrappers to satisfy the orphan rule.
//!
//! ```text
//! ┌────────────────────────────────────────────┐
//! │  restlogin_core::AuthRequest (trait)       │
//! └────────────────┬───────────────────────────┘
//!                  │
//!                  ▼
//! ┌────────────────────────────────────────────┐
//! │  AxumRequest(http::request::Parts)         │
//! │  impl AuthRequest for AxumRequest { }      │
//! └────────────────────────────────────────────┘
//! ```
//!
//! The request wrapper holds only the request head. The body is consumed
//! separately so the wrapper stays `Sync` and can be borrowed across awaits.

use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Response, StatusCode, request::Parts};
use restlogin_core::{AuthRequest, AuthResponseBuilder, AuthenticationError};
use serde::Serialize;

/// Failure of the last login attempt.
///
/// Stashed on the request while the attempt runs, then moved onto the login
/// response so outer layers can observe it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastAuthenticationFailure(pub AuthenticationError);

/// Newtype wrapper around the head of an Axum request.
#[repr(transparent)]
pub struct AxumRequest(pub Parts);

impl AxumRequest {
    pub fn new(parts: Parts) -> Self {
        Self(parts)
    }

    pub fn parts(&self) -> &Parts {
        &self.0
    }

    pub fn parts_mut(&mut self) -> &mut Parts {
        &mut self.0
    }

    pub fn into_parts(self) -> Parts {
        self.0
    }
}

impl From<Parts> for AxumRequest {
    fn from(parts: Parts) -> Self {
        AxumRequest(parts)
    }
}

impl AuthRequest for AxumRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.0.headers.get(name)?.to_str().ok()
    }

    fn method(&self) -> &str {
        self.0.method.as_str()
    }

    fn path(&self) -> &str {
        self.0.uri.path()
    }

    fn peer_addr(&self) -> Option<SocketAddr> {
        self.0
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr)
    }

    fn stash_attempt_failure(&mut self, error: AuthenticationError) {
        self.0.extensions.insert(LastAuthenticationFailure(error));
    }

    fn take_attempt_failure(&mut self) -> Option<AuthenticationError> {
        self.0
            .extensions
            .remove::<LastAuthenticationFailure>()
            .map(|LastAuthenticationFailure(error)| error)
    }
}

/// Newtype wrapper around Axum's response builder.
pub struct AxumResponseBuilder {
    builder: axum::http::response::Builder,
    body: Option<Vec<u8>>,
    serialization_failed: bool,
}

impl AxumResponseBuilder {
    /// Create a new Axum response builder
    pub fn new() -> Self {
        Self {
            builder: Response::builder(),
            body: None,
            serialization_failed: false,
        }
    }
}

impl Default for AxumResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthResponseBuilder for AxumResponseBuilder {
    type Response = Response<Body>;

    fn status(mut self, code: u16) -> Self {
        self.builder = self.builder.status(code);
        self
    }

    fn header(mut self, name: &str, value: &str) -> Self {
        self.builder = self.builder.header(name, value);
        self
    }

    fn json_body<T: Serialize>(mut self, body: &T) -> Self {
        match serde_json::to_vec(body) {
            Ok(bytes) => {
                self.builder = self.builder.header("content-type", "application/json");
                self.body = Some(bytes);
            }
            Err(error) => {
                tracing::error!(%error, "Failed to serialize response body");
                self.serialization_failed = true;
            }
        }
        self
    }

    fn build(self) -> Self::Response {
        if self.serialization_failed {
            return internal_server_error();
        }

        let body = self.body.map(Body::from).unwrap_or_else(Body::empty);
        self.builder.body(body).unwrap_or_else(|error| {
            tracing::error!(%error, "Failed to build response");
            internal_server_error()
        })
    }
}

fn internal_server_error() -> Response<Body> {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
}

/// Helper function to create an Axum response builder
pub fn response_builder() -> AxumResponseBuilder {
    AxumResponseBuilder::new()
}
