//! Framework-agnostic HTTP abstraction for the login pipeline.
//!
//! The login decision logic and the response handlers only ever talk to these
//! traits. Framework crates implement them on newtype wrappers of their own
//! request and response-builder types.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  restlogin_core: HTTP traits             │
//! └──────────────┬───────────────────────────┘
//!                │
//!                ▼
//! ┌──────────────────────────────────────────┐
//! │  restlogin_axum: newtype wrappers        │
//! │  struct AxumRequest(http::request::Parts)│
//! │  impl AuthRequest for AxumRequest { }    │
//! └──────────────┬───────────────────────────┘
//!                │
//!                ▼
//! ┌──────────────────────────────────────────┐
//! │  handlers, matchers, negotiation use     │
//! │  the traits (generic over framework)     │
//! └──────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;

use serde::Serialize;

use crate::error::AuthenticationError;

/// Read access to an HTTP request, plus the transient per-request attempt state.
///
/// The trait is object safe so matchers and negotiation strategies can take
/// `&dyn AuthRequest`.
pub trait AuthRequest {
    /// Get a header value by name.
    ///
    /// Lookup is case-insensitive. Returns `None` if the header doesn't exist
    /// or isn't valid UTF-8.
    fn header(&self, name: &str) -> Option<&str>;

    /// Get a cookie value by name from the `Cookie` header.
    fn cookie(&self, name: &str) -> Option<&str> {
        self.header("cookie")?.split(';').find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name).then_some(value)
        })
    }

    /// Get the HTTP method (GET, POST, etc.)
    fn method(&self) -> &str;

    /// Get the request path
    fn path(&self) -> &str;

    /// Address of the connected peer, when the framework exposes it.
    fn peer_addr(&self) -> Option<SocketAddr> {
        None
    }

    /// Remember the failure of the current attempt on the request.
    fn stash_attempt_failure(&mut self, error: AuthenticationError);

    /// Remove and return a previously stashed failure.
    fn take_attempt_failure(&mut self) -> Option<AuthenticationError>;
}

/// Trait for building HTTP responses.
///
/// Follows the builder pattern:
/// ```ignore
/// builder
///     .status(200)
///     .header("x-request-id", "abc")
///     .json_body(&body)
///     .build()
/// ```
pub trait AuthResponseBuilder: Sized {
    /// The final response type produced by this builder
    type Response;

    /// Set the HTTP status code
    fn status(self, code: u16) -> Self;

    /// Add an HTTP header
    fn header(self, name: &str, value: &str) -> Self;

    /// Add a Set-Cookie header
    ///
    /// The cookie_value should be a complete cookie string like:
    /// `"SESSION=abc; HttpOnly; Secure; SameSite=Lax"`
    fn cookie(self, cookie_value: &str) -> Self {
        self.header("set-cookie", cookie_value)
    }

    /// Serialize `body` as JSON and set `Content-Type: application/json`.
    fn json_body<T: Serialize>(self, body: &T) -> Self;

    /// Build the final response
    fn build(self) -> Self::Response;
}

/// Shorthands for the JSON responses the login pipeline emits.
pub trait AuthResponseHelpers: AuthResponseBuilder {
    /// Create a 200 OK JSON response
    fn ok_json<T: Serialize>(self, body: &T) -> Self::Response {
        self.status(200).json_body(body).build()
    }

    /// Create a JSON response with an arbitrary status
    fn json_with_status<T: Serialize>(self, code: u16, body: &T) -> Self::Response {
        self.status(code).json_body(body).build()
    }
}

impl<T: AuthResponseBuilder> AuthResponseHelpers for T {}
