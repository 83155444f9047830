use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    domain::{credentials::Credentials, subject::Subject},
    error::AuthorityError,
};

/// External component that verifies credentials against a user store.
///
/// Implementations may block on I/O; the login pipeline awaits the call once
/// per request with no timeout or retry of its own.
#[async_trait]
pub trait AuthenticationAuthority: Send + Sync + 'static {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Subject, AuthorityError>;
}

#[async_trait]
impl<A: AuthenticationAuthority + ?Sized> AuthenticationAuthority for Arc<A> {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Subject, AuthorityError> {
        (**self).authenticate(credentials).await
    }
}
