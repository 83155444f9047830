use std::future::Future;
use std::sync::Arc;

use restlogin_core::{
    Authentication, AuthenticationAuthority, AuthenticationDetails, AuthenticationError,
};

use crate::extract_credentials::CredentialExtractor;

/// The login decision logic: method check, credential extraction, delegation
/// to the authority.
///
/// Holds no per-request state; one instance serves all concurrent requests.
#[derive(Clone)]
pub struct AttemptAuthenticationUseCase {
    authority: Arc<dyn AuthenticationAuthority>,
    extractor: CredentialExtractor,
}

impl AttemptAuthenticationUseCase {
    pub fn new(authority: Arc<dyn AuthenticationAuthority>, extractor: CredentialExtractor) -> Self {
        Self {
            authority,
            extractor,
        }
    }

    /// Execute one login attempt.
    ///
    /// # Arguments
    /// * `method` - HTTP method of the request; only `POST` is accepted
    /// * `body` - Future yielding the raw request body, only polled once the
    ///   method has been accepted
    /// * `details` - Request metadata attached to a successful authentication
    #[tracing::instrument(name = "AttemptAuthenticationUseCase::execute", skip(self, body, details))]
    pub async fn execute<Fut, Body>(
        &self,
        method: &str,
        body: Fut,
        details: AuthenticationDetails,
    ) -> Result<Authentication, AuthenticationError>
    where
        Fut: Future<Output = Result<Body, AuthenticationError>> + Send,
        Body: AsRef<[u8]>,
    {
        if method != "POST" {
            return Err(AuthenticationError::UnsupportedMethod(method.to_owned()));
        }

        let body = body.await?;
        let credentials = self.extractor.extract(body.as_ref())?;

        let subject = self
            .authority
            .authenticate(&credentials)
            .await
            .map_err(|error| {
                tracing::debug!(username = credentials.username(), %error, "Authority refused credentials");
                AuthenticationError::from(error)
            })?;

        Ok(Authentication::new(subject, details))
    }
}
