use async_trait::async_trait;

/// Resolves authentication established by an earlier request.
///
/// The security pipeline asks the validator whether a request to a protected
/// resource already carries an authenticated principal (session cookie,
/// bearer token, mutual TLS identity...). When validation fails the request
/// is handed to the exception-handling layer and its entry points.
///
/// The validator receives request parts rather than the full request so that
/// non-`Sync` bodies never have to cross the trait boundary.
#[async_trait]
pub trait AuthValidator: Clone + Send + Sync + 'static {
    /// Principal data made available to downstream handlers on success.
    type Claims: Clone + Send + Sync + 'static;

    /// The request parts type this validator operates on.
    ///
    /// Typically `http::request::Parts`.
    type RequestParts;

    type Error: std::error::Error + Send + Sync + 'static;

    async fn validate(&self, parts: &Self::RequestParts) -> Result<Self::Claims, Self::Error>;
}
