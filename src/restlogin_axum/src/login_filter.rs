use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::Request;
use restlogin_adapters::handle_login;
use restlogin_application::AttemptAuthenticationUseCase;
use restlogin_core::{
    AuthRequest, AuthenticationDetailsSource, AuthenticationError, AuthenticationFailureHandler,
    AuthenticationSuccessHandler, PathRequestMatcher, RequestMatcher, SessionAuthenticationStrategy,
};

use crate::adapters::{AxumRequest, LastAuthenticationFailure, response_builder};
use crate::filter::{FilterOutcome, SecurityFilter};

/// Processes JSON login attempts sent to the login path.
///
/// Every method on the login path is intercepted so non-`POST` requests get a
/// failure response instead of falling through. Requests to other paths pass
/// untouched. A rejected attempt leaves its [`LastAuthenticationFailure`]
/// in the response extensions.
pub struct LoginFilter<S, F> {
    matcher: PathRequestMatcher,
    use_case: AttemptAuthenticationUseCase,
    success_handler: S,
    failure_handler: F,
    session_strategy: Option<Arc<dyn SessionAuthenticationStrategy>>,
    details_source: AuthenticationDetailsSource,
    max_body_bytes: usize,
}

impl<S, F> LoginFilter<S, F>
where
    S: AuthenticationSuccessHandler,
    F: AuthenticationFailureHandler,
{
    pub fn new(
        login_path: impl Into<String>,
        use_case: AttemptAuthenticationUseCase,
        success_handler: S,
        failure_handler: F,
    ) -> Self {
        Self {
            matcher: PathRequestMatcher::new(login_path),
            use_case,
            success_handler,
            failure_handler,
            session_strategy: None,
            details_source: AuthenticationDetailsSource::default(),
            max_body_bytes: 64 * 1024,
        }
    }

    pub fn with_session_strategy(
        mut self,
        session_strategy: Option<Arc<dyn SessionAuthenticationStrategy>>,
    ) -> Self {
        self.session_strategy = session_strategy;
        self
    }

    /// Source of the audit details recorded for each attempt.
    pub fn with_details_source(mut self, details_source: AuthenticationDetailsSource) -> Self {
        self.details_source = details_source;
        self
    }

    pub fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    pub fn login_path(&self) -> &str {
        self.matcher.pattern()
    }
}

#[async_trait]
impl<S, F> SecurityFilter for LoginFilter<S, F>
where
    S: AuthenticationSuccessHandler,
    F: AuthenticationFailureHandler,
{
    fn name(&self) -> &'static str {
        "LoginFilter"
    }

    async fn filter(&self, request: Request) -> FilterOutcome {
        let (parts, body) = request.into_parts();
        let mut request = AxumRequest::new(parts);

        if !self.matcher.matches(&request) {
            return FilterOutcome::Continue(Request::from_parts(request.into_parts(), body));
        }

        let limit = self.max_body_bytes;
        let body = async move {
            axum::body::to_bytes(body, limit).await.map_err(|error| {
                tracing::warn!(%error, limit, "Login request body rejected");
                AuthenticationError::MalformedBody
            })
        };

        let mut response = handle_login(
            &self.use_case,
            &mut request,
            body,
            response_builder(),
            &self.success_handler,
            &self.failure_handler,
            self.session_strategy.as_deref(),
            &self.details_source,
        )
        .await;

        if let Some(failure) = request.take_attempt_failure() {
            response
                .extensions_mut()
                .insert(LastAuthenticationFailure(failure));
        }

        FilterOutcome::Respond(response)
    }
}
