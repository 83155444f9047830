//! The host security pipeline the login configurer plugs into.
//!
//! A [`SecurityPipeline`] owns an ordered filter chain, an optional
//! exception-handling layer with its entry points, optional authorization
//! rules and the shared collaborators (authority, content negotiation,
//! session strategy). [`SecurityPipeline::secure`] turns it into axum
//! middleware around a router.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Request, State};
use axum::http::request::Parts;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use restlogin_core::{
    AuthRequest, AuthValidator, AuthenticationAuthority, AuthenticationEntryPoint,
    AuthenticationError, ContentNegotiationStrategy, RequestMatcher, SessionAuthenticationStrategy,
};

use crate::adapters::{AxumRequest, response_builder};
use crate::filter::{FilterOutcome, FilterPosition, SecurityFilter};

/// A type-erased entry point producing an axum response.
pub type EntryPointHandle =
    Arc<dyn Fn(&AxumRequest, &AuthenticationError) -> Response + Send + Sync>;

/// Erase an entry point into a handle the exception-handling layer can store.
pub fn entry_point_handle<E: AuthenticationEntryPoint>(entry_point: E) -> EntryPointHandle {
    Arc::new(move |request: &AxumRequest, error: &AuthenticationError| {
        entry_point.commence(request, response_builder(), error)
    })
}

/// Plain `403 Forbidden` with no body.
pub fn forbidden_entry_point() -> EntryPointHandle {
    Arc::new(|request: &AxumRequest, _error: &AuthenticationError| {
        tracing::debug!(path = request.path(), "Pre-authenticated entry point called. Rejecting access");
        StatusCode::FORBIDDEN.into_response()
    })
}

/// Chooses the entry point for unauthenticated requests to protected resources.
///
/// Mappings are tried in registration order; the first matcher that accepts
/// the request wins. Requests no mapping accepts go to the default entry point.
#[derive(Clone)]
pub struct ExceptionHandling {
    mappings: Vec<(Arc<dyn RequestMatcher>, EntryPointHandle)>,
    default_entry_point: EntryPointHandle,
}

impl Default for ExceptionHandling {
    fn default() -> Self {
        Self {
            mappings: Vec::new(),
            default_entry_point: forbidden_entry_point(),
        }
    }
}

impl ExceptionHandling {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entry point used when no mapping matches.
    pub fn with_default_entry_point(mut self, entry_point: EntryPointHandle) -> Self {
        self.default_entry_point = entry_point;
        self
    }

    /// Register `entry_point` for requests accepted by `matcher`.
    pub fn default_entry_point_for(
        &mut self,
        entry_point: EntryPointHandle,
        matcher: Arc<dyn RequestMatcher>,
    ) -> &mut Self {
        self.mappings.push((matcher, entry_point));
        self
    }

    pub fn mapping_count(&self) -> usize {
        self.mappings.len()
    }

    pub fn commence(&self, request: &AxumRequest, error: &AuthenticationError) -> Response {
        let entry_point = self
            .mappings
            .iter()
            .find(|(matcher, _)| matcher.matches(request))
            .map(|(_, entry_point)| entry_point)
            .unwrap_or(&self.default_entry_point);

        entry_point(request, error)
    }
}

/// Request-level access rules.
///
/// Requests matched by a `permit_all` rule are let through; every other
/// request needs a prior authentication accepted by the pipeline's validator.
#[derive(Clone, Default)]
pub struct AuthorizationRules {
    permitted: Vec<Arc<dyn RequestMatcher>>,
}

impl AuthorizationRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn permit_all(&mut self, matcher: Arc<dyn RequestMatcher>) -> &mut Self {
        self.permitted.push(matcher);
        self
    }

    pub fn is_permitted(&self, request: &dyn AuthRequest) -> bool {
        self.permitted.iter().any(|matcher| matcher.matches(request))
    }
}

/// Host security pipeline: filter chain, exception handling, authorization
/// and shared collaborators.
pub struct SecurityPipeline<V> {
    validator: V,
    filters: Vec<(FilterPosition, Arc<dyn SecurityFilter>)>,
    exception_handling: Option<ExceptionHandling>,
    authorization: Option<AuthorizationRules>,
    content_negotiation: Option<Arc<dyn ContentNegotiationStrategy>>,
    session_strategy: Option<Arc<dyn SessionAuthenticationStrategy>>,
    authority: Option<Arc<dyn AuthenticationAuthority>>,
}

impl<V> SecurityPipeline<V>
where
    V: AuthValidator<RequestParts = Parts>,
{
    pub fn new(validator: V) -> Self {
        Self {
            validator,
            filters: Vec::new(),
            exception_handling: None,
            authorization: None,
            content_negotiation: None,
            session_strategy: None,
            authority: None,
        }
    }

    pub fn with_exception_handling(mut self, exception_handling: ExceptionHandling) -> Self {
        self.exception_handling = Some(exception_handling);
        self
    }

    pub fn with_authorization(mut self, rules: AuthorizationRules) -> Self {
        self.authorization = Some(rules);
        self
    }

    pub fn with_content_negotiation(mut self, strategy: Arc<dyn ContentNegotiationStrategy>) -> Self {
        self.content_negotiation = Some(strategy);
        self
    }

    pub fn with_session_strategy(mut self, strategy: Arc<dyn SessionAuthenticationStrategy>) -> Self {
        self.session_strategy = Some(strategy);
        self
    }

    pub fn with_authority(mut self, authority: Arc<dyn AuthenticationAuthority>) -> Self {
        self.authority = Some(authority);
        self
    }

    pub fn exception_handling_mut(&mut self) -> Option<&mut ExceptionHandling> {
        self.exception_handling.as_mut()
    }

    pub fn authorization_mut(&mut self) -> Option<&mut AuthorizationRules> {
        self.authorization.as_mut()
    }

    pub fn content_negotiation(&self) -> Option<Arc<dyn ContentNegotiationStrategy>> {
        self.content_negotiation.clone()
    }

    pub fn session_strategy(&self) -> Option<Arc<dyn SessionAuthenticationStrategy>> {
        self.session_strategy.clone()
    }

    pub fn authority(&self) -> Option<Arc<dyn AuthenticationAuthority>> {
        self.authority.clone()
    }

    /// Insert a filter; filters at the same position keep insertion order.
    pub fn add_filter(&mut self, position: FilterPosition, filter: Arc<dyn SecurityFilter>) {
        tracing::debug!(filter = filter.name(), ?position, "Adding security filter");
        self.filters.push((position, filter));
        self.filters.sort_by_key(|(position, _)| *position);
    }

    pub fn filter_names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|(_, filter)| filter.name()).collect()
    }

    /// Wrap `router` with the pipeline.
    pub fn secure(self, router: Router) -> Router {
        router.layer(middleware::from_fn_with_state(Arc::new(self), enforce::<V>))
    }

    fn commence(&self, request: &AxumRequest, error: &AuthenticationError) -> Response {
        match &self.exception_handling {
            Some(exception_handling) => exception_handling.commence(request, error),
            None => StatusCode::FORBIDDEN.into_response(),
        }
    }
}

async fn enforce<V>(
    State(pipeline): State<Arc<SecurityPipeline<V>>>,
    request: Request,
    next: Next,
) -> Response
where
    V: AuthValidator<RequestParts = Parts>,
{
    let mut request = request;
    for (_, filter) in &pipeline.filters {
        match filter.filter(request).await {
            FilterOutcome::Respond(response) => return response,
            FilterOutcome::Continue(passed) => request = passed,
        }
    }

    let Some(rules) = &pipeline.authorization else {
        return next.run(request).await;
    };

    let (parts, body) = request.into_parts();
    let mut head = AxumRequest::new(parts);

    if rules.is_permitted(&head) {
        return next.run(Request::from_parts(head.into_parts(), body)).await;
    }

    match pipeline.validator.validate(head.parts()).await {
        Ok(claims) => {
            head.parts_mut().extensions.insert(claims);
            next.run(Request::from_parts(head.into_parts(), body)).await
        }
        Err(error) => {
            tracing::debug!(%error, path = head.path(), "Request is not authenticated");
            pipeline.commence(&head, &AuthenticationError::InsufficientAuthentication)
        }
    }
}
