use std::sync::Arc;

use axum::http::request::Parts;
use restlogin_adapters::{
    RestAuthenticationEntryPoint, RestAuthenticationFailureHandler,
    RestAuthenticationSuccessHandler, RestLoginSettings,
};
use restlogin_application::{AttemptAuthenticationUseCase, CredentialExtractor};
use restlogin_core::{
    AnyRequestMatcher, AuthValidator, AuthenticationDetailsSource, AuthenticationEntryPoint, AuthenticationFailureHandler,
    AuthenticationSuccessHandler, HeaderContentNegotiationStrategy, MediaType,
    MediaTypeRequestMatcher, PathRequestMatcher, RequestMatcher,
};

use crate::error::ConfigurationError;
use crate::filter::FilterPosition;
use crate::login_filter::LoginFilter;
use crate::pipeline::{SecurityPipeline, entry_point_handle};

/// Installs the JSON login endpoint into a [`SecurityPipeline`].
///
/// Assembly runs in two phases, mirroring how a host pipeline is built:
/// [`register_entry_point`](Self::register_entry_point) while shared layers
/// are being set up, then [`install_filter`](Self::install_filter) once the
/// collaborators are known. [`apply`](Self::apply) runs both.
#[derive(Debug, Clone)]
pub struct RestLoginConfigurer<
    S = RestAuthenticationSuccessHandler,
    F = RestAuthenticationFailureHandler,
    E = RestAuthenticationEntryPoint,
> {
    login_path: String,
    permit_all: bool,
    require_json_accept: bool,
    username_parameter: String,
    password_parameter: String,
    max_body_bytes: usize,
    session_cookie_name: String,
    trust_forwarded_for: bool,
    success_handler: S,
    failure_handler: F,
    entry_point: E,
}

impl Default for RestLoginConfigurer {
    fn default() -> Self {
        Self::from_settings(&RestLoginSettings::default())
    }
}

impl RestLoginConfigurer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configurer with every knob taken from `settings`.
    pub fn from_settings(settings: &RestLoginSettings) -> Self {
        Self {
            login_path: settings.login_path.clone(),
            permit_all: settings.permit_all,
            require_json_accept: settings.require_json_accept,
            username_parameter: settings.username_parameter.clone(),
            password_parameter: settings.password_parameter.clone(),
            max_body_bytes: settings.max_body_bytes,
            session_cookie_name: settings.session_cookie_name.clone(),
            trust_forwarded_for: settings.trust_forwarded_for,
            success_handler: RestAuthenticationSuccessHandler::new(),
            failure_handler: RestAuthenticationFailureHandler::with_policy(settings.failure_status),
            entry_point: RestAuthenticationEntryPoint::with_status(settings.entry_point_status),
        }
    }
}

impl<S, F, E> RestLoginConfigurer<S, F, E>
where
    S: AuthenticationSuccessHandler,
    F: AuthenticationFailureHandler,
    E: AuthenticationEntryPoint + Clone,
{
    pub fn login_processing_url(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    pub fn permit_all(mut self, permit_all: bool) -> Self {
        self.permit_all = permit_all;
        self
    }

    /// When `false` the entry point answers every unauthenticated request,
    /// whatever the client accepts.
    pub fn require_json_accept(mut self, require: bool) -> Self {
        self.require_json_accept = require;
        self
    }

    pub fn username_parameter(mut self, name: impl Into<String>) -> Self {
        self.username_parameter = name.into();
        self
    }

    pub fn password_parameter(mut self, name: impl Into<String>) -> Self {
        self.password_parameter = name.into();
        self
    }

    pub fn max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    pub fn session_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.session_cookie_name = name.into();
        self
    }

    /// Record the first `x-forwarded-for` hop as the remote address.
    ///
    /// Only enable behind a proxy that overwrites the header.
    pub fn trust_forwarded_for(mut self, trust: bool) -> Self {
        self.trust_forwarded_for = trust;
        self
    }

    pub fn success_handler<S2: AuthenticationSuccessHandler>(
        self,
        handler: S2,
    ) -> RestLoginConfigurer<S2, F, E> {
        RestLoginConfigurer {
            login_path: self.login_path,
            permit_all: self.permit_all,
            require_json_accept: self.require_json_accept,
            username_parameter: self.username_parameter,
            password_parameter: self.password_parameter,
            max_body_bytes: self.max_body_bytes,
            session_cookie_name: self.session_cookie_name,
            trust_forwarded_for: self.trust_forwarded_for,
            success_handler: handler,
            failure_handler: self.failure_handler,
            entry_point: self.entry_point,
        }
    }

    pub fn failure_handler<F2: AuthenticationFailureHandler>(
        self,
        handler: F2,
    ) -> RestLoginConfigurer<S, F2, E> {
        RestLoginConfigurer {
            login_path: self.login_path,
            permit_all: self.permit_all,
            require_json_accept: self.require_json_accept,
            username_parameter: self.username_parameter,
            password_parameter: self.password_parameter,
            max_body_bytes: self.max_body_bytes,
            session_cookie_name: self.session_cookie_name,
            trust_forwarded_for: self.trust_forwarded_for,
            success_handler: self.success_handler,
            failure_handler: handler,
            entry_point: self.entry_point,
        }
    }

    pub fn entry_point<E2: AuthenticationEntryPoint + Clone>(
        self,
        entry_point: E2,
    ) -> RestLoginConfigurer<S, F, E2> {
        RestLoginConfigurer {
            login_path: self.login_path,
            permit_all: self.permit_all,
            require_json_accept: self.require_json_accept,
            username_parameter: self.username_parameter,
            password_parameter: self.password_parameter,
            max_body_bytes: self.max_body_bytes,
            session_cookie_name: self.session_cookie_name,
            trust_forwarded_for: self.trust_forwarded_for,
            success_handler: self.success_handler,
            failure_handler: self.failure_handler,
            entry_point,
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Register the entry point with the pipeline's exception-handling layer.
    ///
    /// Does nothing when the pipeline has no exception-handling layer.
    pub fn register_entry_point<V>(&self, pipeline: &mut SecurityPipeline<V>)
    where
        V: AuthValidator<RequestParts = Parts>,
    {
        let matcher: Arc<dyn RequestMatcher> = if self.require_json_accept {
            let strategy = pipeline
                .content_negotiation()
                .unwrap_or_else(|| Arc::new(HeaderContentNegotiationStrategy));
            Arc::new(
                MediaTypeRequestMatcher::new(strategy, vec![MediaType::application_json()])
                    .with_ignored_media_types(vec![MediaType::all()]),
            )
        } else {
            Arc::new(AnyRequestMatcher)
        };

        let Some(exception_handling) = pipeline.exception_handling_mut() else {
            tracing::debug!("No exception handling configured; JSON entry point not registered");
            return;
        };

        exception_handling.default_entry_point_for(entry_point_handle(self.entry_point.clone()), matcher);
        tracing::debug!(
            require_json_accept = self.require_json_accept,
            "Registered JSON authentication entry point"
        );
    }

    /// Build the login filter and insert it at the authentication position.
    #[tracing::instrument(name = "RestLoginConfigurer::install_filter", skip_all, fields(login_path = %self.login_path))]
    pub fn install_filter<V>(self, pipeline: &mut SecurityPipeline<V>) -> Result<(), ConfigurationError>
    where
        V: AuthValidator<RequestParts = Parts>,
    {
        let authority = pipeline.authority().ok_or(ConfigurationError::MissingAuthority)?;

        if self.permit_all {
            let rules = pipeline
                .authorization_mut()
                .ok_or_else(|| ConfigurationError::MissingAuthorizationLayer(self.login_path.clone()))?;
            rules.permit_all(Arc::new(PathRequestMatcher::new(self.login_path.clone())));
        }

        let extractor = CredentialExtractor::new(self.username_parameter, self.password_parameter);
        let use_case = AttemptAuthenticationUseCase::new(authority, extractor);
        let filter = LoginFilter::new(self.login_path, use_case, self.success_handler, self.failure_handler)
            .with_session_strategy(pipeline.session_strategy())
            .with_details_source(
                AuthenticationDetailsSource::new(self.session_cookie_name)
                    .with_trust_forwarded_for(self.trust_forwarded_for),
            )
            .with_max_body_bytes(self.max_body_bytes);

        pipeline.add_filter(FilterPosition::Authentication, Arc::new(filter));
        tracing::info!("Login filter installed");
        Ok(())
    }

    /// Run [`register_entry_point`](Self::register_entry_point) then
    /// [`install_filter`](Self::install_filter).
    pub fn apply<V>(self, pipeline: &mut SecurityPipeline<V>) -> Result<(), ConfigurationError>
    where
        V: AuthValidator<RequestParts = Parts>,
    {
        self.register_entry_point(pipeline);
        self.install_filter(pipeline)
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use async_trait::async_trait;
    use axum::Router;
    use axum::body::Body;
    use axum::extract::{ConnectInfo, Request};
    use axum::http::StatusCode;
    use axum::routing::get;
    use restlogin_core::{
        AuthRequest, Authentication, AuthenticationAuthority, AuthenticationError,
        AuthorityError, Credentials, FixedContentNegotiationStrategy, RejectionReason,
        SessionAuthenticationStrategy, SessionDirectives, Subject,
    };
    use secrecy::ExposeSecret;
    use tower::ServiceExt;

    use super::*;
    use crate::adapters::LastAuthenticationFailure;
    use crate::pipeline::{AuthorizationRules, ExceptionHandling};

    /// Accepts a login when the password equals the username.
    struct PasswordIsUsername;

    #[async_trait]
    impl AuthenticationAuthority for PasswordIsUsername {
        async fn authenticate(&self, credentials: &Credentials) -> Result<Subject, AuthorityError> {
            if credentials.password().expose_secret() == credentials.username() {
                Ok(Subject::new(credentials.username()))
            } else {
                Err(RejectionReason::BadCredentials.into())
            }
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("no session")]
    struct NoSession;

    #[derive(Clone)]
    struct NeverAuthenticated;

    #[async_trait]
    impl AuthValidator for NeverAuthenticated {
        type Claims = ();
        type RequestParts = Parts;
        type Error = NoSession;

        async fn validate(&self, _parts: &Parts) -> Result<(), NoSession> {
            Err(NoSession)
        }
    }

    struct SessionCookie;

    impl SessionAuthenticationStrategy for SessionCookie {
        fn on_authentication(
            &self,
            _authentication: &Authentication,
            _request: &dyn AuthRequest,
        ) -> Result<SessionDirectives, AuthenticationError> {
            Ok(SessionDirectives::new().with_cookie("SESSION=fresh; HttpOnly"))
        }
    }

    /// Answers every login with the recorded remote address as a cookie.
    struct RemoteAddressCookie;

    impl SessionAuthenticationStrategy for RemoteAddressCookie {
        fn on_authentication(
            &self,
            authentication: &Authentication,
            _request: &dyn AuthRequest,
        ) -> Result<SessionDirectives, AuthenticationError> {
            let address = authentication.details().remote_address.as_deref().unwrap_or("none");
            Ok(SessionDirectives::new().with_cookie(format!("REMOTE={address}")))
        }
    }

    fn full_pipeline() -> SecurityPipeline<NeverAuthenticated> {
        SecurityPipeline::new(NeverAuthenticated)
            .with_exception_handling(ExceptionHandling::new())
            .with_authorization(AuthorizationRules::new())
            .with_authority(Arc::new(PasswordIsUsername))
    }

    fn app(pipeline: SecurityPipeline<NeverAuthenticated>) -> Router {
        pipeline.secure(Router::new().route("/api/orders", get(|| async { "orders" })))
    }

    fn login(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/api/login")
            .header("content-type", "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    fn orders(accept: Option<&str>) -> Request {
        let builder = Request::builder().uri("/api/orders");
        let builder = match accept {
            Some(accept) => builder.header("accept", accept),
            None => builder,
        };
        builder.body(Body::empty()).unwrap()
    }

    async fn json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn defaults_follow_settings_defaults() {
        let configurer = RestLoginConfigurer::new();

        assert_eq!(configurer.login_path(), "/api/login");
        assert!(configurer.permit_all);
        assert!(configurer.require_json_accept);
        assert_eq!(configurer.max_body_bytes, 64 * 1024);
    }

    #[test]
    fn forwarded_header_is_untrusted_by_default() {
        assert!(!RestLoginConfigurer::new().trust_forwarded_for);

        let settings = RestLoginSettings {
            trust_forwarded_for: true,
            ..RestLoginSettings::default()
        };
        assert!(RestLoginConfigurer::from_settings(&settings).trust_forwarded_for);
    }

    #[test]
    fn missing_authority_is_a_configuration_error() {
        let mut pipeline = SecurityPipeline::new(NeverAuthenticated)
            .with_authorization(AuthorizationRules::new());

        let result = RestLoginConfigurer::new().apply(&mut pipeline);

        assert_eq!(result, Err(ConfigurationError::MissingAuthority));
    }

    #[test]
    fn permit_all_without_authorization_layer_is_an_error() {
        let mut pipeline =
            SecurityPipeline::new(NeverAuthenticated).with_authority(Arc::new(PasswordIsUsername));

        let result = RestLoginConfigurer::new().install_filter(&mut pipeline);

        assert_eq!(
            result,
            Err(ConfigurationError::MissingAuthorizationLayer("/api/login".into()))
        );
    }

    #[test]
    fn permit_all_disabled_needs_no_authorization_layer() {
        let mut pipeline =
            SecurityPipeline::new(NeverAuthenticated).with_authority(Arc::new(PasswordIsUsername));

        RestLoginConfigurer::new()
            .permit_all(false)
            .install_filter(&mut pipeline)
            .unwrap();

        assert_eq!(pipeline.filter_names(), vec!["LoginFilter"]);
    }

    #[test]
    fn entry_point_registration_without_exception_handling_is_a_no_op() {
        let mut pipeline = SecurityPipeline::new(NeverAuthenticated);

        RestLoginConfigurer::new().register_entry_point(&mut pipeline);

        assert!(pipeline.exception_handling_mut().is_none());
    }

    #[test]
    fn entry_point_is_registered_once() {
        let mut pipeline = full_pipeline();

        RestLoginConfigurer::new().register_entry_point(&mut pipeline);

        assert_eq!(pipeline.exception_handling_mut().map(|eh| eh.mapping_count()), Some(1));
    }

    #[tokio::test]
    async fn login_path_is_reachable_without_prior_authentication() {
        let mut pipeline = full_pipeline();
        RestLoginConfigurer::new().apply(&mut pipeline).unwrap();

        let response = app(pipeline)
            .oneshot(login(r#"{"username":"alice","password":"alice"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json(response).await["username"], "alice");
    }

    #[tokio::test]
    async fn custom_parameter_names_are_used() {
        let mut pipeline = full_pipeline();
        RestLoginConfigurer::new()
            .username_parameter("user")
            .password_parameter("pass")
            .apply(&mut pipeline)
            .unwrap();

        let response = app(pipeline)
            .oneshot(login(r#"{"user":"bob","pass":"bob"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn session_strategy_from_pipeline_is_propagated() {
        let mut pipeline = full_pipeline().with_session_strategy(Arc::new(SessionCookie));
        RestLoginConfigurer::new().apply(&mut pipeline).unwrap();

        let response = app(pipeline)
            .oneshot(login(r#"{"username":"alice","password":"alice"}"#))
            .await
            .unwrap();

        assert_eq!(
            response.headers().get("set-cookie").and_then(|v| v.to_str().ok()),
            Some("SESSION=fresh; HttpOnly")
        );
    }

    #[tokio::test]
    async fn json_clients_get_the_json_entry_point() {
        let mut pipeline = full_pipeline();
        RestLoginConfigurer::new().apply(&mut pipeline).unwrap();

        let response = app(pipeline).oneshot(orders(Some("application/json"))).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json(response).await["error"], "unauthenticated");
    }

    #[tokio::test]
    async fn browsers_and_wildcards_get_the_host_default() {
        let mut pipeline = full_pipeline();
        RestLoginConfigurer::new().apply(&mut pipeline).unwrap();
        let app = app(pipeline);

        for accept in [Some("text/html"), Some("*/*"), None] {
            let response = app.clone().oneshot(orders(accept)).await.unwrap();
            assert_eq!(response.status(), StatusCode::FORBIDDEN, "accept: {accept:?}");
        }
    }

    #[tokio::test]
    async fn json_accept_match_can_be_disabled() {
        let mut pipeline = full_pipeline();
        RestLoginConfigurer::new()
            .require_json_accept(false)
            .apply(&mut pipeline)
            .unwrap();

        let response = app(pipeline).oneshot(orders(Some("text/html"))).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn pipeline_negotiation_strategy_is_used() {
        let mut pipeline = full_pipeline().with_content_negotiation(Arc::new(
            FixedContentNegotiationStrategy::new(vec![MediaType::application_json()]),
        ));
        RestLoginConfigurer::new().apply(&mut pipeline).unwrap();

        let response = app(pipeline).oneshot(orders(Some("text/html"))).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn entry_point_status_is_configurable() {
        let mut pipeline = full_pipeline();
        RestLoginConfigurer::new()
            .entry_point(RestAuthenticationEntryPoint::with_status(403))
            .apply(&mut pipeline)
            .unwrap();

        let response = app(pipeline).oneshot(orders(Some("application/json"))).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(json(response).await["error"], "unauthenticated");
    }

    #[tokio::test]
    async fn rejected_login_response_carries_the_failure() {
        let mut pipeline = full_pipeline();
        RestLoginConfigurer::new().apply(&mut pipeline).unwrap();

        let response = app(pipeline)
            .oneshot(login(r#"{"username":"alice","password":"wrong"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response
                .extensions()
                .get::<LastAuthenticationFailure>()
                .map(|failure| failure.0.code()),
            Some("bad_credentials")
        );
    }

    #[tokio::test]
    async fn remote_address_comes_from_the_peer_unless_proxy_is_trusted() {
        for (trust, expected) in [(false, "REMOTE=192.0.2.10"), (true, "REMOTE=203.0.113.7")] {
            let mut pipeline = full_pipeline().with_session_strategy(Arc::new(RemoteAddressCookie));
            RestLoginConfigurer::new()
                .trust_forwarded_for(trust)
                .apply(&mut pipeline)
                .unwrap();

            let mut request = login(r#"{"username":"alice","password":"alice"}"#);
            request
                .headers_mut()
                .insert("x-forwarded-for", "203.0.113.7".parse().unwrap());
            request
                .extensions_mut()
                .insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 10], 5555))));

            let response = app(pipeline).oneshot(request).await.unwrap();

            assert_eq!(
                response.headers().get("set-cookie").and_then(|v| v.to_str().ok()),
                Some(expected),
                "trust_forwarded_for: {trust}"
            );
        }
    }
}
