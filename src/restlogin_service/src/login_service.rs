use std::net::SocketAddr;

use axum::{
    Json, Router,
    http::{HeaderValue, Method, StatusCode, request},
    response::IntoResponse,
    routing::get,
};
use restlogin_adapters::RestLoginSettings;
use restlogin_axum::{ConfigurationError, RestLoginConfigurer, SecurityPipeline};
use restlogin_core::{
    AuthValidator, AuthenticationEntryPoint, AuthenticationFailureHandler,
    AuthenticationSuccessHandler,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::tracing::{make_span_with_request_id, on_request, on_response};

/// HTTP service combining the login endpoint with a protected application router.
pub struct LoginService {
    router: Router,
}

impl LoginService {
    /// Secure `protected` with `pipeline` after installing the login endpoint.
    ///
    /// # Arguments
    /// * `pipeline` - Host pipeline; must carry an authority
    /// * `configurer` - Login endpoint configuration
    /// * `protected` - Application routes to guard
    ///
    /// `/health` stays outside the pipeline. Unknown paths answer a JSON 404,
    /// after the pipeline has had its say.
    pub fn new<V, S, F, E>(
        mut pipeline: SecurityPipeline<V>,
        configurer: RestLoginConfigurer<S, F, E>,
        protected: Router,
    ) -> Result<Self, ConfigurationError>
    where
        V: AuthValidator<RequestParts = request::Parts>,
        S: AuthenticationSuccessHandler,
        F: AuthenticationFailureHandler,
        E: AuthenticationEntryPoint + Clone,
    {
        configurer.apply(&mut pipeline)?;

        let router = pipeline
            .secure(protected.fallback(not_found))
            .route("/health", get(health));

        Ok(Self { router })
    }

    /// [`new`](Self::new) with the configurer built from `settings`.
    pub fn from_settings<V>(
        settings: &RestLoginSettings,
        pipeline: SecurityPipeline<V>,
        protected: Router,
    ) -> Result<Self, ConfigurationError>
    where
        V: AuthValidator<RequestParts = request::Parts>,
    {
        Self::new(pipeline, RestLoginConfigurer::from_settings(settings), protected)
    }

    fn with_trace_layer(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(make_span_with_request_id)
                .on_request(on_request)
                .on_response(on_response),
        );
        self
    }

    /// Convert the service into a router that can be mounted on another router
    ///
    /// # Arguments
    /// * `allowed_origins` - Optional list of allowed CORS origins
    pub fn as_nested_router(mut self, allowed_origins: Option<Vec<String>>) -> Router {
        if let Some(allowed_origins) = allowed_origins {
            let allowed_origins: Vec<HeaderValue> = allowed_origins
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(error) => {
                        tracing::warn!(%origin, %error, "Ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();

            let cors = CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_credentials(true)
                .allow_origin(AllowOrigin::predicate(
                    move |origin: &HeaderValue, _request_parts: &request::Parts| {
                        allowed_origins.contains(origin)
                    },
                ));

            self.router = self.router.layer(cors);
        }
        self.with_trace_layer().router
    }

    /// Run the service as a standalone server
    ///
    /// Peer addresses are exposed to the pipeline through connect info.
    pub async fn run_standalone(
        self,
        listener: TcpListener,
        allowed_origins: Option<Vec<String>>,
    ) -> Result<(), std::io::Error> {
        let router = self.as_nested_router(allowed_origins);

        tracing::info!("Login service listening on {}", listener.local_addr()?);

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
    }
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Not found" })),
    )
}
