use std::sync::Arc;

use async_trait::async_trait;
use axum::{Router, http::request::Parts, routing::get};
use restlogin_adapters::{InMemoryAuthority, RestLoginSettings};
use restlogin_axum::{AuthorizationRules, ExceptionHandling, SecurityPipeline};
use restlogin_core::{AuthValidator, Subject};
use restlogin_service::LoginService;
use serde::Serialize;
use tokio::net::TcpListener;

pub const BEARER_TOKEN: &str = "test-token";

#[derive(Debug)]
pub struct InvalidToken;

impl std::fmt::Display for InvalidToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("missing or invalid bearer token")
    }
}

impl std::error::Error for InvalidToken {}

/// Accepts requests carrying `Authorization: Bearer test-token`.
#[derive(Clone)]
pub struct StaticTokenValidator;

#[async_trait]
impl AuthValidator for StaticTokenValidator {
    type Claims = ();
    type RequestParts = Parts;
    type Error = InvalidToken;

    async fn validate(&self, parts: &Parts) -> Result<(), InvalidToken> {
        let expected = format!("Bearer {BEARER_TOKEN}");
        match parts.headers.get("authorization") {
            Some(value) if value.as_bytes() == expected.as_bytes() => Ok(()),
            _ => Err(InvalidToken),
        }
    }
}

pub struct TestApp {
    pub address: String,
    pub http_client: reqwest::Client,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_settings(RestLoginSettings::default()).await
    }

    pub async fn with_settings(settings: RestLoginSettings) -> Self {
        let authority = InMemoryAuthority::from_users([
            (Subject::new("alice"), "wonderland"),
            (Subject::new("bob").with_account_non_locked(false), "builder"),
            (
                Subject::new("carol").with_credentials_non_expired(false),
                "singer",
            ),
        ]);

        let pipeline = SecurityPipeline::new(StaticTokenValidator)
            .with_exception_handling(ExceptionHandling::new())
            .with_authorization(AuthorizationRules::new())
            .with_authority(Arc::new(authority));

        let protected = Router::new().route("/api/orders", get(|| async { "orders" }));

        let service = LoginService::from_settings(&settings, pipeline, protected)
            .expect("Failed to build login service");

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let address = format!("http://{}", listener.local_addr().unwrap());

        let _ = tokio::spawn(service.run_standalone(listener, None));

        let http_client = reqwest::Client::builder()
            .build()
            .expect("Failed to build http client");

        Self {
            address,
            http_client,
        }
    }

    pub async fn post_login<Body>(&self, body: &Body) -> reqwest::Response
    where
        Body: Serialize,
    {
        self.http_client
            .post(format!("{}/api/login", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_raw_login(&self, body: &'static str) -> reqwest::Response {
        self.http_client
            .post(format!("{}/api/login", &self.address))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get(&self, path: &str, accept: Option<&str>) -> reqwest::Response {
        let request = self.http_client.get(format!("{}{path}", &self.address));
        let request = match accept {
            Some(accept) => request.header("accept", accept),
            None => request,
        };
        request.send().await.expect("Failed to execute request.")
    }
}
