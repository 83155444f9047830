use restlogin_adapters::RestLoginSettings;
use serde_json::{Value, json};

use crate::helpers::{BEARER_TOKEN, TestApp};

#[tokio::test]
async fn json_client_gets_json_401() {
    let app = TestApp::new().await;

    let response = app.get("/api/orders", Some("application/json")).await;

    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({
            "error": "unauthenticated",
            "message": "Full authentication is required to access this resource",
        })
    );
}

#[tokio::test]
async fn browser_gets_host_default() {
    let app = TestApp::new().await;

    let response = app
        .get("/api/orders", Some("text/html,application/xhtml+xml"))
        .await;

    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn wildcard_accept_gets_host_default() {
    let app = TestApp::new().await;

    let response = app.get("/api/orders", Some("*/*")).await;

    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn json_preferred_over_html_by_quality() {
    let app = TestApp::new().await;

    let response = app
        .get("/api/orders", Some("text/html;q=0.5, application/json"))
        .await;

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn authenticated_requests_reach_protected_routes() {
    let app = TestApp::new().await;

    let response = app
        .http_client
        .get(format!("{}/api/orders", &app.address))
        .bearer_auth(BEARER_TOKEN)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), "orders");
}

#[tokio::test]
async fn entry_point_status_comes_from_settings() {
    let app = TestApp::with_settings(RestLoginSettings {
        entry_point_status: 403,
        ..RestLoginSettings::default()
    })
    .await;

    let response = app.get("/api/orders", Some("application/json")).await;

    assert_eq!(response.status().as_u16(), 403);
    assert_eq!(response.json::<Value>().await.unwrap()["error"], "unauthenticated");
}
