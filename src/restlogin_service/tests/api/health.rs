use serde_json::{Value, json};

use crate::helpers::{BEARER_TOKEN, TestApp};

#[tokio::test]
async fn health_is_public() {
    let app = TestApp::new().await;

    let response = app.get("/health", None).await;

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.json::<Value>().await.unwrap(), json!({ "status": "ok" }));
}

#[tokio::test]
async fn unknown_paths_answer_json_404_once_authenticated() {
    let app = TestApp::new().await;

    let response = app
        .http_client
        .get(format!("{}/nowhere", &app.address))
        .bearer_auth(BEARER_TOKEN)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status().as_u16(), 404);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({ "error": "Not found" })
    );
}
