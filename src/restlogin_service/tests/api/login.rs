use serde_json::{Value, json};

use crate::helpers::TestApp;

#[tokio::test]
async fn valid_credentials_return_subject_attributes() {
    let app = TestApp::new().await;

    let response = app
        .post_login(&json!({ "username": "alice", "password": "wonderland" }))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response
            .headers()
            .get("content-type")
            .and_then(|value| value.to_str().ok()),
        Some("application/json")
    );
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({
            "username": "alice",
            "enabled": true,
            "credentialsNonExpired": true,
            "expired": false,
            "locked": false,
        })
    );
}

#[tokio::test]
async fn wrong_password_is_401() {
    let app = TestApp::new().await;

    let response = app
        .post_login(&json!({ "username": "alice", "password": "nope" }))
        .await;

    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({ "error": "Bad credentials" })
    );
}

#[tokio::test]
async fn missing_password_is_rejected_as_bad_credentials() {
    let app = TestApp::new().await;

    let response = app.post_login(&json!({ "username": "alice" })).await;

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn locked_and_expired_accounts_are_reported() {
    let app = TestApp::new().await;

    let locked = app
        .post_login(&json!({ "username": "bob", "password": "builder" }))
        .await;
    let expired = app
        .post_login(&json!({ "username": "carol", "password": "singer" }))
        .await;

    assert_eq!(
        locked.json::<Value>().await.unwrap(),
        json!({ "error": "User account is locked" })
    );
    assert_eq!(
        expired.json::<Value>().await.unwrap(),
        json!({ "error": "User credentials have expired" })
    );
}

#[tokio::test]
async fn malformed_body_is_400_without_parser_details() {
    let app = TestApp::new().await;

    let response = app.post_raw_login("{\"username\": ").await;

    assert_eq!(response.status().as_u16(), 400);
    let body = response.json::<Value>().await.unwrap();
    assert_eq!(
        body,
        json!({ "error": "Authentication failed: request body is not valid JSON" })
    );
}

#[tokio::test]
async fn get_on_login_path_is_unsupported() {
    let app = TestApp::new().await;

    let response = app.get("/api/login", Some("application/json")).await;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({ "error": "Authentication method not supported: GET" })
    );
}

#[tokio::test]
async fn repeated_failures_are_indistinguishable() {
    let app = TestApp::new().await;
    let body = json!({ "username": "alice", "password": "nope" });

    let first = app.post_login(&body).await;
    let second = app.post_login(&body).await;

    assert_eq!(first.status(), second.status());
    assert_eq!(
        first.json::<Value>().await.unwrap(),
        second.json::<Value>().await.unwrap()
    );
}

#[tokio::test]
async fn unknown_users_look_like_wrong_passwords() {
    let app = TestApp::new().await;

    let unknown = app
        .post_login(&json!({ "username": "mallory", "password": "x" }))
        .await;
    let wrong = app
        .post_login(&json!({ "username": "alice", "password": "x" }))
        .await;

    assert_eq!(unknown.status(), wrong.status());
    assert_eq!(
        unknown.json::<Value>().await.unwrap(),
        wrong.json::<Value>().await.unwrap()
    );
}
