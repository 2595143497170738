//! E2E tests for upload URL signing

mod common;

use common::TestServer;
use serde_json::Value;

#[tokio::test]
async fn test_create_upload_url() {
    let server = TestServer::new().await;
    server.seed_user("u1", "alice").await;

    let response = server
        .client
        .post(server.url("/api/v1/media/upload_url"))
        .json(&serde_json::json!({
            "userid": "u1",
            "content_type": "image/png",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let json: Value = response.json().await.unwrap();
    let key = json["key"].as_str().unwrap();
    assert!(key.starts_with("uploads/u1/"));
    assert!(key.ends_with(".png"));

    let upload_url = json["upload_url"].as_str().unwrap();
    assert!(upload_url.contains(key));

    assert_eq!(
        json["public_url"],
        format!("https://media.test.example.com/{key}")
    );
}

#[tokio::test]
async fn test_create_upload_url_unsupported_type() {
    let server = TestServer::new().await;
    server.seed_user("u1", "alice").await;

    let response = server
        .client
        .post(server.url("/api/v1/media/upload_url"))
        .json(&serde_json::json!({
            "userid": "u1",
            "content_type": "application/zip",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_create_upload_url_missing_fields() {
    let server = TestServer::new().await;

    let response = server
        .client
        .post(server.url("/api/v1/media/upload_url"))
        .json(&serde_json::json!({ "userid": "u1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}
