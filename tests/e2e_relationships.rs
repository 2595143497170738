//! E2E tests for follow/block operations and their invariants

mod common;

use common::TestServer;
use serde_json::Value;

#[tokio::test]
async fn test_follow_and_unfollow() {
    let server = TestServer::new().await;
    server.seed_user("u1", "alice").await;
    server.seed_user("u2", "bob").await;

    let response = server.follow("u1", "u2").await;
    assert_eq!(response.status(), 200);

    let response = server
        .client
        .delete(server.url("/api/v1/follows"))
        .json(&serde_json::json!({ "follower": "u1", "followee_id": "u2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_follow_by_username() {
    let server = TestServer::new().await;
    server.seed_user("u1", "alice").await;
    server.seed_user("u2", "bob").await;

    let response = server
        .client
        .post(server.url("/api/v1/follows"))
        .json(&serde_json::json!({
            "follower": "u1",
            "followee_username": "bob",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    // Unknown username resolves to nothing
    let response = server
        .client
        .post(server.url("/api/v1/follows"))
        .json(&serde_json::json!({
            "follower": "u1",
            "followee_username": "nobody",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_follow_missing_users() {
    let server = TestServer::new().await;
    server.seed_user("u1", "alice").await;

    // Missing followee
    let response = server.follow("u1", "ghost").await;
    assert_eq!(response.status(), 404);

    // Missing follower
    let response = server.follow("ghost", "u1").await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_self_follow_fails_validation_even_for_unknown_user() {
    let server = TestServer::new().await;

    // No such user exists, but the self-edge check comes first.
    let response = server.follow("ghost", "ghost").await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_duplicate_follow_is_conflict() {
    let server = TestServer::new().await;
    server.seed_user("u1", "alice").await;
    server.seed_user("u2", "bob").await;

    assert_eq!(server.follow("u1", "u2").await.status(), 200);
    assert_eq!(server.follow("u1", "u2").await.status(), 409);
}

#[tokio::test]
async fn test_follow_blocked_by_followee_is_forbidden() {
    let server = TestServer::new().await;
    server.seed_user("u1", "alice").await;
    server.seed_user("u2", "bob").await;

    assert_eq!(server.block("u2", "u1").await.status(), 200);

    let response = server.follow("u1", "u2").await;
    assert_eq!(response.status(), 403);
}

#[tokio::test]
async fn test_unfollow_without_edge_is_not_found() {
    let server = TestServer::new().await;
    server.seed_user("u1", "alice").await;
    server.seed_user("u2", "bob").await;

    let response = server
        .client
        .delete(server.url("/api/v1/follows"))
        .json(&serde_json::json!({ "follower": "u1", "followee_id": "u2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_self_block_fails_validation() {
    let server = TestServer::new().await;
    server.seed_user("u1", "alice").await;

    let response = server.block("u1", "u1").await;
    assert_eq!(response.status(), 400);

    // Same result when the user does not even exist.
    let response = server.block("ghost", "ghost").await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_duplicate_block_is_conflict() {
    let server = TestServer::new().await;
    server.seed_user("u1", "alice").await;
    server.seed_user("u2", "bob").await;

    assert_eq!(server.block("u1", "u2").await.status(), 200);
    assert_eq!(server.block("u1", "u2").await.status(), 409);
}

#[tokio::test]
async fn test_block_removes_follows_in_both_directions() {
    let server = TestServer::new().await;
    server.seed_user("u1", "alice").await;
    server.seed_user("u2", "bob").await;

    assert_eq!(server.follow("u1", "u2").await.status(), 200);
    assert_eq!(server.follow("u2", "u1").await.status(), 200);

    assert_eq!(server.block("u1", "u2").await.status(), 200);

    // Block dominance: neither follow direction survives.
    assert!(!server.state.db.follow_exists("u1", "u2").await.unwrap());
    assert!(!server.state.db.follow_exists("u2", "u1").await.unwrap());
    assert!(server.state.db.block_exists("u1", "u2").await.unwrap());
}

#[tokio::test]
async fn test_unblock_requires_existing_edge_and_restores_nothing() {
    let server = TestServer::new().await;
    server.seed_user("u1", "alice").await;
    server.seed_user("u2", "bob").await;

    // No block yet
    let response = server
        .client
        .delete(server.url("/api/v1/blocks"))
        .json(&serde_json::json!({ "blocker": "u1", "blockee_id": "u2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    assert_eq!(server.follow("u2", "u1").await.status(), 200);
    assert_eq!(server.block("u1", "u2").await.status(), 200);

    let response = server
        .client
        .delete(server.url("/api/v1/blocks"))
        .json(&serde_json::json!({ "blocker": "u1", "blockee_id": "u2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    // The follow edge removed by the block stays removed.
    assert!(!server.state.db.follow_exists("u2", "u1").await.unwrap());
}

#[tokio::test]
async fn test_block_then_refollow_scenario() {
    let server = TestServer::new().await;
    server.seed_user("u1", "alice").await;
    server.seed_user("u2", "bob").await;

    // Alice follows Bob, then Bob blocks Alice.
    assert_eq!(server.follow("u1", "u2").await.status(), 200);
    assert_eq!(server.block("u2", "u1").await.status(), 200);

    // Alice's home feed no longer contains Bob's posts.
    server.seed_post("u2", "Bob's post").await;
    let response = server
        .client
        .get(server.url("/api/v1/timelines/home?viewer=u1"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let feed: Vec<Value> = response.json().await.unwrap();
    assert!(feed.is_empty());

    // A renewed follow attempt is forbidden.
    assert_eq!(server.follow("u1", "u2").await.status(), 403);
}

#[tokio::test]
async fn test_missing_target_fields_fail_validation() {
    let server = TestServer::new().await;
    server.seed_user("u1", "alice").await;

    let response = server
        .client
        .post(server.url("/api/v1/follows"))
        .json(&serde_json::json!({ "follower": "u1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    // Both id and username at once is rejected too.
    let response = server
        .client
        .post(server.url("/api/v1/follows"))
        .json(&serde_json::json!({
            "follower": "u1",
            "followee_id": "u2",
            "followee_username": "bob",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}
