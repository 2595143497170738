//! Request and response DTOs for the HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::data::UserRef;
use crate::error::AppError;

// =============================================================================
// Users
// =============================================================================

/// User registration (get-or-create) request
#[derive(Debug, Deserialize)]
pub struct RegisterUserRequest {
    pub userid: Option<String>,
    pub username: Option<String>,
    pub picture: Option<String>,
}

/// Full user profile response
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub userid: String,
    pub username: String,
    pub bio: Option<String>,
    pub picture: Option<String>,
}

/// Minimal user entry for people discovery
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub userid: String,
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct ListUsersParams {
    /// The requesting user, excluded from the listing
    pub exclude: String,
}

// =============================================================================
// Relationships
// =============================================================================

/// Follow/unfollow request. The followee is addressed by id or by
/// username, exactly one of the two.
#[derive(Debug, Deserialize)]
pub struct FollowRequest {
    pub follower: Option<String>,
    pub followee_id: Option<String>,
    pub followee_username: Option<String>,
}

/// Block/unblock request. Same target addressing as follows.
#[derive(Debug, Deserialize)]
pub struct BlockRequest {
    pub blocker: Option<String>,
    pub blockee_id: Option<String>,
    pub blockee_username: Option<String>,
}

/// Resolve the (id, username) pair fields into a `UserRef`.
///
/// Exactly one of the two must be provided.
pub fn target_user_ref(
    id: Option<String>,
    username: Option<String>,
    field_prefix: &str,
) -> Result<UserRef, AppError> {
    match (id, username) {
        (Some(id), None) => Ok(UserRef::Id(id)),
        (None, Some(username)) => Ok(UserRef::Username(username)),
        (None, None) => Err(AppError::Validation(format!(
            "{field_prefix}_id or {field_prefix}_username missing."
        ))),
        (Some(_), Some(_)) => Err(AppError::Validation(format!(
            "Provide only one of {field_prefix}_id and {field_prefix}_username."
        ))),
    }
}

/// Extract a required string field, failing validation when absent.
pub fn require_field(value: Option<String>, name: &str) -> Result<String, AppError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::Validation(format!("{name} missing."))),
    }
}

// =============================================================================
// Posts & engagement
// =============================================================================

/// Post creation request
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub userid: Option<String>,
    pub text: Option<String>,
    pub image_key: Option<String>,
    pub parent_post_id: Option<String>,
}

/// Post response, shared by the post and timeline endpoints
#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub postid: String,
    pub userid: String,
    pub text: String,
    pub image_url: Option<String>,
    pub parent_post_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Like/retweet request body
#[derive(Debug, Deserialize)]
pub struct EngagementRequest {
    pub userid: Option<String>,
}

/// Batched counts request
#[derive(Debug, Deserialize)]
pub struct CountsRequest {
    pub postids: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct CountEntry {
    pub postid: String,
    pub count: i64,
}

/// Batched counts response. Posts with a zero count of a kind are
/// absent from that kind's array.
#[derive(Debug, Serialize)]
pub struct CountsResponse {
    pub likes: Vec<CountEntry>,
    pub retweets: Vec<CountEntry>,
    pub comment_counts: Vec<CountEntry>,
}

// =============================================================================
// Timelines
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct TimelineParams {
    pub viewer: String,
}

/// Post annotated with the viewer's own engagement
#[derive(Debug, Serialize)]
pub struct TimelineItemResponse {
    #[serde(flatten)]
    pub post: PostResponse,
    pub is_liked: bool,
    pub is_retweeted: bool,
}

// =============================================================================
// Media
// =============================================================================

/// Upload URL request
#[derive(Debug, Deserialize)]
pub struct UploadUrlRequest {
    pub userid: Option<String>,
    pub content_type: Option<String>,
}

/// Issued upload grant
#[derive(Debug, Serialize)]
pub struct UploadUrlResponse {
    pub upload_url: String,
    pub key: String,
    pub public_url: String,
}

// =============================================================================
// Generic
// =============================================================================

/// Plain success acknowledgement for mutations
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
