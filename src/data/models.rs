//! Data models
//!
//! Rust structs representing database entities.
//! Post IDs are ULIDs; all timestamps are chrono UTC.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// ID Types
// =============================================================================

/// Entity ID wrapper (ULID format, 26 characters)
///
/// ULIDs are time-ordered, so sorting by id is itself roughly
/// chronological. Example: "01ARZ3NDEKTSV4RRFFQ69G5FAV"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    /// Generate a new ULID
    pub fn new() -> Self {
        Self(ulid::Ulid::new().to_string())
    }

    /// Create from existing string
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// How a mutation addresses its target user.
///
/// Several entry points name the followee/blockee by username rather
/// than userid; resolution to exactly one userid happens before any
/// invariant check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserRef {
    Id(String),
    Username(String),
}

// =============================================================================
// User
// =============================================================================

/// A registered user.
///
/// The `userid` is the caller-supplied upstream identity; `username`
/// is unique and used for mentions and profile lookup.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub userid: String,
    pub username: String,
    pub bio: Option<String>,
    /// Public URL of the profile picture
    pub picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial profile update over the fixed mutable field set.
///
/// The UPDATE statement is built only from these fields; caller input
/// never names columns.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilePatch {
    pub bio: Option<String>,
    pub username: Option<String>,
    pub picture: Option<String>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.bio.is_none() && self.username.is_none() && self.picture.is_none()
    }
}

// =============================================================================
// Post
// =============================================================================

/// A post.
///
/// `parent_post_id` is None for root posts and references the parent
/// for replies.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: String,
    pub author_id: String,
    pub text_content: String,
    /// Object-storage key of an attached image, opaque to the core
    pub image_key: Option<String>,
    pub parent_post_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn is_root(&self) -> bool {
        self.parent_post_id.is_none()
    }
}

// =============================================================================
// Relationship edges
// =============================================================================

/// A follow relationship: `follower` follows `followee`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FollowEdge {
    pub follower: String,
    pub followee: String,
    pub created_at: DateTime<Utc>,
}

/// A block relationship: `blocker` has blocked `blockee`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BlockEdge {
    pub blocker: String,
    pub blockee: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Engagement
// =============================================================================

/// Per-post count row returned by the batched count queries.
///
/// Posts with a zero count of a kind are simply absent from that
/// kind's result set; callers treat absence as zero.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PostCount {
    pub post_id: String,
    pub count: i64,
}

/// Batched engagement counts for a set of posts.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EngagementCounts {
    pub likes: Vec<PostCount>,
    pub retweets: Vec<PostCount>,
    pub replies: Vec<PostCount>,
}
