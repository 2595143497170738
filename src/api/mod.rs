//! API layer
//!
//! HTTP handlers for:
//! - User registry and profiles
//! - Relationships (follows, blocks)
//! - Posts and engagement
//! - Timelines
//! - Media upload URLs
//! - Metrics (Prometheus)

use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::AppState;

mod converters;
mod dto;
mod engagement;
mod media;
pub mod metrics;
mod posts;
mod relationships;
mod timelines;
mod users;

pub use converters::*;
pub use dto::*;

pub use metrics::metrics_router;

/// Create the API router
pub fn api_router() -> Router<AppState> {
    Router::new()
        // Users
        .route("/v1/users", post(users::register_user))
        .route("/v1/users", get(users::list_users))
        .route("/v1/users/:id", get(users::get_user))
        .route("/v1/users/:id", patch(users::update_profile))
        // Relationships
        .route("/v1/follows", post(relationships::follow))
        .route("/v1/follows", delete(relationships::unfollow))
        .route("/v1/blocks", post(relationships::block))
        .route("/v1/blocks", delete(relationships::unblock))
        // Posts
        .route("/v1/posts", post(posts::create_post))
        .route("/v1/posts/counts", post(engagement::get_counts))
        .route("/v1/posts/:id", get(posts::get_post))
        .route("/v1/posts/:id", delete(posts::delete_post))
        // Engagement
        .route("/v1/posts/:id/like", post(engagement::like_post))
        .route("/v1/posts/:id/unlike", post(engagement::unlike_post))
        .route("/v1/posts/:id/retweet", post(engagement::retweet_post))
        .route("/v1/posts/:id/unretweet", post(engagement::unretweet_post))
        // Timelines
        .route("/v1/timelines/home", get(timelines::home_timeline))
        .route(
            "/v1/timelines/thread/:postid",
            get(timelines::thread_timeline),
        )
        .route(
            "/v1/timelines/profile/:username",
            get(timelines::profile_timeline),
        )
        // Media
        .route("/v1/media/upload_url", post(media::create_upload_url))
}
