//! Like, retweet, and batched count endpoints

use axum::{
    extract::{Path, State},
    response::Json,
};

use crate::AppState;
use crate::error::AppError;
use crate::service::EngagementService;

use super::converters::count_to_entry;
use super::dto::{CountsRequest, CountsResponse, EngagementRequest, MessageResponse, require_field};

/// POST /api/v1/posts/:id/like
pub async fn like_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Json(request): Json<EngagementRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let userid = require_field(request.userid, "userid")?;

    let service = EngagementService::new(state.db.clone());
    service.like(&userid, &post_id).await?;

    Ok(Json(MessageResponse::new("Post liked successfully.")))
}

/// POST /api/v1/posts/:id/unlike
pub async fn unlike_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Json(request): Json<EngagementRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let userid = require_field(request.userid, "userid")?;

    let service = EngagementService::new(state.db.clone());
    service.unlike(&userid, &post_id).await?;

    Ok(Json(MessageResponse::new("Like removed successfully.")))
}

/// POST /api/v1/posts/:id/retweet
pub async fn retweet_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Json(request): Json<EngagementRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let userid = require_field(request.userid, "userid")?;

    let service = EngagementService::new(state.db.clone());
    service.retweet(&userid, &post_id).await?;

    Ok(Json(MessageResponse::new("Successfully retweeted post.")))
}

/// POST /api/v1/posts/:id/unretweet
pub async fn unretweet_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Json(request): Json<EngagementRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let userid = require_field(request.userid, "userid")?;

    let service = EngagementService::new(state.db.clone());
    service.unretweet(&userid, &post_id).await?;

    Ok(Json(MessageResponse::new("Retweet removed successfully.")))
}

/// POST /api/v1/posts/counts
///
/// Batched like/retweet/reply counts. Posts with a zero count of a
/// kind are absent from that kind's array; an empty id list yields
/// empty arrays.
pub async fn get_counts(
    State(state): State<AppState>,
    Json(request): Json<CountsRequest>,
) -> Result<Json<CountsResponse>, AppError> {
    let post_ids = request
        .postids
        .ok_or_else(|| AppError::Validation("postids missing.".to_string()))?;

    let service = EngagementService::new(state.db.clone());
    let counts = service.batch_counts(&post_ids).await?;

    Ok(Json(CountsResponse {
        likes: counts.likes.iter().map(count_to_entry).collect(),
        retweets: counts.retweets.iter().map(count_to_entry).collect(),
        comment_counts: counts.replies.iter().map(count_to_entry).collect(),
    }))
}
