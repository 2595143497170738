//! Follow and block endpoints
//!
//! One handler pair per edge type; the target user is addressed by id
//! or by username and resolved before any invariant check.

use axum::{extract::State, response::Json};

use crate::AppState;
use crate::error::AppError;
use crate::service::RelationshipService;

use super::dto::{BlockRequest, FollowRequest, MessageResponse, require_field, target_user_ref};

/// POST /api/v1/follows
pub async fn follow(
    State(state): State<AppState>,
    Json(request): Json<FollowRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let follower = require_field(request.follower, "follower")?;
    let followee = target_user_ref(request.followee_id, request.followee_username, "followee")?;

    let service = RelationshipService::new(state.db.clone());
    service.follow(&follower, &followee).await?;

    Ok(Json(MessageResponse::new("Successfully followed user.")))
}

/// DELETE /api/v1/follows
pub async fn unfollow(
    State(state): State<AppState>,
    Json(request): Json<FollowRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let follower = require_field(request.follower, "follower")?;
    let followee = target_user_ref(request.followee_id, request.followee_username, "followee")?;

    let service = RelationshipService::new(state.db.clone());
    service.unfollow(&follower, &followee).await?;

    Ok(Json(MessageResponse::new("Successfully unfollowed user.")))
}

/// POST /api/v1/blocks
pub async fn block(
    State(state): State<AppState>,
    Json(request): Json<BlockRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let blocker = require_field(request.blocker, "blocker")?;
    let blockee = target_user_ref(request.blockee_id, request.blockee_username, "blockee")?;

    let service = RelationshipService::new(state.db.clone());
    service.block(&blocker, &blockee).await?;

    Ok(Json(MessageResponse::new("Successfully blocked user.")))
}

/// DELETE /api/v1/blocks
pub async fn unblock(
    State(state): State<AppState>,
    Json(request): Json<BlockRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let blocker = require_field(request.blocker, "blocker")?;
    let blockee = target_user_ref(request.blockee_id, request.blockee_username, "blockee")?;

    let service = RelationshipService::new(state.db.clone());
    service.unblock(&blocker, &blockee).await?;

    Ok(Json(MessageResponse::new("Successfully unblocked user.")))
}
