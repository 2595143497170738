//! Post endpoints

use axum::{
    extract::{Path, State},
    response::Json,
};

use crate::AppState;
use crate::error::AppError;
use crate::service::PostService;

use super::converters::post_to_response;
use super::dto::{CreatePostRequest, MessageResponse, PostResponse, require_field};

/// POST /api/v1/posts
pub async fn create_post(
    State(state): State<AppState>,
    Json(request): Json<CreatePostRequest>,
) -> Result<Json<PostResponse>, AppError> {
    let userid = require_field(request.userid, "userid")?;
    let text = request
        .text
        .ok_or_else(|| AppError::Validation("text missing.".to_string()))?;

    let service = PostService::new(state.db.clone());
    let post = service
        .create(&userid, text, request.image_key, request.parent_post_id)
        .await?;

    Ok(Json(post_to_response(&post, &state.storage)))
}

/// GET /api/v1/posts/:id
pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<PostResponse>, AppError> {
    let service = PostService::new(state.db.clone());
    let post = service.get(&post_id).await?;

    Ok(Json(post_to_response(&post, &state.storage)))
}

/// DELETE /api/v1/posts/:id
pub async fn delete_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let service = PostService::new(state.db.clone());
    service.delete(&post_id).await?;

    Ok(Json(MessageResponse::new("Post deleted successfully.")))
}
