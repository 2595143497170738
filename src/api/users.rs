//! User registry endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};

use crate::AppState;
use crate::data::ProfilePatch;
use crate::error::AppError;
use crate::service::ProfileService;

use super::converters::{user_to_response, user_to_summary};
use super::dto::{
    ListUsersParams, MessageResponse, RegisterUserRequest, UserResponse, UserSummary, require_field,
};

/// POST /api/v1/users
///
/// Get-or-create keyed by userid. Returns 201 when a new user was
/// created, 200 when the profile already existed.
pub async fn register_user(
    State(state): State<AppState>,
    Json(request): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let userid = require_field(request.userid, "userid")?;
    let username = require_field(request.username, "username")?;
    let picture = require_field(request.picture, "picture")?;

    let service = ProfileService::new(state.db.clone());
    let (user, created) = service.register(&userid, &username, &picture).await?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(user_to_response(&user))))
}

/// GET /api/v1/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(userid): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let service = ProfileService::new(state.db.clone());
    let user = service.get(&userid).await?;

    Ok(Json(user_to_response(&user)))
}

/// GET /api/v1/users?exclude=<userid>
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListUsersParams>,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    let service = ProfileService::new(state.db.clone());
    let users = service.list_others(&params.exclude).await?;

    Ok(Json(users.iter().map(user_to_summary).collect()))
}

/// PATCH /api/v1/users/:id
///
/// Partial update over the fixed mutable field set {bio, username,
/// picture}; unknown fields are ignored.
pub async fn update_profile(
    State(state): State<AppState>,
    Path(userid): Path<String>,
    Json(patch): Json<ProfilePatch>,
) -> Result<Json<MessageResponse>, AppError> {
    let service = ProfileService::new(state.db.clone());
    service.update(&userid, &patch).await?;

    Ok(Json(MessageResponse::new("Profile updated successfully.")))
}
