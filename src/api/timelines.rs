//! Timeline endpoints

use axum::{
    extract::{Path, Query, State},
    response::Json,
};

use crate::AppState;
use crate::error::AppError;
use crate::metrics::{
    DB_QUERIES_TOTAL, DB_QUERY_DURATION_SECONDS, HTTP_REQUEST_DURATION_SECONDS, HTTP_REQUESTS_TOTAL,
};
use crate::service::TimelineService;

use super::converters::{post_to_response, timeline_item_to_response};
use super::dto::{PostResponse, TimelineItemResponse, TimelineParams};

/// GET /api/v1/timelines/home?viewer=<userid>
pub async fn home_timeline(
    State(state): State<AppState>,
    Query(params): Query<TimelineParams>,
) -> Result<Json<Vec<TimelineItemResponse>>, AppError> {
    // Start timing the request
    let _timer = HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&["GET", "/api/v1/timelines/home"])
        .start_timer();

    let service = TimelineService::new(state.db.clone());

    let db_timer = DB_QUERY_DURATION_SECONDS
        .with_label_values(&["SELECT", "posts"])
        .start_timer();
    let items = service.home_timeline(&params.viewer).await?;
    DB_QUERIES_TOTAL
        .with_label_values(&["SELECT", "posts"])
        .inc();
    db_timer.observe_duration();

    let responses: Vec<_> = items
        .iter()
        .map(|item| timeline_item_to_response(item, &state.storage))
        .collect();

    // Record successful request
    HTTP_REQUESTS_TOTAL
        .with_label_values(&["GET", "/api/v1/timelines/home", "200"])
        .inc();

    Ok(Json(responses))
}

/// GET /api/v1/timelines/thread/:postid?viewer=<userid>
pub async fn thread_timeline(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Query(params): Query<TimelineParams>,
) -> Result<Json<Vec<TimelineItemResponse>>, AppError> {
    let _timer = HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&["GET", "/api/v1/timelines/thread"])
        .start_timer();

    let service = TimelineService::new(state.db.clone());

    let db_timer = DB_QUERY_DURATION_SECONDS
        .with_label_values(&["SELECT", "posts"])
        .start_timer();
    let items = service.thread(&params.viewer, &post_id).await?;
    DB_QUERIES_TOTAL
        .with_label_values(&["SELECT", "posts"])
        .inc();
    db_timer.observe_duration();

    let responses: Vec<_> = items
        .iter()
        .map(|item| timeline_item_to_response(item, &state.storage))
        .collect();

    HTTP_REQUESTS_TOTAL
        .with_label_values(&["GET", "/api/v1/timelines/thread", "200"])
        .inc();

    Ok(Json(responses))
}

/// GET /api/v1/timelines/profile/:username?viewer=<userid>
///
/// Author-centric browsing: no like/retweet annotations.
pub async fn profile_timeline(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(params): Query<TimelineParams>,
) -> Result<Json<Vec<PostResponse>>, AppError> {
    let _timer = HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&["GET", "/api/v1/timelines/profile"])
        .start_timer();

    let service = TimelineService::new(state.db.clone());

    let db_timer = DB_QUERY_DURATION_SECONDS
        .with_label_values(&["SELECT", "posts"])
        .start_timer();
    let posts = service.profile_timeline(&params.viewer, &username).await?;
    DB_QUERIES_TOTAL
        .with_label_values(&["SELECT", "posts"])
        .inc();
    db_timer.observe_duration();

    let responses: Vec<_> = posts
        .iter()
        .map(|post| post_to_response(post, &state.storage))
        .collect();

    HTTP_REQUESTS_TOTAL
        .with_label_values(&["GET", "/api/v1/timelines/profile", "200"])
        .inc();

    Ok(Json(responses))
}
