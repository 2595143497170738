//! Media upload URL endpoint

use axum::{extract::State, response::Json};

use crate::AppState;
use crate::error::AppError;
use crate::metrics::UPLOAD_URLS_ISSUED_TOTAL;

use super::dto::{UploadUrlRequest, UploadUrlResponse, require_field};

/// POST /api/v1/media/upload_url
///
/// Issues a time-limited presigned PUT URL. The returned key is what
/// the client passes back as a post's `image_key`.
pub async fn create_upload_url(
    State(state): State<AppState>,
    Json(request): Json<UploadUrlRequest>,
) -> Result<Json<UploadUrlResponse>, AppError> {
    let userid = require_field(request.userid, "userid")?;
    let content_type = require_field(request.content_type, "content_type")?;

    let grant = state
        .storage
        .create_upload_url(&userid, &content_type)
        .await?;

    UPLOAD_URLS_ISSUED_TOTAL
        .with_label_values(&[content_type.as_str()])
        .inc();

    Ok(Json(UploadUrlResponse {
        upload_url: grant.upload_url,
        key: grant.key,
        public_url: grant.public_url,
    }))
}
