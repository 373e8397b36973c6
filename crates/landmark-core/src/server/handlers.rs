//! Request handlers.

use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::error::ClassifyError;
use crate::types::{ClassificationResult, HealthStatus};

use super::AppState;

/// Multipart field carrying the upload.
const IMAGE_FIELD: &str = "image";

/// POST /classify - classify the uploaded `image` field.
pub async fn classify(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ClassificationResult>, ClassifyError> {
    // A body that isn't multipart can't carry an image field.
    let mut multipart = multipart.map_err(|_| ClassifyError::MissingImage)?;

    let bytes = read_image_field(&mut multipart, state.service.limits().max_upload_mb).await?;
    let result = state.service.classify(bytes).await?;
    Ok(Json(result))
}

/// GET /health - liveness plus what's loaded.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    let service = &state.service;
    (
        StatusCode::OK,
        Json(HealthStatus {
            status: "ok".to_string(),
            model: service.model_id().to_string(),
            labels: service.labels().len(),
        }),
    )
}

/// Return the bytes of the first field named `image`, skipping any others.
async fn read_image_field(
    multipart: &mut Multipart,
    max_upload_mb: u64,
) -> Result<Vec<u8>, ClassifyError> {
    loop {
        let field = multipart
            .next_field()
            .await
            .map_err(|e| upload_error(e, max_upload_mb))?
            .ok_or(ClassifyError::MissingImage)?;

        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        tracing::debug!(
            "Received image field (file: {:?}, content type: {:?})",
            field.file_name(),
            field.content_type()
        );
        let bytes = field
            .bytes()
            .await
            .map_err(|e| upload_error(e, max_upload_mb))?;
        return Ok(bytes.to_vec());
    }
}

fn upload_error(err: MultipartError, max_upload_mb: u64) -> ClassifyError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ClassifyError::FileTooLarge {
            size_bytes: max_upload_mb * 1024 * 1024 + 1,
            max_mb: max_upload_mb,
        }
    } else {
        ClassifyError::Upload(err.body_text())
    }
}
