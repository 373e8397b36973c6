//! Mapping of classification errors onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ClassifyError;

/// Message shown to callers for server-side failures; details stay in the logs.
const INTERNAL_MESSAGE: &str = "Could not classify image";

/// JSON error body: `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ClassifyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingImage
            | Self::Upload(_)
            | Self::Decode(_)
            | Self::ImageTooLarge { .. } => StatusCode::BAD_REQUEST,
            Self::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Timeout { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::Inference(_) => INTERNAL_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ClassifyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Classification failed: {self}");
        } else {
            tracing::debug!("Rejected request: {self}");
        }

        let body = ErrorBody {
            error: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ClassifyError::MissingImage.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ClassifyError::Decode("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ClassifyError::FileTooLarge {
                size_bytes: 10,
                max_mb: 1
            }
            .status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            ClassifyError::Inference("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_inference_detail_not_exposed() {
        let err = ClassifyError::Inference("onnx: shape [1,3,224] mismatch at node 17".into());
        assert_eq!(err.public_message(), "Could not classify image");
    }
}
