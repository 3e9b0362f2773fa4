use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use emotion_inference::InferenceError;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum CameraError {
    #[error("camera device unavailable")]
    DeviceUnavailable(#[source] InferenceError),

    #[error("no active camera session")]
    NotActive,

    #[error("frame capture failed")]
    CaptureFailed(#[source] InferenceError),

    #[error("internal error")]
    Internal(#[from] tokio::task::JoinError),
}

fn log_failure(error: &CameraError) {
    match error {
        CameraError::DeviceUnavailable(e) => error!("Could not acquire camera device: {e}"),
        CameraError::NotActive => warn!("Camera request without an active session"),
        CameraError::CaptureFailed(e) => error!("Frame capture failed: {e}"),
        CameraError::Internal(e) => error!("Camera task failed: {e}"),
    }
}

impl IntoResponse for CameraError {
    fn into_response(self) -> Response {
        log_failure(&self);

        let (status, message) = match self {
            Self::DeviceUnavailable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Could not open the camera. Make sure it is connected and not in use.".to_string(),
            ),
            Self::NotActive => (
                StatusCode::CONFLICT,
                "No active camera session. Start the camera first.".to_string(),
            ),
            Self::CaptureFailed(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to capture a frame from the camera.".to_string(),
            ),
            Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected internal error occurred.".to_string(),
            ),
        };

        let body = Json(json!({ "status": "error", "message": message }));
        (status, body).into_response()
    }
}
