use crate::api::camera::error::CameraError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use emotion_inference::InferenceError;
use serde_json::json;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("emotion models are not loaded")]
    ModelsNotLoaded,

    #[error("camera error")]
    Camera(#[from] CameraError),

    #[error("no face detected in frame")]
    NoFaceDetected,

    #[error("emotion inference failed")]
    Inference(#[source] InferenceError),

    #[error("invalid image upload: {0}")]
    InvalidUpload(String),

    #[error("no emotion captured yet")]
    NoSnapshot,

    #[error("internal error")]
    Internal(#[from] tokio::task::JoinError),
}

fn log_failure(error: &CaptureError) {
    match error {
        CaptureError::ModelsNotLoaded => error!("Capture requested but models are not loaded"),
        CaptureError::Camera(e) => error!("Capture pipeline camera failure: {e}"),
        CaptureError::NoFaceDetected => info!("Capture pipeline found no face in the frame"),
        CaptureError::Inference(e) => error!("Emotion inference failed: {e}"),
        CaptureError::InvalidUpload(reason) => warn!("Rejected image upload: {reason}"),
        CaptureError::NoSnapshot => info!("Emotion snapshot requested before any capture"),
        CaptureError::Internal(e) => error!("Capture task failed: {e}"),
    }
}

impl IntoResponse for CaptureError {
    fn into_response(self) -> Response {
        log_failure(&self);

        let (status, message) = match self {
            Self::ModelsNotLoaded => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Emotion models are not loaded.".to_string(),
            ),
            Self::Camera(e) => return e.into_response(),
            Self::NoFaceDetected => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "No face detected. Position your face in view of the camera and try again."
                    .to_string(),
            ),
            Self::Inference(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not classify the emotion on the captured frame.".to_string(),
            ),
            Self::InvalidUpload(reason) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid image upload: {reason}"),
            ),
            Self::NoSnapshot => (
                StatusCode::NOT_FOUND,
                "No emotion captured yet.".to_string(),
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
