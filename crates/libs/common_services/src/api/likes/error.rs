use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum LikesError {
    #[error("invalid liked item: {0}")]
    InvalidInput(String),

    #[error("i/o error")]
    Io(#[from] std::io::Error),

    #[error("serialization error")]
    Serde(#[from] serde_json::Error),

    #[error("liked-items store lock poisoned")]
    LockPoisoned,
}

fn log_failure(error: &LikesError) {
    match error {
        LikesError::InvalidInput(reason) => warn!("Rejected liked item: {reason}"),
        LikesError::Io(e) => error!("Failed to persist liked items: {e}"),
        LikesError::Serde(e) => error!("Failed to serialize liked items: {e}"),
        LikesError::LockPoisoned => error!("Liked-items store lock poisoned"),
    }
}

impl IntoResponse for LikesError {
    fn into_response(self) -> Response {
        log_failure(&self);

        let (status, message) = match self {
            Self::InvalidInput(reason) => (StatusCode::BAD_REQUEST, reason),
            Self::Io(_) | Self::Serde(_) | Self::LockPoisoned => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to save the liked item.".to_string(),
            ),
        };

        let body = Json(json!({ "status": "error", "message": message }));
        (status, body).into_response()
    }
}
