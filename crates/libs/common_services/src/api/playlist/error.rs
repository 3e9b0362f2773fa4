use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum PlaylistError {
    #[error("no emotion provided")]
    MissingEmotion,
}

impl IntoResponse for PlaylistError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::MissingEmotion => {
                warn!("Playlist requested without an emotion parameter");
                (StatusCode::BAD_REQUEST, "No emotion provided.".to_string())
            }
        };

        let body = Json(json!({ "status": "error", "message": message }));
        (status, body).into_response()
    }
}
