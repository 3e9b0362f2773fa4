use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("empty search query")]
    EmptyQuery,
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::EmptyQuery => {
                warn!("Rejected empty search query");
                (
                    StatusCode::BAD_REQUEST,
                    "Search query must not be empty.".to_string(),
                )
            }
        };

        let body = Json(json!({ "status": "error", "message": message }));
        (status, body).into_response()
    }
}
