use crate::api_state::ApiContext;
use crate::routes::capture::handlers::{capture_image, detect_emotion, get_emotion};
use axum::{
    Router,
    routing::{get, post},
};

pub fn capture_router() -> Router<ApiContext> {
    Router::new()
        .route("/capture_image", post(capture_image))
        .route("/get_emotion", get(get_emotion))
        .route("/detect_emotion", post(detect_emotion))
}
