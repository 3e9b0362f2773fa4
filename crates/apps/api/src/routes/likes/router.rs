use crate::api_state::ApiContext;
use crate::routes::likes::handlers::like_video;
use axum::{Router, routing::post};

pub fn likes_router() -> Router<ApiContext> {
    Router::new().route("/like_video", post(like_video))
}
