use crate::api_state::ApiContext;
use crate::routes::camera::handlers::{start_camera, stop_camera, video_feed};
use axum::{
    Router,
    routing::{get, post},
};

pub fn camera_router() -> Router<ApiContext> {
    Router::new()
        .route("/start_camera", post(start_camera))
        .route("/stop_camera", post(stop_camera))
        .route("/video_feed", get(video_feed))
}
