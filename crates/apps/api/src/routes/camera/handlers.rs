use crate::api_state::ApiContext;
use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use common_services::api::camera::error::CameraError;
use serde_json::{Value, json};
use tracing::instrument;

/// Start a camera session. Any existing session is forcibly stopped first,
/// so there is never more than one.
#[utoipa::path(
    post,
    path = "/start_camera",
    tag = "Camera",
    responses(
        (status = 200, description = "Camera session started."),
        (status = 503, description = "The capture device could not be acquired."),
    )
)]
#[instrument(skip(context), err(Debug))]
pub async fn start_camera(State(context): State<ApiContext>) -> Result<Json<Value>, CameraError> {
    context.camera.start().await?;
    Ok(Json(
        json!({ "status": "success", "message": "Camera started" }),
    ))
}

/// Stop the active camera session, releasing the device. Idempotent.
#[utoipa::path(
    post,
    path = "/stop_camera",
    tag = "Camera",
    responses(
        (status = 200, description = "Camera session stopped (or none was active)."),
    )
)]
#[instrument(skip(context))]
pub async fn stop_camera(State(context): State<ApiContext>) -> Json<Value> {
    context.camera.stop().await;
    Json(json!({ "status": "success" }))
}

/// Live MJPEG preview of the camera. Only available while a session is
/// active; every streamed frame counts as activity for the idle timeout.
#[utoipa::path(
    get,
    path = "/video_feed",
    tag = "Camera",
    responses(
        (status = 200, description = "multipart/x-mixed-replace JPEG stream."),
        (status = 409, description = "No active camera session."),
    )
)]
#[instrument(skip(context), err(Debug))]
pub async fn video_feed(State(context): State<ApiContext>) -> Result<Response, CameraError> {
    if !context.camera.is_active().await {
        return Err(CameraError::NotActive);
    }

    let stream = context.camera.mjpeg_stream();
    Ok((
        [
            (
                header::CONTENT_TYPE,
                "multipart/x-mixed-replace; boundary=frame",
            ),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(stream),
    )
        .into_response())
}
