use crate::api_state::ApiContext;
use axum::Json;
use axum::extract::{Multipart, State};
use common_services::api::capture::error::CaptureError;
use common_services::api::capture::interfaces::{CaptureResponse, DetectResponse, EmotionSnapshot};
use emotion_inference::Frame;
use tracing::instrument;

/// Capture one frame from the camera, classify the dominant face's emotion,
/// and search both catalogs for matching content. The camera session is
/// closed once the frame is taken, success or not.
#[utoipa::path(
    post,
    path = "/capture_image",
    tag = "Capture",
    responses(
        (status = 200, description = "Emotion and matching media.", body = CaptureResponse),
        (status = 422, description = "No face was detected in the frame."),
        (status = 503, description = "Camera unavailable or models not loaded."),
    )
)]
#[instrument(skip(context), err(Debug))]
pub async fn capture_image(
    State(context): State<ApiContext>,
) -> Result<Json<CaptureResponse>, CaptureError> {
    let snapshot = context.pipeline.capture_and_recommend().await?;
    Ok(Json(snapshot.into()))
}

/// The result of the last completed capture.
#[utoipa::path(
    get,
    path = "/get_emotion",
    tag = "Capture",
    responses(
        (status = 200, description = "Last captured emotion with its media.", body = EmotionSnapshot),
        (status = 404, description = "Nothing has been captured yet."),
    )
)]
#[instrument(skip(context), err(Debug))]
pub async fn get_emotion(
    State(context): State<ApiContext>,
) -> Result<Json<EmotionSnapshot>, CaptureError> {
    context
        .pipeline
        .snapshot()
        .await
        .map(Json)
        .ok_or(CaptureError::NoSnapshot)
}

/// Classify the emotion on an uploaded still image (multipart field
/// `frame`), without touching the camera.
#[utoipa::path(
    post,
    path = "/detect_emotion",
    tag = "Capture",
    responses(
        (status = 200, description = "Detected emotion.", body = DetectResponse),
        (status = 400, description = "Missing or undecodable image."),
        (status = 422, description = "No face was detected in the image."),
    )
)]
#[instrument(skip(context, multipart), err(Debug))]
pub async fn detect_emotion(
    State(context): State<ApiContext>,
    mut multipart: Multipart,
) -> Result<Json<DetectResponse>, CaptureError> {
    let mut frame_bytes = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| CaptureError::InvalidUpload(e.to_string()))?
    {
        if field.name() == Some("frame") {
            frame_bytes = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| CaptureError::InvalidUpload(e.to_string()))?,
            );
            break;
        }
    }

    let bytes =
        frame_bytes.ok_or_else(|| CaptureError::InvalidUpload("missing 'frame' field".into()))?;
    let frame = Frame::decode(&bytes).map_err(|e| CaptureError::InvalidUpload(e.to_string()))?;

    let emotion = context.pipeline.classify_still(frame).await?;
    Ok(Json(DetectResponse {
        status: "success".to_string(),
        emotion,
    }))
}
