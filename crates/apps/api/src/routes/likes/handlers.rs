use crate::api_state::ApiContext;
use axum::Json;
use axum::extract::State;
use common_services::api::likes::error::LikesError;
use common_services::api::likes::interfaces::LikeResponse;
use common_services::api::likes::service::LikeOutcome;
use common_types::MediaItem;
use tracing::instrument;

/// Persist a liked media item. Liking the same item again is a no-op.
#[utoipa::path(
    post,
    path = "/like_video",
    tag = "Likes",
    request_body = MediaItem,
    responses(
        (status = 200, description = "Item stored (or already present).", body = LikeResponse),
        (status = 400, description = "Malformed media item."),
    )
)]
#[instrument(skip(context), err(Debug))]
pub async fn like_video(
    State(context): State<ApiContext>,
    Json(item): Json<MediaItem>,
) -> Result<Json<LikeResponse>, LikesError> {
    let status = match context.likes.like(item)? {
        LikeOutcome::Added => "success",
        LikeOutcome::AlreadyLiked => "already_liked",
    };
    Ok(Json(LikeResponse {
        status: status.to_string(),
    }))
}
