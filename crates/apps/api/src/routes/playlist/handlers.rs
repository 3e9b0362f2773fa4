use crate::api_state::ApiContext;
use axum::Json;
use axum::extract::{Query, State};
use common_services::api::playlist::error::PlaylistError;
use common_services::api::playlist::interfaces::{PlaylistParams, PlaylistResponse};
use tracing::instrument;

/// Playlists matching an emotion label, straight from the music catalog.
#[utoipa::path(
    get,
    path = "/get_playlist",
    tag = "Playlist",
    params(PlaylistParams),
    responses(
        (status = 200, description = "Matching playlists.", body = PlaylistResponse),
        (status = 400, description = "No emotion provided."),
    )
)]
#[instrument(skip(context), err(Debug))]
pub async fn get_playlist(
    State(context): State<ApiContext>,
    Query(params): Query<PlaylistParams>,
) -> Result<Json<PlaylistResponse>, PlaylistError> {
    let playlist = context
        .playlist
        .playlists_for(params.emotion.as_deref())
        .await?;
    Ok(Json(PlaylistResponse {
        status: "success".to_string(),
        playlist,
    }))
}
