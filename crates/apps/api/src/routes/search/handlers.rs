use crate::api_state::ApiContext;
use axum::Json;
use axum::extract::State;
use common_services::api::search::error::SearchError;
use common_services::api::search::interfaces::{SearchRequest, SearchResponse};
use tracing::instrument;

/// Free-text search against both catalogs. Does not touch the camera or the
/// cached emotion snapshot; a failing catalog shows up as an empty list.
#[utoipa::path(
    post,
    path = "/search",
    tag = "Search",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Matching videos and tracks.", body = SearchResponse),
        (status = 400, description = "Empty query."),
    )
)]
#[instrument(skip(context), err(Debug))]
pub async fn search(
    State(context): State<ApiContext>,
    Json(payload): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, SearchError> {
    let (youtube_videos, spotify_tracks) = context.search.search(&payload.query).await?;
    Ok(Json(SearchResponse {
        status: "success".to_string(),
        youtube_videos,
        spotify_tracks,
    }))
}
