use common_types::MediaItem;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SearchRequest {
    pub query: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResponse {
    pub status: String,
    pub youtube_videos: Vec<MediaItem>,
    pub spotify_tracks: Vec<MediaItem>,
}
