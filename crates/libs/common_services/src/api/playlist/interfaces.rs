use media_catalogs::PlaylistEntry;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
pub struct PlaylistParams {
    /// Emotion label (or free text) to find playlists for.
    pub emotion: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlaylistResponse {
    pub status: String,
    pub playlist: Vec<PlaylistEntry>,
}
