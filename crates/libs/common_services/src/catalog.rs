use async_trait::async_trait;
use common_types::MediaItem;
use media_catalogs::{PlaylistEntry, SpotifyClient, YoutubeClient};

/// Search seam over the video catalog.
///
/// Implementations degrade transport failures to empty lists; "no results"
/// is a valid outcome the pipeline handles, not an error.
#[async_trait]
pub trait VideoCatalog: Send + Sync {
    async fn search(&self, query: &str) -> Vec<MediaItem>;
}

/// Search seam over the music catalog.
#[async_trait]
pub trait MusicCatalog: Send + Sync {
    async fn search_tracks(&self, query: &str) -> Vec<MediaItem>;
    async fn search_playlists(&self, query: &str) -> Vec<PlaylistEntry>;
}

#[async_trait]
impl VideoCatalog for YoutubeClient {
    async fn search(&self, query: &str) -> Vec<MediaItem> {
        YoutubeClient::search(self, query).await
    }
}

#[async_trait]
impl MusicCatalog for SpotifyClient {
    async fn search_tracks(&self, query: &str) -> Vec<MediaItem> {
        SpotifyClient::search_tracks(self, query).await
    }

    async fn search_playlists(&self, query: &str) -> Vec<PlaylistEntry> {
        SpotifyClient::search_playlists(self, query).await
    }
}
