use crate::api::search::error::SearchError;
use crate::catalog::{MusicCatalog, VideoCatalog};
use common_types::MediaItem;
use std::sync::Arc;

/// The plain text-query path: fans a query out to both catalogs without
/// touching the camera or the cached emotion snapshot.
pub struct SearchService {
    video_catalog: Arc<dyn VideoCatalog>,
    music_catalog: Arc<dyn MusicCatalog>,
}

impl SearchService {
    pub fn new(
        video_catalog: Arc<dyn VideoCatalog>,
        music_catalog: Arc<dyn MusicCatalog>,
    ) -> Arc<Self> {
        Arc::new(Self {
            video_catalog,
            music_catalog,
        })
    }

    /// Searches both catalogs concurrently. Catalog failures surface as
    /// empty lists, never as a request failure.
    pub async fn search(
        &self,
        query: &str,
    ) -> Result<(Vec<MediaItem>, Vec<MediaItem>), SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        Ok(tokio::join!(
            self.video_catalog.search(query),
            self.music_catalog.search_tracks(query)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use common_types::MediaSource;
    use media_catalogs::PlaylistEntry;

    struct EmptyVideoCatalog;

    #[async_trait]
    impl VideoCatalog for EmptyVideoCatalog {
        async fn search(&self, _query: &str) -> Vec<MediaItem> {
            Vec::new()
        }
    }

    struct OneTrackCatalog;

    #[async_trait]
    impl MusicCatalog for OneTrackCatalog {
        async fn search_tracks(&self, query: &str) -> Vec<MediaItem> {
            vec![MediaItem {
                title: query.to_string(),
                embed_link: "https://open.spotify.com/embed/track/t".to_string(),
                duration: "3:00".to_string(),
                thumbnail: String::new(),
                source: MediaSource::Music,
            }]
        }

        async fn search_playlists(&self, _query: &str) -> Vec<PlaylistEntry> {
            Vec::new()
        }
    }

    #[tokio::test]
    async fn empty_queries_are_rejected() {
        let service = SearchService::new(Arc::new(EmptyVideoCatalog), Arc::new(OneTrackCatalog));
        assert!(matches!(
            service.search("   ").await,
            Err(SearchError::EmptyQuery)
        ));
    }

    #[tokio::test]
    async fn a_failed_catalog_still_yields_the_other() {
        let service = SearchService::new(Arc::new(EmptyVideoCatalog), Arc::new(OneTrackCatalog));
        let (videos, tracks) = service.search("lofi beats").await.expect("search");
        assert!(videos.is_empty());
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].title, "lofi beats");
    }
}
