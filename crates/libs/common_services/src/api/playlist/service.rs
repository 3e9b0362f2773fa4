use crate::api::playlist::error::PlaylistError;
use crate::catalog::MusicCatalog;
use media_catalogs::PlaylistEntry;
use std::sync::Arc;

/// Delegates playlist lookups to the music catalog.
pub struct PlaylistService {
    music_catalog: Arc<dyn MusicCatalog>,
}

impl PlaylistService {
    pub fn new(music_catalog: Arc<dyn MusicCatalog>) -> Arc<Self> {
        Arc::new(Self { music_catalog })
    }

    pub async fn playlists_for(
        &self,
        emotion: Option<&str>,
    ) -> Result<Vec<PlaylistEntry>, PlaylistError> {
        let emotion = emotion
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or(PlaylistError::MissingEmotion)?;
        Ok(self.music_catalog.search_playlists(emotion).await)
    }
}
