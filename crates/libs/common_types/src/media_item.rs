use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Which external catalog a media item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaSource {
    Video,
    Music,
}

/// A playable item from one of the external catalogs.
///
/// Value object: structural equality is what the liked-items store uses to
/// reject duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MediaItem {
    pub title: String,
    /// URL that renders the item in an IFRAME-like embed context.
    pub embed_link: String,
    /// Playback length formatted as `M:SS`.
    pub duration: String,
    pub thumbnail: String,
    pub source: MediaSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> MediaItem {
        MediaItem {
            title: "Test".to_string(),
            embed_link: "https://example.com/embed/1".to_string(),
            duration: "3:05".to_string(),
            thumbnail: "https://example.com/thumb.jpg".to_string(),
            source: MediaSource::Video,
        }
    }

    #[test]
    fn equality_is_structural() {
        assert_eq!(item(), item());
        let mut other = item();
        other.title = "Other".to_string();
        assert_ne!(item(), other);
    }
}
