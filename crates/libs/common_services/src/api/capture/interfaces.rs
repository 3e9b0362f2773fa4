use common_types::{Emotion, MediaItem};
use serde::Serialize;
use utoipa::ToSchema;

/// Result of the most recent completed capture pipeline run.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EmotionSnapshot {
    pub emotion: Emotion,
    pub youtube_videos: Vec<MediaItem>,
    pub spotify_tracks: Vec<MediaItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CaptureResponse {
    pub status: String,
    pub emotion: Emotion,
    pub youtube_videos: Vec<MediaItem>,
    pub spotify_tracks: Vec<MediaItem>,
}

impl From<EmotionSnapshot> for CaptureResponse {
    fn from(snapshot: EmotionSnapshot) -> Self {
        Self {
            status: "success".to_string(),
            emotion: snapshot.emotion,
            youtube_videos: snapshot.youtube_videos,
            spotify_tracks: snapshot.spotify_tracks,
        }
    }
}

/// Response for still-image classification.
#[derive(Debug, Serialize, ToSchema)]
pub struct DetectResponse {
    pub status: String,
    pub emotion: Emotion,
}
