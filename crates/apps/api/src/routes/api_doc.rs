use crate::routes::{camera, capture, likes, playlist, root, search};
use common_services::api::capture::interfaces::{CaptureResponse, DetectResponse, EmotionSnapshot};
use common_services::api::likes::interfaces::LikeResponse;
use common_services::api::playlist::interfaces::PlaylistResponse;
use common_services::api::search::interfaces::{SearchRequest, SearchResponse};
use common_types::{Emotion, MediaItem, MediaSource};
use media_catalogs::PlaylistEntry;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        root::handlers::root,
        // Camera handlers
        camera::handlers::start_camera,
        camera::handlers::stop_camera,
        camera::handlers::video_feed,
        // Capture handlers
        capture::handlers::capture_image,
        capture::handlers::get_emotion,
        capture::handlers::detect_emotion,
        // Search handlers
        search::handlers::search,
        // Likes handlers
        likes::handlers::like_video,
        // Playlist handlers
        playlist::handlers::get_playlist,
    ),
    components(
        schemas(
            Emotion,
            MediaItem,
            MediaSource,
            EmotionSnapshot,
            CaptureResponse,
            DetectResponse,
            SearchRequest,
            SearchResponse,
            LikeResponse,
            PlaylistEntry,
            PlaylistResponse,
        ),
    ),
    tags(
        (name = "Camera", description = "Camera session lifecycle and live preview"),
        (name = "Capture", description = "Emotion capture and classification"),
        (name = "Search", description = "Free-text catalog search"),
        (name = "Likes", description = "Liked media items"),
        (name = "Playlist", description = "Emotion-matched playlists"),
        (name = "System", description = "Liveness"),
    )
)]
pub struct ApiDoc;
