use crate::api_state::ApiContext;
use crate::create_router;
use app_state::AppSettings;
use axum::http::{HeaderValue, header};
use color_eyre::Result;
use color_eyre::eyre::eyre;
use common_services::api::camera::service::CameraService;
use common_services::api::capture::service::CapturePipeline;
use common_services::api::likes::service::LikedStore;
use common_services::api::playlist::service::PlaylistService;
use common_services::api::search::service::SearchService;
use common_services::catalog::{MusicCatalog, VideoCatalog};
use emotion_inference::{
    CameraFrameSource, EmotionClassifier, FaceLocator, OnnxEmotionClassifier, OnnxFaceDetector,
};
use media_catalogs::{SpotifyClient, YoutubeClient};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

pub async fn serve(settings: AppSettings) -> Result<()> {
    // --- Server Startup ---
    info!("🚀 Initializing server...");
    let api_state = build_context(settings.clone());

    // --- CORS Configuration ---
    let allowed_origins: Vec<HeaderValue> = settings
        .api
        .allowed_origins
        .iter()
        .filter_map(|s| match s.parse() {
            Ok(hv) => Some(hv),
            Err(e) => {
                error!("Invalid CORS origin configured: {} - Error: {}", s, e);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_methods(cors::Any)
        .allow_origin(allowed_origins)
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::ORIGIN,
            header::USER_AGENT,
        ]);

    // --- Create Router & Start Server ---
    let app = create_router(api_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("{}:{}", settings.api.host, settings.api.port)
        .parse()
        .map_err(|e| eyre!("Invalid address: {}", e))?;

    info!("🎧 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Builds the full service graph behind the API.
///
/// Model loading is non-fatal: with a missing detector or classifier the
/// process still serves traffic, and the capture endpoints answer with an
/// explicit "models not loaded" error.
#[must_use]
pub fn build_context(settings: AppSettings) -> ApiContext {
    let youtube: Arc<dyn VideoCatalog> = Arc::new(YoutubeClient::new(
        &settings.catalogs.youtube.base_url,
        &settings.secrets.youtube_api_key,
        &settings.catalogs.youtube.region,
    ));
    let spotify: Arc<dyn MusicCatalog> = Arc::new(SpotifyClient::new(
        &settings.catalogs.spotify.accounts_url,
        &settings.catalogs.spotify.api_url,
        &settings.secrets.spotify_client_id,
        &settings.secrets.spotify_client_secret,
    ));

    let locator: Option<Arc<dyn FaceLocator>> =
        match OnnxFaceDetector::load(&settings.models.face_detector) {
            Ok(detector) => Some(Arc::new(detector)),
            Err(e) => {
                warn!("Face detector not loaded, capture endpoints disabled: {e}");
                None
            }
        };
    let classifier: Option<Arc<dyn EmotionClassifier>> =
        match OnnxEmotionClassifier::load(&settings.models.emotion_classifier) {
            Ok(classifier) => Some(Arc::new(classifier)),
            Err(e) => {
                warn!("Emotion classifier not loaded, capture endpoints disabled: {e}");
                None
            }
        };

    let source = Arc::new(CameraFrameSource::spawn(
        settings.camera.device_index,
        settings.camera.open_attempts,
        settings.camera.open_retry_delay,
    ));
    let camera = CameraService::new(source, &settings.camera);
    let pipeline = CapturePipeline::new(
        Arc::clone(&camera),
        locator,
        classifier,
        Arc::clone(&youtube),
        Arc::clone(&spotify),
    );
    let search = SearchService::new(Arc::clone(&youtube), Arc::clone(&spotify));
    let playlist = PlaylistService::new(Arc::clone(&spotify));
    let likes = Arc::new(LikedStore::load(settings.likes.store_file.clone()));

    ApiContext {
        settings,
        camera,
        pipeline,
        search,
        playlist,
        likes,
    }
}
