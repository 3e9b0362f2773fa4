use app_state::AppSettings;
use axum::extract::FromRef;
use common_services::api::camera::service::CameraService;
use common_services::api::capture::service::CapturePipeline;
use common_services::api::likes::service::LikedStore;
use common_services::api::playlist::service::PlaylistService;
use common_services::api::search::service::SearchService;
use std::sync::Arc;

#[derive(Clone)]
pub struct ApiContext {
    pub settings: AppSettings,
    pub camera: Arc<CameraService>,
    pub pipeline: Arc<CapturePipeline>,
    pub search: Arc<SearchService>,
    pub playlist: Arc<PlaylistService>,
    pub likes: Arc<LikedStore>,
}

// These impls let handlers and extractors pull out just the part of the
// state they need.
impl FromRef<ApiContext> for AppSettings {
    fn from_ref(state: &ApiContext) -> Self {
        state.settings.clone()
    }
}

impl FromRef<ApiContext> for Arc<CameraService> {
    fn from_ref(state: &ApiContext) -> Self {
        Arc::clone(&state.camera)
    }
}

impl FromRef<ApiContext> for Arc<CapturePipeline> {
    fn from_ref(state: &ApiContext) -> Self {
        Arc::clone(&state.pipeline)
    }
}

impl FromRef<ApiContext> for Arc<LikedStore> {
    fn from_ref(state: &ApiContext) -> Self {
        Arc::clone(&state.likes)
    }
}
