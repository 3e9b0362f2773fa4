pub mod camera;
pub mod capture;
pub mod likes;
pub mod playlist;
pub mod root;
pub mod search;

mod api_doc;

use crate::api_state::ApiContext;
use crate::routes::api_doc::ApiDoc;
use crate::routes::camera::router::camera_router;
use crate::routes::capture::router::capture_router;
use crate::routes::likes::router::likes_router;
use crate::routes::playlist::router::playlist_router;
use crate::routes::root::router::root_router;
use crate::routes::search::router::search_router;
use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// --- Router Construction ---
pub fn create_router(api_state: ApiContext) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .merge(root_router())
        .merge(camera_router())
        .merge(capture_router())
        .merge(search_router())
        .merge(likes_router())
        .merge(playlist_router())
        .with_state(api_state)
}
