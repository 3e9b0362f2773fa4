use crate::api_state::ApiContext;
use crate::routes::playlist::handlers::get_playlist;
use axum::{Router, routing::get};

pub fn playlist_router() -> Router<ApiContext> {
    Router::new().route("/get_playlist", get(get_playlist))
}
