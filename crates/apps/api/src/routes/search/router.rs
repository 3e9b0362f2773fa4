use crate::api_state::ApiContext;
use crate::routes::search::handlers::search;
use axum::{Router, routing::post};

pub fn search_router() -> Router<ApiContext> {
    Router::new().route("/search", post(search))
}
