use axum::Json;
use serde_json::{Value, json};

#[utoipa::path(
    get,
    path = "/",
    tag = "System",
    responses(
        (status = 200, description = "Liveness message")
    )
)]
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "API is live!" }))
}
