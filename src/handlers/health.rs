// src/handlers/health.rs

use axum::Json;
use serde_json::{json, Value};

// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Serviço no ar", example = json!({ "ok": true }))
    )
)]
pub async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}
