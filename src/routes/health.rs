use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tracing::info;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health))
}

async fn health() -> Json<Value> {
    info!("GET / - Health check");
    Json(json!({ "Health": "OK" }))
}
