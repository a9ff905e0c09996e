use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::TickerMatch;
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/search-ticker", get(search_ticker))
}

#[derive(Debug, Deserialize)]
pub struct TickerSearchParams {
    query: String,
}

pub async fn search_ticker(
    Query(params): Query<TickerSearchParams>,
    State(state): State<AppState>,
) -> Result<Json<Vec<TickerMatch>>, AppError> {
    info!("GET /search-ticker - Searching for '{}'", params.query);
    let matches = services::ticker_service::search_ticker(state.price_api.as_ref(), &params.query)
        .await
        .map_err(|e| {
            error!("Ticker search for '{}' failed: {}", params.query, e);
            e
        })?;
    Ok(Json(matches))
}
