use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::models::HistoricalPriceSeries;
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/historical-price", get(get_historical_price))
}

#[derive(Debug, Deserialize)]
pub struct HistoricalPriceParams {
    symbol: String,
    date_start: String,
    date_end: String,
}

pub async fn get_historical_price(
    Query(params): Query<HistoricalPriceParams>,
    State(state): State<AppState>,
) -> Result<Json<HistoricalPriceSeries>, AppError> {
    info!(
        "GET /historical-price - {} from {} to {}",
        params.symbol, params.date_start, params.date_end
    );
    let series = services::historical_price_service::get_historical_price(
        state.price_api.as_ref(),
        &params.symbol,
        &params.date_start,
        &params.date_end,
    )
    .await
    .map_err(|e| {
        match &e {
            AppError::Unauthorized => warn!("Historical price request for {} rejected: {}", params.symbol, e),
            _ => error!("Failed to get historical price for {}: {}", params.symbol, e),
        }
        e
    })?;
    Ok(Json(series))
}
