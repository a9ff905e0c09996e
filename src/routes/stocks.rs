use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{CountryExchangeGroup, StockCatalogEntry, StockSearchParams};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stocks", post(create_stock_catalog))
        .route("/stock-search", get(search_stocks))
        .route("/stock-countries", get(get_country_exchanges))
}

pub async fn create_stock_catalog(
    State(state): State<AppState>,
) -> Result<Html<&'static str>, AppError> {
    info!("POST /stocks - Populating stock catalog");
    let message = services::stock_data_service::set_stock_data(
        state.catalog_api.as_ref(),
        state.catalog.as_ref(),
    )
    .await
    .map_err(|e| {
        error!("Failed to populate stock catalog: {}", e);
        e
    })?;
    Ok(Html(message))
}

pub async fn search_stocks(
    Query(params): Query<StockSearchParams>,
    State(state): State<AppState>,
) -> Result<Json<Vec<StockCatalogEntry>>, AppError> {
    info!("GET /stock-search - {:?}", params);
    let rows = services::stock_data_service::search_stocks(state.catalog.as_ref(), &params).await?;
    Ok(Json(rows))
}

pub async fn get_country_exchanges(
    State(state): State<AppState>,
) -> Result<Json<Vec<CountryExchangeGroup>>, AppError> {
    info!("GET /stock-countries - Aggregating exchanges by country");
    let groups = services::stock_data_service::get_country_exchanges(state.catalog.as_ref()).await?;
    Ok(Json(groups))
}
