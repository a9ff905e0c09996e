use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{health, historical_prices, stocks, tickers};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .merge(health::router())
        .merge(historical_prices::router())
        .merge(tickers::router())
        .merge(stocks::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
