use http::StatusCode;
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::external::upstream::UpstreamClient;
use crate::models::TickerMatch;

const SEARCH_TICKER_PATH: &str = "search-ticker";

/// Provider-side ticker search. Every non-200 status, 401 and 404 included,
/// surfaces as `AppError::Upstream` with that status.
pub async fn search_ticker(
    upstream: &dyn UpstreamClient,
    query: &str,
) -> Result<Vec<TickerMatch>, AppError> {
    let response = upstream
        .fetch(&[SEARCH_TICKER_PATH], &[("query", query)])
        .await
        .map_err(|e| {
            error!("Ticker search for '{}' failed: {}", query, e);
            AppError::bad_gateway()
        })?;

    if response.status != StatusCode::OK {
        warn!("Ticker search for '{}' returned {}", query, response.status);
        return Err(AppError::upstream(response.status));
    }

    let matches: Vec<TickerMatch> = response.json().map_err(|e| {
        error!("Malformed ticker search body for '{}': {}", query, e);
        AppError::bad_gateway()
    })?;

    info!("✓ {} ticker matches for '{}'", matches.len(), query);
    Ok(matches)
}
