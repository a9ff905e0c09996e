use http::StatusCode;
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::external::upstream::UpstreamClient;
use crate::models::{CountryExchangeGroup, StockCatalogEntry, StockListResponse, StockSearchParams};
use crate::store::{CatalogStore, PopulateOutcome};

const STOCKS_PATH: &str = "stocks";

pub const DATA_ADDED: &str = "Data added successfully";
pub const DATA_EXISTS: &str = "OK, Data already exists";
pub const NO_DATA_FOUND: &str = "No data found for the query";

/// Pulls the full stock list from the catalog provider and stores it, unless
/// the catalog already has rows. The provider is always called first, so a
/// failing provider is reported even when the catalog is populated.
pub async fn set_stock_data(
    upstream: &dyn UpstreamClient,
    store: &dyn CatalogStore,
) -> Result<&'static str, AppError> {
    let response = upstream.fetch(&[STOCKS_PATH], &[]).await.map_err(|e| {
        error!("Stock list request failed: {}", e);
        AppError::bad_gateway()
    })?;

    if response.status != StatusCode::OK {
        warn!("Stock list provider returned {}", response.status);
        return Err(AppError::upstream(response.status));
    }

    let body: StockListResponse = response.json().map_err(|e| {
        error!("Malformed stock list body: {}", e);
        AppError::bad_gateway()
    })?;

    let outcome = store.populate_once(body.data).await.map_err(|e| {
        error!("Failed to populate stock catalog: {}", e);
        AppError::Db(e)
    })?;

    let message = match outcome {
        PopulateOutcome::Inserted(rows) => {
            info!("✅ Inserted {} rows into the stock catalog", rows);
            DATA_ADDED
        }
        PopulateOutcome::AlreadyPopulated => {
            info!("Stock catalog already populated, skipping insert");
            DATA_EXISTS
        }
    };

    match store.count().await {
        Ok(total) => info!("Stock catalog holds {} rows", total),
        Err(e) => warn!("Could not count stock catalog rows: {}", e),
    }

    Ok(message)
}

/// Catalog rows matching every supplied filter. No match is `NotFound`, never an empty list.
pub async fn search_stocks(
    store: &dyn CatalogStore,
    params: &StockSearchParams,
) -> Result<Vec<StockCatalogEntry>, AppError> {
    let rows = store
        .search(params)
        .await
        .inspect_err(|e| error!("Stock catalog search failed: {}", e))?;

    if rows.is_empty() {
        return Err(AppError::NotFound(NO_DATA_FOUND.to_string()));
    }
    Ok(rows)
}

pub async fn get_country_exchanges(
    store: &dyn CatalogStore,
) -> Result<Vec<CountryExchangeGroup>, AppError> {
    let groups = store.country_exchanges().await.map_err(|e| {
        error!("Country aggregation query failed: {}", e);
        AppError::Aggregation
    })?;

    if groups.is_empty() {
        warn!("Country aggregation returned no groups");
        return Err(AppError::Aggregation);
    }
    Ok(groups)
}
