use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A persisted catalog row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct StockCatalogEntry {
    pub id: i64,
    pub symbol: String,
    pub name: String,
    pub currency: String,
    pub exchange: String,
    pub mic_code: String,
    pub country: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub instrument_type: String,
}

/// A catalog row as delivered by the stock-list provider, before it gets an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStockListing {
    pub symbol: String,
    pub name: String,
    pub currency: String,
    pub exchange: String,
    pub mic_code: String,
    pub country: String,
    #[serde(rename = "type")]
    pub instrument_type: String,
}

impl NewStockListing {
    pub fn into_entry(self, id: i64) -> StockCatalogEntry {
        StockCatalogEntry {
            id,
            symbol: self.symbol,
            name: self.name,
            currency: self.currency,
            exchange: self.exchange,
            mic_code: self.mic_code,
            country: self.country,
            instrument_type: self.instrument_type,
        }
    }
}

/// Body of the provider's `/stocks` endpoint.
#[derive(Debug, Deserialize)]
pub struct StockListResponse {
    pub data: Vec<NewStockListing>,
}

/// Optional substring filters for a catalog search, ANDed together.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StockSearchParams {
    pub country: Option<String>,
    pub exchange: Option<String>,
    pub symbol: Option<String>,
    pub name: Option<String>,
}

impl StockSearchParams {
    /// Supplied, non-empty filters as `(column, needle)` pairs.
    pub fn filters(&self) -> Vec<(&'static str, &str)> {
        [
            ("country", &self.country),
            ("exchange", &self.exchange),
            ("symbol", &self.symbol),
            ("name", &self.name),
        ]
        .into_iter()
        .filter_map(|(column, value)| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| (column, v))
        })
        .collect()
    }

    /// Case-insensitive contains on every supplied filter.
    pub fn matches(&self, entry: &StockCatalogEntry) -> bool {
        self.filters().into_iter().all(|(column, needle)| {
            let haystack = match column {
                "country" => &entry.country,
                "exchange" => &entry.exchange,
                "symbol" => &entry.symbol,
                _ => &entry.name,
            };
            haystack.to_lowercase().contains(&needle.to_lowercase())
        })
    }
}

/// Distinct exchanges per country, joined with ", ".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CountryExchangeGroup {
    pub country: String,
    pub exchange: String,
}
