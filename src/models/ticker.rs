use serde::{Deserialize, Serialize};

/// One row of a ticker search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerMatch {
    pub symbol: String,
    pub name: String,
    pub currency: Option<String>,
    pub stock_exchange: Option<String>,
    pub exchange_short_name: Option<String>,
}
