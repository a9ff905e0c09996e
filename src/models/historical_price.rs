use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// One trading day as the price provider reports it. Field names are part of
/// the public contract and serialize exactly as upstream spells them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalPricePoint {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub change: f64,
    pub change_over_time: f64,
    pub change_percent: f64,
    #[serde(deserialize_with = "integral_volume")]
    pub unadjusted_volume: i64,
    #[serde(deserialize_with = "integral_volume")]
    pub volume: i64,
    pub vwap: f64,
    pub label: String,
}

/// Volumes sometimes arrive float-encoded (`82488700.0`); accept any integral number.
fn integral_volume<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    if let Some(volume) = number.as_i64() {
        return Ok(volume);
    }
    match number.as_f64() {
        Some(volume) if volume.fract() == 0.0 && volume.abs() < i64::MAX as f64 => Ok(volume as i64),
        _ => Err(D::Error::custom(format!("volume is not an integer: {}", number))),
    }
}

/// Price history for one symbol. Both fields absent serializes to `{}`,
/// which is how "no data" is reported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPriceSeries {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub historical: Option<Vec<HistoricalPricePoint>>,
}

impl HistoricalPriceSeries {
    pub fn new(symbol: impl Into<String>, historical: Vec<HistoricalPricePoint>) -> Self {
        Self {
            symbol: Some(symbol.into()),
            historical: Some(historical),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.historical.as_ref().map_or(true, |h| h.is_empty())
    }
}

/// Shape of the provider's `historical-price-full` body; only `historical` is used.
#[derive(Debug, Deserialize)]
pub struct UpstreamHistoricalBody {
    #[serde(default)]
    pub historical: Option<Vec<HistoricalPricePoint>>,
}
