use http::StatusCode;
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::external::upstream::UpstreamClient;
use crate::models::{HistoricalPriceSeries, UpstreamHistoricalBody};

const HISTORICAL_PATH: &str = "historical-price-full";

/// Price history for `symbol` between `date_start` and `date_end`.
///
/// Outcomes by upstream status:
/// - 200 with a non-empty `historical` array: the series
/// - 200 without data, or 404: an empty series (serializes as `{}`)
/// - 401: `AppError::Unauthorized`
/// - anything else: `AppError::Upstream` with that status
pub async fn get_historical_price(
    upstream: &dyn UpstreamClient,
    symbol: &str,
    date_start: &str,
    date_end: &str,
) -> Result<HistoricalPriceSeries, AppError> {
    let response = upstream
        .fetch(
            &[HISTORICAL_PATH, symbol],
            &[("from", date_start), ("to", date_end)],
        )
        .await
        .map_err(|e| {
            error!("Historical price request for {} failed: {}", symbol, e);
            AppError::bad_gateway()
        })?;

    match response.status {
        StatusCode::OK => {
            let body: UpstreamHistoricalBody = response.json().map_err(|e| {
                error!("Malformed historical price body for {}: {}", symbol, e);
                AppError::bad_gateway()
            })?;
            match body.historical {
                Some(historical) if !historical.is_empty() => {
                    info!("✓ {} historical points for {}", historical.len(), symbol);
                    Ok(HistoricalPriceSeries::new(symbol, historical))
                }
                _ => {
                    info!("No historical data for {} ({} to {})", symbol, date_start, date_end);
                    Ok(HistoricalPriceSeries::empty())
                }
            }
        }
        StatusCode::UNAUTHORIZED => {
            warn!("Price provider rejected the API key");
            Err(AppError::Unauthorized)
        }
        StatusCode::NOT_FOUND => {
            info!("Price provider has no data for {}", symbol);
            Ok(HistoricalPriceSeries::empty())
        }
        status => {
            warn!("Price provider returned {} for {}", status, symbol);
            Err(AppError::upstream(status))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::upstream::stub::StubUpstream;

    const POINT: &str = r#"{
        "date": "2024-01-02",
        "open": 187.15,
        "high": 188.44,
        "low": 183.89,
        "close": 185.64,
        "adjClose": 185.4,
        "volume": 82488700,
        "unadjustedVolume": 82488700,
        "change": -1.51,
        "changePercent": -0.80684,
        "vwap": 185.99,
        "label": "January 02, 24",
        "changeOverTime": -0.0080684
    }"#;

    #[tokio::test]
    async fn test_returns_series_for_symbol() {
        let body = format!(r#"{{"symbol": "AAPL", "historical": [{}]}}"#, POINT);
        let upstream = StubUpstream::new(StatusCode::OK, body);

        let series = get_historical_price(&upstream, "AAPL", "2024-01-01", "2024-01-31")
            .await
            .unwrap();

        assert_eq!(series.symbol.as_deref(), Some("AAPL"));
        let historical = series.historical.unwrap();
        assert_eq!(historical.len(), 1);
        assert_eq!(historical[0].date, "2024-01-02");
        assert_eq!(historical[0].change_over_time, -0.0080684);

        let requests = upstream.requests();
        assert_eq!(requests[0].segments, vec!["historical-price-full", "AAPL"]);
        assert_eq!(
            requests[0].params,
            vec![
                ("from".to_string(), "2024-01-01".to_string()),
                ("to".to_string(), "2024-01-31".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_series_keeps_upstream_points_field_for_field() {
        let body = format!(r#"{{"historical": [{}]}}"#, POINT);
        let upstream = StubUpstream::new(StatusCode::OK, body);

        let series = get_historical_price(&upstream, "AAPL", "a", "b").await.unwrap();

        let expected: serde_json::Value =
            serde_json::from_str(&format!(r#"{{"symbol": "AAPL", "historical": [{}]}}"#, POINT)).unwrap();
        assert_eq!(serde_json::to_value(&series).unwrap(), expected);
    }

    #[tokio::test]
    async fn test_float_encoded_volumes_still_return_series() {
        let point = POINT
            .replace(r#""volume": 82488700"#, r#""volume": 82488700.0"#)
            .replace(r#""unadjustedVolume": 82488700"#, r#""unadjustedVolume": 82488700.0"#);
        let upstream = StubUpstream::new(StatusCode::OK, format!(r#"{{"historical": [{}]}}"#, point));

        let series = get_historical_price(&upstream, "AAPL", "2024-01-01", "2024-01-31")
            .await
            .unwrap();

        let historical = series.historical.unwrap();
        assert_eq!(historical[0].volume, 82488700);
        assert_eq!(historical[0].unadjusted_volume, 82488700);
    }

    #[tokio::test]
    async fn test_empty_or_missing_historical_is_empty_object() {
        for body in [r#"{"symbol": "AAPL", "historical": []}"#, r#"{}"#, r#"{"symbol": "AAPL"}"#] {
            let upstream = StubUpstream::new(StatusCode::OK, body);

            let series = get_historical_price(&upstream, "AAPL", "a", "b").await.unwrap();

            assert!(series.is_empty());
            assert_eq!(serde_json::to_string(&series).unwrap(), "{}");
        }
    }

    #[tokio::test]
    async fn test_not_found_is_empty_object() {
        let upstream = StubUpstream::new(StatusCode::NOT_FOUND, "not found");

        let series = get_historical_price(&upstream, "NOPE", "a", "b").await.unwrap();

        assert_eq!(series, HistoricalPriceSeries::empty());
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_invalid_api_key() {
        let upstream = StubUpstream::new(StatusCode::UNAUTHORIZED, r#"{"Error Message": "Invalid API KEY."}"#);

        let err = get_historical_price(&upstream, "AAPL", "a", "b").await.unwrap_err();

        assert!(matches!(err, AppError::Unauthorized));
        assert_eq!(err.to_string(), "Invalid API key");
    }

    #[tokio::test]
    async fn test_other_statuses_pass_through() {
        let upstream = StubUpstream::new(StatusCode::TOO_MANY_REQUESTS, "slow down");

        let err = get_historical_price(&upstream, "AAPL", "a", "b").await.unwrap_err();

        match err {
            AppError::Upstream { status, message } => {
                assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
                assert_eq!(message, "Unexpected error");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transport_failure_is_bad_gateway() {
        let upstream = StubUpstream::unreachable();

        let err = get_historical_price(&upstream, "AAPL", "a", "b").await.unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_gateway() {
        let upstream = StubUpstream::new(StatusCode::OK, r#"{"historical": [{"date": 1}]}"#);

        let err = get_historical_price(&upstream, "AAPL", "a", "b").await.unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }
}
