pub(crate) mod health;
pub(crate) mod historical_prices;
pub(crate) mod stocks;
pub(crate) mod tickers;
