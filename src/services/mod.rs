pub mod historical_price_service;
pub mod stock_data_service;
pub mod ticker_service;
