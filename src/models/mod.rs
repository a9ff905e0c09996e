mod historical_price;
mod stock_data;
mod ticker;

pub use historical_price::{HistoricalPriceSeries, UpstreamHistoricalBody};
pub use stock_data::{
    CountryExchangeGroup, NewStockListing, StockCatalogEntry, StockListResponse, StockSearchParams,
};
pub use ticker::TickerMatch;
