pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::models::{CountryExchangeGroup, NewStockListing, StockCatalogEntry, StockSearchParams};

pub use memory::InMemoryCatalogStore;
pub use postgres::PgCatalogStore;

/// Result of a populate-once call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopulateOutcome {
    Inserted(usize),
    AlreadyPopulated,
}

/// Local copy of the provider's stock catalog.
///
/// Population is all-or-nothing and happens at most once: an implementation
/// must make the "is the table empty" check and the bulk insert atomic with
/// respect to other populate calls.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn populate_once(
        &self,
        listings: Vec<NewStockListing>,
    ) -> Result<PopulateOutcome, sqlx::Error>;

    async fn search(&self, params: &StockSearchParams) -> Result<Vec<StockCatalogEntry>, sqlx::Error>;

    async fn country_exchanges(&self) -> Result<Vec<CountryExchangeGroup>, sqlx::Error>;

    async fn count(&self) -> Result<i64, sqlx::Error>;
}
