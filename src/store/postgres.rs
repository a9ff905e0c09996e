use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::stock_queries;
use crate::models::{CountryExchangeGroup, NewStockListing, StockCatalogEntry, StockSearchParams};
use crate::store::{CatalogStore, PopulateOutcome};

pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn populate_once(
        &self,
        listings: Vec<NewStockListing>,
    ) -> Result<PopulateOutcome, sqlx::Error> {
        Ok(match stock_queries::insert_all_if_empty(&self.pool, &listings).await? {
            Some(inserted) => PopulateOutcome::Inserted(inserted),
            None => PopulateOutcome::AlreadyPopulated,
        })
    }

    async fn search(&self, params: &StockSearchParams) -> Result<Vec<StockCatalogEntry>, sqlx::Error> {
        stock_queries::search(&self.pool, params).await
    }

    async fn country_exchanges(&self) -> Result<Vec<CountryExchangeGroup>, sqlx::Error> {
        stock_queries::country_exchanges(&self.pool).await
    }

    async fn count(&self) -> Result<i64, sqlx::Error> {
        stock_queries::count(&self.pool).await
    }
}
