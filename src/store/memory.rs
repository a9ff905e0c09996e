use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::models::{CountryExchangeGroup, NewStockListing, StockCatalogEntry, StockSearchParams};
use crate::store::{CatalogStore, PopulateOutcome};

/// Process-local catalog. The whole populate runs under one lock, so the
/// run-once guard holds under concurrent callers.
#[derive(Default)]
pub struct InMemoryCatalogStore {
    rows: Mutex<Vec<StockCatalogEntry>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn populate_once(
        &self,
        listings: Vec<NewStockListing>,
    ) -> Result<PopulateOutcome, sqlx::Error> {
        let mut rows = self.rows.lock();
        if !rows.is_empty() {
            return Ok(PopulateOutcome::AlreadyPopulated);
        }

        let inserted = listings.len();
        rows.extend(
            listings
                .into_iter()
                .zip(1..)
                .map(|(listing, id)| listing.into_entry(id)),
        );
        Ok(PopulateOutcome::Inserted(inserted))
    }

    async fn search(&self, params: &StockSearchParams) -> Result<Vec<StockCatalogEntry>, sqlx::Error> {
        Ok(self
            .rows
            .lock()
            .iter()
            .filter(|entry| params.matches(entry))
            .cloned()
            .collect())
    }

    async fn country_exchanges(&self) -> Result<Vec<CountryExchangeGroup>, sqlx::Error> {
        let rows = self.rows.lock();
        let mut grouped: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for entry in rows.iter() {
            grouped
                .entry(entry.country.as_str())
                .or_default()
                .insert(entry.exchange.as_str());
        }

        Ok(grouped
            .into_iter()
            .map(|(country, exchanges)| CountryExchangeGroup {
                country: country.to_string(),
                exchange: exchanges.into_iter().collect::<Vec<_>>().join(", "),
            })
            .collect())
    }

    async fn count(&self) -> Result<i64, sqlx::Error> {
        Ok(i64::try_from(self.rows.lock().len()).unwrap_or(i64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn listing(symbol: &str, country: &str, exchange: &str) -> NewStockListing {
        NewStockListing {
            symbol: symbol.to_string(),
            name: format!("{} Inc", symbol),
            currency: "USD".to_string(),
            exchange: exchange.to_string(),
            mic_code: "XNAS".to_string(),
            country: country.to_string(),
            instrument_type: "Common Stock".to_string(),
        }
    }

    #[tokio::test]
    async fn test_populate_assigns_sequential_ids() {
        let store = InMemoryCatalogStore::new();

        let outcome = store
            .populate_once(vec![listing("AAPL", "US", "NASDAQ"), listing("IBM", "US", "NYSE")])
            .await
            .unwrap();
        assert_eq!(outcome, PopulateOutcome::Inserted(2));

        let rows = store.search(&StockSearchParams::default()).await.unwrap();
        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(rows[0].symbol, "AAPL");
    }

    #[tokio::test]
    async fn test_populate_runs_once() {
        let store = InMemoryCatalogStore::new();
        store.populate_once(vec![listing("AAPL", "US", "NASDAQ")]).await.unwrap();

        let second = store
            .populate_once(vec![listing("MSFT", "US", "NASDAQ"), listing("IBM", "US", "NYSE")])
            .await
            .unwrap();

        assert_eq!(second, PopulateOutcome::AlreadyPopulated);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_populates_insert_once() {
        let store = Arc::new(InMemoryCatalogStore::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .populate_once(vec![listing("AAPL", "US", "NASDAQ"), listing("SAP", "Germany", "XETRA")])
                        .await
                        .unwrap()
                })
            })
            .collect();

        let mut inserted = 0;
        for handle in handles {
            if let PopulateOutcome::Inserted(_) = handle.await.unwrap() {
                inserted += 1;
            }
        }

        assert_eq!(inserted, 1);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_country_exchanges_groups_and_dedups() {
        let store = InMemoryCatalogStore::new();
        store
            .populate_once(vec![
                listing("AAPL", "US", "NASDAQ"),
                listing("MSFT", "US", "NASDAQ"),
                listing("IBM", "US", "NYSE"),
                listing("SAP", "DE", "XETRA"),
            ])
            .await
            .unwrap();

        let groups = store.country_exchanges().await.unwrap();

        assert_eq!(
            groups,
            vec![
                CountryExchangeGroup { country: "DE".into(), exchange: "XETRA".into() },
                CountryExchangeGroup { country: "US".into(), exchange: "NASDAQ, NYSE".into() },
            ]
        );
    }

    #[tokio::test]
    async fn test_country_exchanges_empty_catalog() {
        let store = InMemoryCatalogStore::new();
        assert!(store.country_exchanges().await.unwrap().is_empty());
    }
}
