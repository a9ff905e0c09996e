use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{error, info};

use crate::models::{CountryExchangeGroup, NewStockListing, StockCatalogEntry, StockSearchParams};

/// Key for the transaction-scoped advisory lock that serializes catalog population.
const POPULATE_LOCK_KEY: i64 = 0x5354_4f43_4b44_4154;

/// Postgres caps a statement at 65535 bind parameters; 7 per row.
const INSERT_CHUNK_ROWS: usize = 1000;

const ENTRY_COLUMNS: &str = "id, symbol, name, currency, exchange, mic_code, country, type";

// ==============================================================================
// Population
// ==============================================================================

/// Inserts every listing unless the table already holds a row.
///
/// Existence check and insert run in one transaction under an advisory lock,
/// so concurrent callers cannot both see an empty table. Returns the number
/// of rows written, or `None` when the catalog was already populated.
pub async fn insert_all_if_empty(
    pool: &PgPool,
    listings: &[NewStockListing],
) -> Result<Option<usize>, sqlx::Error> {
    let mut tx = pool.begin().await.map_err(|e| {
        error!("Failed to begin catalog population transaction: {}", e);
        e
    })?;

    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(POPULATE_LOCK_KEY)
        .execute(&mut *tx)
        .await?;

    let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM stock_data)")
        .fetch_one(&mut *tx)
        .await?;

    if exists {
        tx.rollback().await?;
        return Ok(None);
    }

    for (i, chunk) in listings.chunks(INSERT_CHUNK_ROWS).enumerate() {
        let mut query_builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO stock_data (symbol, name, currency, exchange, mic_code, country, type) ",
        );
        query_builder.push_values(chunk, |mut row, listing| {
            row.push_bind(&listing.symbol)
                .push_bind(&listing.name)
                .push_bind(&listing.currency)
                .push_bind(&listing.exchange)
                .push_bind(&listing.mic_code)
                .push_bind(&listing.country)
                .push_bind(&listing.instrument_type);
        });

        if let Err(e) = query_builder.build().execute(&mut *tx).await {
            error!("Failed to insert catalog chunk {} ({} rows): {}", i, chunk.len(), e);
            return Err(e);
        }
    }

    tx.commit().await.map_err(|e| {
        error!("Failed to commit catalog population: {}", e);
        e
    })?;

    info!("Inserted {} catalog rows", listings.len());
    Ok(Some(listings.len()))
}

pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM stock_data")
        .fetch_one(pool)
        .await
}

// ==============================================================================
// Queries
// ==============================================================================

/// Rows matching every supplied filter (case-insensitive contains), in insertion order.
pub async fn search(
    pool: &PgPool,
    params: &StockSearchParams,
) -> Result<Vec<StockCatalogEntry>, sqlx::Error> {
    let mut query_builder = search_query(params);
    query_builder
        .build_query_as::<StockCatalogEntry>()
        .fetch_all(pool)
        .await
}

fn search_query(params: &StockSearchParams) -> QueryBuilder<'static, Postgres> {
    let mut query_builder: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {} FROM stock_data", ENTRY_COLUMNS));

    // Column names come from a fixed list; only the needles are bound.
    for (i, (column, needle)) in params.filters().into_iter().enumerate() {
        query_builder.push(if i == 0 { " WHERE " } else { " AND " });
        query_builder.push(column);
        query_builder.push(" ILIKE ");
        query_builder.push_bind(contains_pattern(needle));
        query_builder.push(r" ESCAPE '\'");
    }

    query_builder.push(" ORDER BY id");
    query_builder
}

pub async fn country_exchanges(pool: &PgPool) -> Result<Vec<CountryExchangeGroup>, sqlx::Error> {
    sqlx::query_as::<_, CountryExchangeGroup>(
        r#"
        SELECT country, string_agg(DISTINCT exchange, ', ' ORDER BY exchange) AS exchange
        FROM stock_data
        GROUP BY country
        ORDER BY country
        "#,
    )
    .fetch_all(pool)
    .await
}

/// `%needle%` with LIKE metacharacters in the needle matched literally.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
