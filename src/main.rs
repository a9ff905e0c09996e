mod app;
mod config;
mod db;
mod errors;
mod external;
mod logging;
mod models;
mod routes;
mod services;
mod state;
mod store;

use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use crate::config::{AppConfig, CatalogBackend};
use crate::external::http_upstream::HttpUpstream;
use crate::logging::LoggingConfig;
use crate::state::AppState;
use crate::store::{CatalogStore, InMemoryCatalogStore, PgCatalogStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    logging::init_logging(LoggingConfig::from_env())
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    let config = AppConfig::from_env().context("invalid configuration")?;

    let price_api = HttpUpstream::new(&config.financial_api_base_url, Some(config.api_key.clone()))
        .context("FINANCIAL_API_BASE_URL")?;
    let catalog_api = HttpUpstream::new(&config.twelve_data_base_url, config.twelve_data_api_key.clone())
        .context("TWELVE_DATA_BASE_URL")?;

    let catalog: Arc<dyn CatalogStore> = match config.catalog_backend {
        CatalogBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("database url missing for postgres catalog")?;
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(database_url)
                .await
                .context("failed to connect to database")?;
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("failed to run migrations")?;
            tracing::info!("🗄️ Using Postgres stock catalog");
            Arc::new(PgCatalogStore::new(pool))
        }
        CatalogBackend::Memory => {
            tracing::info!("🗄️ Using in-memory stock catalog");
            Arc::new(InMemoryCatalogStore::new())
        }
    };

    let state = AppState {
        price_api: Arc::new(price_api),
        catalog_api: Arc::new(catalog_api),
        catalog,
    };
    let app = app::create_app(state);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!("🚀 Stock facade backend running at http://{}/", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
