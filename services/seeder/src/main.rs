use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod auth;
mod config;
mod cors;
mod error;
mod fixtures;
mod identity;
mod models;
mod routes;
mod seed;
mod state;
mod upsert;

use common::{
    cache::{RedisConfig, RedisPool},
    database::{self, DatabaseConfig, init_pool},
    store::{DocumentStore, MemoryDocumentStore, PgDocumentStore, RedisDocumentStore},
};

use crate::{
    config::{SeederConfig, StoreBackend},
    identity::{AccountDirectory, JwtConfig, JwtIdentityProvider},
    state::{AppState, Clock},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting seeder service");

    let config = SeederConfig::from_env()?;

    // Store client and account directory are created once and shared
    let (store, accounts): (Arc<dyn DocumentStore>, AccountDirectory) = match config.store_backend
    {
        StoreBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let pool = init_pool(&db_config).await?;

            if database::health_check(&pool).await? {
                info!("Database connection successful");
            } else {
                anyhow::bail!("Failed to connect to database");
            }
            database::ensure_document_schema(&pool).await?;

            (
                Arc::new(PgDocumentStore::new(pool.clone())) as Arc<dyn DocumentStore>,
                AccountDirectory::Postgres(pool),
            )
        }
        StoreBackend::Redis => {
            let redis_config = RedisConfig::from_env()?;
            let redis_pool = RedisPool::new(&redis_config).await?;

            if !redis_pool.health_check().await? {
                anyhow::bail!("Failed to connect to Redis");
            }

            (
                Arc::new(RedisDocumentStore::new(
                    redis_pool,
                    config.redis_key_prefix.clone(),
                )) as Arc<dyn DocumentStore>,
                AccountDirectory::Static(config.allowed_accounts.clone()),
            )
        }
        StoreBackend::Memory => (
            Arc::new(MemoryDocumentStore::new()) as Arc<dyn DocumentStore>,
            AccountDirectory::Static(config.allowed_accounts.clone()),
        ),
    };
    info!("Document store backend: {}", store.backend());

    let jwt_config = JwtConfig::from_env()?;
    let identity = JwtIdentityProvider::new(&jwt_config, accounts)?;

    let app_state = AppState {
        store,
        identity: Arc::new(identity),
        demo_keys: Arc::new(config.demo_keys.clone()),
        clock: Clock::System,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Seeder service listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
