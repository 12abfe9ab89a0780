//! biztime server binary
//!
//! Reads configuration (see [`biztime::config`]), initializes logging, opens
//! the configured store and serves until Ctrl+C or SIGTERM.

use anyhow::Result;
use biztime::config::{Backend, ServerConfig};
use biztime::server::ServerBuilder;
use biztime::storage::InMemoryStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::load()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let builder = ServerBuilder::new();
    let builder = match config.database.backend {
        Backend::InMemory => {
            tracing::warn!("Using the in-memory store; data is lost on shutdown");
            builder.with_store(InMemoryStore::new())
        }
        #[cfg(feature = "postgres")]
        Backend::Postgres => {
            use biztime::storage::postgres::{PostgresStore, ensure_schema};

            let store =
                PostgresStore::connect(config.database.url()?, config.database.max_connections)
                    .await?;
            ensure_schema(store.pool()).await?;
            tracing::info!("Connected to PostgreSQL");
            builder.with_store(store)
        }
        #[cfg(not(feature = "postgres"))]
        Backend::Postgres => {
            anyhow::bail!("biztime was built without the `postgres` feature");
        }
    };

    builder.serve(&config.bind).await
}
