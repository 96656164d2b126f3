use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use domain::services::{GadgetStore, InMemoryGadgetStore};
use gadgets_api::{
    app,
    config::{Config, StoreBackend},
    middleware,
};
use persistence::repositories::GadgetRepository;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load()?;

    middleware::logging::init_logging(&config.logging);
    middleware::init_metrics()?;

    info!("Starting Gadgets API v{}", env!("CARGO_PKG_VERSION"));

    let (store, pool) = match config.store.backend {
        StoreBackend::Postgres => {
            let db_config: persistence::db::DatabaseConfig = (&config.database).into();
            let pool = persistence::db::create_pool(&db_config).await?;

            info!("Running database migrations...");
            persistence::db::run_migrations(&pool).await?;
            info!("Migrations completed");

            let store: Arc<dyn GadgetStore> = Arc::new(GadgetRepository::new(pool.clone()));
            (store, Some(pool))
        }
        StoreBackend::Memory => {
            info!("Using in-memory gadget store; data is lost on restart");
            let store: Arc<dyn GadgetStore> = Arc::new(InMemoryGadgetStore::new());
            (store, None)
        }
    };

    let addr = config.socket_addr()?;
    let app = app::create_app(config, store, pool);

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
