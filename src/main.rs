//! Card Scout server entry point

use anyhow::Result;
use card_scout::{
    config::{self, Settings},
    marketplace::MarketplaceLoader,
    storage::{FileStorage, KeyValueStore, MemoryStorage},
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = config::load()?;

    let default_level = if settings.general.debug { "debug" } else { "info" };
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    info!("Starting Card Scout v{}", card_scout::VERSION);
    info!("Loaded configuration for instance: {}", settings.general.instance_name);

    let storage = open_storage(&settings)?;

    let registry = MarketplaceLoader::load(&settings)?;
    info!("Loaded {} marketplaces", registry.len());

    let addr = SocketAddr::new(settings.server.bind_address.parse()?, settings.server.port);

    let state = AppState::new(settings, registry, storage);
    info!("{} saved searches restored", state.saved.len());

    let app = create_router(state);

    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn open_storage(settings: &Settings) -> Result<Arc<dyn KeyValueStore>> {
    if settings.storage.in_memory {
        info!("Using in-memory storage");
        return Ok(Arc::new(MemoryStorage::new()));
    }

    let dir = settings
        .storage
        .dir
        .clone()
        .unwrap_or_else(FileStorage::default_dir);
    let storage = FileStorage::new(dir)?;
    info!("Using file storage at {}", storage.dir().display());
    Ok(Arc::new(storage))
}
