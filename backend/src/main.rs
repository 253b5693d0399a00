//! AMBA ERP inventory server binary

use std::{net::SocketAddr, sync::Arc};

use amba_erp_backend::{
    create_app,
    external::{CatalogLoader, CsvCatalogLoader, SeedCatalog},
    AppState, Config, InventoryService,
};
use shared::ProductCatalog;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "amba_server=debug,amba_erp_backend=debug,shared=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting AMBA ERP Inventory Server");
    tracing::info!("Environment: {}", config.environment);

    // Load the initial catalog
    let loader: Box<dyn CatalogLoader> = match &config.catalog.path {
        Some(path) => {
            tracing::info!("Loading catalog from {}", path);
            Box::new(CsvCatalogLoader::new(path))
        }
        None => {
            tracing::info!("No catalog path configured, using seed catalog");
            Box::new(SeedCatalog)
        }
    };
    let catalog = ProductCatalog::new(loader.load()?);
    tracing::info!(
        products = catalog.len(),
        forecast_mode = config.forecast.mode.as_str(),
        anomaly_strategy = ?config.anomaly.strategy,
        "Inventory ready"
    );

    // Create application state
    let service = InventoryService::from_config(&config, catalog);
    let state = AppState {
        service: Arc::new(service),
        config: Arc::new(config.clone()),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
