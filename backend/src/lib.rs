//! AMBA ERP inventory server
//!
//! Tracks stock against incoming orders, projects depletion per product and
//! flags unusual orders. The HTTP layer is a thin shell over `InventoryService`.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use services::InventoryService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<InventoryService>,
    pub config: Arc<Config>,
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "AMBA ERP Inventory API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
