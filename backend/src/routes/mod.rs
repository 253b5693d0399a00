//! Route definitions for the AMBA ERP inventory server

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Catalog and stock movements
        .route("/catalog", get(handlers::get_catalog))
        .route("/inventory/log", get(handlers::get_inventory_log))
        // Order intake
        .merge(order_routes())
        // Forecasts
        .route("/forecast", get(handlers::list_forecasts))
        .route("/forecast/:product", get(handlers::get_forecast))
        // Analysis
        .route("/anomalies", get(handlers::detect_anomalies))
        .route("/customers", get(handlers::list_customers))
}

/// Order routes
fn order_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/orders",
            get(handlers::list_orders).post(handlers::submit_order),
        )
        .route("/orders/export", get(handlers::export_orders))
}
