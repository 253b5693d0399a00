//! HTTP handlers for catalog and inventory log endpoints

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use shared::ProductCatalog;

use crate::error::{AppError, AppResult};
use crate::services::InventoryService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct FormatQuery {
    pub format: Option<String>, // "json" or "csv"
}

/// Wants CSV rather than JSON; anything but the two known formats is rejected
pub(crate) fn wants_csv(format: Option<&str>) -> AppResult<bool> {
    match format {
        None | Some("json") => Ok(false),
        Some("csv") => Ok(true),
        Some(other) => Err(AppError::Validation {
            field: "format".to_string(),
            message: format!("Unsupported export format: {}", other),
        }),
    }
}

/// Current catalog with stock levels
pub async fn get_catalog(State(state): State<AppState>) -> Json<ProductCatalog> {
    Json(state.service.get_catalog())
}

/// OUT movements for all accepted orders
pub async fn get_inventory_log(
    State(state): State<AppState>,
    Query(query): Query<FormatQuery>,
) -> AppResult<impl IntoResponse> {
    let log = state.service.inventory_log();

    if wants_csv(query.format.as_deref())? {
        let csv = InventoryService::export_to_csv(&log)?;
        Ok((
            [(header::CONTENT_TYPE, "text/csv"), (header::CONTENT_DISPOSITION, "attachment; filename=\"inventory_log.csv\"")],
            csv,
        ).into_response())
    } else {
        Ok(Json(log).into_response())
    }
}
