//! HTTP handlers for order intake and export

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use shared::{Order, OrderOutcome, OrderRequest};

use super::inventory::{wants_csv, FormatQuery};
use crate::error::AppResult;
use crate::services::InventoryService;
use crate::AppState;

/// Submit an order. Accepted orders return 201, rejected ones 422 with the reason.
pub async fn submit_order(
    State(state): State<AppState>,
    Json(request): Json<OrderRequest>,
) -> (StatusCode, Json<OrderOutcome>) {
    let outcome = state.service.submit_order(request);
    let status = if outcome.is_accepted() {
        StatusCode::CREATED
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    (status, Json(outcome))
}

/// List accepted orders, oldest first
pub async fn list_orders(State(state): State<AppState>) -> Json<Vec<Order>> {
    Json(state.service.list_orders())
}

/// Export orders in their downstream record shape
pub async fn export_orders(
    State(state): State<AppState>,
    Query(query): Query<FormatQuery>,
) -> AppResult<impl IntoResponse> {
    let records = state.service.order_records();

    if wants_csv(query.format.as_deref())? {
        let csv = InventoryService::export_to_csv(&records)?;
        Ok((
            [(header::CONTENT_TYPE, "text/csv"), (header::CONTENT_DISPOSITION, "attachment; filename=\"orders.csv\"")],
            csv,
        ).into_response())
    } else {
        Ok(Json(records).into_response())
    }
}
