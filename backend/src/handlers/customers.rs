//! HTTP handlers for the customer overview

use axum::{extract::State, Json};
use shared::CustomerSummary;

use crate::AppState;

/// Per-customer order value, collections and outstanding balance
pub async fn list_customers(State(state): State<AppState>) -> Json<Vec<CustomerSummary>> {
    Json(state.service.customer_summaries())
}
