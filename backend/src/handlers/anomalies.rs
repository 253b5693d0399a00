//! HTTP handlers for anomaly detection

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use shared::{AnomalyOutcome, DetectionWindow};

use crate::error::{AppError, AppResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AnomalyQuery {
    /// Only the most recent N orders
    pub last: Option<usize>,
    /// Only orders placed on or after this date
    pub since: Option<NaiveDate>,
}

impl AnomalyQuery {
    pub fn window(&self) -> AppResult<DetectionWindow> {
        match (self.last, self.since) {
            (Some(_), Some(_)) => Err(AppError::Validation {
                field: "since".to_string(),
                message: "Use either last or since, not both".to_string(),
            }),
            (Some(n), None) => Ok(DetectionWindow::Last(n)),
            (None, Some(date)) => Ok(DetectionWindow::Since(date)),
            (None, None) => Ok(DetectionWindow::All),
        }
    }
}

/// Run the configured anomaly model over the ledger
pub async fn detect_anomalies(
    State(state): State<AppState>,
    Query(query): Query<AnomalyQuery>,
) -> AppResult<Json<AnomalyOutcome>> {
    let window = query.window()?;
    let service = state.service.clone();

    // Model fitting is CPU-bound; keep it off the async workers
    let outcome = tokio::task::spawn_blocking(move || service.detect_anomalies(window))
        .await
        .map_err(|e| AppError::Internal(format!("Anomaly detection task failed: {}", e)))?;
    Ok(Json(outcome))
}
