//! HTTP handlers for depletion forecasts

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use shared::{ForecastMode, ProductForecast};

use crate::error::AppResult;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    /// Project a day-indexed trajectory instead of a days-remaining scalar
    pub horizon_days: Option<u32>,
    pub mode: Option<ForecastMode>,
}

/// Forecast a single product
pub async fn get_forecast(
    State(state): State<AppState>,
    Path(product): Path<String>,
    Query(query): Query<ForecastQuery>,
) -> AppResult<Json<ProductForecast>> {
    let forecast = state
        .service
        .forecast(&product, query.horizon_days, query.mode)?;
    Ok(Json(forecast))
}

/// Forecast every product in the catalog
pub async fn list_forecasts(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> AppResult<Json<Vec<ProductForecast>>> {
    let forecasts = state.service.forecast_all(query.horizon_days, query.mode)?;
    Ok(Json(forecasts))
}
