//! Depletion forecast models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Strategy used to estimate a product's consumption rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMode {
    /// Mean quantity over the most recent orders
    #[default]
    RecentWindow,
    /// Least-squares slope of cumulative quantity over order dates
    Trend,
    /// Daily usage rate configured on the product
    StaticRate,
}

impl ForecastMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastMode::RecentWindow => "recent_window",
            ForecastMode::Trend => "trend",
            ForecastMode::StaticRate => "static_rate",
        }
    }
}

/// Where a consumption rate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    OrderWindow,
    TrendFit,
    ProductConfigured,
    DefaultRate,
}

/// A resolved daily consumption rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateEstimate {
    /// Units per day, always finite and positive
    pub daily_rate: f64,
    pub source: RateSource,
    /// Orders that contributed to the estimate
    pub sample_size: usize,
    /// True when the estimator produced a non-positive rate and the floor was used
    pub floored: bool,
}

/// Projected stock on a given day offset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub day: u32,
    pub projected_stock: f64,
}

/// Outcome of a forecast for one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ForecastResult {
    DaysRemaining {
        days: u64,
        rate: RateEstimate,
    },
    Trajectory {
        rate: RateEstimate,
        points: Vec<TrajectoryPoint>,
    },
    /// Not enough history and no default rate to fall back on
    Undefined,
}

impl ForecastResult {
    pub fn days(&self) -> Option<u64> {
        match self {
            ForecastResult::DaysRemaining { days, .. } => Some(*days),
            _ => None,
        }
    }

    pub fn points(&self) -> Option<&[TrajectoryPoint]> {
        match self {
            ForecastResult::Trajectory { points, .. } => Some(points),
            _ => None,
        }
    }

    pub fn rate(&self) -> Option<&RateEstimate> {
        match self {
            ForecastResult::DaysRemaining { rate, .. } | ForecastResult::Trajectory { rate, .. } => {
                Some(rate)
            }
            ForecastResult::Undefined => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, ForecastResult::Undefined)
    }
}

/// Forecast for a single catalog product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductForecast {
    pub product_name: String,
    pub mode: ForecastMode,
    pub stock_quantity: u32,
    pub as_of: NaiveDate,
    pub result: ForecastResult,
}
