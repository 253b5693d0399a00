//! Depletion forecasting
//!
//! Three rate estimators share one engine: a mean over the most recent orders,
//! a least-squares trend over cumulative quantity, and a static per-product
//! rate. Whatever the estimator produces, a non-positive or non-finite rate is
//! replaced by the rate floor, so results are always finite and non-negative.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::ledger::OrderLedger;
use crate::models::{
    ForecastMode, ForecastResult, Order, Product, ProductForecast, RateEstimate, RateSource,
    TrajectoryPoint,
};

/// Orders averaged by the recent-window estimator
pub const DEFAULT_WINDOW: usize = 10;

/// Units per day substituted for non-positive rates
pub const DEFAULT_RATE_FLOOR: f64 = 1.0;

/// Forecast engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    pub window: usize,
    /// Rate used when a product has too little history; `None` yields `Undefined`
    pub default_rate: Option<f64>,
    pub rate_floor: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            default_rate: None,
            rate_floor: DEFAULT_RATE_FLOOR,
        }
    }
}

/// Least-squares line `y = intercept + slope * x`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

/// Fit a line through the points. `None` with fewer than two points or when
/// every x is identical.
pub fn fit_line(points: &[(f64, f64)]) -> Option<LinearFit> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (sxx, sxy) = points.iter().fold((0.0, 0.0), |(sxx, sxy), (x, y)| {
        let dx = x - mean_x;
        (sxx + dx * dx, sxy + dx * (y - mean_y))
    });

    if !(sxx.is_finite() && sxx > 0.0) {
        return None;
    }
    let slope = sxy / sxx;
    Some(LinearFit {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}

/// Closed-form trajectory `max(stock - rate * d, 0)` for `d` in `0..=horizon_days`.
///
/// A non-positive or non-finite rate projects flat stock.
pub fn project_trajectory(stock: u32, daily_rate: f64, horizon_days: u32) -> Vec<TrajectoryPoint> {
    let rate = if daily_rate.is_finite() && daily_rate > 0.0 {
        daily_rate
    } else {
        0.0
    };
    let start = f64::from(stock);
    (0..=horizon_days)
        .map(|day| TrajectoryPoint {
            day,
            projected_stock: (start - rate * f64::from(day)).max(0.0),
        })
        .collect()
}

/// Whole days of stock left at a positive daily rate
pub fn days_at_rate(stock: u32, daily_rate: f64) -> u64 {
    if stock == 0 {
        return 0;
    }
    // float-to-int casts saturate, so tiny rates cannot overflow
    (f64::from(stock) / daily_rate).floor().max(0.0) as u64
}

fn day_number(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

/// (day number, cumulative quantity) pairs in chronological order
fn cumulative_points(history: &[&Order]) -> Vec<(f64, f64)> {
    let mut sorted = history.to_vec();
    sorted.sort_by_key(|o| o.ordered_at);

    let mut cumulative = 0.0;
    sorted
        .iter()
        .map(|o| {
            cumulative += f64::from(o.quantity);
            (day_number(o.order_date()), cumulative)
        })
        .collect()
}

/// Projects stock depletion per product
#[derive(Debug, Clone, Default)]
pub struct ForecastEngine {
    config: ForecastConfig,
}

impl ForecastEngine {
    pub fn new(config: ForecastConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    fn rate_floor(&self) -> f64 {
        let floor = self.config.rate_floor;
        if floor.is_finite() && floor > 0.0 {
            floor
        } else {
            DEFAULT_RATE_FLOOR
        }
    }

    fn resolve(&self, raw: f64, source: RateSource, sample_size: usize) -> RateEstimate {
        if raw.is_finite() && raw > 0.0 {
            return RateEstimate {
                daily_rate: raw,
                source,
                sample_size,
                floored: false,
            };
        }
        let floor = self.rate_floor();
        tracing::debug!(raw, floor, ?source, "degenerate consumption rate, using floor");
        RateEstimate {
            daily_rate: floor,
            source,
            sample_size,
            floored: true,
        }
    }

    fn fallback(&self) -> Option<RateEstimate> {
        self.config
            .default_rate
            .map(|rate| self.resolve(rate, RateSource::DefaultRate, 0))
    }

    /// Estimate a product's daily consumption from its history (oldest first).
    ///
    /// Returns `None` when the mode has too little to work with and no default
    /// rate is configured.
    pub fn estimate_rate(
        &self,
        mode: ForecastMode,
        product: &Product,
        history: &[&Order],
    ) -> Option<RateEstimate> {
        match mode {
            ForecastMode::RecentWindow => {
                if history.is_empty() {
                    return self.fallback();
                }
                let window = self.config.window.max(1);
                let recent = &history[history.len().saturating_sub(window)..];
                let total: f64 = recent.iter().map(|o| f64::from(o.quantity)).sum();
                let mean = total / recent.len() as f64;
                Some(self.resolve(mean, RateSource::OrderWindow, recent.len()))
            }
            ForecastMode::Trend => {
                if history.len() < 2 {
                    return self.fallback();
                }
                let points = cumulative_points(history);
                let slope = fit_line(&points).map_or(f64::NAN, |fit| fit.slope);
                Some(self.resolve(slope, RateSource::TrendFit, points.len()))
            }
            ForecastMode::StaticRate => product
                .daily_usage_rate
                .map(|rate| self.resolve(rate, RateSource::ProductConfigured, 0))
                .or_else(|| self.fallback()),
        }
    }

    /// Scalar projection: whole days until the product runs out, counted from `as_of`
    pub fn days_to_depletion(
        &self,
        mode: ForecastMode,
        product: &Product,
        history: &[&Order],
        as_of: NaiveDate,
    ) -> ForecastResult {
        if mode == ForecastMode::Trend && history.len() >= 2 {
            return self.trend_days(product, history, as_of);
        }
        match self.estimate_rate(mode, product, history) {
            Some(rate) => ForecastResult::DaysRemaining {
                days: days_at_rate(product.stock_quantity, rate.daily_rate),
                rate,
            },
            None => ForecastResult::Undefined,
        }
    }

    /// Solve the fitted cumulative line for the day it reaches total supply
    /// (ordered so far plus stock on hand). Past dates clamp to zero days.
    fn trend_days(&self, product: &Product, history: &[&Order], as_of: NaiveDate) -> ForecastResult {
        let points = cumulative_points(history);
        let slope = fit_line(&points).map_or(f64::NAN, |fit| fit.slope);
        let rate = self.resolve(slope, RateSource::TrendFit, points.len());

        if product.stock_quantity == 0 {
            return ForecastResult::DaysRemaining { days: 0, rate };
        }

        // Anchor the line at the centroid so a floored slope still passes through the data
        let n = points.len() as f64;
        let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
        let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;
        let intercept = mean_y - rate.daily_rate * mean_x;

        let ordered_so_far = points.last().map_or(0.0, |(_, y)| *y);
        let total_supply = ordered_so_far + f64::from(product.stock_quantity);
        let depletion_day = (total_supply - intercept) / rate.daily_rate;
        let days = (depletion_day - day_number(as_of)).floor().max(0.0);

        ForecastResult::DaysRemaining {
            days: days as u64,
            rate,
        }
    }

    /// Day-indexed projection over `0..=horizon_days`
    pub fn trajectory(
        &self,
        mode: ForecastMode,
        product: &Product,
        history: &[&Order],
        horizon_days: u32,
    ) -> ForecastResult {
        match self.estimate_rate(mode, product, history) {
            Some(rate) => ForecastResult::Trajectory {
                points: project_trajectory(product.stock_quantity, rate.daily_rate, horizon_days),
                rate,
            },
            None => ForecastResult::Undefined,
        }
    }

    /// Forecast one product against the ledger. A horizon selects the trajectory form.
    pub fn forecast(
        &self,
        mode: ForecastMode,
        product: &Product,
        ledger: &OrderLedger,
        as_of: NaiveDate,
        horizon_days: Option<u32>,
    ) -> ProductForecast {
        let history = ledger.orders_for(&product.name);
        let result = match horizon_days {
            Some(horizon) => self.trajectory(mode, product, &history, horizon),
            None => self.days_to_depletion(mode, product, &history, as_of),
        };

        ProductForecast {
            product_name: product.name.clone(),
            mode,
            stock_quantity: product.stock_quantity,
            as_of,
            result,
        }
    }
}
