//! Depletion forecast tests
//!
//! Tests for forecasting including:
//! - Closed-form trajectory with clamping at zero
//! - Rate flooring for degenerate histories
//! - Explicit undefined results for products without history

use amba_erp_backend::{AppError, InventoryService};
use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    project_trajectory, ForecastConfig, ForecastEngine, ForecastMode, ForecastResult,
    OrderRequest, Product, ProductCatalog, RateSource, ThresholdRule,
};

fn service(engine: ForecastEngine, products: Vec<Product>) -> InventoryService {
    InventoryService::new(
        ProductCatalog::new(products),
        engine,
        ForecastMode::RecentWindow,
        Box::new(ThresholdRule::default()),
    )
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, day).unwrap()
}

fn order_on(service: &InventoryService, product: &str, day: u32, qty: u32) {
    let at = Utc.with_ymd_and_hms(2024, 7, day, 11, 0, 0).unwrap();
    assert!(service
        .submit_order_at(OrderRequest::new("Acme", product, qty), at)
        .is_accepted());
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Stock 100 at a flat 10/day is gone by day 10 and stays at zero
    #[test]
    fn test_flat_rate_trajectory() {
        let product = Product::new("A", 100, Decimal::ONE).with_daily_usage_rate(10.0);
        let service = service(ForecastEngine::default(), vec![product]);

        let forecast = service
            .forecast_at("A", Some(15), Some(ForecastMode::StaticRate), date(1))
            .unwrap();
        let points = forecast.result.points().unwrap();
        assert_eq!(points.len(), 16);
        assert_eq!(points[10].projected_stock, 0.0);
        assert_eq!(points[15].projected_stock, 0.0);
        assert_eq!(forecast.result.rate().unwrap().source, RateSource::ProductConfigured);
    }

    /// No orders and no default rate is undefined rather than an error
    #[test]
    fn test_no_history_is_undefined() {
        let service = service(
            ForecastEngine::default(),
            vec![Product::new("A", 100, Decimal::ONE)],
        );
        let forecast = service.forecast_at("A", None, None, date(1)).unwrap();
        assert_eq!(forecast.result, ForecastResult::Undefined);

        let json = serde_json::to_value(&forecast).unwrap();
        assert_eq!(json["result"]["kind"], "undefined");
    }

    /// A configured default rate covers products without history
    #[test]
    fn test_default_rate_fallback() {
        let engine = ForecastEngine::new(ForecastConfig {
            default_rate: Some(4.0),
            ..Default::default()
        });
        let service = service(engine, vec![Product::new("A", 100, Decimal::ONE)]);
        let forecast = service.forecast_at("A", None, None, date(1)).unwrap();
        assert_eq!(forecast.result.days(), Some(25));
    }

    /// Recent-window mean over the product's own orders only
    #[test]
    fn test_recent_window_per_product() {
        let service = service(
            ForecastEngine::default(),
            vec![
                Product::new("A", 200, Decimal::ONE),
                Product::new("B", 200, Decimal::ONE),
            ],
        );
        order_on(&service, "A", 1, 10);
        order_on(&service, "B", 1, 90);
        order_on(&service, "A", 2, 30);

        // A: 160 left at 20/day
        let forecast = service.forecast_at("A", None, None, date(2)).unwrap();
        assert_eq!(forecast.stock_quantity, 160);
        assert_eq!(forecast.result.days(), Some(8));
    }

    /// Trend mode follows the cumulative order line
    #[test]
    fn test_trend_days() {
        let service = service(
            ForecastEngine::default(),
            vec![Product::new("A", 140, Decimal::ONE)],
        );
        for day in 1..=4 {
            order_on(&service, "A", day, 10);
        }

        let forecast = service
            .forecast_at("A", None, Some(ForecastMode::Trend), date(4))
            .unwrap();
        assert_eq!(forecast.stock_quantity, 100);
        assert_eq!(forecast.result.days(), Some(10));
    }

    /// Forecast for every product keeps catalog order
    #[test]
    fn test_forecast_all() {
        let engine = ForecastEngine::new(ForecastConfig {
            default_rate: Some(1.0),
            ..Default::default()
        });
        let service = service(engine, shared::seed_products());
        let forecasts = service.forecast_all_at(None, None, date(1)).unwrap();

        let names: Vec<_> = forecasts.iter().map(|f| f.product_name.as_str()).collect();
        assert_eq!(names, vec!["Transformer Laminations", "Motor Stamping", "Custom Parts"]);
        assert_eq!(forecasts[2].result.days(), Some(50));
    }

    /// Unknown products are a not-found error
    #[test]
    fn test_unknown_product() {
        let service = service(ForecastEngine::default(), shared::seed_products());
        assert!(matches!(
            service.forecast_at("Gizmo", None, None, date(1)),
            Err(AppError::NotFound(_))
        ));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Trajectory is non-increasing and floors at zero
        #[test]
        fn prop_trajectory_monotonic(
            stock in 0u32..5_000,
            rate in 0.1f64..1_000.0,
            horizon in 0u32..365
        ) {
            let points = project_trajectory(stock, rate, horizon);
            prop_assert_eq!(points[0].projected_stock, f64::from(stock));
            for pair in points.windows(2) {
                prop_assert!(pair[1].projected_stock <= pair[0].projected_stock);
                prop_assert!(pair[1].projected_stock >= 0.0);
            }
        }

        /// Every mode yields a finite result or an explicit undefined
        #[test]
        fn prop_forecasts_are_finite(
            orders in prop::collection::vec((1u32..29, 1u32..40), 0..25),
            mode in prop_oneof![
                Just(ForecastMode::RecentWindow),
                Just(ForecastMode::Trend),
                Just(ForecastMode::StaticRate)
            ]
        ) {
            let service = service(
                ForecastEngine::default(),
                vec![Product::new("A", 10_000, Decimal::ONE)],
            );
            for (day, qty) in orders {
                order_on(&service, "A", day, qty);
            }

            let forecast = service.forecast_at("A", Some(30), Some(mode), date(29)).unwrap();
            if let Some(points) = forecast.result.points() {
                prop_assert!(points.iter().all(|p| p.projected_stock.is_finite()));
            }
            if let Some(rate) = forecast.result.rate() {
                prop_assert!(rate.daily_rate.is_finite() && rate.daily_rate > 0.0);
            }

            let scalar = service.forecast_at("A", None, Some(mode), date(29)).unwrap();
            prop_assert_eq!(scalar.result.is_undefined(), forecast.result.is_undefined());
        }
    }
}
