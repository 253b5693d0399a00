//! WebAssembly module for the AMBA ERP dashboard
//!
//! Provides client-side computation for:
//! - Depletion trajectories for charting
//! - Days-to-depletion at a given rate
//! - Order pre-validation before submission
//! - Threshold anomaly checks over fetched orders

use chrono::Utc;
use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

use shared::{project_trajectory, AnomalyModel, ForecastConfig, ForecastEngine, ThresholdRule};

fn js_error(message: String) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::error_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization failed: {}", e))
}

/// Project `max(stock - rate * day, 0)` for days `0..=horizon_days`, as JSON points
#[wasm_bindgen]
pub fn project_depletion_trajectory(
    stock: u32,
    daily_rate: f64,
    horizon_days: u32,
) -> Result<String, JsValue> {
    to_json(&project_trajectory(stock, daily_rate, horizon_days)).map_err(js_error)
}

/// Whole days until stock runs out; non-positive rates are replaced by `rate_floor`
#[wasm_bindgen]
pub fn days_until_depleted(stock: u32, daily_rate: f64, rate_floor: f64) -> f64 {
    let engine = ForecastEngine::new(ForecastConfig {
        rate_floor,
        ..Default::default()
    });
    let product = Product::new("", stock, Decimal::ZERO).with_daily_usage_rate(daily_rate);
    engine
        .days_to_depletion(
            ForecastMode::StaticRate,
            &product,
            &[],
            Utc::now().date_naive(),
        )
        .days()
        .map_or(0.0, |days| days as f64)
}

/// Pre-check an order. Returns the rejection message, or nothing when it may proceed.
///
/// `current_stock` is absent when the product is not in the catalog.
#[wasm_bindgen]
pub fn check_order(
    customer_name: &str,
    product_name: &str,
    quantity: u32,
    amount_collected: f64,
    current_stock: Option<u32>,
) -> Option<String> {
    let Ok(amount) = Decimal::try_from(amount_collected) else {
        return Some(RejectionReason::InvalidAmount.to_string());
    };
    validate_order_fields(customer_name, product_name, quantity, amount, current_stock)
        .err()
        .map(|reason| reason.to_string())
}

/// Run the threshold rule over orders fetched from the API, returning the outcome as JSON
#[wasm_bindgen]
pub fn flag_threshold_anomalies(
    orders_json: &str,
    median_multiple: f64,
    absolute_threshold: u32,
) -> Result<String, JsValue> {
    let orders: Vec<Order> = serde_json::from_str(orders_json)
        .map_err(|e| js_error(format!("Invalid orders JSON: {}", e)))?;

    let rule = ThresholdRule {
        median_multiple,
        absolute_threshold,
    };
    let refs: Vec<&Order> = orders.iter().collect();
    to_json(&rule.detect(&refs, &orders)).map_err(js_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trajectory_json() {
        let json = project_depletion_trajectory(100, 10.0, 15).unwrap();
        let points: Vec<TrajectoryPoint> = serde_json::from_str(&json).unwrap();
        assert_eq!(points.len(), 16);
        assert_eq!(points[10].projected_stock, 0.0);
        assert_eq!(points[15].projected_stock, 0.0);
    }

    #[test]
    fn test_days_until_depleted() {
        assert_eq!(days_until_depleted(100, 10.0, 1.0), 10.0);
        assert_eq!(days_until_depleted(100, 0.0, 4.0), 25.0);
        assert_eq!(days_until_depleted(100, -3.0, 0.0), 100.0);
        assert_eq!(days_until_depleted(0, 5.0, 1.0), 0.0);
    }

    #[test]
    fn test_check_order() {
        assert_eq!(check_order("Acme", "A", 5, 0.0, Some(5)), None);
        assert_eq!(
            check_order(" ", "A", 50, 0.0, Some(5)).as_deref(),
            Some("Customer Name is required!")
        );
        assert_eq!(
            check_order("Acme", "A", 6, 0.0, Some(5)).as_deref(),
            Some("Insufficient stock for this product!")
        );
        assert!(check_order("Acme", "A", 1, 0.0, None).is_some());
    }

    #[test]
    fn test_check_order_rejects_non_finite_amounts() {
        let expected = RejectionReason::InvalidAmount.to_string();
        for amount in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(check_order("Acme", "A", 1, amount, Some(5)), Some(expected.clone()));
        }
    }

    #[test]
    fn test_flag_threshold_anomalies() {
        let orders: Vec<serde_json::Value> = [1, 1, 1, 1, 1, 1, 1, 1, 1, 500]
            .iter()
            .enumerate()
            .map(|(i, qty)| {
                serde_json::json!({
                    "id": i,
                    "customer_name": "Acme",
                    "product_name": "A",
                    "quantity": qty,
                    "amount_collected": "0",
                    "last_payment_date": null,
                    "ordered_at": "2024-06-01T08:00:00Z"
                })
            })
            .collect();
        let json = flag_threshold_anomalies(&serde_json::to_string(&orders).unwrap(), 2.0, 1000).unwrap();
        let outcome: AnomalyOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(outcome.flagged_ids(), vec![OrderId(9)]);
    }
}
