//! Median-multiple and absolute quantity thresholds

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::AnomalyModel;
use crate::models::{AnomalyFlag, AnomalyOutcome, Order};

/// Reason attached when a quantity exceeds the absolute threshold
pub const REASON_QUANTITY_UNUSUALLY_HIGH: &str = "Quantity unusually high";

/// Reason attached when a quantity exceeds the product's median multiple
pub const REASON_HIGH_QUANTITY_ORDER: &str = "High Quantity Order";

/// Flags orders whose quantity is far above what is normal for the product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRule {
    /// Multiple of the per-product median quantity
    pub median_multiple: f64,
    /// Quantity above which an order is always flagged
    pub absolute_threshold: u32,
}

impl Default for ThresholdRule {
    fn default() -> Self {
        Self {
            median_multiple: 2.0,
            absolute_threshold: 1000,
        }
    }
}

/// Median of a non-empty set of quantities
pub fn median(values: &mut [u32]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_unstable();
    let mid = values.len() / 2;
    let median = if values.len() % 2 == 0 {
        (f64::from(values[mid - 1]) + f64::from(values[mid])) / 2.0
    } else {
        f64::from(values[mid])
    };
    Some(median)
}

impl ThresholdRule {
    fn reason(&self, quantity: u32, product_median: f64) -> Option<&'static str> {
        if quantity > self.absolute_threshold {
            Some(REASON_QUANTITY_UNUSUALLY_HIGH)
        } else if f64::from(quantity) > self.median_multiple * product_median {
            Some(REASON_HIGH_QUANTITY_ORDER)
        } else {
            None
        }
    }
}

impl AnomalyModel for ThresholdRule {
    fn name(&self) -> &'static str {
        "threshold"
    }

    fn detect(&self, orders: &[&Order], history: &[Order]) -> AnomalyOutcome {
        if orders.is_empty() {
            return AnomalyOutcome::EmptyLedger;
        }

        // Medians come from the product's whole history, not just the window
        let mut quantities: HashMap<&str, Vec<u32>> = HashMap::new();
        for order in history {
            quantities
                .entry(order.product_name.as_str())
                .or_default()
                .push(order.quantity);
        }
        let medians: HashMap<&str, f64> = quantities
            .into_iter()
            .filter_map(|(product, mut values)| median(&mut values).map(|m| (product, m)))
            .collect();

        let flags = orders
            .iter()
            .filter_map(|order| {
                let product_median = medians
                    .get(order.product_name.as_str())
                    .copied()
                    .unwrap_or(f64::INFINITY);
                self.reason(order.quantity, product_median)
                    .map(|reason| AnomalyFlag::for_order(order, reason))
            })
            .collect();

        AnomalyOutcome::Detected { flags }
    }
}
