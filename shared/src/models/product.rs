//! Product catalog models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product tracked by the catalog, keyed by its case-sensitive name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub name: String,
    pub stock_quantity: u32,
    pub unit_price: Decimal,
    /// Fixed consumption estimate used by the static-rate forecast
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_usage_rate: Option<f64>,
}

impl Product {
    pub fn new(name: impl Into<String>, stock_quantity: u32, unit_price: Decimal) -> Self {
        Self {
            name: name.into(),
            stock_quantity,
            unit_price,
            daily_usage_rate: None,
        }
    }

    pub fn with_daily_usage_rate(mut self, rate: f64) -> Self {
        self.daily_usage_rate = Some(rate);
        self
    }

    /// Value of the stock on hand at the current unit price
    pub fn stock_value(&self) -> Decimal {
        self.unit_price * Decimal::from(self.stock_quantity)
    }

    pub fn is_depleted(&self) -> bool {
        self.stock_quantity == 0
    }
}
