//! Anomaly detection models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Order, OrderId};

/// Detection strategy selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyStrategy {
    #[default]
    Threshold,
    IsolationForest,
}

/// An order singled out by a detection run. Never stored on the order itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyFlag {
    pub order_id: OrderId,
    pub customer_name: String,
    pub product_name: String,
    pub quantity: u32,
    pub amount_collected: Decimal,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl AnomalyFlag {
    pub fn for_order(order: &Order, reason: impl Into<String>) -> Self {
        Self {
            order_id: order.id,
            customer_name: order.customer_name.clone(),
            product_name: order.product_name.clone(),
            quantity: order.quantity,
            amount_collected: order.amount_collected,
            reason: reason.into(),
            score: None,
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }
}

/// Result of a detection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnomalyOutcome {
    Detected { flags: Vec<AnomalyFlag> },
    /// The window held no orders
    EmptyLedger,
    /// The model needs more samples than the window provides
    InsufficientData { required: usize, available: usize },
}

impl AnomalyOutcome {
    /// Flagged orders; empty for the no-data variants
    pub fn flags(&self) -> &[AnomalyFlag] {
        match self {
            AnomalyOutcome::Detected { flags } => flags,
            AnomalyOutcome::EmptyLedger | AnomalyOutcome::InsufficientData { .. } => &[],
        }
    }

    pub fn flagged_ids(&self) -> Vec<OrderId> {
        self.flags().iter().map(|f| f.order_id).collect()
    }
}
