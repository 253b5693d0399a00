//! Anomaly detection over the order ledger
//!
//! Models are refit from scratch on every call against the current snapshot.
//! Nothing is cached between runs.

mod isolation_forest;
mod threshold;

pub use isolation_forest::*;
pub use threshold::*;

use crate::ledger::OrderLedger;
use crate::models::{AnomalyOutcome, Order};
use crate::types::DetectionWindow;

/// A strategy that classifies orders as anomalous relative to their peers
pub trait AnomalyModel: Send + Sync {
    /// Short identifier for logs
    fn name(&self) -> &'static str;

    /// Score `orders` and return the anomalous subset.
    ///
    /// `orders` is the detection window and is a subset of `history`, the whole ledger.
    /// Only orders in the window are flagged. Models decide which of the two forms
    /// the peer population.
    fn detect(&self, orders: &[&Order], history: &[Order]) -> AnomalyOutcome;
}

/// Run a model over a window of the ledger
pub fn detect_anomalies(
    model: &dyn AnomalyModel,
    ledger: &OrderLedger,
    window: DetectionWindow,
) -> AnomalyOutcome {
    let orders = ledger.window(window);
    if orders.is_empty() {
        return AnomalyOutcome::EmptyLedger;
    }
    let outcome = model.detect(&orders, ledger.orders());
    tracing::debug!(
        model = model.name(),
        orders = orders.len(),
        flagged = outcome.flags().len(),
        "anomaly detection run"
    );
    outcome
}
