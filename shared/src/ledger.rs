//! Append-only order ledger

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Order, OrderId, OrderRequest};
use crate::types::DetectionWindow;

/// Accepted orders in acceptance order. Orders are never edited or removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderLedger {
    orders: Vec<Order>,
}

impl OrderLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn get(&self, id: OrderId) -> Option<&Order> {
        usize::try_from(id.0).ok().and_then(|i| self.orders.get(i))
    }

    /// Id the next recorded order will receive
    pub fn next_id(&self) -> OrderId {
        OrderId(self.orders.len() as u64)
    }

    /// History for one product, oldest first
    pub fn orders_for<'a>(&'a self, product_name: &str) -> Vec<&'a Order> {
        self.orders
            .iter()
            .filter(|o| o.product_name == product_name)
            .collect()
    }

    /// Orders that fall inside a detection window, oldest first
    pub fn window(&self, window: DetectionWindow) -> Vec<&Order> {
        match window {
            DetectionWindow::All => self.orders.iter().collect(),
            DetectionWindow::Last(n) => {
                let skip = self.orders.len().saturating_sub(n);
                self.orders.iter().skip(skip).collect()
            }
            DetectionWindow::Since(date) => self
                .orders
                .iter()
                .filter(|o| o.order_date() >= date)
                .collect(),
        }
    }

    /// Record an accepted request, returning the extended ledger and the new order.
    ///
    /// The request must already have passed validation and stock deduction.
    pub fn record(&self, request: &OrderRequest, ordered_at: DateTime<Utc>) -> (Self, Order) {
        let mut next = self.clone();
        let order = next.append(request, ordered_at);
        (next, order)
    }

    /// Append an accepted request in place and return the new order
    pub fn append(&mut self, request: &OrderRequest, ordered_at: DateTime<Utc>) -> Order {
        let order = Order {
            id: self.next_id(),
            customer_name: request.customer_name.trim().to_string(),
            product_name: request.product_name.clone(),
            quantity: request.quantity,
            amount_collected: request.amount_collected,
            last_payment_date: request.last_payment_date,
            ordered_at,
        };
        self.orders.push(order.clone());
        order
    }
}
