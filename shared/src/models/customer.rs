//! Customer overview models

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::ProductCatalog;
use crate::ledger::OrderLedger;

/// Order value, collections and outstanding balance for one customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub customer_name: String,
    pub order_count: usize,
    pub total_order_value: Decimal,
    pub total_collected: Decimal,
    pub outstanding_balance: Decimal,
    pub last_payment_date: Option<NaiveDate>,
}

impl CustomerSummary {
    fn new(customer_name: &str) -> Self {
        Self {
            customer_name: customer_name.to_string(),
            order_count: 0,
            total_order_value: Decimal::ZERO,
            total_collected: Decimal::ZERO,
            outstanding_balance: Decimal::ZERO,
            last_payment_date: None,
        }
    }
}

/// Aggregate the ledger per customer, sorted by customer name.
///
/// Order value uses the catalog's current unit price. Orders for products missing
/// from the catalog contribute their collections but no order value.
pub fn summarize_customers(ledger: &OrderLedger, catalog: &ProductCatalog) -> Vec<CustomerSummary> {
    let mut by_customer: BTreeMap<&str, CustomerSummary> = BTreeMap::new();

    for order in ledger.orders() {
        let summary = by_customer
            .entry(order.customer_name.as_str())
            .or_insert_with(|| CustomerSummary::new(&order.customer_name));

        summary.order_count += 1;
        if let Some(product) = catalog.get(&order.product_name) {
            summary.total_order_value += product.unit_price * Decimal::from(order.quantity);
        }
        summary.total_collected += order.amount_collected;
        summary.last_payment_date = summary.last_payment_date.max(order.last_payment_date);
    }

    by_customer
        .into_values()
        .map(|mut summary| {
            summary.outstanding_balance = summary.total_order_value - summary.total_collected;
            summary
        })
        .collect()
}
