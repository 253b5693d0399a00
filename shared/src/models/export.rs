//! Insert records handed to the persistence collaborator
//!
//! Each accepted order becomes one `Orders` row and one `InventoryLog` row. The
//! field order and formats are consumed by downstream SQL generation and must
//! stay stable.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Order;

/// Inventory movement direction for a sale
pub const TRANSACTION_TYPE_OUT: &str = "OUT";

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Row for the `Orders` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrdersRecord {
    pub customer_name: String,
    pub product_name: String,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_collected: Decimal,
    /// `YYYY-MM-DD`, or null when no payment was recorded
    pub last_payment_date: Option<String>,
    /// `YYYY-MM-DD`
    pub order_date: String,
}

/// Row for the `InventoryLog` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryLogRecord {
    pub product_name: String,
    pub transaction_type: String,
    pub quantity: u32,
    /// `YYYY-MM-DD HH:MM:SS`
    pub transaction_date: String,
}

/// Both records produced by one accepted order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecords {
    pub orders: OrdersRecord,
    pub inventory_log: InventoryLogRecord,
}

impl From<&Order> for OrdersRecord {
    fn from(order: &Order) -> Self {
        Self {
            customer_name: order.customer_name.clone(),
            product_name: order.product_name.clone(),
            quantity: order.quantity,
            amount_collected: order.amount_collected,
            last_payment_date: order
                .last_payment_date
                .map(|d| d.format(DATE_FORMAT).to_string()),
            order_date: order.ordered_at.format(DATE_FORMAT).to_string(),
        }
    }
}

impl From<&Order> for InventoryLogRecord {
    fn from(order: &Order) -> Self {
        Self {
            product_name: order.product_name.clone(),
            transaction_type: TRANSACTION_TYPE_OUT.to_string(),
            quantity: order.quantity,
            transaction_date: order.ordered_at.format(DATETIME_FORMAT).to_string(),
        }
    }
}

impl Order {
    pub fn export_records(&self) -> ExportRecords {
        ExportRecords {
            orders: OrdersRecord::from(self),
            inventory_log: InventoryLogRecord::from(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderId;
    use chrono::{NaiveDate, TimeZone, Utc};
    use std::str::FromStr;

    fn order(last_payment_date: Option<NaiveDate>) -> Order {
        Order {
            id: OrderId(0),
            customer_name: "Siva Motors".to_string(),
            product_name: "Motor Stamping".to_string(),
            quantity: 4,
            amount_collected: Decimal::from_str("2500.50").unwrap(),
            last_payment_date,
            ordered_at: Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap(),
        }
    }

    #[test]
    fn test_absent_payment_date_serializes_to_null() {
        let records = order(None).export_records();
        let json = serde_json::to_value(&records.orders).unwrap();
        assert!(json["last_payment_date"].is_null());
        assert_eq!(json["order_date"], "2024-03-09");
    }

    #[test]
    fn test_present_payment_date_uses_iso_format() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let records = order(Some(date)).export_records();
        assert_eq!(records.orders.last_payment_date.as_deref(), Some("2024-02-01"));
    }

    #[test]
    fn test_amounts_and_quantities_are_plain_numbers() {
        let json = serde_json::to_value(order(None).export_records()).unwrap();
        assert_eq!(json["orders"]["quantity"], 4);
        assert_eq!(json["orders"]["amount_collected"], 2500.5);
        assert_eq!(json["inventory_log"]["quantity"], 4);
    }

    #[test]
    fn test_inventory_log_record_shape() {
        let log = order(None).export_records().inventory_log;
        assert_eq!(log.transaction_type, "OUT");
        assert_eq!(log.transaction_date, "2024-03-09 14:05:07");
        assert_eq!(log.product_name, "Motor Stamping");
    }
}
