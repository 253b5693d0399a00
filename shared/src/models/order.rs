//! Sales order models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Position of an order in the append-only ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u64);

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A proposed order as entered on the dashboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderRequest {
    pub customer_name: String,
    pub product_name: String,
    pub quantity: u32,
    #[serde(default)]
    pub amount_collected: Decimal,
    /// `None` means no payment has been recorded yet
    #[serde(default)]
    pub last_payment_date: Option<NaiveDate>,
}

impl OrderRequest {
    pub fn new(
        customer_name: impl Into<String>,
        product_name: impl Into<String>,
        quantity: u32,
    ) -> Self {
        Self {
            customer_name: customer_name.into(),
            product_name: product_name.into(),
            quantity,
            amount_collected: Decimal::ZERO,
            last_payment_date: None,
        }
    }

    pub fn with_amount(mut self, amount_collected: Decimal) -> Self {
        self.amount_collected = amount_collected;
        self
    }

    pub fn with_payment_date(mut self, date: NaiveDate) -> Self {
        self.last_payment_date = Some(date);
        self
    }
}

/// An accepted order. Immutable once recorded in the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub customer_name: String,
    pub product_name: String,
    pub quantity: u32,
    pub amount_collected: Decimal,
    pub last_payment_date: Option<NaiveDate>,
    pub ordered_at: DateTime<Utc>,
}

impl Order {
    pub fn order_date(&self) -> NaiveDate {
        self.ordered_at.date_naive()
    }
}

/// Why a proposed order was turned away
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectionReason {
    MissingCustomer,
    UnknownProduct { product: String },
    InvalidQuantity,
    InvalidAmount,
    InsufficientStock { requested: u32, available: u32 },
}

impl RejectionReason {
    pub fn code(&self) -> &'static str {
        match self {
            RejectionReason::MissingCustomer => "MISSING_CUSTOMER",
            RejectionReason::UnknownProduct { .. } => "UNKNOWN_PRODUCT",
            RejectionReason::InvalidQuantity => "INVALID_QUANTITY",
            RejectionReason::InvalidAmount => "INVALID_AMOUNT",
            RejectionReason::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
        }
    }
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectionReason::MissingCustomer => write!(f, "Customer Name is required!"),
            RejectionReason::UnknownProduct { product } => write!(f, "Unknown product: {}", product),
            RejectionReason::InvalidQuantity => write!(f, "Quantity must be at least 1"),
            RejectionReason::InvalidAmount => write!(f, "Amount collected cannot be negative"),
            RejectionReason::InsufficientStock { .. } => {
                write!(f, "Insufficient stock for this product!")
            }
        }
    }
}

/// Result of submitting an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum OrderOutcome {
    Accepted(Order),
    Rejected(RejectionReason),
}

impl OrderOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, OrderOutcome::Accepted(_))
    }

    pub fn order(&self) -> Option<&Order> {
        match self {
            OrderOutcome::Accepted(order) => Some(order),
            OrderOutcome::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&RejectionReason> {
        match self {
            OrderOutcome::Accepted(_) => None,
            OrderOutcome::Rejected(reason) => Some(reason),
        }
    }
}
