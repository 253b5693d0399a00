//! Errors raised by the stock ledger

use thiserror::Error;

use crate::models::RejectionReason;

/// Stock mutation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StockError {
    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    #[error("Insufficient stock for {product}: requested {requested}, available {available}")]
    InsufficientStock {
        product: String,
        requested: u32,
        available: u32,
    },
}

impl From<StockError> for RejectionReason {
    fn from(err: StockError) -> Self {
        match err {
            StockError::UnknownProduct(product) => RejectionReason::UnknownProduct { product },
            StockError::InsufficientStock {
                requested,
                available,
                ..
            } => RejectionReason::InsufficientStock {
                requested,
                available,
            },
        }
    }
}
