//! Shared types and engine for the AMBA ERP inventory platform
//!
//! This crate contains the stock ledger, forecasting and anomaly detection logic
//! shared between the backend, the dashboard (via WASM), and other components.

pub mod anomaly;
pub mod catalog;
pub mod error;
pub mod forecast;
pub mod ledger;
pub mod models;
pub mod types;
pub mod validation;

pub use anomaly::*;
pub use catalog::*;
pub use error::*;
pub use forecast::*;
pub use ledger::*;
pub use models::*;
pub use types::*;
pub use validation::*;
