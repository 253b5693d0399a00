//! HTTP request handlers

pub mod anomalies;
pub mod customers;
pub mod forecast;
pub mod health;
pub mod inventory;
pub mod orders;

pub use anomalies::*;
pub use customers::*;
pub use forecast::*;
pub use health::*;
pub use inventory::{get_catalog, get_inventory_log};
pub use orders::*;
