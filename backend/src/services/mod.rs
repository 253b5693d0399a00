//! Business logic services for the AMBA ERP inventory server

pub mod inventory;

pub use inventory::{InventoryService, InventorySnapshot, MAX_HORIZON_DAYS};
