//! Domain models for the AMBA ERP inventory platform

mod anomaly;
mod customer;
mod export;
mod forecast;
mod order;
mod product;

pub use anomaly::*;
pub use customer::*;
pub use export::*;
pub use forecast::*;
pub use order::*;
pub use product::*;
