//! Common types used across the platform

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Slice of the order ledger an analysis runs over
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum DetectionWindow {
    /// Every order in the ledger
    #[default]
    All,
    /// The most recent N orders
    Last(usize),
    /// Orders placed on or after the given date
    Since(NaiveDate),
}
