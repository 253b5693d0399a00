//! Catalog sources and record sinks

pub mod catalog;
pub mod sink;

pub use catalog::{CatalogLoader, CsvCatalogLoader, LoadError, SeedCatalog};
pub use sink::{LogSink, MemorySink, RecordSink};
