//! Catalog loaders
//!
//! The initial catalog comes either from the built-in seed list or from a
//! spreadsheet exported as CSV with the columns
//! `Product Name, Stock Quantity, Unit Price[, Daily Usage Rate]`.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{seed_products, Product};
use thiserror::Error;

/// Catalog loading failures
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot open catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed catalog row: {0}")]
    Csv(#[from] csv::Error),

    #[error("product {0} appears more than once")]
    DuplicateProduct(String),

    #[error("negative unit price for {0}")]
    NegativePrice(String),
}

/// Source of the initial product catalog
pub trait CatalogLoader: Send + Sync {
    fn load(&self) -> Result<Vec<Product>, LoadError>;
}

/// Built-in seed catalog
#[derive(Debug, Clone, Copy, Default)]
pub struct SeedCatalog;

impl CatalogLoader for SeedCatalog {
    fn load(&self) -> Result<Vec<Product>, LoadError> {
        Ok(seed_products())
    }
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(rename = "Product Name")]
    name: String,
    #[serde(rename = "Stock Quantity")]
    stock_quantity: u32,
    #[serde(rename = "Unit Price")]
    unit_price: Decimal,
    #[serde(rename = "Daily Usage Rate", default)]
    daily_usage_rate: Option<f64>,
}

/// Loads the catalog from a CSV file
#[derive(Debug, Clone)]
pub struct CsvCatalogLoader {
    path: PathBuf,
}

impl CsvCatalogLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parse catalog rows from any reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Product>, LoadError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut seen = HashSet::new();
        let mut products = Vec::new();
        for row in rdr.deserialize::<CatalogRow>() {
            let row = row?;
            if !seen.insert(row.name.clone()) {
                return Err(LoadError::DuplicateProduct(row.name));
            }
            if row.unit_price < Decimal::ZERO {
                return Err(LoadError::NegativePrice(row.name));
            }
            let mut product = Product::new(row.name, row.stock_quantity, row.unit_price);
            product.daily_usage_rate = row.daily_usage_rate;
            products.push(product);
        }
        Ok(products)
    }
}

impl CatalogLoader for CsvCatalogLoader {
    fn load(&self) -> Result<Vec<Product>, LoadError> {
        let file = File::open(&self.path).map_err(|source| LoadError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        let products = Self::from_reader(file)?;
        tracing::info!(
            path = %self.path.display(),
            products = products.len(),
            "catalog loaded"
        );
        Ok(products)
    }
}
