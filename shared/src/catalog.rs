//! Product catalog and stock updates
//!
//! The catalog is a value: stock deductions return a new catalog and leave the
//! original untouched, so callers can hold snapshots without aliasing surprises.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::StockError;
use crate::models::Product;

/// Authoritative stock levels, in load order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductCatalog {
    products: Vec<Product>,
}

impl ProductCatalog {
    /// Build a catalog from a loader's product list. Names are assumed unique.
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, name: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn stock_of(&self, name: &str) -> Option<u32> {
        self.get(name).map(|p| p.stock_quantity)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Value of all stock on hand
    pub fn total_value(&self) -> Decimal {
        self.products.iter().map(Product::stock_value).sum()
    }

    /// Deduct `quantity` from a product's stock, returning the updated catalog.
    ///
    /// Fails instead of clamping when the deduction would take stock below zero.
    pub fn with_deduction(&self, product_name: &str, quantity: u32) -> Result<Self, StockError> {
        let index = self
            .products
            .iter()
            .position(|p| p.name == product_name)
            .ok_or_else(|| StockError::UnknownProduct(product_name.to_string()))?;

        let available = self.products[index].stock_quantity;
        let remaining = available
            .checked_sub(quantity)
            .ok_or_else(|| StockError::InsufficientStock {
                product: product_name.to_string(),
                requested: quantity,
                available,
            })?;

        let mut products = self.products.clone();
        products[index].stock_quantity = remaining;
        Ok(Self { products })
    }
}

/// Seed catalog used when no external catalog is configured
pub fn seed_products() -> Vec<Product> {
    vec![
        Product::new("Transformer Laminations", 120, Decimal::from(1500)),
        Product::new("Motor Stamping", 80, Decimal::from(2000)),
        Product::new("Custom Parts", 50, Decimal::from(500)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn catalog(stock: u32) -> ProductCatalog {
        ProductCatalog::new(vec![Product::new("A", stock, Decimal::from(10))])
    }

    #[test]
    fn test_deduction_returns_new_snapshot() {
        let before = catalog(120);
        let after = before.with_deduction("A", 10).unwrap();
        assert_eq!(after.stock_of("A"), Some(110));
        assert_eq!(before.stock_of("A"), Some(120));
    }

    #[test]
    fn test_deduction_to_exactly_zero() {
        let after = catalog(5).with_deduction("A", 5).unwrap();
        assert_eq!(after.stock_of("A"), Some(0));
        assert!(after.get("A").unwrap().is_depleted());
    }

    #[test]
    fn test_overdraw_is_rejected_not_clamped() {
        let err = catalog(5).with_deduction("A", 10).unwrap_err();
        assert_eq!(
            err,
            StockError::InsufficientStock {
                product: "A".into(),
                requested: 10,
                available: 5,
            }
        );
    }

    #[test]
    fn test_unknown_product() {
        let err = catalog(5).with_deduction("a", 1).unwrap_err();
        assert_eq!(err, StockError::UnknownProduct("a".into()));
    }

    #[test]
    fn test_seed_catalog() {
        let seed = ProductCatalog::new(seed_products());
        assert_eq!(seed.len(), 3);
        assert_eq!(seed.stock_of("Transformer Laminations"), Some(120));
        assert_eq!(seed.stock_of("Motor Stamping"), Some(80));
        assert_eq!(seed.stock_of("Custom Parts"), Some(50));
        assert_eq!(seed.total_value(), Decimal::from(120 * 1500 + 80 * 2000 + 50 * 500));
    }

    proptest! {
        #[test]
        fn prop_stock_never_negative(
            start in 0u32..500,
            deductions in prop::collection::vec(0u32..100, 0..30)
        ) {
            let mut current = catalog(start);
            let mut expected = start;
            for qty in deductions {
                match current.with_deduction("A", qty) {
                    Ok(next) => {
                        expected -= qty;
                        current = next;
                    }
                    Err(_) => prop_assert!(qty > expected),
                }
                prop_assert_eq!(current.stock_of("A"), Some(expected));
            }
        }
    }
}
