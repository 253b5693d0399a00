//! Order validation
//!
//! Pure checks run before any stock is touched. Nothing here mutates state.

use rust_decimal::Decimal;

use crate::catalog::ProductCatalog;
use crate::models::{OrderRequest, RejectionReason};

/// Validate that a customer name is present
pub fn validate_customer_name(customer_name: &str) -> Result<(), RejectionReason> {
    if customer_name.trim().is_empty() {
        return Err(RejectionReason::MissingCustomer);
    }
    Ok(())
}

/// Validate order fields against a product's current stock.
///
/// `current_stock` is `None` when the product is not in the catalog. Checks run
/// in a fixed order so the customer check always wins over the stock check.
pub fn validate_order_fields(
    customer_name: &str,
    product_name: &str,
    quantity: u32,
    amount_collected: Decimal,
    current_stock: Option<u32>,
) -> Result<(), RejectionReason> {
    validate_customer_name(customer_name)?;

    let available = current_stock.ok_or_else(|| RejectionReason::UnknownProduct {
        product: product_name.to_string(),
    })?;

    if quantity == 0 {
        return Err(RejectionReason::InvalidQuantity);
    }
    if amount_collected < Decimal::ZERO {
        return Err(RejectionReason::InvalidAmount);
    }
    if quantity > available {
        return Err(RejectionReason::InsufficientStock {
            requested: quantity,
            available,
        });
    }
    Ok(())
}

/// Validate a proposed order against the catalog
pub fn validate_order(
    request: &OrderRequest,
    catalog: &ProductCatalog,
) -> Result<(), RejectionReason> {
    validate_order_fields(
        &request.customer_name,
        &request.product_name,
        request.quantity,
        request.amount_collected,
        catalog.stock_of(&request.product_name),
    )
}
