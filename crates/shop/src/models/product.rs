//! Product domain type.
//!
//! The catalog is an external concern here; checkout only needs enough of a
//! product to take price/name snapshots for line items.

use rust_decimal::Decimal;
use serde::Serialize;

use secure_shop_core::ProductId;

/// A catalog entry.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Current unit price. Fixed-point decimal.
    pub price: Decimal,
    /// Inactive products cannot be ordered.
    pub active: bool,
}
