//! Order error types.

use thiserror::Error;
use uuid::Uuid;

use secure_shop_core::{OrderStatus, ProductId};

use crate::db::RepositoryError;

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Access to an order was denied. Covers both "no such order" and
    /// "owned by someone else"; the correlation id ties the response to a
    /// server-side log line that records which one it actually was.
    #[error("access denied")]
    AccessDenied { correlation_id: Uuid },

    /// Order not found (administrative lookups only).
    #[error("order not found")]
    NotFound,

    /// The requested status change is not allowed from the current status.
    #[error("cannot transition order from {from} to {to}")]
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
    },

    /// Checkout submitted with no line items.
    #[error("order must contain at least one item")]
    EmptyOrder,

    /// Checkout referenced a product that is unknown or inactive.
    #[error("product {0} is not available")]
    UnknownProduct(ProductId),

    /// Checkout submitted a non-positive quantity.
    #[error("item quantity must be positive")]
    InvalidQuantity,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
