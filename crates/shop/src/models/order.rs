//! Order domain types.
//!
//! An order is owned by exactly one user for its whole lifetime; every
//! line item carries a snapshot of the product name and unit price taken
//! at checkout, so later catalog edits never alter historical orders.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use secure_shop_core::{OrderId, OrderItemId, OrderStatus, ProductId, UserId};

/// An order (domain type).
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Owning user. Immutable after creation.
    pub user_id: UserId,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// Total over all line-item subtotals. Fixed-point decimal.
    pub total_amount: Decimal,
    /// Delivery address.
    pub shipping_address: String,
    /// Receiver name.
    pub receiver_name: String,
    /// Receiver phone.
    pub receiver_phone: String,
    /// Free-form note from the buyer.
    pub notes: Option<String>,
    /// Line items.
    pub items: Vec<OrderItem>,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
    /// Set on the PENDING -> PAID transition.
    pub paid_at: Option<DateTime<Utc>>,
    /// Set on the PAID -> SHIPPED transition.
    pub shipped_at: Option<DateTime<Utc>>,
    /// Set on the SHIPPED -> COMPLETED transition.
    pub completed_at: Option<DateTime<Utc>>,
}

/// A line item belonging to one order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    /// Unique line item ID.
    pub id: OrderItemId,
    /// Owning order.
    pub order_id: OrderId,
    /// Referenced catalog entry, for display only.
    pub product_id: ProductId,
    /// Product name snapshot, frozen at checkout.
    pub product_name: String,
    /// Unit price snapshot, frozen at checkout.
    pub unit_price: Decimal,
    /// Quantity ordered.
    pub quantity: i32,
}

/// Input for inserting a new order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub total_amount: Decimal,
    pub shipping_address: String,
    pub receiver_name: String,
    pub receiver_phone: String,
    pub notes: Option<String>,
    pub items: Vec<NewOrderItem>,
}

/// Input for inserting one line item.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
}

impl NewOrderItem {
    /// Line subtotal from the snapshot price taken at checkout.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}
