//! Order service.
//!
//! Ownership is enforced at the query level: `fetch_owned` asks the
//! database for "this order AND this owner" in one predicate, so a
//! foreign order is indistinguishable from a missing one from the
//! caller's point of view. The `fetch_any` variants skip the owner
//! filter and are only wired to administrator routes.

mod error;

pub use error::OrderError;

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use secure_shop_core::{OrderId, OrderStatus, ProductId, UserId};

use crate::db::orders::OrderRepository;
use crate::db::products::ProductRepository;
use crate::models::order::{NewOrder, NewOrderItem, Order};

/// Input for placing an order.
#[derive(Debug)]
pub struct CheckoutInput {
    pub items: Vec<CheckoutItem>,
    pub shipping_address: String,
    pub receiver_name: String,
    pub receiver_phone: String,
    pub notes: Option<String>,
}

/// One requested line item.
#[derive(Debug)]
pub struct CheckoutItem {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// Order service.
pub struct OrderService<'a> {
    orders: OrderRepository<'a>,
    products: ProductRepository<'a>,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            orders: OrderRepository::new(pool),
            products: ProductRepository::new(pool),
        }
    }

    /// Fetch an order the requester owns.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::AccessDenied` when the order is missing or
    /// belongs to another user. A bare existence probe distinguishes the
    /// two for the server-side log only; no foreign order data is loaded.
    pub async fn fetch_owned(
        &self,
        id: OrderId,
        requester: UserId,
    ) -> Result<Order, OrderError> {
        if let Some(order) = self.orders.get_owned(id, requester).await? {
            return Ok(order);
        }

        let correlation_id = Uuid::new_v4();
        let reason = if self.orders.exists(id).await? {
            "owner mismatch"
        } else {
            "order does not exist"
        };
        tracing::warn!(
            %correlation_id,
            order_id = %id,
            user_id = %requester,
            reason,
            "Order access denied"
        );

        Err(OrderError::AccessDenied { correlation_id })
    }

    /// Fetch any order regardless of owner. Administrator lookup.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if the order doesn't exist.
    pub async fn fetch_any(&self, id: OrderId) -> Result<Order, OrderError> {
        self.orders.get_any(id).await?.ok_or(OrderError::NotFound)
    }

    /// List the requester's own orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the query fails.
    pub async fn list_owned(&self, requester: UserId) -> Result<Vec<Order>, OrderError> {
        Ok(self.orders.list_for_user(requester).await?)
    }

    /// List every order. Administrator listing.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Order>, OrderError> {
        Ok(self.orders.list_all().await?)
    }

    /// Place an order for the requester.
    ///
    /// Product names and unit prices are copied into the line items at this
    /// point; later catalog edits never touch the stored order.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::EmptyOrder` if no items were submitted.
    /// Returns `OrderError::InvalidQuantity` for non-positive quantities.
    /// Returns `OrderError::UnknownProduct` if any product is missing or inactive.
    pub async fn checkout(
        &self,
        requester: UserId,
        input: CheckoutInput,
    ) -> Result<Order, OrderError> {
        if input.items.is_empty() {
            return Err(OrderError::EmptyOrder);
        }
        if input.items.iter().any(|i| i.quantity <= 0) {
            return Err(OrderError::InvalidQuantity);
        }

        let ids: Vec<ProductId> = input.items.iter().map(|i| i.product_id).collect();
        let products: HashMap<ProductId, _> = self
            .products
            .get_active_by_ids(&ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let mut total = Decimal::ZERO;
        let mut items = Vec::with_capacity(input.items.len());
        for requested in &input.items {
            let product = products
                .get(&requested.product_id)
                .ok_or(OrderError::UnknownProduct(requested.product_id))?;

            let item = NewOrderItem {
                product_id: product.id,
                product_name: product.name.clone(),
                unit_price: product.price,
                quantity: requested.quantity,
            };
            total += item.subtotal();
            items.push(item);
        }

        let order = self
            .orders
            .create(&NewOrder {
                user_id: requester,
                total_amount: total,
                shipping_address: input.shipping_address,
                receiver_name: input.receiver_name,
                receiver_phone: input.receiver_phone,
                notes: input.notes,
                items,
            })
            .await?;

        tracing::info!(order_id = %order.id, user_id = %requester, "Order placed");

        Ok(order)
    }

    /// Transition an order the requester owns to a new status.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::AccessDenied` as `fetch_owned` does.
    /// Returns `OrderError::InvalidTransition` if the lifecycle forbids the
    /// move, including when a concurrent request won the race.
    pub async fn transition_owned(
        &self,
        id: OrderId,
        requester: UserId,
        to: OrderStatus,
    ) -> Result<Order, OrderError> {
        let order = self.fetch_owned(id, requester).await?;
        self.apply_transition(order, to).await
    }

    /// Transition any order to a new status. Administrator action.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if the order doesn't exist.
    /// Returns `OrderError::InvalidTransition` if the lifecycle forbids it.
    pub async fn transition_any(
        &self,
        id: OrderId,
        to: OrderStatus,
    ) -> Result<Order, OrderError> {
        let order = self.fetch_any(id).await?;
        self.apply_transition(order, to).await
    }

    async fn apply_transition(&self, order: Order, to: OrderStatus) -> Result<Order, OrderError> {
        let from = order.status;
        if !from.can_transition_to(to) {
            return Err(OrderError::InvalidTransition { from, to });
        }

        // Compare-and-swap in the database; a false here means another
        // request changed the status since we read it.
        let applied = self.orders.transition_status(order.id, from, to).await?;
        if !applied {
            return Err(OrderError::InvalidTransition { from, to });
        }

        tracing::info!(order_id = %order.id, %from, %to, "Order status changed");

        self.orders
            .get_any(order.id)
            .await?
            .ok_or(OrderError::NotFound)
    }
}
