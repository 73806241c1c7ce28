//! Order repository for database operations.
//!
//! The ownership-sensitive lookup is `get_owned`: it filters by order id
//! AND owner id in one query, so a row belonging to another user is never
//! materialized in application memory.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use secure_shop_core::{OrderId, OrderItemId, OrderStatus, ProductId, UserId};

use super::RepositoryError;
use crate::models::order::{NewOrder, Order, OrderItem};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` order queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    user_id: i64,
    status: String,
    total_amount: Decimal,
    shipping_address: String,
    receiver_name: String,
    receiver_phone: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    paid_at: Option<DateTime<Utc>>,
    shipped_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Result<Order, RepositoryError> {
        let status: OrderStatus = self.status.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid order status in database: {e}"))
        })?;

        Ok(Order {
            id: OrderId::new(self.id),
            user_id: UserId::new(self.user_id),
            status,
            total_amount: self.total_amount,
            shipping_address: self.shipping_address,
            receiver_name: self.receiver_name,
            receiver_phone: self.receiver_phone,
            notes: self.notes,
            items,
            created_at: self.created_at,
            paid_at: self.paid_at,
            shipped_at: self.shipped_at,
            completed_at: self.completed_at,
        })
    }
}

/// Internal row type for `PostgreSQL` order item queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: i64,
    order_id: i64,
    product_id: i64,
    product_name: String,
    unit_price: Decimal,
    quantity: i32,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: OrderItemId::new(row.id),
            order_id: OrderId::new(row.order_id),
            product_id: ProductId::new(row.product_id),
            product_name: row.product_name,
            unit_price: row.unit_price,
            quantity: row.quantity,
        }
    }
}

const ORDER_COLUMNS: &str = "id, user_id, status, total_amount, shipping_address, \
                             receiver_name, receiver_phone, notes, created_at, \
                             paid_at, shipped_at, completed_at";

const ITEM_COLUMNS: &str = "id, order_id, product_id, product_name, unit_price, quantity";

// =============================================================================
// Repository
// =============================================================================

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an order by id, filtered by owner.
    ///
    /// Returns `None` both when the order does not exist and when it is
    /// owned by a different user; callers cannot tell these apart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the row data is invalid.
    pub async fn get_owned(
        &self,
        id: OrderId,
        owner: UserId,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 AND user_id = $2"
        ))
        .bind(id.as_i64())
        .bind(owner.as_i64())
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(r) => {
                let items = self.items_for(id).await?;
                Ok(Some(r.into_order(items)?))
            }
            None => Ok(None),
        }
    }

    /// Get an order by id regardless of owner.
    ///
    /// Only reachable through administrator routes; the role check happens
    /// upstream in the route authorization layer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the row data is invalid.
    pub async fn get_any(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(r) => {
                let items = self.items_for(id).await?;
                Ok(Some(r.into_order(items)?))
            }
            None => Ok(None),
        }
    }

    /// Whether an order with this id exists at all, regardless of owner.
    ///
    /// Used only for server-side log context after a denied fetch; returns
    /// a bare boolean so no foreign order data is ever loaded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(&self, id: OrderId) -> Result<bool, RepositoryError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM orders WHERE id = $1)")
                .bind(id.as_i64())
                .fetch_one(self.pool)
                .await?;

        Ok(exists)
    }

    /// List a user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if any row data is invalid.
    pub async fn list_for_user(&self, owner: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(owner.as_i64())
        .fetch_all(self.pool)
        .await?;

        self.attach_items(rows).await
    }

    /// List all orders, newest first. Administrator listing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if any row data is invalid.
    pub async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        self.attach_items(rows).await
    }

    /// Insert an order and its line items in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; the
    /// transaction is rolled back and nothing is persisted.
    pub async fn create(&self, new_order: &NewOrder) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "INSERT INTO orders \
             (user_id, status, total_amount, shipping_address, receiver_name, receiver_phone, notes) \
             VALUES ($1, 'PENDING', $2, $3, $4, $5, $6) \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(new_order.user_id.as_i64())
        .bind(new_order.total_amount)
        .bind(&new_order.shipping_address)
        .bind(&new_order.receiver_name)
        .bind(&new_order.receiver_phone)
        .bind(new_order.notes.as_deref())
        .fetch_one(&mut *tx)
        .await?;

        let order_id = row.id;
        let mut items = Vec::with_capacity(new_order.items.len());
        for item in &new_order.items {
            let item_row = sqlx::query_as::<_, OrderItemRow>(&format!(
                "INSERT INTO order_items (order_id, product_id, product_name, unit_price, quantity) \
                 VALUES ($1, $2, $3, $4, $5) \
                 RETURNING {ITEM_COLUMNS}"
            ))
            .bind(order_id)
            .bind(item.product_id.as_i64())
            .bind(&item.product_name)
            .bind(item.unit_price)
            .bind(item.quantity)
            .fetch_one(&mut *tx)
            .await?;

            items.push(OrderItem::from(item_row));
        }

        tx.commit().await?;

        row.into_order(items)
    }

    /// Transition an order's status, compare-and-swap style.
    ///
    /// The `WHERE status = from` clause makes the transition atomic under
    /// concurrent requests: only one of two racing transitions can match.
    /// Returns `false` when the order was not in the expected status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn transition_status(
        &self,
        id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<bool, RepositoryError> {
        let timestamp_clause = match to {
            OrderStatus::Paid => ", paid_at = NOW()",
            OrderStatus::Shipped => ", shipped_at = NOW()",
            OrderStatus::Completed => ", completed_at = NOW()",
            OrderStatus::Pending | OrderStatus::Cancelled => "",
        };

        let result = sqlx::query(&format!(
            "UPDATE orders SET status = $1{timestamp_clause} WHERE id = $2 AND status = $3"
        ))
        .bind(to.to_string())
        .bind(id.as_i64())
        .bind(from.to_string())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn items_for(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = $1 ORDER BY id ASC"
        ))
        .bind(order_id.as_i64())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(OrderItem::from).collect())
    }

    /// Fetch line items for a batch of orders and zip them back together.
    async fn attach_items(&self, rows: Vec<OrderRow>) -> Result<Vec<Order>, RepositoryError> {
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();

        let item_rows = sqlx::query_as::<_, OrderItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = ANY($1) ORDER BY id ASC"
        ))
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let items = item_rows
                .iter()
                .filter(|i| i.order_id == row.id)
                .map(|i| OrderItem {
                    id: OrderItemId::new(i.id),
                    order_id: OrderId::new(i.order_id),
                    product_id: ProductId::new(i.product_id),
                    product_name: i.product_name.clone(),
                    unit_price: i.unit_price,
                    quantity: i.quantity,
                })
                .collect();
            orders.push(row.into_order(items)?);
        }

        Ok(orders)
    }
}
