//! Order route handlers.
//!
//! Owner routes resolve orders through `OrderService::fetch_owned`, so a
//! guessed order id never reveals whether someone else's order exists.
//! Admin routes use the unfiltered lookups and sit behind `RequireAdmin`.

use axum::{Json, extract::Path, extract::State, http::StatusCode};
use serde::Deserialize;

use secure_shop_core::{OrderId, OrderStatus, ProductId};

use crate::error::{AppError, Result};
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::Order;
use crate::services::orders::{CheckoutInput, CheckoutItem, OrderService};
use crate::state::AppState;

/// Checkout payload.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItemRequest>,
    pub shipping_address: String,
    pub receiver_name: String,
    pub receiver_phone: String,
    pub notes: Option<String>,
}

/// One requested line item.
#[derive(Debug, Deserialize)]
pub struct CheckoutItemRequest {
    pub product_id: i64,
    pub quantity: i32,
}

/// GET /orders
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderService::new(state.pool()).list_owned(user.id).await?;

    Ok(Json(orders))
}

/// POST /orders
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<Order>)> {
    if req.shipping_address.trim().is_empty()
        || req.receiver_name.trim().is_empty()
        || req.receiver_phone.trim().is_empty()
    {
        return Err(AppError::BadRequest(
            "shipping address, receiver name and phone are required".to_owned(),
        ));
    }

    let order = OrderService::new(state.pool())
        .checkout(
            user.id,
            CheckoutInput {
                items: req
                    .items
                    .iter()
                    .map(|i| CheckoutItem {
                        product_id: ProductId::new(i.product_id),
                        quantity: i.quantity,
                    })
                    .collect(),
                shipping_address: req.shipping_address,
                receiver_name: req.receiver_name,
                receiver_phone: req.receiver_phone,
                notes: req.notes,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /orders/{id}
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
) -> Result<Json<Order>> {
    let order = OrderService::new(state.pool())
        .fetch_owned(OrderId::new(id), user.id)
        .await?;

    Ok(Json(order))
}

/// POST /orders/{id}/pay
pub async fn pay(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
) -> Result<Json<Order>> {
    let order = OrderService::new(state.pool())
        .transition_owned(OrderId::new(id), user.id, OrderStatus::Paid)
        .await?;

    Ok(Json(order))
}

/// POST /orders/{id}/complete
pub async fn complete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
) -> Result<Json<Order>> {
    let order = OrderService::new(state.pool())
        .transition_owned(OrderId::new(id), user.id, OrderStatus::Completed)
        .await?;

    Ok(Json(order))
}

/// POST /orders/{id}/cancel
pub async fn cancel(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
) -> Result<Json<Order>> {
    let order = OrderService::new(state.pool())
        .transition_owned(OrderId::new(id), user.id, OrderStatus::Cancelled)
        .await?;

    Ok(Json(order))
}

/// GET /orders/admin
pub async fn admin_list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderService::new(state.pool()).list_all().await?;

    Ok(Json(orders))
}

/// GET /orders/admin/{id}
pub async fn admin_show(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<Json<Order>> {
    let order = OrderService::new(state.pool())
        .fetch_any(OrderId::new(id))
        .await?;

    Ok(Json(order))
}

/// POST /orders/admin/{id}/ship
pub async fn admin_ship(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<Json<Order>> {
    let order = OrderService::new(state.pool())
        .transition_any(OrderId::new(id), OrderStatus::Shipped)
        .await?;

    Ok(Json(order))
}
