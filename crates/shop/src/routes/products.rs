//! Catalog route handlers.
//!
//! Read-only: the catalog is browsed here and snapshotted at checkout,
//! but it is maintained outside this service.

use axum::{
    Json,
    extract::{Path, State},
};

use secure_shop_core::ProductId;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::models::Product;
use crate::state::AppState;

/// GET /products
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool()).list_active().await?;

    Ok(Json(products))
}

/// GET /products/{id}
///
/// Inactive products 404 like missing ones; they are not orderable and
/// not browsable.
pub async fn show(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .get_by_id(ProductId::new(product_id))
        .await?
        .filter(|p| p.active)
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;

    Ok(Json(product))
}
