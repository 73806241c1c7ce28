//! HTTP route handlers for the shop.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database ping)
//!
//! # Auth
//! GET  /auth/availability      - Username/email availability probe
//! POST /auth/register          - Create an account
//! POST /auth/login             - Log in (rotates the session id)
//! POST /auth/logout            - Log out (destroys the session)
//! GET  /auth/me                - Current account
//!
//! # Account administration (requires admin)
//! POST /auth/admin/users/{id}/enabled - Enable or disable an account
//! POST /auth/admin/users/{id}/role    - Change an account's role
//!
//! # Catalog (public, read-only)
//! GET  /products               - Active products
//! GET  /products/{id}          - Product detail
//!
//! # Orders (requires auth; owner-filtered)
//! GET  /orders                 - Own order history
//! POST /orders                 - Checkout
//! GET  /orders/{id}            - Own order detail
//! POST /orders/{id}/pay        - PENDING -> PAID
//! POST /orders/{id}/complete   - SHIPPED -> COMPLETED
//! POST /orders/{id}/cancel     - PENDING/PAID -> CANCELLED
//!
//! # Order administration (requires admin; unfiltered)
//! GET  /orders/admin           - All orders
//! GET  /orders/admin/{id}      - Any order detail
//! POST /orders/admin/{id}/ship - PAID -> SHIPPED
//! ```

pub mod auth;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/availability", get(auth::availability))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .route("/admin/users/{id}/enabled", post(auth::set_enabled))
        .route("/admin/users/{id}/role", post(auth::set_role))
}

/// Create the catalog routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list))
        .route("/{id}", get(products::show))
}

/// Create the order routes router.
///
/// The `/admin` subtree is registered before the `/{id}` routes; axum
/// matches the literal segment ahead of the capture either way, but
/// keeping them grouped makes the privileged surface easy to audit.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/admin", get(orders::admin_list))
        .route("/admin/{id}", get(orders::admin_show))
        .route("/admin/{id}/ship", post(orders::admin_ship))
        .route("/", get(orders::list).post(orders::create))
        .route("/{id}", get(orders::show))
        .route("/{id}/pay", post(orders::pay))
        .route("/{id}/complete", post(orders::complete))
        .route("/{id}/cancel", post(orders::cancel))
}

/// Assemble all application routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/products", product_routes())
        .nest("/orders", order_routes())
}
