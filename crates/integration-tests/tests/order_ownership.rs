//! Integration tests for owner-filtered order access.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The shop server running (cargo run -p secure-shop)
//! - A seeded catalog containing an active product with id 1
//! - For the admin tests: `SHOP_ADMIN_USERNAME` / `SHOP_ADMIN_PASSWORD`
//!   pointing at an account whose role is admin
//! - For the snapshot test: `SHOP_DATABASE_URL` (or `DATABASE_URL`)
//!   granting direct access to the shop database
//!
//! Run with: cargo test -p secure-shop-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use secure_shop_core::OrderStatus;
use secure_shop_integration_tests::{base_url, client, login, register_and_login};

/// Place an order for the logged-in client and return its JSON body.
async fn place_order(client: &Client) -> Value {
    let resp = client
        .post(format!("{}/orders", base_url()))
        .json(&json!({
            "items": [{ "product_id": 1, "quantity": 2 }],
            "shipping_address": "1 Test Street",
            "receiver_name": "Test Receiver",
            "receiver_phone": "555-0100",
        }))
        .send()
        .await
        .expect("Failed to place order");
    assert_eq!(resp.status(), StatusCode::CREATED);

    resp.json().await.expect("order response should be JSON")
}

/// Connect directly to the shop database, for setup the API does not expose.
async fn db_pool() -> sqlx::PgPool {
    let url = std::env::var("SHOP_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("SHOP_DATABASE_URL or DATABASE_URL not set");

    sqlx::PgPool::connect(&url)
        .await
        .expect("Failed to connect to database")
}

/// Log in the admin account named by the environment.
async fn admin_client() -> Client {
    let username = std::env::var("SHOP_ADMIN_USERNAME").expect("SHOP_ADMIN_USERNAME not set");
    let password = std::env::var("SHOP_ADMIN_PASSWORD").expect("SHOP_ADMIN_PASSWORD not set");

    let client = client();
    login(&client, &username, &password).await;
    client
}

// ============================================================================
// Owner-Filtered Access
// ============================================================================

#[tokio::test]
#[ignore = "Requires running shop server and seeded catalog"]
async fn test_owner_can_fetch_own_order() {
    let client = client();
    register_and_login(&client).await;
    let order = place_order(&client).await;

    let resp = client
        .get(format!("{}/orders/{}", base_url(), order["id"]))
        .send()
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("JSON body");
    assert_eq!(body["id"], order["id"]);
    assert_eq!(body["status"], OrderStatus::Pending.to_string());
}

#[tokio::test]
#[ignore = "Requires running shop server and seeded catalog"]
async fn test_foreign_order_is_denied() {
    let owner = client();
    register_and_login(&owner).await;
    let order = place_order(&owner).await;

    let intruder = client();
    register_and_login(&intruder).await;

    let resp = intruder
        .get(format!("{}/orders/{}", base_url(), order["id"]))
        .send()
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = resp.json().await.expect("JSON body");
    assert_eq!(body["error"], "Access denied");
    assert!(body["correlation_id"].is_string());
    // Nothing about the order itself leaks.
    assert!(body.get("user_id").is_none());
}

#[tokio::test]
#[ignore = "Requires running shop server"]
async fn test_missing_order_looks_like_foreign_order() {
    let client = client();
    register_and_login(&client).await;

    let resp = client
        .get(format!("{}/orders/999999999", base_url()))
        .send()
        .await
        .expect("request failed");

    // Same status and shape as the foreign-order case.
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = resp.json().await.expect("JSON body");
    assert_eq!(body["error"], "Access denied");
}

#[tokio::test]
#[ignore = "Requires running shop server and seeded catalog"]
async fn test_listing_only_returns_own_orders() {
    let owner = client();
    register_and_login(&owner).await;
    let order = place_order(&owner).await;

    let other = client();
    register_and_login(&other).await;

    let resp = other
        .get(format!("{}/orders", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("JSON body");
    let ids: Vec<&Value> = body
        .as_array()
        .expect("listing is an array")
        .iter()
        .map(|o| &o["id"])
        .collect();
    assert!(!ids.contains(&&order["id"]));
}

// ============================================================================
// Status Lifecycle
// ============================================================================

#[tokio::test]
#[ignore = "Requires running shop server and seeded catalog"]
async fn test_owner_status_walk_pay_then_cancel_is_allowed() {
    let client = client();
    register_and_login(&client).await;
    let order = place_order(&client).await;
    let id = &order["id"];

    let paid = client
        .post(format!("{}/orders/{id}/pay", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(paid.status(), StatusCode::OK);
    let body: Value = paid.json().await.expect("JSON body");
    assert_eq!(body["status"], OrderStatus::Paid.to_string());
    assert!(body["paid_at"].is_string());

    // PAID orders can still be cancelled.
    let cancelled = client
        .post(format!("{}/orders/{id}/cancel", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(cancelled.status(), StatusCode::OK);
    let body: Value = cancelled.json().await.expect("JSON body");
    assert_eq!(body["status"], OrderStatus::Cancelled.to_string());
}

#[tokio::test]
#[ignore = "Requires running shop server and seeded catalog"]
async fn test_skipping_a_lifecycle_step_is_rejected() {
    let client = client();
    register_and_login(&client).await;
    let order = place_order(&client).await;

    // PENDING -> COMPLETED skips PAID and SHIPPED.
    let resp = client
        .post(format!("{}/orders/{}/complete", base_url(), order["id"]))
        .send()
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running shop server and seeded catalog"]
async fn test_intruder_cannot_transition_foreign_order() {
    let owner = client();
    register_and_login(&owner).await;
    let order = place_order(&owner).await;

    let intruder = client();
    register_and_login(&intruder).await;

    let resp = intruder
        .post(format!("{}/orders/{}/cancel", base_url(), order["id"]))
        .send()
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

// ============================================================================
// Snapshot Immutability
// ============================================================================

#[tokio::test]
#[ignore = "Requires running shop server, seeded catalog, and database access"]
async fn test_line_item_snapshots_survive_catalog_edits() {
    let client = client();
    register_and_login(&client).await;
    let order = place_order(&client).await;

    let frozen_name = order["items"][0]["product_name"].clone();
    let frozen_price = order["items"][0]["unit_price"].clone();
    let frozen_total = order["total_amount"].clone();

    // The catalog has no write API; edit the row directly.
    let pool = db_pool().await;
    sqlx::query("UPDATE products SET name = name || ' v2', price = price + 1 WHERE id = 1")
        .execute(&pool)
        .await
        .expect("Failed to edit product");

    let resp = client
        .get(format!("{}/orders/{}", base_url(), order["id"]))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("JSON body");

    // Restore the catalog row before asserting.
    sqlx::query(
        "UPDATE products SET name = replace(name, ' v2', ''), price = price - 1 WHERE id = 1",
    )
    .execute(&pool)
    .await
    .expect("Failed to restore product");

    assert_eq!(body["items"][0]["product_name"], frozen_name);
    assert_eq!(body["items"][0]["unit_price"], frozen_price);
    assert_eq!(body["total_amount"], frozen_total);
}

// ============================================================================
// Administrator Bypass
// ============================================================================

#[tokio::test]
#[ignore = "Requires running shop server, seeded catalog, and admin credentials"]
async fn test_admin_can_fetch_any_order() {
    let owner = client();
    register_and_login(&owner).await;
    let order = place_order(&owner).await;

    let admin = admin_client().await;
    let resp = admin
        .get(format!("{}/orders/admin/{}", base_url(), order["id"]))
        .send()
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("JSON body");
    assert_eq!(body["id"], order["id"]);
}

#[tokio::test]
#[ignore = "Requires running shop server, seeded catalog, and admin credentials"]
async fn test_full_lifecycle_walk_ends_in_a_terminal_state() {
    let owner = client();
    register_and_login(&owner).await;
    let order = place_order(&owner).await;
    let id = &order["id"];

    let paid = owner
        .post(format!("{}/orders/{id}/pay", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(paid.status(), StatusCode::OK);

    let admin = admin_client().await;
    let shipped = admin
        .post(format!("{}/orders/admin/{id}/ship", base_url()))
        .send()
        .await
        .expect("request failed");

    assert_eq!(shipped.status(), StatusCode::OK);
    let body: Value = shipped.json().await.expect("JSON body");
    assert_eq!(body["status"], OrderStatus::Shipped.to_string());
    assert!(body["shipped_at"].is_string());

    // The owner confirms receipt.
    let completed = owner
        .post(format!("{}/orders/{id}/complete", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(completed.status(), StatusCode::OK);
    let body: Value = completed.json().await.expect("JSON body");
    assert_eq!(body["status"], OrderStatus::Completed.to_string());
    assert!(body["completed_at"].is_string());

    // COMPLETED is terminal; nothing further is allowed.
    let cancel = owner
        .post(format!("{}/orders/{id}/cancel", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(cancel.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running shop server and admin credentials"]
async fn test_admin_lookup_of_missing_order_is_not_found() {
    let admin = admin_client().await;

    let resp = admin
        .get(format!("{}/orders/admin/999999999", base_url()))
        .send()
        .await
        .expect("request failed");

    // Admins see the real reason; there is nothing to hide from them.
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
