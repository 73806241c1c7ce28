//! Integration tests for SecureShop.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and apply migrations, then run the server:
//! cargo run -p secure-shop
//!
//! # Run integration tests against it:
//! cargo test -p secure-shop-integration-tests -- --ignored
//! ```
//!
//! The server under test is located via `SHOP_BASE_URL`
//! (default `http://localhost:3000`).
//!
//! # Test Categories
//!
//! - `auth_flow` - Registration, password policy, login, session handling
//! - `order_ownership` - Owner-filtered order access and admin bypass

use reqwest::Client;
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the shop API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("SHOP_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Build a client with its own cookie jar, i.e. its own session.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// A password that satisfies every policy rule.
pub const STRONG_PASSWORD: &str = "MyP@ssw0rd2024!";

/// Register a fresh account with a unique username and return
/// `(username, email)`. The client's cookie jar is left untouched;
/// registration does not log in.
///
/// # Panics
///
/// Panics if the registration request fails.
pub async fn register_user(client: &Client) -> (String, String) {
    let suffix = Uuid::new_v4().simple().to_string();
    let username = format!("user-{}", &suffix[..12]);
    let email = format!("{username}@test.example");

    let resp = client
        .post(format!("{}/auth/register", base_url()))
        .json(&json!({
            "username": username,
            "email": email,
            "password": STRONG_PASSWORD,
            "confirm_password": STRONG_PASSWORD,
        }))
        .send()
        .await
        .expect("Failed to register test user");
    assert_eq!(resp.status(), 201, "registration should succeed");

    (username, email)
}

/// Log a client in, attaching the session cookie to its jar.
///
/// # Panics
///
/// Panics if the login request fails.
pub async fn login(client: &Client, identifier: &str, password: &str) -> Value {
    let resp = client
        .post(format!("{}/auth/login", base_url()))
        .json(&json!({ "identifier": identifier, "password": password }))
        .send()
        .await
        .expect("Failed to log in");
    assert_eq!(resp.status(), 200, "login should succeed");

    resp.json().await.expect("login response should be JSON")
}

/// Register and log in a fresh user in one step.
pub async fn register_and_login(client: &Client) -> (String, String) {
    let (username, email) = register_user(client).await;
    login(client, &username, STRONG_PASSWORD).await;
    (username, email)
}
