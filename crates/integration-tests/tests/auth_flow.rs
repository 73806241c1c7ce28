//! Integration tests for registration, login, and session handling.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The shop server running (cargo run -p secure-shop)
//!
//! Run with: cargo test -p secure-shop-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::json;
use uuid::Uuid;

use secure_shop_core::Role;
use secure_shop_integration_tests::{
    STRONG_PASSWORD, base_url, client, login, register_and_login, register_user,
};

// ============================================================================
// Registration Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running shop server"]
async fn test_register_then_login_roundtrip() {
    let client = client();
    let (username, email) = register_user(&client).await;

    // Login works with the username...
    let body = login(&client, &username, STRONG_PASSWORD).await;
    assert_eq!(body["username"], username.as_str());
    assert_eq!(body["email"], email.as_str());
    assert_eq!(body["role"], Role::User.to_string());
}

#[tokio::test]
#[ignore = "Requires running shop server"]
async fn test_register_rejects_weak_password() {
    let client = client();
    let suffix = Uuid::new_v4().simple().to_string();

    // No special character.
    let resp = client
        .post(format!("{}/auth/register", base_url()))
        .json(&json!({
            "username": format!("weak-{}", &suffix[..12]),
            "email": format!("weak-{}@test.example", &suffix[..12]),
            "password": "Password123",
            "confirm_password": "Password123",
        }))
        .send()
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running shop server"]
async fn test_register_rejects_mismatched_confirmation() {
    let client = client();
    let suffix = Uuid::new_v4().simple().to_string();

    let resp = client
        .post(format!("{}/auth/register", base_url()))
        .json(&json!({
            "username": format!("mm-{}", &suffix[..12]),
            "email": format!("mm-{}@test.example", &suffix[..12]),
            "password": STRONG_PASSWORD,
            "confirm_password": "Different#Pw9x",
        }))
        .send()
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running shop server"]
async fn test_register_duplicate_username_conflicts() {
    let client = client();
    let (username, _) = register_user(&client).await;

    let resp = client
        .post(format!("{}/auth/register", base_url()))
        .json(&json!({
            "username": username,
            "email": format!("other-{}@test.example", Uuid::new_v4().simple()),
            "password": STRONG_PASSWORD,
            "confirm_password": STRONG_PASSWORD,
        }))
        .send()
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running shop server"]
async fn test_availability_reflects_registration() {
    let client = client();
    let (username, email) = register_user(&client).await;

    let resp = client
        .get(format!(
            "{}/auth/availability?username={username}&email={email}",
            base_url()
        ))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = resp.json().await.expect("json body");
    assert_eq!(body["username"], false);
    assert_eq!(body["email"], false);

    let fresh = client
        .get(format!(
            "{}/auth/availability?username=fresh-{}",
            base_url(),
            Uuid::new_v4().simple()
        ))
        .send()
        .await
        .expect("request failed");
    let body: serde_json::Value = fresh.json().await.expect("json body");
    assert_eq!(body["username"], true);
    assert!(body.get("email").is_none());
}

// ============================================================================
// Login Failure Uniformity
// ============================================================================

#[tokio::test]
#[ignore = "Requires running shop server"]
async fn test_wrong_password_and_unknown_user_are_indistinguishable() {
    let client = client();
    let (username, _) = register_user(&client).await;

    let wrong_password = client
        .post(format!("{}/auth/login", base_url()))
        .json(&json!({ "identifier": username, "password": "Wrong#Pw9xyz" }))
        .send()
        .await
        .expect("request failed");
    let unknown_user = client
        .post(format!("{}/auth/login", base_url()))
        .json(&json!({
            "identifier": format!("ghost-{}", Uuid::new_v4().simple()),
            "password": "Wrong#Pw9xyz",
        }))
        .send()
        .await
        .expect("request failed");

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);

    // Identical bodies: nothing to tell the two causes apart.
    let a = wrong_password.text().await.expect("body");
    let b = unknown_user.text().await.expect("body");
    assert_eq!(a, b);
}

// ============================================================================
// Session Handling
// ============================================================================

#[tokio::test]
#[ignore = "Requires running shop server"]
async fn test_me_requires_session() {
    let resp = client()
        .get(format!("{}/auth/me", base_url()))
        .send()
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running shop server"]
async fn test_login_rotates_session_cookie() {
    let client = client();
    let (username, _) = register_user(&client).await;

    // Visit a public page first so the server has a chance to hand out a
    // pre-login session cookie.
    let before = client
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .expect("request failed");
    let pre_login_cookie = before
        .cookies()
        .find(|c| c.name() == "shop_session")
        .map(|c| c.value().to_string());

    let after = client
        .post(format!("{}/auth/login", base_url()))
        .json(&json!({ "identifier": username, "password": STRONG_PASSWORD }))
        .send()
        .await
        .expect("request failed");
    let post_login_cookie = after
        .cookies()
        .find(|c| c.name() == "shop_session")
        .map(|c| c.value().to_string());

    // Login must issue a session id; if one existed before, it must change.
    let post_login_cookie = post_login_cookie.expect("login should set a session cookie");
    if let Some(pre) = pre_login_cookie {
        assert_ne!(pre, post_login_cookie, "session id must rotate on login");
    }
}

#[tokio::test]
#[ignore = "Requires running shop server"]
async fn test_logout_invalidates_session() {
    let client = client();
    register_and_login(&client).await;

    let resp = client
        .post(format!("{}/auth/logout", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let me = client
        .get(format!("{}/auth/me", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(me.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Route Authorization
// ============================================================================

#[tokio::test]
#[ignore = "Requires running shop server"]
async fn test_admin_routes_reject_regular_users() {
    let client = client();
    register_and_login(&client).await;

    let resp = client
        .get(format!("{}/orders/admin", base_url()))
        .send()
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires running shop server"]
async fn test_health_is_public() {
    let resp = client()
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running shop server"]
async fn test_catalog_is_public() {
    let resp = client()
        .get(format!("{}/products", base_url()))
        .send()
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.expect("json body");
    assert!(body.is_array());
}
