//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use secure_shop_core::{Email, Role, UserId, Username};

/// A registered account (domain type).
///
/// The stored password hash is deliberately not part of this type; it is
/// only surfaced by the repository call that verifies credentials.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login/display name, globally unique and case-sensitive.
    pub username: Username,
    /// Contact address, globally unique.
    pub email: Email,
    /// Permission level.
    pub role: Role,
    /// Disabled accounts cannot authenticate.
    pub enabled: bool,
    /// Optional profile field.
    pub full_name: Option<String>,
    /// Optional profile field.
    pub phone_number: Option<String>,
    /// Updated on every successful authentication.
    pub last_login_at: Option<DateTime<Utc>>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Session-stored identity.
///
/// Minimal data stored in the session to identify the logged-in user.
/// Handlers receive this explicitly via extractors; services never read
/// ambient session state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's login name.
    pub username: Username,
    /// User's role.
    pub role: Role,
}

impl CurrentUser {
    /// Build the session identity for a user.
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
        }
    }
}

/// Session keys for authentication data.
pub mod session_keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}
