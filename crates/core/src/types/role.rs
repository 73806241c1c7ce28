//! User roles for access control.

use serde::{Deserialize, Serialize};

/// Role with different permission levels.
///
/// Stored as TEXT in the database (`user` / `admin`); the authorization
/// layer consumes it via explicit `match` - there is no virtual dispatch
/// over roles anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Ordinary shopper: owns a cart and orders.
    #[default]
    User,
    /// Administrator: store management, may view any order.
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}
