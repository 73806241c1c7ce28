//! Order status state machine.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// Stored as TEXT in the database using the `SCREAMING_SNAKE_CASE` names.
///
/// Permitted transitions:
///
/// ```text
/// PENDING -> PAID -> SHIPPED -> COMPLETED
/// PENDING -> CANCELLED
/// PAID    -> CANCELLED
/// ```
///
/// `COMPLETED` and `CANCELLED` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Awaiting payment. The owner may pay or cancel.
    #[default]
    Pending,
    /// Payment received. An administrator may ship; the owner may cancel.
    Paid,
    /// Handed to the carrier. The owner may confirm receipt.
    Shipped,
    /// Received and confirmed. Terminal.
    Completed,
    /// Cancelled before shipping. Terminal.
    Cancelled,
}

impl OrderStatus {
    /// Whether the status permits a transition to `next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Paid)
                | (Self::Paid, Self::Shipped)
                | (Self::Shipped, Self::Completed)
                | (Self::Pending | Self::Paid, Self::Cancelled)
        )
    }

    /// Whether no further transitions are permitted.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Paid => write!(f, "PAID"),
            Self::Shipped => write!(f, "SHIPPED"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "PAID" => Ok(Self::Paid),
            "SHIPPED" => Ok(Self::Shipped),
            "COMPLETED" => Ok(Self::Completed),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}
