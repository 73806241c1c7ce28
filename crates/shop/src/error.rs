//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Responses never leak internals: denied access and server faults both get
//! a fixed message plus a correlation id, and the real cause is logged
//! server-side next to that same id.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::orders::OrderError;

/// Application-level error type for the shop.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Order operation failed.
    #[error("Order error: {0}")]
    Orders(#[from] OrderError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body returned to clients.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,
}

impl AppError {
    /// Whether this error is a server-side fault rather than a client error.
    fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Database(_)
                | Self::Internal(_)
                | Self::Auth(AuthError::Repository(_) | AuthError::Hashing)
                | Self::Orders(OrderError::Repository(_))
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::DuplicateIdentity(_) => StatusCode::CONFLICT,
                AuthError::WeakPassword(_)
                | AuthError::InvalidUsername(_)
                | AuthError::InvalidEmail(_)
                | AuthError::PasswordMismatch => StatusCode::BAD_REQUEST,
                AuthError::UserNotFound => StatusCode::NOT_FOUND,
                AuthError::Repository(_) | AuthError::Hashing => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Orders(err) => match err {
                OrderError::AccessDenied { .. } => StatusCode::FORBIDDEN,
                OrderError::InvalidTransition { .. }
                | OrderError::EmptyOrder
                | OrderError::UnknownProduct(_)
                | OrderError::InvalidQuantity => StatusCode::BAD_REQUEST,
                OrderError::NotFound => StatusCode::NOT_FOUND,
                OrderError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients. Denied access and
        // server faults carry a correlation id the operator can grep for.
        let body = if self.is_internal() {
            // Capture server errors to Sentry
            let correlation_id = Uuid::new_v4();
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                %correlation_id,
                sentry_event_id = %event_id,
                error = %self,
                "Request error"
            );
            ErrorBody {
                error: "Internal server error".to_owned(),
                correlation_id: Some(correlation_id.to_string()),
            }
        } else {
            match &self {
                Self::Orders(OrderError::AccessDenied { correlation_id }) => ErrorBody {
                    error: "Access denied".to_owned(),
                    correlation_id: Some(correlation_id.to_string()),
                },
                Self::Auth(AuthError::InvalidCredentials) => ErrorBody {
                    error: "Invalid credentials".to_owned(),
                    correlation_id: None,
                },
                Self::Auth(AuthError::DuplicateIdentity(field)) => ErrorBody {
                    error: format!("An account with this {field} already exists"),
                    correlation_id: None,
                },
                Self::Auth(err) => ErrorBody {
                    error: err.to_string(),
                    correlation_id: None,
                },
                Self::Orders(err) => ErrorBody {
                    error: err.to_string(),
                    correlation_id: None,
                },
                _ => ErrorBody {
                    error: self.to_string(),
                    correlation_id: None,
                },
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("order-123".to_string());
        assert_eq!(err.to_string(), "Not found: order-123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_body_omits_absent_correlation_id() {
        let body = ErrorBody {
            error: "Invalid credentials".to_owned(),
            correlation_id: None,
        };
        let value = serde_json::to_value(&body).expect("serializes");

        assert_eq!(value["error"], "Invalid credentials");
        assert!(value.get("correlation_id").is_none());
    }

    #[test]
    fn test_invalid_credentials_is_unauthorized() {
        assert_eq!(
            get_status(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_duplicate_identity_is_conflict() {
        assert_eq!(
            get_status(AppError::Auth(AuthError::DuplicateIdentity(
                "username".to_string()
            ))),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_access_denied_is_forbidden() {
        assert_eq!(
            get_status(AppError::Orders(OrderError::AccessDenied {
                correlation_id: Uuid::new_v4(),
            })),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_invalid_transition_is_bad_request() {
        use secure_shop_core::OrderStatus;

        assert_eq!(
            get_status(AppError::Orders(OrderError::InvalidTransition {
                from: OrderStatus::Completed,
                to: OrderStatus::Cancelled,
            })),
            StatusCode::BAD_REQUEST
        );
    }
}
