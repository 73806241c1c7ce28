//! Route-level authorization.
//!
//! A central table maps URL prefixes to the access they require; the
//! middleware consults it on every request before any handler runs.
//! Handlers still use the `RequireAuth` / `RequireAdmin` extractors, so a
//! route missing from this table fails closed instead of silently
//! becoming public.

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use secure_shop_core::Role;

use crate::models::{CurrentUser, session_keys};

/// Access level a route requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// No session needed.
    Public,
    /// Any authenticated user.
    RequiresUser,
    /// Authenticated administrator only.
    RequiresAdmin,
}

/// Prefix table, consulted longest-match-first. Paths not covered by any
/// entry get the strictest level.
const ROUTE_TABLE: &[(&str, RouteAccess)] = &[
    ("/health", RouteAccess::Public),
    ("/auth/availability", RouteAccess::Public),
    ("/auth/register", RouteAccess::Public),
    ("/auth/login", RouteAccess::Public),
    ("/auth/logout", RouteAccess::RequiresUser),
    ("/auth/me", RouteAccess::RequiresUser),
    ("/auth/admin", RouteAccess::RequiresAdmin),
    ("/products", RouteAccess::Public),
    ("/orders", RouteAccess::RequiresUser),
    ("/orders/admin", RouteAccess::RequiresAdmin),
];

/// Look up the access level for a request path.
///
/// The longest matching prefix wins, so `/orders/admin/7` resolves to the
/// admin entry rather than the `/orders` one. Prefixes match on whole path
/// segments; `/healthz` does not match `/health`.
#[must_use]
pub fn required_access(path: &str) -> RouteAccess {
    ROUTE_TABLE
        .iter()
        .filter(|(prefix, _)| {
            path == *prefix
                || (path.starts_with(prefix) && path.as_bytes().get(prefix.len()) == Some(&b'/'))
        })
        .max_by_key(|(prefix, _)| prefix.len())
        .map_or(RouteAccess::RequiresAdmin, |(_, access)| *access)
}

/// Middleware enforcing the route table.
pub async fn authorize(request: Request, next: Next) -> Response {
    let access = required_access(request.uri().path());

    if access == RouteAccess::Public {
        return next.run(request).await;
    }

    let user: Option<CurrentUser> = match request.extensions().get::<Session>() {
        Some(session) => session
            .get(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten(),
        None => None,
    };

    let Some(user) = user else {
        return StatusCode::UNAUTHORIZED.into_response();
    };

    if access == RouteAccess::RequiresAdmin && user.role != Role::Admin {
        return StatusCode::FORBIDDEN.into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_is_public() {
        assert_eq!(required_access("/health"), RouteAccess::Public);
        assert_eq!(required_access("/health/ready"), RouteAccess::Public);
    }

    #[test]
    fn test_auth_entry_points_are_public() {
        assert_eq!(required_access("/auth/availability"), RouteAccess::Public);
        assert_eq!(required_access("/auth/register"), RouteAccess::Public);
        assert_eq!(required_access("/auth/login"), RouteAccess::Public);
    }

    #[test]
    fn test_catalog_is_public() {
        assert_eq!(required_access("/products"), RouteAccess::Public);
        assert_eq!(required_access("/products/7"), RouteAccess::Public);
    }

    #[test]
    fn test_orders_require_a_user() {
        assert_eq!(required_access("/orders"), RouteAccess::RequiresUser);
        assert_eq!(required_access("/orders/42"), RouteAccess::RequiresUser);
        assert_eq!(required_access("/orders/42/pay"), RouteAccess::RequiresUser);
    }

    #[test]
    fn test_longest_prefix_wins_for_admin_routes() {
        assert_eq!(required_access("/orders/admin"), RouteAccess::RequiresAdmin);
        assert_eq!(
            required_access("/orders/admin/7/ship"),
            RouteAccess::RequiresAdmin
        );
        assert_eq!(
            required_access("/auth/admin/users/3/role"),
            RouteAccess::RequiresAdmin
        );
    }

    #[test]
    fn test_unknown_paths_fail_closed() {
        assert_eq!(required_access("/"), RouteAccess::RequiresAdmin);
        assert_eq!(required_access("/internal"), RouteAccess::RequiresAdmin);
    }

    #[test]
    fn test_prefix_matches_whole_segments_only() {
        // "/healthz" must not inherit the "/health" entry.
        assert_eq!(required_access("/healthz"), RouteAccess::RequiresAdmin);
        assert_eq!(required_access("/ordersx"), RouteAccess::RequiresAdmin);
    }
}
