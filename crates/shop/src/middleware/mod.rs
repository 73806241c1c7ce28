//! HTTP middleware stack for the shop.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with `PostgreSQL` store)
//! 4. Route authorization (central prefix table, fail closed)

pub mod auth;
pub mod authz;
pub mod session;

pub use auth::{RequireAdmin, RequireAuth, destroy_session, establish_session};
pub use authz::authorize;
pub use session::create_session_layer;
