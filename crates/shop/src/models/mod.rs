//! Domain models for the shop.
//!
//! These types represent validated domain objects separate from database
//! row types; row-to-model conversion lives in the `db` modules.

pub mod order;
pub mod product;
pub mod user;

pub use order::{NewOrder, NewOrderItem, Order, OrderItem};
pub use product::Product;
pub use user::{CurrentUser, User, session_keys};
