//! Database Models
//!
//! Entity structs stored in SurrealDB plus the request payloads that
//! create or update them. Everything client-facing uses the camelCase
//! wire form; products and orders also store those names, so rows are
//! returned as-is.

pub mod order;
pub mod product;
pub mod serde_helpers;
pub mod session;
pub mod user;

pub use order::{Order, OrderCreate, OrderId, OrderItem, OrderLineRequest, OrderStatus};
pub use product::{Product, ProductCreate, ProductId, ProductUpdate};
pub use session::Session;
pub use user::{User, UserCreate, UserId};
