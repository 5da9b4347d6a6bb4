//! API Route Modules
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`auth`] - signup, signin, refresh, signout, me
//! - [`products`] - owner-scoped product catalog
//! - [`orders`] - owner-scoped orders with atomic stock decrement

pub mod auth;
pub mod health;
pub mod orders;
pub mod products;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};
