//! Core Module
//!
//! - [`Config`] - server configuration
//! - [`ServerState`] - shared state for handlers
//! - [`Server`] - HTTP server

pub mod config;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::{Server, build_app, router};
pub use state::ServerState;
