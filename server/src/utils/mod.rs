//! Utility module - shared helpers and types
//!
//! - [`AppError`] - application error type
//! - [`AppResult`] - handler-level result alias
//! - Logging and validation helpers

pub mod error;
pub mod logger;
pub mod result;
pub mod validation;

pub use error::{AppError, AppResponse};
pub use result::AppResult;
