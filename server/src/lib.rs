//! Storekeep Server - inventory and order backend
//!
//! # Overview
//!
//! A REST backend for per-user product catalogs and order placement:
//!
//! - **Auth** (`auth`): JWT access tokens + Argon2 password hashing,
//!   with opaque refresh tokens backed by server-side sessions
//! - **Database** (`db`): embedded SurrealDB storage
//! - **HTTP API** (`api`): RESTful routes for auth, products, orders
//!
//! # Module structure
//!
//! ```text
//! server/src/
//! ├── core/          # config, state, server
//! ├── auth/          # JWT, middleware, extractor
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # models and repositories
//! └── utils/         # errors, logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - supports tracing format specifiers
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
   _____ __                  __
  / ___// /_____  ________  / /_____  ___  ____
  \__ \/ __/ __ \/ ___/ _ \/ //_/ _ \/ _ \/ __ \
 ___/ / /_/ /_/ / /  /  __/ ,< /  __/  __/ /_/ /
/____/\__/\____/_/   \___/_/|_|\___/\___/ .___/
                                       /_/
    "#
    );
}

/// Prepare the process environment: load `.env`, then wire up logging
/// from `LOG_LEVEL` and `LOG_DIR`.
pub fn setup_environment() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}
