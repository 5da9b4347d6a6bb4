//! Authentication Routes
//!
//! - /api/auth/signup, /api/auth/signin, /api/auth/refresh,
//!   /api/auth/signout: public (no bearer required)
//! - /api/auth/me: protected by the global require_auth middleware

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/auth/signup", post(handler::signup))
        .route("/api/auth/signin", post(handler::signin))
        .route("/api/auth/refresh", post(handler::refresh))
        .route("/api/auth/signout", post(handler::signout))
        .route("/api/auth/me", get(handler::me))
}
