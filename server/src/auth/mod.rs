//! Authentication Module
//!
//! JWT access tokens, opaque refresh tokens, and the middleware and
//! extractor that put the authenticated user in front of handlers.

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, JwtConfig, JwtError, JwtService, generate_refresh_token};
pub use middleware::require_auth;

use crate::AppError;
use crate::db::models::{User, UserId};

/// Authenticated user context, injected by [`require_auth`].
///
/// Built from a fresh user row, not from token claims, so a deleted
/// account stops authenticating the moment its row is gone.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: UserId,
    pub username: String,
    pub display_name: String,
    pub email: String,
}

impl TryFrom<User> for CurrentUser {
    type Error = AppError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        let id = user
            .id
            .ok_or_else(|| AppError::internal("User record has no id"))?;
        Ok(Self {
            id,
            username: user.username,
            display_name: user.display_name,
            email: user.email,
        })
    }
}
