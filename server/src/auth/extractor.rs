//! CurrentUser Extractor
//!
//! Lets handlers take `user: CurrentUser` as an argument instead of
//! digging through request extensions.

use axum::extract::FromRequestParts;
use http::request::Parts;

use crate::AppError;
use crate::auth::CurrentUser;
use crate::core::ServerState;

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(AppError::unauthorized)
    }
}
