//! Authentication Middleware
//!
//! Axum middleware that guards `/api` routes with JWT bearer auth.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::AppError;
use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::db::repository::UserRepository;
use crate::security_log;

/// Require a valid access token.
///
/// Extracts the JWT from `Authorization: Bearer <token>`, validates it,
/// re-fetches the user behind the `sub` claim, and injects a
/// [`CurrentUser`] into request extensions.
///
/// Skipped paths:
/// - `OPTIONS *` (CORS preflight)
/// - anything outside `/api/`
/// - `/api/health`
/// - `/api/auth/*` except `/api/auth/me`
///
/// No Authorization header at all is 401; a header carrying a malformed,
/// invalid, or expired token is 403.
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    let is_public_api_route =
        path == "/api/health" || (path.starts_with("/api/auth/") && path != "/api/auth/me");
    if is_public_api_route {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::unauthorized());
        }
    };

    let claims = match state.jwt_service().validate_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );
            return Err(match e {
                crate::auth::JwtError::ExpiredToken => AppError::token_expired(),
                _ => AppError::invalid_token("Invalid token"),
            });
        }
    };

    // The token can outlive its user; confirm the account still exists
    let users = UserRepository::new(state.db().clone());
    let user = users
        .find_by_id_str(&claims.sub)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    req.extensions_mut().insert(CurrentUser::try_from(user)?);
    Ok(next.run(req).await)
}
