//! Authentication Handlers
//!
//! Signup, signin, refresh, signout, and current-user lookup. The
//! refresh token never appears in a response body; it only travels in
//! the HttpOnly cookie set here.

use std::time::Duration;

use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};

use crate::AppError;
use crate::auth::{CurrentUser, generate_refresh_token};
use crate::core::{Config, ServerState};
use crate::db::models::{User, UserCreate};
use crate::db::repository::{SessionRepository, UserRepository};
use crate::security_log;
use crate::utils::AppResult;
use crate::utils::validation::{MAX_EMAIL_LEN, MAX_PASSWORD_LEN, MAX_USERNAME_LEN, require_text};

/// Name of the refresh token cookie
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// Minimum accepted password length
const MIN_PASSWORD_LEN: usize = 8;

// =============================================================================
// DTOs
// =============================================================================

/// Fields arrive as Option so that a missing field is a 400 validation
/// error rather than a body-deserialization rejection.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Deserialize)]
pub struct SigninRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub created_at: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SigninResponse {
    pub access_token: String,
    pub user: UserInfo,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
}

fn user_info(user: User) -> AppResult<UserInfo> {
    let id = user
        .id
        .ok_or_else(|| AppError::internal("User record has no id"))?;
    Ok(UserInfo {
        id: id.to_string(),
        username: user.username,
        email: user.email,
        display_name: user.display_name,
        created_at: user.created_at,
    })
}

// =============================================================================
// Cookie helpers
// =============================================================================

/// Refresh cookie: HttpOnly, site-wide path, lifetime matching the
/// server-side session. Production runs behind HTTPS on a different
/// origin than the frontend, hence Secure + SameSite=None there.
fn refresh_cookie(config: &Config, token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(REFRESH_COOKIE, token);
    cookie.set_http_only(true);
    cookie.set_path("/");
    cookie.set_max_age(time::Duration::days(config.refresh_ttl_days));
    if config.is_production() {
        cookie.set_secure(true);
        cookie.set_same_site(SameSite::None);
    } else {
        cookie.set_same_site(SameSite::Lax);
    }
    cookie
}

fn remove_refresh_cookie(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build((REFRESH_COOKIE, "")).path("/"))
}

// =============================================================================
// Handlers
// =============================================================================

/// POST /api/auth/signup - register a new account
pub async fn signup(
    State(state): State<ServerState>,
    Json(req): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<UserInfo>)> {
    let username = require_text(req.username.as_deref(), "username", MAX_USERNAME_LEN)?;
    let password = require_text(req.password.as_deref(), "password", MAX_PASSWORD_LEN)?;
    let email = require_text(req.email.as_deref(), "email", MAX_EMAIL_LEN)?;
    let first_name = require_text(req.first_name.as_deref(), "firstName", MAX_USERNAME_LEN)?;
    let last_name = require_text(req.last_name.as_deref(), "lastName", MAX_USERNAME_LEN)?;

    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if !email.contains('@') {
        return Err(AppError::validation("email is not valid"));
    }

    let display_name = format!("{} {}", first_name.trim(), last_name.trim());

    let users = UserRepository::new(state.db().clone());
    let user = users
        .create(UserCreate {
            username: username.clone(),
            password,
            email,
            display_name: Some(display_name),
        })
        .await?;

    tracing::info!(username = %username, "User registered");
    Ok((StatusCode::CREATED, Json(user_info(user)?)))
}

/// POST /api/auth/signin - authenticate and open a refresh session
pub async fn signin(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(req): Json<SigninRequest>,
) -> AppResult<(CookieJar, Json<SigninResponse>)> {
    let username = require_text(req.username.as_deref(), "username", MAX_USERNAME_LEN)?;
    let password = require_text(req.password.as_deref(), "password", MAX_PASSWORD_LEN)?;

    let users = UserRepository::new(state.db().clone());
    let user = users.find_by_username(&username).await?;

    // Fixed delay before inspecting the result, so hit and miss cost the same
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error message to prevent username enumeration
    let user = match user {
        Some(u) => {
            let password_valid = u
                .verify_password(&password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;
            if !password_valid {
                security_log!("WARN", "signin_failed", username = username.clone());
                return Err(AppError::invalid_credentials());
            }
            u
        }
        None => {
            security_log!("WARN", "signin_failed", username = username.clone());
            return Err(AppError::invalid_credentials());
        }
    };

    let user_id = user
        .id
        .clone()
        .ok_or_else(|| AppError::internal("User record has no id"))?;

    let access_token = state
        .jwt_service()
        .generate_token(&user_id.to_string())
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    let refresh_token = generate_refresh_token()
        .map_err(|e| AppError::internal(format!("Failed to generate refresh token: {e}")))?;

    let sessions = SessionRepository::new(state.db().clone());
    sessions
        .create(
            user_id.clone(),
            refresh_token.clone(),
            state.config.refresh_ttl_days,
        )
        .await?;

    tracing::info!(user_id = %user_id, username = %user.username, "User signed in");

    let jar = jar.add(refresh_cookie(&state.config, refresh_token));
    Ok((
        jar,
        Json(SigninResponse {
            access_token,
            user: user_info(user)?,
        }),
    ))
}

/// POST /api/auth/refresh - trade the refresh cookie for a new access token
///
/// No rotation and no sliding window: the cookie and its session keep
/// their original expiry, only a fresh access token is issued.
pub async fn refresh(
    State(state): State<ServerState>,
    jar: CookieJar,
) -> AppResult<Json<RefreshResponse>> {
    let token = jar
        .get(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(AppError::unauthorized)?;

    let sessions = SessionRepository::new(state.db().clone());
    let session = sessions
        .find_by_token(&token)
        .await?
        .ok_or_else(|| AppError::invalid_token("Unknown refresh token"))?;

    if session.is_expired(chrono::Utc::now().timestamp_millis()) {
        sessions.delete_by_token(&token).await?;
        security_log!("WARN", "refresh_expired", user_id = session.user.to_string());
        return Err(AppError::token_expired());
    }

    let users = UserRepository::new(state.db().clone());
    let user = users
        .find_by_id(&session.user)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    let user_id = user
        .id
        .ok_or_else(|| AppError::internal("User record has no id"))?;

    let access_token = state
        .jwt_service()
        .generate_token(&user_id.to_string())
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    Ok(Json(RefreshResponse { access_token }))
}

/// POST /api/auth/signout - revoke the refresh session
///
/// Idempotent: succeeds with 204 whether or not a session exists.
pub async fn signout(
    State(state): State<ServerState>,
    jar: CookieJar,
) -> AppResult<(CookieJar, StatusCode)> {
    if let Some(cookie) = jar.get(REFRESH_COOKIE) {
        let token = cookie.value().to_string();
        let sessions = SessionRepository::new(state.db().clone());
        if let Err(e) = sessions.delete_by_token(&token).await {
            // Session cleanup failure should not block signout
            tracing::error!(target: "database", "Failed to delete session: {}", e);
        }
    }

    Ok((remove_refresh_cookie(jar), StatusCode::NO_CONTENT))
}

/// GET /api/auth/me - current user info
pub async fn me(State(state): State<ServerState>, user: CurrentUser) -> AppResult<Json<UserInfo>> {
    // Re-fetch for created_at, which the auth context does not carry
    let users = UserRepository::new(state.db().clone());
    let fresh = users
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(Json(user_info(fresh)?))
}
