//! Session Repository
//!
//! Server-side refresh sessions. One row per issued refresh token; the
//! unique index on `token` makes lookup and revocation O(log n).

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Session, UserId};
use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct SessionRepository {
    base: BaseRepository,
}

impl SessionRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a session for `user` that expires `ttl_days` from now.
    ///
    /// `$token` is a protected SurrealDB parameter, so the refresh token
    /// binds as `$refresh_token` here and in the other queries below.
    pub async fn create(&self, user: UserId, token: String, ttl_days: i64) -> RepoResult<Session> {
        let now = Utc::now().timestamp_millis();
        let expires_at = now + ttl_days * 24 * 60 * 60 * 1000;

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE session SET
                    token = $refresh_token,
                    user = $user,
                    expires_at = $expires_at,
                    created_at = $created_at
                RETURN AFTER"#,
            )
            .bind(("refresh_token", token))
            .bind(("user", user))
            .bind(("expires_at", expires_at))
            .bind(("created_at", now))
            .await?;

        let created: Option<Session> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create session".to_string()))
    }

    /// Find session by refresh token
    pub async fn find_by_token(&self, token: &str) -> RepoResult<Option<Session>> {
        let token_owned = token.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM session WHERE token = $refresh_token LIMIT 1")
            .bind(("refresh_token", token_owned))
            .await?;
        let sessions: Vec<Session> = result.take(0)?;
        Ok(sessions.into_iter().next())
    }

    /// Delete the session holding `token`. Missing token is not an error.
    pub async fn delete_by_token(&self, token: &str) -> RepoResult<()> {
        let token_owned = token.to_string();
        self.base
            .db()
            .query("DELETE session WHERE token = $refresh_token")
            .bind(("refresh_token", token_owned))
            .await?
            .check()?;
        Ok(())
    }
}
