//! Session Model
//!
//! A session is a live refresh grant. The database row is the sole source
//! of truth: a refresh token is valid iff a matching row exists and has
//! not passed its absolute expiry.

use super::serde_helpers;
use super::user::UserId;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Session ID type
pub type SessionId = RecordId;

/// Session model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<SessionId>,
    /// Opaque refresh token (64 random bytes, hex-encoded)
    pub token: String,
    #[serde(with = "serde_helpers::record_id")]
    pub user: UserId,
    /// Absolute expiry, epoch milliseconds. Never extended after creation.
    pub expires_at: i64,
    pub created_at: i64,
}

impl Session {
    /// A session is valid strictly before its expiry instant
    pub fn is_expired(&self, now_ms: i64) -> bool {
        self.expires_at <= now_ms
    }
}
