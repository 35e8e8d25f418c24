//! Refresh Token Entity
//!
//! Opaque tokens are stored hashed; only the digest ever reaches the
//! database. Expired rows are removed by the token cleanup task, and a
//! user's tokens are tombstoned when the user is cascade-deleted.

use chrono::{DateTime, Utc};
use el_common::Lifecycle;
use sha2::{Digest, Sha256};

#[derive(Debug, Clone)]
pub struct RefreshToken {
    pub id: i64,
    pub user_id: i64,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub lifecycle: Lifecycle,
    pub created_at: DateTime<Utc>,
}

impl RefreshToken {
    pub fn new(user_id: i64, token: &str, expires_at: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            user_id,
            token_hash: Self::hash(token),
            expires_at,
            lifecycle: Lifecycle::Active,
            created_at: Utc::now(),
        }
    }

    /// SHA-256 hex digest of the raw token.
    pub fn hash(token: &str) -> String {
        let digest = Sha256::digest(token.as_bytes());
        hex::encode(digest)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
