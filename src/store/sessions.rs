//! Bearer session storage

use anyhow::{Result, anyhow};
use chrono::{DateTime, Duration, TimeZone, Utc};
use rusqlite::{OptionalExtension, params};

use super::db::GameDb;
use crate::random::generate_session_token;

/// An issued session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct SessionStore {
    db: GameDb,
}

impl SessionStore {
    pub fn new(db: GameDb) -> Self {
        Self { db }
    }

    /// Issue a new token for `user_id`
    pub fn create(&self, user_id: &str, ttl: Duration, now: DateTime<Utc>) -> Result<Session> {
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| anyhow!("Session lifetime of {} is out of range", ttl))?;
        let session = Session {
            token: generate_session_token(),
            user_id: user_id.to_string(),
            created_at: now,
            expires_at,
        };

        let conn = self.db.conn();
        conn.execute(
            "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                session.token,
                session.user_id,
                session.created_at.timestamp_millis(),
                session.expires_at.timestamp_millis(),
            ],
        )?;
        Ok(session)
    }

    /// Resolve a token that has not expired at `now`
    pub fn find_valid(&self, token: &str, now: DateTime<Utc>) -> Result<Option<Session>> {
        let conn = self.db.conn();
        let row: Option<(String, i64, i64)> = conn
            .query_row(
                "SELECT user_id, created_at, expires_at FROM sessions WHERE token = ?1",
                [token],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .optional()?;

        let Some((user_id, created_at, expires_at)) = row else {
            return Ok(None);
        };
        if expires_at <= now.timestamp_millis() {
            return Ok(None);
        }

        Ok(Some(Session {
            token: token.to_string(),
            user_id,
            created_at: from_millis(created_at),
            expires_at: from_millis(expires_at),
        }))
    }

    pub fn revoke(&self, token: &str) -> Result<bool> {
        let conn = self.db.conn();
        let removed = conn.execute("DELETE FROM sessions WHERE token = ?1", [token])?;
        Ok(removed > 0)
    }

    /// Delete expired sessions; returns how many were removed
    pub fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        let conn = self.db.conn();
        let removed = conn.execute(
            "DELETE FROM sessions WHERE expires_at <= ?1",
            [now.timestamp_millis()],
        )?;
        Ok(removed)
    }
}

fn from_millis(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms).single().unwrap_or_default()
}
