//! User document store

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{OptionalExtension, params};

use super::db::GameDb;
use crate::domain::{UserRecord, normalize_email};

/// Reads and writes user documents
#[derive(Clone)]
pub struct UserStore {
    db: GameDb,
}

impl UserStore {
    pub fn new(db: GameDb) -> Self {
        Self { db }
    }

    /// Insert a new user. Returns false if the email is already registered.
    pub fn insert(&self, user: &UserRecord) -> Result<bool> {
        let document = serde_json::to_string(user).context("Failed to encode user document")?;
        let now = Utc::now().timestamp_millis();

        let conn = self.db.conn();
        let inserted = conn.execute(
            r#"INSERT OR IGNORE INTO users
               (id, email, username, points, rank, missions_completed, avatar_color,
                created_at, updated_at, last_played_at, document)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"#,
            params![
                user.id,
                normalize_email(&user.email),
                user.username,
                points_column(user.points),
                user.rank.as_str(),
                user.missions_completed,
                user.profile.avatar_color,
                user.created_at.timestamp_millis(),
                now,
                user.last_played_at.map(|t| t.timestamp_millis()),
                document,
            ],
        )?;
        Ok(inserted == 1)
    }

    /// Persist every field of an existing user
    pub fn save(&self, user: &UserRecord) -> Result<()> {
        let document = serde_json::to_string(user).context("Failed to encode user document")?;
        let now = Utc::now().timestamp_millis();

        let conn = self.db.conn();
        let updated = conn.execute(
            r#"UPDATE users SET
                 username = ?2, points = ?3, rank = ?4, missions_completed = ?5,
                 avatar_color = ?6, updated_at = ?7, last_played_at = ?8, document = ?9
               WHERE id = ?1"#,
            params![
                user.id,
                user.username,
                points_column(user.points),
                user.rank.as_str(),
                user.missions_completed,
                user.profile.avatar_color,
                now,
                user.last_played_at.map(|t| t.timestamp_millis()),
                document,
            ],
        )?;

        if updated == 0 {
            anyhow::bail!("User {} does not exist", user.id);
        }
        Ok(())
    }

    pub fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>> {
        self.find_one("SELECT document FROM users WHERE id = ?1", id)
    }

    /// Lookup by email, ignoring case and surrounding whitespace
    pub fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        self.find_one(
            "SELECT document FROM users WHERE email = ?1",
            &normalize_email(email),
        )
    }

    pub fn email_exists(&self, email: &str) -> Result<bool> {
        let conn = self.db.conn();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE email = ?1",
            [normalize_email(email)],
            |r| r.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn count(&self) -> Result<u64> {
        let conn = self.db.conn();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))?;
        Ok(count.max(0) as u64)
    }

    fn find_one(&self, sql: &str, key: &str) -> Result<Option<UserRecord>> {
        let conn = self.db.conn();
        let document: Option<String> = conn
            .query_row(sql, [key], |r| r.get(0))
            .optional()?;
        drop(conn);

        document
            .map(|doc| serde_json::from_str(&doc).context("Corrupt user document"))
            .transpose()
    }
}

/// SQLite integers are signed
pub(crate) fn points_column(points: u64) -> i64 {
    i64::try_from(points).unwrap_or(i64::MAX)
}
