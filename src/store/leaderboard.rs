//! Leaderboard queries over the users table

use anyhow::Result;
use rusqlite::{Connection, Row};
use serde::Serialize;

use super::db::GameDb;
use super::users::points_column;
use crate::domain::Rank;

/// One leaderboard row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// 1-based
    pub position: u64,
    pub user_id: String,
    pub username: String,
    pub points: u64,
    pub rank: Rank,
    pub missions_completed: u32,
    pub avatar: String,
}

/// Read-only standings
#[derive(Clone)]
pub struct LeaderboardQuery {
    db: GameDb,
}

impl LeaderboardQuery {
    pub fn new(db: GameDb) -> Self {
        Self { db }
    }

    /// Top players by points; ties go to the earlier signup
    pub fn top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>> {
        let conn = self.db.conn();
        Self::query_entries(
            &conn,
            r#"SELECT id, username, points, rank, missions_completed, avatar_color
               FROM users ORDER BY points DESC, created_at ASC LIMIT ?1"#,
            rusqlite::params![limit_column(limit)],
        )
    }

    /// Top players holding `rank`
    pub fn by_rank(&self, rank: Rank, limit: usize) -> Result<Vec<LeaderboardEntry>> {
        let conn = self.db.conn();
        Self::query_entries(
            &conn,
            r#"SELECT id, username, points, rank, missions_completed, avatar_color
               FROM users WHERE rank = ?1 ORDER BY points DESC, created_at ASC LIMIT ?2"#,
            rusqlite::params![rank.as_str(), limit_column(limit)],
        )
    }

    /// 1 + number of players with strictly more points
    pub fn position_for_points(&self, points: u64) -> Result<u64> {
        let conn = self.db.conn();
        let ahead: i64 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE points > ?1",
            [points_column(points)],
            |r| r.get(0),
        )?;
        Ok(ahead.max(0) as u64 + 1)
    }

    fn query_entries(
        conn: &Connection,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<LeaderboardEntry>> {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params, Self::map_row)?;

        let mut entries = Vec::new();
        for (index, row) in rows.enumerate() {
            let mut entry = row?;
            entry.position = index as u64 + 1;
            entries.push(entry);
        }
        Ok(entries)
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<LeaderboardEntry> {
        let username: Option<String> = row.get(1)?;
        let points: i64 = row.get(2)?;
        let rank: String = row.get(3)?;
        let avatar: Option<String> = row.get(5)?;

        Ok(LeaderboardEntry {
            position: 0,
            user_id: row.get(0)?,
            username: username
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| "Anonymous".to_string()),
            points: points.max(0) as u64,
            rank: Rank::parse(&rank).unwrap_or_default(),
            missions_completed: row.get(4)?,
            avatar: avatar.unwrap_or_else(|| "#3498db".to_string()),
        })
    }
}

fn limit_column(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}
