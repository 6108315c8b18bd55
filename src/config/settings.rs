//! Config sections

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Request bodies above this size are rejected with 413
    pub max_body_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3005,
            max_body_bytes: 1024 * 1024, // 1 MiB
        }
    }
}

impl ServerSettings {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database location
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Defaults to ~/.banana-quest/game.db
    pub database_path: Option<PathBuf>,
}

/// Longest session lifetime accepted from config (ten years)
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365 * 10;

/// Credential hashing and sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// bcrypt work factor (4..=31)
    pub bcrypt_cost: u32,
    pub session_ttl_hours: i64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            bcrypt_cost: 10,
            session_ttl_hours: 24 * 7,
        }
    }
}

/// Upstream sources for daily challenges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChallengeSettings {
    pub trivia_url: String,
    pub history_fact_url: String,
    pub timeout_secs: u64,
}

impl Default for ChallengeSettings {
    fn default() -> Self {
        Self {
            trivia_url: "https://opentdb.com/api.php?amount=1&type=multiple&difficulty=medium"
                .to_string(),
            history_fact_url: "https://en.wikipedia.org/api/rest_v1/page/random/summary"
                .to_string(),
            timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardSettings {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for LeaderboardSettings {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
        }
    }
}

impl LeaderboardSettings {
    /// Parse a `limit` query value; invalid or missing values use the default
    pub fn resolve_limit(&self, raw: Option<&str>) -> usize {
        let requested = raw
            .and_then(|s| s.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(self.default_limit);
        requested.clamp(1, self.max_limit.max(1))
    }
}
