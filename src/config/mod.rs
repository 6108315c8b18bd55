//! Configuration loading and management

mod io;
mod settings;

pub use settings::{
    AuthSettings, ChallengeSettings, LeaderboardSettings, MAX_SESSION_TTL_HOURS, ServerSettings,
    StorageSettings,
};

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::progression::{Achievement, AchievementCatalog};

pub const ENV_PORT: &str = "BACKEND_PORT";
pub const ENV_HOST: &str = "BANANA_QUEST_HOST";
pub const ENV_DATABASE: &str = "BANANA_QUEST_DB";
pub const ENV_BCRYPT_COST: &str = "BANANA_QUEST_BCRYPT_COST";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub auth: AuthSettings,

    #[serde(default)]
    pub challenges: ChallengeSettings,

    #[serde(default)]
    pub leaderboard: LeaderboardSettings,

    /// Achievements appended after the standard catalog
    #[serde(default)]
    pub achievements: Vec<Achievement>,
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load from `path`, or the global config file if present, else defaults.
    /// Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let global = Self::global_config_path();
                if global.exists() {
                    Self::from_file(&global)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(port) = lookup(ENV_PORT) {
            match port.trim().parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!("Ignoring invalid {}: {:?}", ENV_PORT, port),
            }
        }
        if let Some(host) = lookup(ENV_HOST).filter(|h| !h.trim().is_empty()) {
            self.server.host = host.trim().to_string();
        }
        if let Some(db) = lookup(ENV_DATABASE).filter(|p| !p.trim().is_empty()) {
            self.storage.database_path = Some(PathBuf::from(db.trim()));
        }
        if let Some(cost) = lookup(ENV_BCRYPT_COST) {
            match cost.trim().parse::<u32>() {
                Ok(cost) => self.auth.bcrypt_cost = cost,
                Err(_) => warn!("Ignoring invalid {}: {:?}", ENV_BCRYPT_COST, cost),
            }
        }
    }

    /// Reject values that would fail later at runtime
    pub fn validate(&self) -> Result<()> {
        if !(4..=31).contains(&self.auth.bcrypt_cost) {
            anyhow::bail!(
                "auth.bcrypt_cost must be between 4 and 31 (got {})",
                self.auth.bcrypt_cost
            );
        }
        if !(1..=MAX_SESSION_TTL_HOURS).contains(&self.auth.session_ttl_hours) {
            anyhow::bail!(
                "auth.session_ttl_hours must be between 1 and {} (got {})",
                MAX_SESSION_TTL_HOURS,
                self.auth.session_ttl_hours
            );
        }
        for achievement in &self.achievements {
            if achievement.id.trim().is_empty() {
                anyhow::bail!("achievement ids must not be empty");
            }
        }
        Ok(())
    }

    /// Database path, falling back to the global data dir
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::global_config_dir().join("game.db"))
    }

    /// Standard catalog plus configured extras
    pub fn achievement_catalog(&self) -> AchievementCatalog {
        let mut catalog = AchievementCatalog::standard();
        for id in catalog.extend(self.achievements.iter().cloned()) {
            warn!("Ignoring duplicate achievement id in config: {}", id);
        }
        catalog
    }
}
