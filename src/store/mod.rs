//! Persistence for Banana Quest
//!
//! User documents, sessions and leaderboard queries live in one SQLite
//! database (`~/.banana-quest/game.db` by default).
//!
//! # Usage
//!
//! ```ignore
//! let store = GameStore::with_path(&config.database_path())?;
//!
//! let user = store.users().find_by_email("player@example.com")?;
//! let standings = store.leaderboard().top(10)?;
//! ```

mod db;
mod leaderboard;
mod sessions;
mod users;

pub use db::GameDb;
pub use leaderboard::{LeaderboardEntry, LeaderboardQuery};
pub use sessions::{Session, SessionStore};
pub use users::UserStore;

use anyhow::Result;

/// Entry point to the stores sharing one connection.
///
/// Cheap to clone; the connection sits behind a mutex.
#[derive(Clone)]
pub struct GameStore {
    db: GameDb,
}

impl GameStore {
    pub fn with_path(path: &std::path::Path) -> Result<Self> {
        Ok(Self {
            db: GameDb::open(path)?,
        })
    }

    pub fn in_memory() -> Result<Self> {
        Ok(Self {
            db: GameDb::open_in_memory()?,
        })
    }

    pub fn users(&self) -> UserStore {
        UserStore::new(self.db.clone())
    }

    pub fn sessions(&self) -> SessionStore {
        SessionStore::new(self.db.clone())
    }

    pub fn leaderboard(&self) -> LeaderboardQuery {
        LeaderboardQuery::new(self.db.clone())
    }

    /// Delete all users and sessions
    pub fn reset_all(&self) -> Result<()> {
        self.db.reset_all()
    }
}
