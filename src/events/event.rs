use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::Rank;

/// Notification topics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Topic {
    PuzzleStarted,
    /// Reserved for timed puzzles; never published by the engine
    PuzzleTimerTick,
    /// Reserved for timed puzzles; never published by the engine
    PuzzleTimeExpired,
    PuzzleCompleted,
    ScoreUpdated,
    RankUp,
    AchievementEarned,
    LeaderboardChanged,
}

impl Topic {
    pub fn all() -> &'static [Topic] {
        &[
            Self::PuzzleStarted,
            Self::PuzzleTimerTick,
            Self::PuzzleTimeExpired,
            Self::PuzzleCompleted,
            Self::ScoreUpdated,
            Self::RankUp,
            Self::AchievementEarned,
            Self::LeaderboardChanged,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PuzzleStarted => "puzzle:started",
            Self::PuzzleTimerTick => "puzzle:timer:tick",
            Self::PuzzleTimeExpired => "puzzle:time:expired",
            Self::PuzzleCompleted => "puzzle:completed",
            Self::ScoreUpdated => "score:updated",
            Self::RankUp => "rank:up",
            Self::AchievementEarned => "achievement:earned",
            Self::LeaderboardChanged => "leaderboard:changed",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A domain event with its payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    PuzzleStarted {
        user_id: String,
        puzzle_id: String,
        time_limit_secs: u32,
        at: DateTime<Utc>,
    },
    PuzzleTimerTick {
        user_id: String,
        puzzle_id: String,
        time_remaining_secs: u32,
        at: DateTime<Utc>,
    },
    PuzzleTimeExpired {
        user_id: String,
        puzzle_id: String,
        at: DateTime<Utc>,
    },
    PuzzleCompleted {
        user_id: String,
        puzzle_id: String,
        correct: bool,
        points: u64,
        at: DateTime<Utc>,
    },
    ScoreUpdated {
        user_id: String,
        new_score: u64,
        at: DateTime<Utc>,
    },
    RankUp {
        user_id: String,
        previous_rank: Rank,
        new_rank: Rank,
        at: DateTime<Utc>,
    },
    AchievementEarned {
        user_id: String,
        achievement_id: String,
        achievement_name: String,
        at: DateTime<Utc>,
    },
    /// Standings may have shifted; consumers re-query
    LeaderboardChanged { user_id: String, at: DateTime<Utc> },
}

impl GameEvent {
    pub fn topic(&self) -> Topic {
        match self {
            Self::PuzzleStarted { .. } => Topic::PuzzleStarted,
            Self::PuzzleTimerTick { .. } => Topic::PuzzleTimerTick,
            Self::PuzzleTimeExpired { .. } => Topic::PuzzleTimeExpired,
            Self::PuzzleCompleted { .. } => Topic::PuzzleCompleted,
            Self::ScoreUpdated { .. } => Topic::ScoreUpdated,
            Self::RankUp { .. } => Topic::RankUp,
            Self::AchievementEarned { .. } => Topic::AchievementEarned,
            Self::LeaderboardChanged { .. } => Topic::LeaderboardChanged,
        }
    }
}
