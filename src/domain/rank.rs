//! Rank ladder
//!
//! Ranks are derived from cumulative points only: every `POINTS_PER_RANK`
//! points moves the player one rung up, clamped at the top rank.

use serde::{Deserialize, Serialize};

/// Points needed per rank step
pub const POINTS_PER_RANK: u64 = 1000;

/// Ordered rank enumeration (lowest first)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    Villager,
    Knight,
    Warrior,
    Champion,
    Legend,
}

/// All ranks in ladder order
pub static RANKS: &[Rank] = &[
    Rank::Villager,
    Rank::Knight,
    Rank::Warrior,
    Rank::Champion,
    Rank::Legend,
];

impl Default for Rank {
    fn default() -> Self {
        Self::Villager
    }
}

impl Rank {
    /// Rank for a cumulative point total
    pub fn for_points(points: u64) -> Rank {
        let top = RANKS.len() - 1;
        let index = usize::try_from(points / POINTS_PER_RANK)
            .unwrap_or(top)
            .min(top);
        RANKS[index]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Villager => "Villager",
            Self::Knight => "Knight",
            Self::Warrior => "Warrior",
            Self::Champion => "Champion",
            Self::Legend => "Legend",
        }
    }

    /// Parse a rank name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        RANKS
            .iter()
            .copied()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
    }

    /// Top rank of the ladder
    pub fn top() -> Rank {
        RANKS[RANKS.len() - 1]
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
