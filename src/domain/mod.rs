//! Core domain types for Banana Quest

mod puzzle;
mod rank;
mod user;

pub use puzzle::{Difficulty, Puzzle, PuzzleAssignment, PuzzleCatalog, PuzzleView};
pub use rank::{POINTS_PER_RANK, RANKS, Rank};
pub use user::{
    AvatarStyle, EarnedAchievement, Profile, ProfileUpdate, ProgressEntry, UserRecord,
    accuracy_percent, normalize_email,
};
