//! Progression system: points, ranks, accuracy and achievements
//!
//! The engine is built from explicitly passed parts (catalog, notifier,
//! clock) so it can be exercised in isolation.
//!
//! # Usage
//!
//! ```ignore
//! let engine = ProgressionEngine::new(
//!     AchievementCatalog::standard(),
//!     Arc::new(EventNotifier::new()),
//!     Arc::new(SystemClock),
//! );
//! let report = engine.apply_submission(&mut user, &PuzzleOutcome::new("2", true, 200))?;
//! users.save(&user)?;
//! ```

pub mod achievements;
mod clock;
mod engine;

pub use achievements::{Achievement, AchievementCatalog, AchievementRule, check_achievements};
pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::{ProgressionEngine, PuzzleOutcome, RankChange, SubmissionReport};
