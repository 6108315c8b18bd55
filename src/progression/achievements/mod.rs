//! Achievement rule set: catalog definitions and the pure checker

mod checker;
mod definitions;

pub use checker::check_achievements;
pub use definitions::{Achievement, AchievementCatalog, AchievementRule};
