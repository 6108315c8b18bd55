//! Achievement checking logic
//!
//! Rules are pure functions of the user record: no clock, no I/O.

use super::definitions::{Achievement, AchievementCatalog, AchievementRule};
use crate::domain::UserRecord;

impl AchievementRule {
    /// Whether the rule holds for this user snapshot
    pub fn holds(&self, user: &UserRecord) -> bool {
        match self {
            Self::MissionsCompleted { at_least } => user.missions_completed >= *at_least,
            Self::CorrectAnswers { at_least } => user.correct_answers >= *at_least,
            Self::Points { at_least } => user.points >= *at_least,
            Self::RankAtLeast { rank } => user.rank >= *rank,
            Self::CorrectStreak { length } => has_correct_streak(user, *length),
        }
    }
}

/// Last `length` history entries all correct (needs at least `length` entries)
fn has_correct_streak(user: &UserRecord, length: usize) -> bool {
    let history = &user.progress_history;
    if length == 0 || history.len() < length {
        return false;
    }
    history[history.len() - length..].iter().all(|p| p.correct)
}

/// Achievements not yet held whose rule holds, in catalog order.
///
/// Everything is judged against the same snapshot, so an award made from
/// this list cannot make another entry of the same pass eligible.
pub fn check_achievements<'a>(
    catalog: &'a AchievementCatalog,
    user: &UserRecord,
) -> Vec<&'a Achievement> {
    catalog
        .iter()
        .filter(|a| !user.holds_achievement(&a.id))
        .filter(|a| a.rule.holds(user))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EarnedAchievement, ProgressEntry, Rank};
    use chrono::Utc;

    fn user() -> UserRecord {
        UserRecord::new("u1", "a@b.c", "hash", Utc::now())
    }

    fn push_history(user: &mut UserRecord, results: &[bool]) {
        for (i, correct) in results.iter().enumerate() {
            user.progress_history.push(ProgressEntry {
                puzzle_id: i.to_string(),
                correct: *correct,
                timestamp: Utc::now(),
            });
        }
    }

    fn ids(found: Vec<&Achievement>) -> Vec<&str> {
        found.into_iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn test_new_user_has_nothing_to_unlock() {
        let catalog = AchievementCatalog::standard();
        assert!(check_achievements(&catalog, &user()).is_empty());
    }

    #[test]
    fn test_milestones() {
        let catalog = AchievementCatalog::standard();
        let mut u = user();
        u.missions_completed = 10;
        assert_eq!(
            ids(check_achievements(&catalog, &u)),
            vec!["first-puzzle", "ten-puzzles"]
        );
    }

    #[test]
    fn test_perfect_streak_needs_five_entries() {
        let rule = AchievementRule::CorrectStreak { length: 5 };
        let mut u = user();
        push_history(&mut u, &[true, true, true, true]);
        assert!(!rule.holds(&u));

        push_history(&mut u, &[true]);
        assert!(rule.holds(&u));

        push_history(&mut u, &[false]);
        assert!(!rule.holds(&u));
    }

    #[test]
    fn test_streak_only_looks_at_last_entries() {
        let rule = AchievementRule::CorrectStreak { length: 5 };
        let mut u = user();
        push_history(&mut u, &[false, false, true, true, true, true, true]);
        assert!(rule.holds(&u));
    }

    #[test]
    fn test_rank_rules_are_cumulative() {
        let catalog = AchievementCatalog::standard();
        let mut u = user();
        u.rank = Rank::Champion;
        assert_eq!(
            ids(check_achievements(&catalog, &u)),
            vec!["knight-rank", "warrior-rank", "champion-rank"]
        );
    }

    #[test]
    fn test_held_achievements_are_skipped() {
        let catalog = AchievementCatalog::standard();
        let mut u = user();
        u.points = 5000;
        u.achievements.push(EarnedAchievement {
            id: "thousand-points".to_string(),
            name: "Milestone Reached".to_string(),
            description: String::new(),
            icon: String::new(),
            earned_at: Utc::now(),
        });
        assert_eq!(
            ids(check_achievements(&catalog, &u)),
            vec!["five-thousand-points"]
        );
    }

    #[test]
    fn test_zero_length_streak_never_holds() {
        let mut u = user();
        push_history(&mut u, &[true]);
        assert!(!AchievementRule::CorrectStreak { length: 0 }.holds(&u));
    }
}
