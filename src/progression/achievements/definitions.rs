//! Achievement definitions and metadata
//!
//! The standard catalog is declared here in evaluation order. Extra
//! achievements can be appended from configuration.

use serde::{Deserialize, Serialize};

use crate::domain::Rank;

/// Unlock condition for an achievement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AchievementRule {
    /// missionsCompleted >= at_least
    MissionsCompleted { at_least: u32 },
    /// correctAnswers >= at_least
    CorrectAnswers { at_least: u32 },
    /// points >= at_least
    Points { at_least: u64 },
    /// rank >= rank
    RankAtLeast { rank: Rank },
    /// The last `length` history entries are all correct
    CorrectStreak { length: usize },
}

/// Achievement definition with all metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub rule: AchievementRule,
}

impl Achievement {
    pub fn new(
        id: &str,
        name: &str,
        description: &str,
        icon: &str,
        rule: AchievementRule,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            rule,
        }
    }
}

/// Ordered achievement catalog, fixed once the process has started
#[derive(Debug, Clone)]
pub struct AchievementCatalog {
    entries: Vec<Achievement>,
}

impl AchievementCatalog {
    pub fn new(entries: Vec<Achievement>) -> Self {
        Self { entries }
    }

    /// The standard Banana Quest achievements
    pub fn standard() -> Self {
        use AchievementRule::*;

        Self::new(vec![
            Achievement::new(
                "first-puzzle",
                "First Steps",
                "Complete your first puzzle",
                "🎯",
                MissionsCompleted { at_least: 1 },
            ),
            Achievement::new(
                "ten-puzzles",
                "On a Roll",
                "Complete 10 puzzles",
                "🔥",
                MissionsCompleted { at_least: 10 },
            ),
            Achievement::new(
                "fifty-puzzles",
                "Master Solver",
                "Complete 50 puzzles",
                "⭐",
                MissionsCompleted { at_least: 50 },
            ),
            Achievement::new(
                "perfect-streak",
                "Perfect Accuracy",
                "Get 5 correct answers in a row",
                "💯",
                CorrectStreak { length: 5 },
            ),
            Achievement::new(
                "knight-rank",
                "Rise of the Knight",
                "Reach Knight rank",
                "⚔️",
                RankAtLeast { rank: Rank::Knight },
            ),
            Achievement::new(
                "warrior-rank",
                "Warrior's Path",
                "Reach Warrior rank",
                "🛡️",
                RankAtLeast { rank: Rank::Warrior },
            ),
            Achievement::new(
                "champion-rank",
                "Champion's Glory",
                "Reach Champion rank",
                "👑",
                RankAtLeast { rank: Rank::Champion },
            ),
            Achievement::new(
                "legend-rank",
                "Living Legend",
                "Reach Legend rank",
                "✨",
                RankAtLeast { rank: Rank::Legend },
            ),
            Achievement::new(
                "thousand-points",
                "Milestone Reached",
                "Earn 1000 points",
                "💰",
                Points { at_least: 1000 },
            ),
            Achievement::new(
                "five-thousand-points",
                "Point Master",
                "Earn 5000 points",
                "🏆",
                Points { at_least: 5000 },
            ),
        ])
    }

    /// Append extra definitions; ids already in the catalog are skipped and
    /// returned.
    pub fn extend(&mut self, extra: impl IntoIterator<Item = Achievement>) -> Vec<String> {
        let mut skipped = Vec::new();
        for achievement in extra {
            if self.get(&achievement.id).is_some() {
                skipped.push(achievement.id);
            } else {
                self.entries.push(achievement);
            }
        }
        skipped
    }

    pub fn get(&self, id: &str) -> Option<&Achievement> {
        self.entries.iter().find(|a| a.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Achievement> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AchievementCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_order() {
        let catalog = AchievementCatalog::standard();
        let ids: Vec<&str> = catalog.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "first-puzzle",
                "ten-puzzles",
                "fifty-puzzles",
                "perfect-streak",
                "knight-rank",
                "warrior-rank",
                "champion-rank",
                "legend-rank",
                "thousand-points",
                "five-thousand-points",
            ]
        );
    }

    #[test]
    fn test_extend_skips_duplicate_ids() {
        let mut catalog = AchievementCatalog::standard();
        let skipped = catalog.extend(vec![
            Achievement::new(
                "first-puzzle",
                "Dup",
                "",
                "",
                AchievementRule::Points { at_least: 1 },
            ),
            Achievement::new(
                "hundred-correct",
                "Centurion",
                "Answer 100 puzzles correctly",
                "🏛️",
                AchievementRule::CorrectAnswers { at_least: 100 },
            ),
        ]);
        assert_eq!(skipped, vec!["first-puzzle".to_string()]);
        assert_eq!(catalog.len(), 11);
        assert_eq!(catalog.get("first-puzzle").unwrap().name, "First Steps");
    }

    #[test]
    fn test_rule_deserializes_from_tagged_toml() {
        let achievement: Achievement = toml::from_str(
            r#"
            id = "streak-ten"
            name = "Unstoppable"
            description = "Ten correct answers in a row"
            icon = "🚀"
            rule = { kind = "correct_streak", length = 10 }
            "#,
        )
        .unwrap();
        assert_eq!(achievement.rule, AchievementRule::CorrectStreak { length: 10 });
    }
}
