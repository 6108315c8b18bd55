//! Progression engine - turns a puzzle outcome into user state changes
//!
//! Applies the outcome to the record (history, points, accuracy, rank,
//! achievements, badges), then announces what happened through the
//! notifier. Persisting the record is left to the caller.

use std::sync::Arc;

use tracing::debug;

use super::achievements::{Achievement, AchievementCatalog, check_achievements};
use super::clock::Clock;
use crate::domain::{EarnedAchievement, ProgressEntry, Rank, UserRecord};
use crate::error::{GameError, GameResult};
use crate::events::{EventNotifier, GameEvent};

/// A resolved puzzle submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleOutcome {
    pub puzzle_id: String,
    /// Whether the submitted answer matched the key
    pub correct: bool,
    /// The puzzle's point value
    pub points: u64,
}

impl PuzzleOutcome {
    pub fn new(puzzle_id: impl Into<String>, correct: bool, points: u64) -> Self {
        Self {
            puzzle_id: puzzle_id.into(),
            correct,
            points,
        }
    }
}

/// A rank change caused by a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankChange {
    pub previous: Rank,
    pub new: Rank,
}

/// What a submission changed
#[derive(Debug, Clone)]
pub struct SubmissionReport {
    pub correct: bool,
    /// Points awarded by this submission (0 when incorrect)
    pub points_awarded: u64,
    pub rank_change: Option<RankChange>,
    /// In catalog order
    pub newly_earned: Vec<Achievement>,
    /// Published in this order
    pub events: Vec<GameEvent>,
}

pub struct ProgressionEngine {
    catalog: AchievementCatalog,
    notifier: Arc<EventNotifier>,
    clock: Arc<dyn Clock>,
}

impl ProgressionEngine {
    pub fn new(
        catalog: AchievementCatalog,
        notifier: Arc<EventNotifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            catalog,
            notifier,
            clock,
        }
    }

    pub fn catalog(&self) -> &AchievementCatalog {
        &self.catalog
    }

    pub fn notifier(&self) -> &Arc<EventNotifier> {
        &self.notifier
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Apply a submission to `user`.
    ///
    /// Input is validated before anything is touched; on error the record is
    /// unchanged. Events are published after every mutation has been made.
    pub fn apply_submission(
        &self,
        user: &mut UserRecord,
        outcome: &PuzzleOutcome,
    ) -> GameResult<SubmissionReport> {
        if outcome.puzzle_id.trim().is_empty() {
            return Err(GameError::invalid_input("Invalid input"));
        }

        let now = self.clock.now();
        let mut events = Vec::new();

        user.progress_history.push(ProgressEntry {
            puzzle_id: outcome.puzzle_id.clone(),
            correct: outcome.correct,
            timestamp: now,
        });

        let points_awarded = if outcome.correct { outcome.points } else { 0 };
        events.push(GameEvent::PuzzleCompleted {
            user_id: user.id.clone(),
            puzzle_id: outcome.puzzle_id.clone(),
            correct: outcome.correct,
            points: points_awarded,
            at: now,
        });

        if !outcome.correct {
            user.recompute_accuracy();
            self.notifier.publish_all(&events);
            return Ok(SubmissionReport {
                correct: false,
                points_awarded,
                rank_change: None,
                newly_earned: Vec::new(),
                events,
            });
        }

        user.points = user.points.saturating_add(outcome.points);
        user.missions_completed = user.missions_completed.saturating_add(1);
        user.correct_answers = user.correct_answers.saturating_add(1);
        user.recompute_accuracy();
        events.push(GameEvent::ScoreUpdated {
            user_id: user.id.clone(),
            new_score: user.points,
            at: now,
        });

        let rank_change = self.update_rank(user);
        if let Some(change) = rank_change {
            events.push(GameEvent::RankUp {
                user_id: user.id.clone(),
                previous_rank: change.previous,
                new_rank: change.new,
                at: now,
            });
        }

        let newly_earned: Vec<Achievement> = check_achievements(&self.catalog, user)
            .into_iter()
            .cloned()
            .collect();
        for achievement in &newly_earned {
            user.achievements.push(EarnedAchievement {
                id: achievement.id.clone(),
                name: achievement.name.clone(),
                description: achievement.description.clone(),
                icon: achievement.icon.clone(),
                earned_at: now,
            });
            user.add_badge(&achievement.name);
            events.push(GameEvent::AchievementEarned {
                user_id: user.id.clone(),
                achievement_id: achievement.id.clone(),
                achievement_name: achievement.name.clone(),
                at: now,
            });
        }

        events.push(GameEvent::LeaderboardChanged {
            user_id: user.id.clone(),
            at: now,
        });

        debug!(
            "[bq:progression] user={} points={} rank={} earned={}",
            user.id,
            user.points,
            user.rank,
            newly_earned.len()
        );

        self.notifier.publish_all(&events);

        Ok(SubmissionReport {
            correct: true,
            points_awarded,
            rank_change,
            newly_earned,
            events,
        })
    }

    /// Promote to the rank implied by the point total. Never demotes.
    fn update_rank(&self, user: &mut UserRecord) -> Option<RankChange> {
        let target = Rank::for_points(user.points);
        if target <= user.rank {
            return None;
        }
        let previous = user.rank;
        user.rank = target;
        user.add_badge(target.as_str());
        Some(RankChange {
            previous,
            new: target,
        })
    }
}
