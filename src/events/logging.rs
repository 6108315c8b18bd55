use tracing::info;

use super::{EventNotifier, GameEvent, SubscriptionId, Topic};

/// Register one log line per topic
pub fn register_logging_subscribers(notifier: &EventNotifier) -> Vec<SubscriptionId> {
    Topic::all()
        .iter()
        .map(|topic| {
            notifier.subscribe(*topic, |event| {
                info!("{}", describe(event));
                Ok(())
            })
        })
        .collect()
}

/// Human readable summary of an event
pub fn describe(event: &GameEvent) -> String {
    match event {
        GameEvent::PuzzleStarted {
            user_id,
            puzzle_id,
            time_limit_secs,
            at,
        } => format!(
            "[PUZZLE STARTED] User {} started puzzle {} with {}s limit at {}",
            user_id, puzzle_id, time_limit_secs, at
        ),
        GameEvent::PuzzleTimerTick {
            user_id,
            time_remaining_secs,
            ..
        } => format!(
            "[TIMER TICK] User {} - Time remaining: {}s",
            user_id, time_remaining_secs
        ),
        GameEvent::PuzzleTimeExpired {
            user_id,
            puzzle_id,
            at,
        } => format!(
            "[TIME EXPIRED] User {} - Puzzle {} time limit exceeded at {}",
            user_id, puzzle_id, at
        ),
        GameEvent::PuzzleCompleted {
            user_id,
            puzzle_id,
            correct,
            points,
            at,
        } => format!(
            "[PUZZLE COMPLETED] User {} completed puzzle {} (Correct: {}, Points: {}) at {}",
            user_id, puzzle_id, correct, points, at
        ),
        GameEvent::ScoreUpdated {
            user_id,
            new_score,
            at,
        } => format!(
            "[SCORE UPDATED] User {} new score: {} at {}",
            user_id, new_score, at
        ),
        GameEvent::RankUp {
            user_id,
            previous_rank,
            new_rank,
            at,
        } => format!(
            "[RANK UP] User {} promoted from {} to {} at {}",
            user_id, previous_rank, new_rank, at
        ),
        GameEvent::AchievementEarned {
            user_id,
            achievement_name,
            at,
            ..
        } => format!(
            "[ACHIEVEMENT EARNED] User {} earned achievement: {} at {}",
            user_id, achievement_name, at
        ),
        GameEvent::LeaderboardChanged { user_id, at } => format!(
            "[LEADERBOARD UPDATED] User {} position changed at {}",
            user_id, at
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Rank;
    use chrono::Utc;

    #[test]
    fn test_logging_subscribers_cover_every_topic() {
        let notifier = EventNotifier::new();
        let ids = register_logging_subscribers(&notifier);
        assert_eq!(ids.len(), Topic::all().len());
        for topic in Topic::all() {
            assert_eq!(notifier.subscriber_count(*topic), 1);
        }
    }

    #[test]
    fn test_describe_rank_up() {
        let line = describe(&GameEvent::RankUp {
            user_id: "u7".to_string(),
            previous_rank: Rank::Villager,
            new_rank: Rank::Knight,
            at: Utc::now(),
        });
        assert!(line.starts_with("[RANK UP] User u7 promoted from Villager to Knight"));
    }
}
