//! Progression engine driven against a real database

mod common;

use std::sync::Arc;

use banana_quest::domain::{Rank, UserRecord};
use banana_quest::events::{EventNotifier, Topic};
use banana_quest::progression::{AchievementCatalog, ProgressionEngine, PuzzleOutcome};

use common::{epoch, fixed_clock, record_topics, temp_store};

fn engine(notifier: &Arc<EventNotifier>) -> ProgressionEngine {
    ProgressionEngine::new(
        AchievementCatalog::standard(),
        Arc::clone(notifier),
        fixed_clock(),
    )
}

#[test]
fn test_knight_promotion_persists() {
    let (_dir, store) = temp_store();
    let notifier = Arc::new(EventNotifier::new());
    let seen = record_topics(&notifier);
    let engine = engine(&notifier);

    let mut user = UserRecord::new("u1", "knight@example.com", "hash", epoch());
    user.points = 950;
    store.users().insert(&user).unwrap();

    let report = engine
        .apply_submission(&mut user, &PuzzleOutcome::new("1", true, 100))
        .unwrap();
    store.users().save(&user).unwrap();

    let reloaded = store.users().find_by_id("u1").unwrap().unwrap();
    assert_eq!(reloaded, user);
    assert_eq!(reloaded.points, 1050);
    assert_eq!(reloaded.rank, Rank::Knight);
    assert!(reloaded.holds_achievement("thousand-points"));
    assert!(reloaded.profile.badges.contains(&"Knight".to_string()));
    assert!(
        reloaded
            .profile
            .badges
            .contains(&"Milestone Reached".to_string())
    );

    let published = seen.lock().unwrap().clone();
    assert_eq!(published.len(), report.events.len());
    assert_eq!(published.first(), Some(&Topic::PuzzleCompleted));
    assert_eq!(published.last(), Some(&Topic::LeaderboardChanged));
    assert!(published.contains(&Topic::RankUp));

    let top = store.leaderboard().top(10).unwrap();
    assert_eq!(top[0].rank, Rank::Knight);
    assert_eq!(top[0].missions_completed, 1);
}

#[test]
fn test_five_correct_in_a_row_awards_streak_once() {
    let notifier = Arc::new(EventNotifier::new());
    let engine = engine(&notifier);
    let mut user = UserRecord::new("u1", "streak@example.com", "hash", epoch());

    let mut earned = Vec::new();
    for _ in 0..7 {
        let report = engine
            .apply_submission(&mut user, &PuzzleOutcome::new("3", true, 100))
            .unwrap();
        earned.extend(report.newly_earned.into_iter().map(|a| a.id));
    }

    assert_eq!(
        earned.iter().filter(|id| id.as_str() == "perfect-streak").count(),
        1
    );
    assert_eq!(user.average_accuracy, 100.0);
    assert_eq!(user.achievements.len(), earned.len());
}

#[test]
fn test_failing_subscriber_is_isolated() {
    let notifier = Arc::new(EventNotifier::new());
    notifier.subscribe(Topic::ScoreUpdated, |_| anyhow::bail!("subscriber down"));
    let seen = record_topics(&notifier);
    let engine = engine(&notifier);

    let mut user = UserRecord::new("u1", "iso@example.com", "hash", epoch());
    let report = engine
        .apply_submission(&mut user, &PuzzleOutcome::new("1", true, 100))
        .unwrap();

    assert_eq!(user.points, 100);
    assert_eq!(seen.lock().unwrap().len(), report.events.len());
}

#[test]
fn test_wrong_answers_lower_accuracy_without_points() {
    let notifier = Arc::new(EventNotifier::new());
    let engine = engine(&notifier);
    let mut user = UserRecord::new("u1", "acc@example.com", "hash", epoch());

    engine
        .apply_submission(&mut user, &PuzzleOutcome::new("2", true, 200))
        .unwrap();
    for _ in 0..2 {
        engine
            .apply_submission(&mut user, &PuzzleOutcome::new("2", false, 200))
            .unwrap();
    }

    assert_eq!(user.points, 200);
    assert_eq!(user.missions_completed, 1);
    assert_eq!(user.progress_history.len(), 3);
    assert_eq!(user.average_accuracy, 33.33);
}
