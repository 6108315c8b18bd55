//! /api/puzzle endpoints

use rand::Rng;
use serde_json::{Value, json};

use super::{current_user, parse_body};
use crate::error::{GameError, GameResult};
use crate::events::GameEvent;
use crate::progression::PuzzleOutcome;
use crate::server::types::{ApiRequest, AppState};

/// Hand out a puzzle matching the caller's rank and start its timer
pub(super) fn next(state: &AppState, req: &ApiRequest) -> GameResult<Value> {
    let mut user = current_user(state, req)?;
    let mut rng = rand::thread_rng();
    let assignment = state
        .puzzles
        .assign(user.rank, |n| rng.gen_range(0..n))
        .ok_or_else(|| GameError::not_found("No puzzles available"))?;

    let now = state.clock().now();
    user.last_played_at = Some(now);
    state.store.users().save(&user)?;

    state.notifier().publish(&GameEvent::PuzzleStarted {
        user_id: user.id.clone(),
        puzzle_id: assignment.puzzle.id.to_string(),
        time_limit_secs: assignment.time_limit_secs,
        at: now,
    });

    // Single-tier ranks report a bare string
    let difficulty = match assignment.difficulties {
        [only] => json!(only),
        tiers => json!(tiers),
    };

    Ok(json!({
        "puzzle": assignment.puzzle.view(),
        "timeLimit": assignment.time_limit_secs,
        "difficulty": difficulty,
        "userRank": user.rank,
        "userPoints": user.points,
    }))
}

/// Grade an answer and run it through the progression engine.
///
/// `averageAccuracy` in the response is recomputed on wrong answers too, so it
/// always reflects the full submission history.
pub(super) fn submit(state: &AppState, req: &ApiRequest) -> GameResult<Value> {
    let mut user = current_user(state, req)?;
    let body: Value = parse_body(req, "Invalid input")?;

    // Both fields must be JSON numbers
    let (Some(puzzle_id), Some(answer)) = (
        body.get("puzzleId").and_then(Value::as_f64),
        body.get("answer").and_then(Value::as_f64),
    ) else {
        return Err(GameError::invalid_input("Invalid input"));
    };

    let puzzle = state
        .puzzles
        .all()
        .iter()
        .find(|p| f64::from(p.id) == puzzle_id)
        .ok_or_else(|| GameError::not_found("Puzzle not found"))?;

    let correct = answer.fract() == 0.0 && puzzle.is_correct(answer as i64);
    let outcome = PuzzleOutcome::new(puzzle.id.to_string(), correct, puzzle.points);
    let report = state.engine.apply_submission(&mut user, &outcome)?;
    state.store.users().save(&user)?;

    let message = if correct {
        "Correct answer!".to_string()
    } else {
        format!("Wrong! The correct answer is {}", puzzle.solution)
    };

    let mut response = json!({
        "isCorrect": correct,
        "points": report.points_awarded,
        "userPoints": user.points,
        "userRank": user.rank,
        "message": message,
        "missionsCompleted": user.missions_completed,
        "correctAnswers": user.correct_answers,
        "averageAccuracy": user.average_accuracy,
    });

    if !report.newly_earned.is_empty() {
        let earned: Vec<Value> = report
            .newly_earned
            .iter()
            .map(|a| json!({ "id": a.id, "name": a.name, "icon": a.icon }))
            .collect();
        response["achievements"] = Value::Array(earned);
    }

    Ok(response)
}

/// Catalog without answer keys
pub(super) fn list(state: &AppState, req: &ApiRequest) -> GameResult<Value> {
    current_user(state, req)?;
    let puzzles: Vec<_> = state.puzzles.all().iter().map(|p| p.view()).collect();
    Ok(json!({ "puzzles": puzzles }))
}
