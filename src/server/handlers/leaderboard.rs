//! /api/leaderboard endpoints

use serde_json::{Value, json};

use super::current_user;
use crate::domain::Rank;
use crate::error::{GameError, GameResult};
use crate::server::types::{ApiRequest, AppState};

pub(super) fn top(state: &AppState, req: &ApiRequest) -> GameResult<Value> {
    let limit = state
        .config
        .leaderboard
        .resolve_limit(req.query_param("limit"));
    let entries = state.store.leaderboard().top(limit)?;
    Ok(json!({ "leaderboard": entries }))
}

pub(super) fn position(state: &AppState, req: &ApiRequest) -> GameResult<Value> {
    let user = current_user(state, req)?;
    let position = state.store.leaderboard().position_for_points(user.points)?;
    Ok(json!({
        "position": position,
        "username": user.username,
        "points": user.points,
        "rank": user.rank,
        "missionsCompleted": user.missions_completed,
    }))
}

pub(super) fn by_rank(state: &AppState, req: &ApiRequest, raw_rank: &str) -> GameResult<Value> {
    let rank = Rank::parse(raw_rank.trim_end_matches('/'))
        .ok_or_else(|| GameError::invalid_input(format!("Unknown rank: {}", raw_rank)))?;
    let limit = state
        .config
        .leaderboard
        .resolve_limit(req.query_param("limit"));
    let entries = state.store.leaderboard().by_rank(rank, limit)?;
    Ok(json!({ "leaderboard": entries, "rank": rank }))
}
