//! /api/challenges endpoints

use serde_json::{Value, json};

use super::current_user;
use crate::error::GameResult;
use crate::server::types::{ApiRequest, AppState};

pub(super) fn trivia(state: &AppState, req: &ApiRequest) -> GameResult<Value> {
    current_user(state, req)?;
    let challenge = state.challenges.trivia(state.clock().now())?;
    Ok(json!({ "challenge": challenge }))
}

pub(super) fn history_fact(state: &AppState, req: &ApiRequest) -> GameResult<Value> {
    current_user(state, req)?;
    Ok(json!({ "fact": state.challenges.history_fact() }))
}
