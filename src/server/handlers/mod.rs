//! Request routing and the JSON envelope shared by all endpoints.

mod auth;
mod challenges;
mod leaderboard;
mod puzzle;

use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{error, warn};

use super::types::{ApiRequest, ApiResponse, AppState};
use crate::domain::UserRecord;
use crate::error::{GameError, GameResult};

const BY_RANK_PREFIX: &str = "/api/leaderboard/by-rank/";

/// Dispatch a request to its handler
pub fn route(state: &AppState, req: &ApiRequest) -> ApiResponse {
    let result = match (req.method.as_str(), req.path.as_str()) {
        ("GET", "/") => return ApiResponse::text(200, "API is running..."),

        ("POST", "/api/auth/signup") => auth::signup(state, req),
        ("POST", "/api/auth/login") => auth::login(state, req),
        ("POST", "/api/auth/logout") => auth::logout(state, req),
        ("POST", "/api/auth/update-username") => auth::update_username(state, req),
        ("GET", "/api/auth/profile") => auth::profile(state, req),
        ("POST", "/api/auth/update-profile") => auth::update_profile(state, req),

        ("GET", "/api/puzzle/next") => puzzle::next(state, req),
        ("POST", "/api/puzzle/submit") => puzzle::submit(state, req),
        ("GET", "/api/puzzle/list") => puzzle::list(state, req),

        ("GET", "/api/leaderboard") | ("GET", "/api/leaderboard/") => {
            leaderboard::top(state, req)
        }
        ("GET", "/api/leaderboard/position") => leaderboard::position(state, req),
        ("GET", p) if p.starts_with(BY_RANK_PREFIX) => {
            leaderboard::by_rank(state, req, &p[BY_RANK_PREFIX.len()..])
        }

        ("GET", "/api/challenges/trivia") => challenges::trivia(state, req),
        ("GET", "/api/challenges/history-fact") => challenges::history_fact(state, req),

        _ => Err(GameError::not_found("Not found")),
    };

    match result {
        Ok(payload) => ApiResponse::json(200, success(payload)),
        Err(err) => failure(req, err),
    }
}

/// Merge `payload` into `{"success": true}`
fn success(payload: Value) -> Value {
    let mut envelope = json!({ "success": true });
    if let (Value::Object(out), Value::Object(fields)) = (&mut envelope, payload) {
        out.extend(fields);
    }
    envelope
}

fn failure(req: &ApiRequest, err: GameError) -> ApiResponse {
    let status = err.status_code();
    if status >= 500 {
        error!("[bq:http] {} {} failed: {}", req.method, req.path, err);
    } else {
        warn!("[bq:http] {} {} -> {}: {}", req.method, req.path, status, err);
    }
    ApiResponse::json(
        status,
        json!({ "success": false, "message": err.to_string() }),
    )
}

fn current_user(state: &AppState, req: &ApiRequest) -> GameResult<UserRecord> {
    state.auth.authenticate(req.authorization.as_deref())
}

/// Parse a JSON body; an empty body parses like `{}`
fn parse_body<T: DeserializeOwned>(req: &ApiRequest, invalid: &str) -> GameResult<T> {
    let body = if req.body.trim().is_empty() {
        "{}"
    } else {
        req.body.as_str()
    };
    serde_json::from_str(body).map_err(|_| GameError::invalid_input(invalid))
}
