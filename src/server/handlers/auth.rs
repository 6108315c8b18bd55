//! /api/auth endpoints

use serde_json::{Value, json};

use super::{current_user, parse_body};
use crate::error::{GameError, GameResult};
use crate::server::types::{
    ApiRequest, AppState, CredentialsRequest, ProfileRequest, UsernameRequest,
};

pub(super) fn signup(state: &AppState, req: &ApiRequest) -> GameResult<Value> {
    let creds: CredentialsRequest = parse_body(req, "Email and password are required")?;
    let grant = state.auth.signup(&creds.email, &creds.password)?;
    Ok(json!({
        "token": grant.token,
        "userId": grant.user_id,
        "email": grant.email,
    }))
}

pub(super) fn login(state: &AppState, req: &ApiRequest) -> GameResult<Value> {
    let creds: CredentialsRequest = parse_body(req, "Email and password are required")?;
    let grant = state.auth.login(&creds.email, &creds.password)?;
    Ok(json!({
        "token": grant.token,
        "userId": grant.user_id,
        "username": grant.username,
        "email": grant.email,
    }))
}

pub(super) fn logout(state: &AppState, req: &ApiRequest) -> GameResult<Value> {
    current_user(state, req)?;
    let token = req
        .authorization
        .as_deref()
        .and_then(|h| h.trim().strip_prefix("Bearer "))
        .unwrap_or_default()
        .trim();
    state.auth.logout(token)?;
    Ok(json!({ "message": "Logged out" }))
}

pub(super) fn update_username(state: &AppState, req: &ApiRequest) -> GameResult<Value> {
    let mut user = current_user(state, req)?;
    let body: UsernameRequest = parse_body(req, "Username is required")?;
    state.auth.update_username(&mut user, &body.username)?;
    Ok(json!({
        "username": user.username,
        "userId": user.id,
    }))
}

pub(super) fn profile(state: &AppState, req: &ApiRequest) -> GameResult<Value> {
    let user = current_user(state, req)?;
    Ok(json!({
        "user": {
            "id": user.id,
            "email": user.email,
            "username": user.username,
            "points": user.points,
            "rank": user.rank,
            "missionsCompleted": user.missions_completed,
            "correctAnswers": user.correct_answers,
            "averageAccuracy": user.average_accuracy,
            "streakDays": user.streak_days,
            "profile": user.profile,
            "achievements": user.achievements,
        }
    }))
}

pub(super) fn update_profile(state: &AppState, req: &ApiRequest) -> GameResult<Value> {
    let mut user = current_user(state, req)?;
    let body: ProfileRequest = parse_body(req, "Invalid profile data")?;
    let update = body
        .profile
        .ok_or_else(|| GameError::invalid_input("Profile data is required"))?;

    let profile = state.auth.update_profile(&mut user, update)?;
    Ok(json!({
        "message": "Profile updated successfully",
        "profile": profile,
    }))
}
