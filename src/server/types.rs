//! Type definitions for the HTTP server.

use std::sync::Arc;

use serde::Deserialize;

use crate::auth::AuthService;
use crate::challenges::ChallengeClient;
use crate::config::Config;
use crate::domain::{ProfileUpdate, PuzzleCatalog};
use crate::events::{EventNotifier, register_logging_subscribers};
use crate::progression::{Clock, ProgressionEngine};
use crate::store::GameStore;

/// Everything a handler needs, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: GameStore,
    pub auth: AuthService,
    pub engine: Arc<ProgressionEngine>,
    pub puzzles: Arc<PuzzleCatalog>,
    pub challenges: ChallengeClient,
}

impl AppState {
    /// Wire the services together; logging subscribers are registered on a
    /// fresh notifier.
    pub fn new(config: Config, store: GameStore, clock: Arc<dyn Clock>) -> Self {
        let notifier = Arc::new(EventNotifier::new());
        register_logging_subscribers(&notifier);

        let engine = ProgressionEngine::new(config.achievement_catalog(), notifier, clock.clone());
        let auth = AuthService::new(store.clone(), config.auth.clone(), clock);
        let challenges = ChallengeClient::new(config.challenges.clone());

        Self {
            config: Arc::new(config),
            store,
            auth,
            engine: Arc::new(engine),
            puzzles: Arc::new(PuzzleCatalog::builtin()),
            challenges,
        }
    }

    pub fn notifier(&self) -> &Arc<EventNotifier> {
        self.engine.notifier()
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        self.engine.clock()
    }
}

/// Transport-independent view of an incoming request
#[derive(Debug, Clone, Default)]
pub struct ApiRequest {
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub authorization: Option<String>,
    pub body: String,
}

impl ApiRequest {
    /// Split `url` into path and query pairs
    pub fn new(method: &str, url: &str) -> Self {
        let (path, query) = url.split_once('?').unwrap_or((url, ""));
        let query = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
                (k.to_string(), v.to_string())
            })
            .collect();

        Self {
            method: method.to_ascii_uppercase(),
            path: path.to_string(),
            query,
            authorization: None,
            body: String::new(),
        }
    }

    pub fn with_authorization(mut self, value: impl Into<String>) -> Self {
        self.authorization = Some(value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(serde_json::Value),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl ApiResponse {
    pub fn json(status: u16, value: serde_json::Value) -> Self {
        Self {
            status,
            body: ResponseBody::Json(value),
        }
    }

    pub fn text(status: u16, text: impl Into<String>) -> Self {
        Self {
            status,
            body: ResponseBody::Text(text.into()),
        }
    }

    /// JSON payload, if any
    pub fn json_body(&self) -> Option<&serde_json::Value> {
        match &self.body {
            ResponseBody::Json(v) => Some(v),
            ResponseBody::Text(_) => None,
        }
    }
}

/// POST /api/auth/signup and /api/auth/login
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsernameRequest {
    #[serde(default)]
    pub username: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileRequest {
    pub profile: Option<ProfileUpdate>,
}
