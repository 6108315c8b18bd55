//! Daily challenges backed by public trivia and encyclopedia APIs

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::ChallengeSettings;
use crate::error::{GameError, GameResult};

/// A multiple-choice trivia question ready for the client
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriviaChallenge {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
    pub difficulty: String,
    pub question: String,
    pub answers: Vec<String>,
    pub correct_answer_index: usize,
    pub points: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryFact {
    pub title: String,
    pub extract: String,
    pub image: Option<String>,
}

impl HistoryFact {
    /// Served whenever the upstream lookup fails
    pub fn fallback() -> Self {
        Self {
            title: "Ancient Kingdom".to_string(),
            extract: "Throughout history, kingdoms have risen and fallen, each leaving their mark on civilization.".to_string(),
            image: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TriviaResponse {
    #[serde(default)]
    results: Vec<TriviaQuestion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TriviaQuestion {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub difficulty: String,
    pub question: String,
    pub correct_answer: String,
    #[serde(default)]
    pub incorrect_answers: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    title: String,
    #[serde(default)]
    extract: String,
    thumbnail: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    source: String,
}

/// Points awarded per trivia difficulty
pub fn trivia_points(difficulty: &str) -> u64 {
    match difficulty {
        "easy" => 100,
        "medium" => 200,
        _ => 300,
    }
}

/// Turn a raw upstream question into a challenge.
///
/// `arrange` reorders the answers; the correct index is located afterwards.
pub fn build_trivia_challenge(
    raw: &TriviaQuestion,
    now: DateTime<Utc>,
    arrange: impl FnOnce(&mut [String]),
) -> TriviaChallenge {
    let correct = decode_html_entities(&raw.correct_answer);
    let mut answers = Vec::with_capacity(raw.incorrect_answers.len() + 1);
    answers.push(correct.clone());
    answers.extend(raw.incorrect_answers.iter().map(|a| decode_html_entities(a)));

    arrange(&mut answers);
    let correct_answer_index = answers.iter().position(|a| *a == correct).unwrap_or(0);

    TriviaChallenge {
        id: format!("trivia-{}", now.timestamp_millis()),
        kind: "trivia".to_string(),
        category: decode_html_entities(&raw.category),
        difficulty: raw.difficulty.clone(),
        question: decode_html_entities(&raw.question),
        answers,
        correct_answer_index,
        points: trivia_points(&raw.difficulty),
    }
}

/// Decode named and numeric HTML character references.
///
/// Unknown or malformed references are kept verbatim.
pub fn decode_html_entities(input: &str) -> String {
    html_escape::decode_html_entities(input).into_owned()
}

/// HTTP client for the upstream challenge sources
#[derive(Clone)]
pub struct ChallengeClient {
    agent: ureq::Agent,
    settings: ChallengeSettings,
}

impl ChallengeClient {
    pub fn new(settings: ChallengeSettings) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(settings.timeout_secs.max(1)))
            .user_agent(concat!("banana-quest/", env!("CARGO_PKG_VERSION")))
            .build();
        Self { agent, settings }
    }

    pub fn trivia(&self, now: DateTime<Utc>) -> GameResult<TriviaChallenge> {
        let raw = self.fetch_trivia().map_err(|e| {
            warn!("[bq:challenges] Trivia fetch failed: {}", e);
            GameError::Upstream("Failed to fetch trivia question".to_string())
        })?;
        Ok(build_trivia_challenge(&raw, now, |answers| {
            answers.shuffle(&mut rand::thread_rng())
        }))
    }

    /// Never fails; falls back to a fixed fact
    pub fn history_fact(&self) -> HistoryFact {
        match self.fetch_summary() {
            Ok(fact) => fact,
            Err(e) => {
                warn!("[bq:challenges] History fact fetch failed: {}", e);
                HistoryFact::fallback()
            }
        }
    }

    fn fetch_trivia(&self) -> anyhow::Result<TriviaQuestion> {
        let response: TriviaResponse = self
            .agent
            .get(&self.settings.trivia_url)
            .call()?
            .into_json()?;
        response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("empty trivia result set"))
    }

    fn fetch_summary(&self) -> anyhow::Result<HistoryFact> {
        let summary: SummaryResponse = self
            .agent
            .get(&self.settings.history_fact_url)
            .set("Accept", "application/json")
            .call()?
            .into_json()?;
        Ok(HistoryFact {
            title: summary.title,
            extract: summary.extract,
            image: summary.thumbnail.map(|t| t.source),
        })
    }
}
