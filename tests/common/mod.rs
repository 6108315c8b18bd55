//! Shared test utilities for integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

use banana_quest::config::Config;
use banana_quest::events::{EventNotifier, Topic};
use banana_quest::progression::FixedClock;
use banana_quest::store::GameStore;

/// A fixed instant so timestamps are predictable
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap()
}

/// Creates a database inside a temporary directory.
///
/// Keep the `TempDir` alive for as long as the store is used.
pub fn temp_store() -> (TempDir, GameStore) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store =
        GameStore::with_path(&temp_dir.path().join("game.db")).expect("Failed to open store");
    (temp_dir, store)
}

/// Config with a cheap bcrypt cost and unreachable upstreams
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;
    config.auth.bcrypt_cost = 4;
    config.challenges.trivia_url = "http://127.0.0.1:9/api.php".to_string();
    config.challenges.history_fact_url = "http://127.0.0.1:9/summary".to_string();
    config.challenges.timeout_secs = 1;
    config
}

pub fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(epoch()))
}

/// Subscribe to every topic and record what arrives
pub fn record_topics(notifier: &EventNotifier) -> Arc<Mutex<Vec<Topic>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    for topic in Topic::all() {
        let sink = Arc::clone(&seen);
        notifier.subscribe(*topic, move |event| {
            sink.lock().unwrap().push(event.topic());
            Ok(())
        });
    }
    seen
}
