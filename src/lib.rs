//! Banana Quest - game backend
//!
//! Players sign up, solve banana-counting puzzles and climb a five-step rank
//! ladder. Every submission runs through the progression engine, which
//! updates points, accuracy, rank and achievements and then announces what
//! changed on the event notifier.
//!
//! ## Layout
//!
//! - [`progression`]: the engine, achievement catalog and injectable clock
//! - [`events`]: topic-based publish/subscribe notifier
//! - [`store`]: SQLite-backed user documents, sessions and leaderboard
//! - [`server`]: the JSON HTTP API

pub mod auth;
pub mod challenges;
pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod progression;
pub mod random;
pub mod server;
pub mod store;

pub use error::{GameError, GameResult};
