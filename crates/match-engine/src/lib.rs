//! Match Engine for iterated two-player games
//!
//! Drives turn-by-turn play between pluggable players (e.g. the iterated
//! Prisoner's Dilemma), reuses records of deterministic matches through a
//! shared cache, applies action noise, and derives scores, cooperation
//! rates, winner and state distribution from the resulting action record.
//!
//! This crate is compiled to:
//! - Native (for tournament runners)
//! - WASM (for frontend match replay)

mod action;
mod cache;
mod engine;
mod error;
mod game;
mod player;
mod random;

pub mod interaction;
pub mod strategies;

#[cfg(feature = "wasm")]
mod wasm;

pub use action::{apply_noise, Action, ActionRecord, Turn};
pub use cache::{CacheKey, DeterministicCache, SharedCache};
pub use engine::{CacheEvent, Match, MatchAttributes, MatchConfig, MatchSummary, DEFAULT_TURNS};
pub use error::{Error, Result};
pub use game::{Game, Score};
pub use interaction::{StateDistribution, Winner};
pub use player::{is_stochastic, Classifier, History, MatchContext, Player, PlayerCore, PlayerId};
pub use random::SeededRng;
pub use strategies::StrategyKind;
