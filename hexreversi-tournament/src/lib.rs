//! HEXREVERSI Tournament - Games and matches between strategy chains
//!
//! This crate drives the rules engine from outside:
//! - Single games between two seats (automated or external)
//! - Randomised, seeded openings
//! - Matches between two strategy chains with colour alternation
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 2: play_match (phases)
//! - Level 3: GameRunner::play_game (steps)
//! - Level 4: utilities, configuration

mod config;
mod game_runner;
mod match_play;

pub use config::MatchConfig;
pub use game_runner::{create_rng, GameRecord, GameRunner, Turn};
pub use match_play::{play_match, MatchResult};
