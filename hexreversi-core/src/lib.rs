//! HEXREVERSI Core - Rules engine for Reversi on a hexagonal board
//!
//! This crate provides the game itself, independent of any front end:
//! - Board geometry (cube coordinates, rows, colinear lines)
//! - Game engine (turn order, dry-run probes, flips, passes, game end)
//! - Strategy chains for computer players
//! - Player adapters for automated and external decisions
//! - Plain-text board view

pub mod board;
pub mod error;
pub mod game;
pub mod player;
pub mod render;
pub mod strategy;
pub mod view;

// Re-exports for convenient access
pub use board::{Board, Cell, CellId, CellStatus, Coordinate, MAX_SIDE_LENGTH, MIN_SIDE_LENGTH};
pub use error::{GameError, Result};
pub use game::{
    EndReason, GameConfig, GameEngine, Outcome, Player, Probe, StalemateRule, TurnListener,
    UnknownStalemateRule,
};
pub use player::{Decision, MoveSource, PlayerAdapter, ScriptedSource, SharedSource};
pub use render::{render, TextView};
pub use strategy::{Strategy, UnknownStrategy};
pub use view::{ProbeRecorder, ReversiView};
