//! Errors raised by the rules engine

use crate::board::Coordinate;
use crate::game::Player;

/// Everything that can go wrong when driving a [`GameEngine`](crate::GameEngine).
///
/// All variants except [`GameError::NoSuchCoordinate`] are usage errors: the
/// caller broke the engine's protocol and the operation was aborted before
/// any state changed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("side length must be between 2 and 1024, got {0}")]
    InvalidSideLength(usize),

    #[error("game has not started")]
    NotStarted,

    #[error("game already started")]
    AlreadyStarted,

    #[error("not {attempted:?}'s turn ({current:?} to move)")]
    NotYourTurn { attempted: Player, current: Player },

    #[error("cell {0} is already occupied")]
    CellOccupied(Coordinate),

    #[error("{player:?} cannot play at {coordinate}: nothing to capture")]
    IllegalMove { coordinate: Coordinate, player: Player },

    #[error("no cell at {0}")]
    NoSuchCoordinate(Coordinate),

    #[error("game is not over")]
    GameNotOver,
}

impl GameError {
    /// Protocol violation by the caller
    pub fn is_usage_error(&self) -> bool {
        !self.is_not_found()
    }

    /// Lookup of a coordinate that is not on the board
    pub fn is_not_found(&self) -> bool {
        matches!(self, GameError::NoSuchCoordinate(_))
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
