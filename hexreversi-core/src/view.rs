//! Read-only surface of the engine, as seen by strategies and input sources

use std::cell::RefCell;

use crate::board::{Board, Cell, Coordinate};
use crate::error::Result;
use crate::game::{GameEngine, Player, Probe};

/// Queries that never mutate the game.
///
/// Strategies and external move sources only ever see a game through this
/// trait, so they cannot commit moves or pass on anyone's behalf.
pub trait ReversiView {
    fn board(&self) -> Result<&Board>;

    fn side_length(&self) -> usize;

    fn cell_at(&self, coordinate: Coordinate) -> Result<&Cell>;

    fn corners(&self) -> [Coordinate; 6];

    fn whose_turn(&self) -> Result<Player>;

    fn score(&self, player: Player) -> Result<usize>;

    fn is_over(&self) -> Result<bool>;

    /// Legality and flip count of a hypothetical placement
    fn evaluate_dry_run(&self, coordinate: Coordinate, player: Player) -> Result<Probe>;
}

impl ReversiView for GameEngine {
    fn board(&self) -> Result<&Board> {
        GameEngine::board(self)
    }

    fn side_length(&self) -> usize {
        GameEngine::side_length(self)
    }

    fn cell_at(&self, coordinate: Coordinate) -> Result<&Cell> {
        GameEngine::cell_at(self, coordinate)
    }

    fn corners(&self) -> [Coordinate; 6] {
        GameEngine::corners(self)
    }

    fn whose_turn(&self) -> Result<Player> {
        GameEngine::whose_turn(self)
    }

    fn score(&self, player: Player) -> Result<usize> {
        GameEngine::score(self, player)
    }

    fn is_over(&self) -> Result<bool> {
        GameEngine::is_over(self)
    }

    fn evaluate_dry_run(&self, coordinate: Coordinate, player: Player) -> Result<Probe> {
        GameEngine::evaluate_dry_run(self, coordinate, player)
    }
}

/// Wraps a view and logs every probed coordinate, in order
pub struct ProbeRecorder<'a> {
    inner: &'a dyn ReversiView,
    transcript: RefCell<Vec<Coordinate>>,
}

impl<'a> ProbeRecorder<'a> {
    pub fn new(inner: &'a dyn ReversiView) -> Self {
        Self {
            inner,
            transcript: RefCell::new(Vec::new()),
        }
    }

    /// Coordinates probed so far
    pub fn transcript(&self) -> Vec<Coordinate> {
        self.transcript.borrow().clone()
    }

    pub fn clear(&self) {
        self.transcript.borrow_mut().clear();
    }
}

impl ReversiView for ProbeRecorder<'_> {
    fn board(&self) -> Result<&Board> {
        self.inner.board()
    }

    fn side_length(&self) -> usize {
        self.inner.side_length()
    }

    fn cell_at(&self, coordinate: Coordinate) -> Result<&Cell> {
        self.inner.cell_at(coordinate)
    }

    fn corners(&self) -> [Coordinate; 6] {
        self.inner.corners()
    }

    fn whose_turn(&self) -> Result<Player> {
        self.inner.whose_turn()
    }

    fn score(&self, player: Player) -> Result<usize> {
        self.inner.score(player)
    }

    fn is_over(&self) -> Result<bool> {
        self.inner.is_over()
    }

    fn evaluate_dry_run(&self, coordinate: Coordinate, player: Player) -> Result<Probe> {
        self.transcript.borrow_mut().push(coordinate);
        self.inner.evaluate_dry_run(coordinate, player)
    }
}
