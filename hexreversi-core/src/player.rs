//! Player adapters: one decision per turn, from a strategy or from outside

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::board::Coordinate;
use crate::error::{GameError, Result};
use crate::game::Player;
use crate::strategy::Strategy;
use crate::view::ReversiView;

/// What a player does with its turn
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    Place(Coordinate),
    Pass,
}

impl From<Option<Coordinate>> for Decision {
    fn from(choice: Option<Coordinate>) -> Self {
        match choice {
            Some(coordinate) => Decision::Place(coordinate),
            None => Decision::Pass,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Place(c) => write!(f, "place {}", c),
            Decision::Pass => f.write_str("pass"),
        }
    }
}

/// Supplies coordinates picked outside the engine (a person at a terminal,
/// a network peer, a test script).
///
/// `None` means the source chose to pass.
pub trait MoveSource: Send {
    fn next_coordinate(&mut self, view: &dyn ReversiView, player: Player) -> Option<Coordinate>;
}

/// Pre-recorded choices, handed out in order; passes once exhausted
#[derive(Clone, Debug, Default)]
pub struct ScriptedSource {
    choices: VecDeque<Option<Coordinate>>,
}

impl ScriptedSource {
    pub fn new(choices: impl IntoIterator<Item = Option<Coordinate>>) -> Self {
        Self {
            choices: choices.into_iter().collect(),
        }
    }
}

impl MoveSource for ScriptedSource {
    fn next_coordinate(&mut self, _view: &dyn ReversiView, _player: Player) -> Option<Coordinate> {
        self.choices.pop_front().flatten()
    }
}

/// One input shared by several seats, so that a single terminal or peer
/// can answer for both colours in turn. Each call holds the lock for one
/// decision only.
pub struct SharedSource<S>(Arc<Mutex<S>>);

impl<S> SharedSource<S> {
    pub fn new(source: S) -> Self {
        Self(Arc::new(Mutex::new(source)))
    }
}

impl<S> Clone for SharedSource<S> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<S: MoveSource> MoveSource for SharedSource<S> {
    fn next_coordinate(&mut self, view: &dyn ReversiView, player: Player) -> Option<Coordinate> {
        // A panic in another seat leaves the input itself usable
        let mut source = match self.0.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        source.next_coordinate(view, player)
    }
}

/// A seat at the table
pub enum PlayerAdapter {
    /// Computer player driven by a strategy chain
    Automated { player: Player, strategy: Strategy },
    /// Decisions confirmed outside the engine
    External {
        player: Player,
        source: Box<dyn MoveSource>,
    },
}

impl fmt::Debug for PlayerAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerAdapter::Automated { player, strategy } => f
                .debug_struct("Automated")
                .field("player", player)
                .field("strategy", strategy)
                .finish(),
            PlayerAdapter::External { player, .. } => f
                .debug_struct("External")
                .field("player", player)
                .finish_non_exhaustive(),
        }
    }
}

impl PlayerAdapter {
    pub fn automated(player: Player, strategy: Strategy) -> Self {
        PlayerAdapter::Automated { player, strategy }
    }

    pub fn external(player: Player, source: impl MoveSource + 'static) -> Self {
        PlayerAdapter::External {
            player,
            source: Box::new(source),
        }
    }

    pub fn player(&self) -> Player {
        match self {
            PlayerAdapter::Automated { player, .. } | PlayerAdapter::External { player, .. } => {
                *player
            }
        }
    }

    /// Short label for reports
    pub fn label(&self) -> String {
        match self {
            PlayerAdapter::Automated { strategy, .. } => strategy.to_string(),
            PlayerAdapter::External { .. } => "external".to_string(),
        }
    }

    /// Decide this turn's action.
    ///
    /// An external coordinate that is off the board or not a legal placement
    /// turns into a pass; it is never forwarded to the engine.
    pub fn decide(&mut self, view: &dyn ReversiView) -> Result<Decision> {
        match self {
            PlayerAdapter::Automated { player, strategy } => {
                Ok(strategy.choose(view, *player)?.into())
            }
            PlayerAdapter::External { player, source } => {
                let Some(coordinate) = source.next_coordinate(view, *player) else {
                    return Ok(Decision::Pass);
                };
                match view.evaluate_dry_run(coordinate, *player) {
                    Ok(probe) if probe.legal => Ok(Decision::Place(coordinate)),
                    Ok(_) => {
                        tracing::warn!(%player, %coordinate, "rejected illegal move, passing");
                        Ok(Decision::Pass)
                    }
                    Err(GameError::NoSuchCoordinate(_)) => {
                        tracing::warn!(%player, %coordinate, "rejected move off the board, passing");
                        Ok(Decision::Pass)
                    }
                    Err(e) => Err(e),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameEngine;

    fn started() -> GameEngine {
        let mut engine = GameEngine::new(4).unwrap();
        engine.start().unwrap();
        engine
    }

    #[test]
    fn test_automated_uses_strategy() {
        let engine = started();
        let mut adapter = PlayerAdapter::automated(Player::Light, Strategy::capture_most());
        let expected = Strategy::capture_most().choose(&engine, Player::Light).unwrap();
        assert_eq!(adapter.decide(&engine).unwrap(), Decision::from(expected));
        assert_eq!(adapter.player(), Player::Light);
        assert_eq!(adapter.label(), "capture-most");
    }

    #[test]
    fn test_automated_passes_when_blocked() {
        let mut engine = GameEngine::new(2).unwrap();
        engine.start().unwrap();
        let mut adapter = PlayerAdapter::automated(Player::Light, Strategy::capture_most());
        assert_eq!(adapter.decide(&engine).unwrap(), Decision::Pass);
    }

    #[test]
    fn test_external_legal_coordinate() {
        let engine = started();
        let nw = Coordinate::new(-1, -1);
        let mut adapter = PlayerAdapter::external(Player::Light, ScriptedSource::new([Some(nw)]));
        assert_eq!(adapter.decide(&engine).unwrap(), Decision::Place(nw));
    }

    #[test]
    fn test_external_rejections_become_passes() {
        let engine = started();
        let source = ScriptedSource::new([
            None,
            Some(Coordinate::new(0, 0)),  // brackets nothing
            Some(Coordinate::new(0, -1)), // occupied
            Some(Coordinate::new(9, 9)),  // off the board
        ]);
        let mut adapter = PlayerAdapter::external(Player::Light, source);
        for _ in 0..4 {
            assert_eq!(adapter.decide(&engine).unwrap(), Decision::Pass);
        }
        // Exhausted script keeps passing
        assert_eq!(adapter.decide(&engine).unwrap(), Decision::Pass);
    }

    #[test]
    fn test_external_before_start_is_an_error() {
        let engine = GameEngine::new(4).unwrap();
        let mut adapter = PlayerAdapter::external(
            Player::Light,
            ScriptedSource::new([Some(Coordinate::new(-1, -1))]),
        );
        assert_eq!(adapter.decide(&engine), Err(GameError::NotStarted));
    }

    #[test]
    fn test_shared_source_answers_both_seats_in_order() {
        let mut engine = started();
        let shared = SharedSource::new(ScriptedSource::new([
            Some(Coordinate::new(-1, -1)),
            Some(Coordinate::new(1, -2)),
        ]));
        let mut light = PlayerAdapter::external(Player::Light, shared.clone());
        let mut dark = PlayerAdapter::external(Player::Dark, shared);

        let first = light.decide(&engine).unwrap();
        assert_eq!(first, Decision::Place(Coordinate::new(-1, -1)));
        engine.commit_move(Coordinate::new(-1, -1), Player::Light).unwrap();

        assert_eq!(
            dark.decide(&engine).unwrap(),
            Decision::Place(Coordinate::new(1, -2))
        );
        // Script is spent for both seats
        assert_eq!(light.decide(&engine).unwrap(), Decision::Pass);
    }

    #[test]
    fn test_decision_display() {
        assert_eq!(Decision::Place(Coordinate::new(1, -2)).to_string(), "place (1, -2, 1)");
        assert_eq!(Decision::Pass.to_string(), "pass");
    }
}
