//! Move-selection strategies for computer players
//!
//! A strategy is a linear chain: decorators such as [`Strategy::PlayToCorner`]
//! try their own rule first and hand over to their fallback when it finds
//! nothing. Every rule works purely through dry-run probes, so choosing a
//! move never touches the board, and the same position always yields the
//! same choice.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::Coordinate;
use crate::error::Result;
use crate::game::Player;
use crate::view::ReversiView;

/// A strategy chain
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Strategy {
    /// Legal cell with the most flips; the first one scanned wins ties
    CaptureMost,
    /// First legal corner, in corner order
    PlayToCorner {
        #[serde(default)]
        fallback: Option<Box<Strategy>>,
    },
    /// First legal cell that does not touch a corner
    AvoidCornerAdjacent {
        #[serde(default)]
        fallback: Option<Box<Strategy>>,
    },
}

impl Strategy {
    pub fn capture_most() -> Self {
        Strategy::CaptureMost
    }

    pub fn play_to_corner(fallback: Strategy) -> Self {
        Strategy::PlayToCorner {
            fallback: Some(Box::new(fallback)),
        }
    }

    pub fn avoid_corner_adjacent(fallback: Strategy) -> Self {
        Strategy::AvoidCornerAdjacent {
            fallback: Some(Box::new(fallback)),
        }
    }

    /// Pick a coordinate for `player`, or `None` to pass
    pub fn choose(&self, view: &dyn ReversiView, player: Player) -> Result<Option<Coordinate>> {
        match self {
            Strategy::CaptureMost => capture_most(view, player),
            Strategy::PlayToCorner { fallback } => match play_to_corner(view, player)? {
                Some(corner) => Ok(Some(corner)),
                None => choose_fallback(fallback.as_deref(), view, player),
            },
            Strategy::AvoidCornerAdjacent { fallback } => {
                match avoid_corner_adjacent(view, player)? {
                    Some(coordinate) => Ok(Some(coordinate)),
                    None => choose_fallback(fallback.as_deref(), view, player),
                }
            }
        }
    }

    fn rule_name(&self) -> &'static str {
        match self {
            Strategy::CaptureMost => "capture-most",
            Strategy::PlayToCorner { .. } => "play-to-corner",
            Strategy::AvoidCornerAdjacent { .. } => "avoid-corner-adjacent",
        }
    }

    fn fallback(&self) -> Option<&Strategy> {
        match self {
            Strategy::CaptureMost => None,
            Strategy::PlayToCorner { fallback } | Strategy::AvoidCornerAdjacent { fallback } => {
                fallback.as_deref()
            }
        }
    }
}

fn choose_fallback(
    fallback: Option<&Strategy>,
    view: &dyn ReversiView,
    player: Player,
) -> Result<Option<Coordinate>> {
    match fallback {
        Some(next) => next.choose(view, player),
        None => Ok(None),
    }
}

// ============================================================================
// RULES
// ============================================================================

fn capture_most(view: &dyn ReversiView, player: Player) -> Result<Option<Coordinate>> {
    let mut best: Option<(Coordinate, usize)> = None;

    for cell in view.board()?.cells() {
        let coordinate = cell.coordinate();
        let probe = view.evaluate_dry_run(coordinate, player)?;
        if !probe.legal {
            continue;
        }
        let most = best.map_or(0, |(_, flips)| flips);
        if most < probe.flips {
            best = Some((coordinate, probe.flips));
        }
    }

    Ok(best.map(|(coordinate, _)| coordinate))
}

fn play_to_corner(view: &dyn ReversiView, player: Player) -> Result<Option<Coordinate>> {
    for corner in view.corners() {
        if view.evaluate_dry_run(corner, player)?.legal {
            return Ok(Some(corner));
        }
    }
    Ok(None)
}

fn avoid_corner_adjacent(view: &dyn ReversiView, player: Player) -> Result<Option<Coordinate>> {
    let corners = view.corners();

    for cell in view.board()?.cells() {
        let coordinate = cell.coordinate();
        if corners.iter().any(|corner| coordinate.is_adjacent(*corner)) {
            continue;
        }
        if view.evaluate_dry_run(coordinate, player)?.legal {
            return Ok(Some(coordinate));
        }
    }
    Ok(None)
}

// ============================================================================
// NAMES
// ============================================================================

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rule_name())?;
        let mut next = self.fallback();
        while let Some(strategy) = next {
            write!(f, " -> {}", strategy.rule_name())?;
            next = strategy.fallback();
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown strategy '{0}' (expected capture-most, play-to-corner or avoid-corner)")]
pub struct UnknownStrategy(pub String);

/// Preset chains by short name
impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "capture-most" => Ok(Strategy::capture_most()),
            "play-to-corner" => Ok(Strategy::play_to_corner(Strategy::capture_most())),
            "avoid-corner" => Ok(Strategy::avoid_corner_adjacent(Strategy::play_to_corner(
                Strategy::capture_most(),
            ))),
            other => Err(UnknownStrategy(other.to_string())),
        }
    }
}
