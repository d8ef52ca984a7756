//! Game engine: turn order, move validation, disc flips and game end

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Cell, CellId, CellStatus, Coordinate};
use crate::error::{GameError, Result};

// ============================================================================
// CORE TYPES
// ============================================================================

/// Player colour
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    Dark = 0,
    Light = 1,
}

impl Player {
    pub const ALL: [Player; 2] = [Player::Dark, Player::Light];

    pub fn opponent(self) -> Self {
        match self {
            Player::Dark => Player::Light,
            Player::Light => Player::Dark,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Dark => f.write_str("Dark"),
            Player::Light => f.write_str("Light"),
        }
    }
}

/// Result of a finished game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Winner(Player),
    Tie,
}

impl Outcome {
    pub fn winner(self) -> Option<Player> {
        match self {
            Outcome::Winner(p) => Some(p),
            Outcome::Tie => None,
        }
    }
}

/// Why the game ended (or, for `NoValidMoves`, why it could)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    TwoPasses,
    BoardFull,
    NoValidMoves,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndReason::TwoPasses => f.write_str("two passes in a row"),
            EndReason::BoardFull => f.write_str("all cells filled"),
            EndReason::NoValidMoves => f.write_str("no more valid moves"),
        }
    }
}

/// What happens when a stalemate is detected but neither passes nor a full
/// board have ended the game
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StalemateRule {
    /// Report `EndReason::NoValidMoves` but keep the game running
    #[default]
    RecordOnly,
    /// Over as soon as the player to move has no legal placement
    CurrentPlayerBlocked,
    /// Over when neither colour has a legal placement
    BothPlayersBlocked,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown stalemate rule '{0}' (expected record-only, current-player-blocked or both-players-blocked)")]
pub struct UnknownStalemateRule(pub String);

impl FromStr for StalemateRule {
    type Err = UnknownStalemateRule;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "record-only" => Ok(StalemateRule::RecordOnly),
            "current-player-blocked" => Ok(StalemateRule::CurrentPlayerBlocked),
            "both-players-blocked" => Ok(StalemateRule::BothPlayersBlocked),
            other => Err(UnknownStalemateRule(other.to_string())),
        }
    }
}

/// Engine configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub side_length: usize,
    pub stalemate: StalemateRule,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            side_length: 4,
            stalemate: StalemateRule::RecordOnly,
        }
    }
}

impl GameConfig {
    pub fn with_side_length(mut self, side_length: usize) -> Self {
        self.side_length = side_length;
        self
    }

    pub fn with_stalemate(mut self, stalemate: StalemateRule) -> Self {
        self.stalemate = stalemate;
        self
    }
}

/// Outcome of a dry-run probe
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Probe {
    pub legal: bool,
    /// Discs that would flip if the move were committed
    pub flips: usize,
}

/// Receives turn transitions for one colour.
///
/// Called synchronously from inside `commit_move` and `pass`; listeners get
/// no engine access, so they cannot re-enter it.
pub trait TurnListener: Send {
    fn on_turn_begin(&mut self, player: Player);
    fn on_turn_end(&mut self, player: Player);
}

// ============================================================================
// GAME ENGINE
// ============================================================================

/// Rules engine owning the board and the turn state
pub struct GameEngine {
    board: Board,
    config: GameConfig,
    started: bool,
    current_turn: Player,
    consecutive_passes: u32,
    last_move_flips: usize,
    listeners: [Option<Box<dyn TurnListener>>; 2],
}

impl fmt::Debug for GameEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameEngine")
            .field("config", &self.config)
            .field("started", &self.started)
            .field("current_turn", &self.current_turn)
            .field("consecutive_passes", &self.consecutive_passes)
            .field("last_move_flips", &self.last_move_flips)
            .finish_non_exhaustive()
    }
}

impl GameEngine {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Engine with a blank board of the given side length
    pub fn new(side_length: usize) -> Result<Self> {
        Self::with_config(GameConfig::default().with_side_length(side_length))
    }

    pub fn with_config(config: GameConfig) -> Result<Self> {
        Ok(Self {
            board: Board::new(config.side_length)?,
            config,
            started: false,
            current_turn: Player::Light,
            consecutive_passes: 0,
            last_move_flips: 0,
            listeners: [None, None],
        })
    }

    /// Register the turn listener for one colour, replacing any previous one
    pub fn listen_for_turn(&mut self, player: Player, listener: Box<dyn TurnListener>) {
        self.listeners[player.index()] = Some(listener);
    }

    /// Seed the opening discs and hand the first turn to Light
    pub fn start(&mut self) -> Result<()> {
        if self.started {
            return Err(GameError::AlreadyStarted);
        }
        self.board.seed_opening()?;
        self.started = true;
        self.current_turn = Player::Light;
        self.consecutive_passes = 0;
        tracing::debug!(side_length = self.board.side_length(), "game started");
        Ok(())
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn side_length(&self) -> usize {
        self.board.side_length()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Read-only view of the board
    pub fn board(&self) -> Result<&Board> {
        self.ensure_started()?;
        Ok(&self.board)
    }

    pub fn whose_turn(&self) -> Result<Player> {
        self.ensure_started()?;
        Ok(self.current_turn)
    }

    pub fn cell_at(&self, coordinate: Coordinate) -> Result<&Cell> {
        self.ensure_started()?;
        self.board.cell_at(coordinate)
    }

    pub fn corners(&self) -> [Coordinate; 6] {
        self.board.corners()
    }

    /// Flips made by the most recently committed move
    pub fn last_move_flip_count(&self) -> Result<usize> {
        self.ensure_started()?;
        Ok(self.last_move_flips)
    }

    pub fn consecutive_passes(&self) -> Result<u32> {
        self.ensure_started()?;
        Ok(self.consecutive_passes)
    }

    /// Number of discs of the given colour, recounted on every call
    pub fn score(&self, player: Player) -> Result<usize> {
        self.ensure_started()?;
        Ok(self.board.count(player.into()))
    }

    // ========================================================================
    // MOVE EVALUATION
    // ========================================================================

    /// Legality and would-be flip count of a placement, without mutating anything
    pub fn evaluate_dry_run(&self, coordinate: Coordinate, player: Player) -> Result<Probe> {
        self.ensure_started()?;
        let target = self.board.find(coordinate)?;
        if !self.board.cell(target).status().is_blank() {
            return Ok(Probe::default());
        }
        let runs = self.capturable_runs(target, player);
        Ok(Probe {
            legal: !runs.is_empty(),
            flips: runs.len(),
        })
    }

    /// Every coordinate `player` could legally play, in row-major order
    pub fn legal_moves(&self, player: Player) -> Result<Vec<Coordinate>> {
        self.ensure_started()?;
        Ok(self
            .board
            .cells()
            .filter(|cell| cell.status().is_blank())
            .map(|cell| cell.coordinate())
            .filter(|&c| self.is_legal(c, player))
            .collect())
    }

    pub fn has_legal_move(&self, player: Player) -> Result<bool> {
        self.ensure_started()?;
        Ok(self
            .board
            .cells()
            .any(|cell| cell.status().is_blank() && self.is_legal(cell.coordinate(), player)))
    }

    fn is_legal(&self, coordinate: Coordinate, player: Player) -> bool {
        self.board
            .find(coordinate)
            .map(|id| !self.capturable_runs(id, player).is_empty())
            .unwrap_or(false)
    }

    /// Opponent discs bracketed by `player` along the target's three lines.
    ///
    /// A run is the open interval between the target and a same-coloured
    /// disc at least two slots away; it counts only if every cell in it
    /// belongs to the opponent.
    fn capturable_runs(&self, target: CellId, player: Player) -> Vec<CellId> {
        let mover = CellStatus::from(player);
        let opponent = CellStatus::from(player.opponent());
        let mut captured = Vec::new();

        for slot in self.board.cell(target).lines() {
            let line = self.board.line(slot.line);
            let here = slot.slot;

            for (there, &anchor) in line.iter().enumerate() {
                if self.board.cell(anchor).status() != mover || here.abs_diff(there) <= 1 {
                    continue;
                }
                let between = &line[here.min(there) + 1..here.max(there)];
                if between.iter().all(|&id| self.board.cell(id).status() == opponent) {
                    captured.extend_from_slice(between);
                }
            }
        }

        captured
    }

    // ========================================================================
    // COMMANDS
    // ========================================================================

    /// Place a disc for `player`, flipping every bracketed run.
    ///
    /// Returns the number of flipped discs. Fails without touching the board
    /// if it is not `player`'s turn, the cell is taken, or nothing would flip.
    pub fn commit_move(&mut self, coordinate: Coordinate, player: Player) -> Result<usize> {
        self.ensure_started()?;
        self.ensure_turn(player)?;

        let target = self.board.find(coordinate)?;
        if !self.board.cell(target).status().is_blank() {
            return Err(GameError::CellOccupied(coordinate));
        }

        let captured = self.capturable_runs(target, player);
        if captured.is_empty() {
            return Err(GameError::IllegalMove { coordinate, player });
        }

        let status = CellStatus::from(player);
        for &id in &captured {
            self.board.set_status(id, status);
        }
        self.board.set_status(target, status);
        self.last_move_flips = captured.len();
        self.consecutive_passes = 0;

        tracing::debug!(%player, %coordinate, flips = captured.len(), "move committed");
        self.switch_turn();
        Ok(captured.len())
    }

    /// Give up the turn
    pub fn pass(&mut self, player: Player) -> Result<()> {
        self.ensure_started()?;
        self.ensure_turn(player)?;

        self.consecutive_passes += 1;
        tracing::debug!(%player, passes = self.consecutive_passes, "turn passed");
        self.switch_turn();
        Ok(())
    }

    fn switch_turn(&mut self) {
        let outgoing = self.current_turn;
        let incoming = outgoing.opponent();
        self.current_turn = incoming;

        if let Some(listener) = self.listeners[incoming.index()].as_mut() {
            listener.on_turn_begin(incoming);
        }
        if let Some(listener) = self.listeners[outgoing.index()].as_mut() {
            listener.on_turn_end(outgoing);
        }
    }

    // ========================================================================
    // GAME END
    // ========================================================================

    /// First applicable end condition, if any.
    ///
    /// `NoValidMoves` is reported whenever the player to move is blocked,
    /// even if the configured [`StalemateRule`] keeps the game running.
    pub fn end_reason(&self) -> Result<Option<EndReason>> {
        self.ensure_started()?;
        if self.consecutive_passes >= 2 {
            return Ok(Some(EndReason::TwoPasses));
        }
        if self.board.is_full() {
            return Ok(Some(EndReason::BoardFull));
        }
        if !self.has_legal_move(self.current_turn)? {
            return Ok(Some(EndReason::NoValidMoves));
        }
        Ok(None)
    }

    pub fn is_over(&self) -> Result<bool> {
        match self.end_reason()? {
            Some(EndReason::TwoPasses) | Some(EndReason::BoardFull) => Ok(true),
            Some(EndReason::NoValidMoves) => match self.config.stalemate {
                StalemateRule::RecordOnly => Ok(false),
                StalemateRule::CurrentPlayerBlocked => Ok(true),
                StalemateRule::BothPlayersBlocked => {
                    Ok(!self.has_legal_move(self.current_turn.opponent())?)
                }
            },
            None => Ok(false),
        }
    }

    /// Higher disc count wins; only valid once the game is over
    pub fn winner(&self) -> Result<Outcome> {
        if !self.is_over()? {
            return Err(GameError::GameNotOver);
        }
        let dark = self.score(Player::Dark)?;
        let light = self.score(Player::Light)?;
        Ok(match dark.cmp(&light) {
            std::cmp::Ordering::Greater => Outcome::Winner(Player::Dark),
            std::cmp::Ordering::Less => Outcome::Winner(Player::Light),
            std::cmp::Ordering::Equal => Outcome::Tie,
        })
    }

    // ========================================================================
    // PRECONDITIONS
    // ========================================================================

    fn ensure_started(&self) -> Result<()> {
        if self.started {
            Ok(())
        } else {
            Err(GameError::NotStarted)
        }
    }

    fn ensure_turn(&self, player: Player) -> Result<()> {
        if player == self.current_turn {
            Ok(())
        } else {
            Err(GameError::NotYourTurn {
                attempted: player,
                current: self.current_turn,
            })
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
