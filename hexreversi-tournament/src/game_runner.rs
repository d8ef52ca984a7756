//! Game runner - drives a single game between two seats
//!
//! Level 3 - Step-level implementation

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use hexreversi_core::{
    Decision, EndReason, GameConfig, GameEngine, GameError, Outcome, Player, PlayerAdapter, Result,
};

/// One ply of a finished game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Turn {
    pub player: Player,
    pub decision: Decision,
    /// Discs flipped by the placement (0 for a pass)
    pub flips: usize,
    /// Played at random during the opening
    pub opening: bool,
}

/// Everything worth keeping about a finished game
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameRecord {
    /// Label of the seat that played Dark
    pub dark: String,
    /// Label of the seat that played Light
    pub light: String,
    pub turns: Vec<Turn>,
    pub dark_score: usize,
    pub light_score: usize,
    pub outcome: Outcome,
    pub end_reason: Option<EndReason>,
}

impl GameRecord {
    /// Get winner (None for a tie)
    pub fn winner(&self) -> Option<Player> {
        self.outcome.winner()
    }

    /// Dark discs minus Light discs
    pub fn margin(&self) -> i64 {
        self.dark_score as i64 - self.light_score as i64
    }
}

/// Game runner that alternates two seats until the engine reports the end
pub struct GameRunner {
    /// Board and stalemate settings
    config: GameConfig,
    /// Random plies played before the seats take over
    opening_plies: usize,
    rng: ChaCha8Rng,
}

impl GameRunner {
    /// Create a new game runner without a random opening
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            opening_plies: 0,
            rng: create_rng(None),
        }
    }

    /// Play `plies` uniformly random legal moves first, drawn from `seed`
    pub fn with_opening(mut self, plies: usize, seed: Option<u64>) -> Self {
        self.opening_plies = plies;
        self.rng = create_rng(seed);
        self
    }

    /// Play a game on a fresh engine
    pub fn play_game(
        &mut self,
        dark: &mut PlayerAdapter,
        light: &mut PlayerAdapter,
    ) -> Result<GameRecord> {
        let mut engine = GameEngine::with_config(self.config)?;
        self.play_on(&mut engine, dark, light)
    }

    /// Play a game on a prepared engine (listeners attached, started or not)
    pub fn play_on(
        &mut self,
        engine: &mut GameEngine,
        dark: &mut PlayerAdapter,
        light: &mut PlayerAdapter,
    ) -> Result<GameRecord> {
        check_seat(dark, Player::Dark)?;
        check_seat(light, Player::Light)?;
        if !engine.is_started() {
            engine.start()?;
        }

        tracing::info!(dark = %dark.label(), light = %light.label(), "game started");

        let mut turns = Vec::new();
        self.play_opening(engine, &mut turns)?;

        while !engine.is_over()? {
            let player = engine.whose_turn()?;
            let seat = match player {
                Player::Dark => &mut *dark,
                Player::Light => &mut *light,
            };
            let decision = seat.decide(&*engine)?;
            turns.push(apply_decision(engine, player, decision, false)?);
        }

        let record = GameRecord {
            dark: dark.label(),
            light: light.label(),
            turns,
            dark_score: engine.score(Player::Dark)?,
            light_score: engine.score(Player::Light)?,
            outcome: engine.winner()?,
            end_reason: engine.end_reason()?,
        };

        tracing::info!(
            dark = record.dark_score,
            light = record.light_score,
            outcome = ?record.outcome,
            reason = ?record.end_reason,
            "game finished"
        );

        Ok(record)
    }

    /// Random legal plies; a player with none passes
    fn play_opening(&mut self, engine: &mut GameEngine, turns: &mut Vec<Turn>) -> Result<()> {
        for _ in 0..self.opening_plies {
            if engine.is_over()? {
                break;
            }
            let player = engine.whose_turn()?;
            let moves = engine.legal_moves(player)?;
            let decision = Decision::from(moves.choose(&mut self.rng).copied());
            turns.push(apply_decision(engine, player, decision, true)?);
        }
        Ok(())
    }
}

// ============================================================================
// Level 4 - Utilities
// ============================================================================

fn check_seat(seat: &PlayerAdapter, expected: Player) -> Result<()> {
    if seat.player() == expected {
        Ok(())
    } else {
        Err(GameError::NotYourTurn {
            attempted: seat.player(),
            current: expected,
        })
    }
}

/// Forward a decision to the engine's two commands
fn apply_decision(
    engine: &mut GameEngine,
    player: Player,
    decision: Decision,
    opening: bool,
) -> Result<Turn> {
    let flips = match decision {
        Decision::Place(coordinate) => engine.commit_move(coordinate, player)?,
        Decision::Pass => {
            engine.pass(player)?;
            0
        }
    };
    Ok(Turn {
        player,
        decision,
        flips,
        opening,
    })
}

/// Create RNG from seed or random
pub fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexreversi_core::{Coordinate, ScriptedSource, StalemateRule, Strategy};

    fn seats(dark: Strategy, light: Strategy) -> (PlayerAdapter, PlayerAdapter) {
        (
            PlayerAdapter::automated(Player::Dark, dark),
            PlayerAdapter::automated(Player::Light, light),
        )
    }

    #[test]
    fn test_play_game_capture_most() {
        let (mut dark, mut light) = seats(Strategy::capture_most(), Strategy::capture_most());
        let mut runner = GameRunner::new(GameConfig::default());
        let record = runner.play_game(&mut dark, &mut light).unwrap();

        assert!(!record.turns.is_empty());
        assert_eq!(record.turns[0].player, Player::Light);
        assert!(record.end_reason.is_some());
        assert!(record.dark_score + record.light_score <= 37);
        match record.outcome {
            Outcome::Winner(Player::Dark) => assert!(record.margin() > 0),
            Outcome::Winner(Player::Light) => assert!(record.margin() < 0),
            Outcome::Tie => assert_eq!(record.margin(), 0),
        }
    }

    #[test]
    fn test_record_replays_to_same_scores() {
        let (mut dark, mut light) = seats(
            "avoid-corner".parse().unwrap(),
            "play-to-corner".parse().unwrap(),
        );
        let mut runner = GameRunner::new(GameConfig::default()).with_opening(4, Some(11));
        let record = runner.play_game(&mut dark, &mut light).unwrap();

        let mut engine = GameEngine::new(4).unwrap();
        engine.start().unwrap();
        for turn in &record.turns {
            let flips = match turn.decision {
                Decision::Place(c) => engine.commit_move(c, turn.player).unwrap(),
                Decision::Pass => {
                    engine.pass(turn.player).unwrap();
                    0
                }
            };
            assert_eq!(flips, turn.flips);
        }
        assert!(engine.is_over().unwrap());
        assert_eq!(engine.score(Player::Dark).unwrap(), record.dark_score);
        assert_eq!(engine.score(Player::Light).unwrap(), record.light_score);
    }

    #[test]
    fn test_opening_is_seeded() {
        let play = |seed| {
            let (mut dark, mut light) = seats(Strategy::capture_most(), Strategy::capture_most());
            GameRunner::new(GameConfig::default())
                .with_opening(6, Some(seed))
                .play_game(&mut dark, &mut light)
                .unwrap()
        };
        let a = play(3);
        let b = play(3);
        assert_eq!(a, b);
        assert_eq!(a.turns.iter().filter(|t| t.opening).count(), 6);
        assert!(a.turns[..6].iter().all(|t| t.opening));
        assert!(a.turns[6..].iter().all(|t| !t.opening));
    }

    #[test]
    fn test_blocked_board_ends_after_two_passes() {
        let (mut dark, mut light) = seats(Strategy::capture_most(), Strategy::capture_most());
        let mut runner = GameRunner::new(GameConfig::default().with_side_length(2));
        let record = runner.play_game(&mut dark, &mut light).unwrap();

        assert!(record.turns.iter().all(|t| t.decision == Decision::Pass));
        assert_eq!(record.turns.len(), 2);
        assert_eq!(record.end_reason, Some(EndReason::TwoPasses));
        assert_eq!(record.outcome, Outcome::Tie);
        assert_eq!((record.dark_score, record.light_score), (3, 3));
    }

    #[test]
    fn test_blocked_board_with_stalemate_rule() {
        let (mut dark, mut light) = seats(Strategy::capture_most(), Strategy::capture_most());
        let config = GameConfig::default()
            .with_side_length(2)
            .with_stalemate(StalemateRule::CurrentPlayerBlocked);
        let record = GameRunner::new(config).play_game(&mut dark, &mut light).unwrap();

        assert!(record.turns.is_empty());
        assert_eq!(record.end_reason, Some(EndReason::NoValidMoves));
        assert_eq!(record.outcome, Outcome::Tie);
    }

    #[test]
    fn test_external_seat_illegal_input_passes() {
        let mut dark = PlayerAdapter::automated(Player::Dark, Strategy::capture_most());
        let mut light = PlayerAdapter::external(
            Player::Light,
            ScriptedSource::new([Some(Coordinate::new(0, 0)), Some(Coordinate::new(-1, -1))]),
        );
        let record = GameRunner::new(GameConfig::default())
            .play_game(&mut dark, &mut light)
            .unwrap();

        assert_eq!(record.turns[0].decision, Decision::Pass);
        assert_eq!(record.turns[0].player, Player::Light);
        assert_eq!(record.turns[1].player, Player::Dark);
        assert_eq!(record.light, "external");
    }

    #[test]
    fn test_seats_must_match_colours() {
        let (mut dark, mut light) = seats(Strategy::capture_most(), Strategy::capture_most());
        let err = GameRunner::new(GameConfig::default())
            .play_game(&mut light, &mut dark)
            .unwrap_err();
        assert!(err.is_usage_error());
    }

    #[test]
    fn test_create_rng_deterministic() {
        use rand::Rng;
        let mut rng1 = create_rng(Some(42));
        let mut rng2 = create_rng(Some(42));
        assert_eq!(rng1.gen::<u64>(), rng2.gen::<u64>());
    }
}
