//! Match play - multiple games between two strategy chains
//!
//! Level 2 - Phase-level implementation

use rayon::prelude::*;
use serde::Serialize;

use hexreversi_core::{Outcome, Player, PlayerAdapter, Result, Strategy};

use crate::config::MatchConfig;
use crate::game_runner::{GameRecord, GameRunner};

/// Result of a match (multiple games)
///
/// "Dark chain" and "light chain" name the chains by their seat in the
/// first game; wins are credited to the chain, whatever colour it held.
#[derive(Clone, Debug, Serialize)]
pub struct MatchResult {
    /// Wins for the chain configured as `dark`
    pub dark_chain_wins: u32,
    /// Wins for the chain configured as `light`
    pub light_chain_wins: u32,
    /// Games with equal disc counts
    pub ties: u32,
    /// Average of (dark chain discs - light chain discs)
    pub avg_margin: f32,
    /// Total games played
    pub games_played: u32,
    /// Individual game records
    pub games: Vec<GameRecord>,
}

impl MatchResult {
    /// Create empty result
    pub fn empty() -> Self {
        Self {
            dark_chain_wins: 0,
            light_chain_wins: 0,
            ties: 0,
            avg_margin: 0.0,
            games_played: 0,
            games: Vec::new(),
        }
    }

    /// Get win rate for the dark chain
    pub fn dark_chain_win_rate(&self) -> f32 {
        rate(self.dark_chain_wins, self.games_played)
    }

    /// Get win rate for the light chain
    pub fn light_chain_win_rate(&self) -> f32 {
        rate(self.light_chain_wins, self.games_played)
    }

    pub fn tie_rate(&self) -> f32 {
        rate(self.ties, self.games_played)
    }
}

fn rate(count: u32, total: u32) -> f32 {
    if total == 0 {
        0.0
    } else {
        count as f32 / total as f32
    }
}

/// Play a match between two strategy chains (Level 2 phase)
///
/// Plays `config.games` games, swapping seats every other game when
/// alternation is on, in parallel when `config.parallel` is set.
pub fn play_match(config: &MatchConfig) -> Result<MatchResult> {
    if config.games == 0 {
        return Ok(MatchResult::empty());
    }

    tracing::info!(
        dark = %config.dark,
        light = %config.light,
        games = config.games,
        parallel = config.parallel,
        "match started"
    );

    let game_configs = prepare_game_configs(config.games, config.alternate_colors);
    let results = if config.parallel {
        execute_games_parallel(config, &game_configs)?
    } else {
        execute_games(config, &game_configs)?
    };
    Ok(aggregate_results(results))
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

/// Seating for a single game in a match
#[derive(Clone, Copy, Debug)]
struct Seating {
    /// The configured dark chain plays Dark this game
    dark_chain_is_dark: bool,
    /// Game index (for seeding)
    game_index: usize,
}

/// Prepare game seatings for a match
fn prepare_game_configs(games: usize, alternate: bool) -> Vec<Seating> {
    (0..games)
        .map(|i| Seating {
            dark_chain_is_dark: !alternate || i % 2 == 0,
            game_index: i,
        })
        .collect()
}

/// Execute games sequentially
fn execute_games(config: &MatchConfig, seatings: &[Seating]) -> Result<Vec<RecordWithContext>> {
    seatings
        .iter()
        .map(|seating| play_single_game(config, seating))
        .collect()
}

/// Execute games in parallel using rayon
fn execute_games_parallel(
    config: &MatchConfig,
    seatings: &[Seating],
) -> Result<Vec<RecordWithContext>> {
    seatings
        .par_iter()
        .map(|seating| play_single_game(config, seating))
        .collect()
}

/// Record with context about which chain sat where
#[derive(Clone)]
struct RecordWithContext {
    record: GameRecord,
    dark_chain_was_dark: bool,
}

/// Play a single game with the given seating
fn play_single_game(config: &MatchConfig, seating: &Seating) -> Result<RecordWithContext> {
    let (dark_strategy, light_strategy): (&Strategy, &Strategy) = if seating.dark_chain_is_dark {
        (&config.dark, &config.light)
    } else {
        (&config.light, &config.dark)
    };
    let mut dark = PlayerAdapter::automated(Player::Dark, dark_strategy.clone());
    let mut light = PlayerAdapter::automated(Player::Light, light_strategy.clone());

    let seed = config
        .seed
        .map(|s| s.wrapping_add(seating.game_index as u64));
    let mut runner = GameRunner::new(config.game).with_opening(config.opening_plies, seed);
    let record = runner.play_game(&mut dark, &mut light)?;

    tracing::info!(
        game = seating.game_index + 1,
        outcome = ?record.outcome,
        dark = record.dark_score,
        light = record.light_score,
        "game recorded"
    );

    Ok(RecordWithContext {
        record,
        dark_chain_was_dark: seating.dark_chain_is_dark,
    })
}

/// Aggregate game records into a match result
fn aggregate_results(records: Vec<RecordWithContext>) -> MatchResult {
    let mut dark_chain_wins = 0u32;
    let mut light_chain_wins = 0u32;
    let mut ties = 0u32;
    let mut total_margin = 0i64;
    let mut games = Vec::with_capacity(records.len());

    for rwc in records {
        // Margin and wins from the dark chain's point of view
        let margin = rwc.record.margin();
        total_margin += if rwc.dark_chain_was_dark { margin } else { -margin };

        match rwc.record.outcome {
            Outcome::Winner(Player::Dark) if rwc.dark_chain_was_dark => dark_chain_wins += 1,
            Outcome::Winner(Player::Light) if !rwc.dark_chain_was_dark => dark_chain_wins += 1,
            Outcome::Winner(_) => light_chain_wins += 1,
            Outcome::Tie => ties += 1,
        }

        games.push(rwc.record);
    }

    let games_played = games.len() as u32;
    let avg_margin = if games_played > 0 {
        total_margin as f32 / games_played as f32
    } else {
        0.0
    };

    MatchResult {
        dark_chain_wins,
        light_chain_wins,
        ties,
        avg_margin,
        games_played,
        games,
    }
}
