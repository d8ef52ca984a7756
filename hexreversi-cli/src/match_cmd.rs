//! Match command - play games between two strategy chains
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_config(), play_match(), report_results()
//! - Level 3: hexreversi_tournament game and match steps
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use hexreversi_core::{GameConfig, StalemateRule, Strategy};
use hexreversi_tournament::{play_match, MatchConfig, MatchResult};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// Match description JSON file (flags below are ignored when given)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Chain seated as Dark in the first game
    #[arg(long, default_value = "capture-most")]
    pub dark: Strategy,

    /// Chain seated as Light in the first game
    #[arg(long, default_value = "avoid-corner")]
    pub light: Strategy,

    /// Number of games to play (will alternate colours)
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Board side length
    #[arg(long, default_value = "4")]
    pub size: usize,

    /// Random legal plies before the strategies take over
    #[arg(long, default_value = "0")]
    pub opening_plies: usize,

    /// record-only, current-player-blocked or both-players-blocked
    #[arg(long, default_value = "record-only")]
    pub stalemate: StalemateRule,

    /// Keep the same seats for every game
    #[arg(long)]
    pub no_alternate: bool,

    /// Play games one at a time
    #[arg(long)]
    pub sequential: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
///
/// This function reads like a table of contents:
/// 1. Build the match configuration
/// 2. Play the match (multiple games)
/// 3. Report results
pub fn run(args: MatchArgs, seed: Option<u64>) -> Result<()> {
    let config = build_config(&args, seed)?;

    tracing::info!(
        "Starting match: {} vs {} ({} games, side {})",
        config.dark,
        config.light,
        config.games,
        config.game.side_length
    );

    let results = play_match(&config).context("Match aborted")?;

    report_results(&config, &results, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Load the config file, or assemble one from the flags
fn build_config(args: &MatchArgs, seed: Option<u64>) -> Result<MatchConfig> {
    let mut config = match &args.config {
        Some(path) => MatchConfig::load(path)?,
        None => {
            let game = GameConfig::default()
                .with_side_length(args.size)
                .with_stalemate(args.stalemate);
            let mut config = MatchConfig::new(args.dark.clone(), args.light.clone())
                .with_games(args.games)
                .with_opening_plies(args.opening_plies)
                .with_game(game);
            if args.no_alternate {
                config = config.without_alternation();
            }
            if args.sequential {
                config = config.sequential();
            }
            config
        }
    };

    if let Some(seed) = seed {
        config.seed = Some(seed);
    }
    Ok(config)
}

/// Report match results
fn report_results(config: &MatchConfig, results: &MatchResult, json: bool) -> Result<()> {
    if json {
        let text = json_results(config, results).context("Failed to serialize match results")?;
        println!("{}", text);
    } else {
        print!("{}", text_results(config, results));
    }
    Ok(())
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Results as pretty JSON
fn json_results(config: &MatchConfig, results: &MatchResult) -> serde_json::Result<String> {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        dark: String,
        light: String,
        dark_score: usize,
        light_score: usize,
        winner: Option<String>,
        end_reason: Option<String>,
        plies: usize,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        dark_chain: String,
        light_chain: String,
        total_games: u32,
        dark_chain_wins: u32,
        light_chain_wins: u32,
        ties: u32,
        avg_margin: f32,
        dark_chain_win_rate: f32,
        light_chain_win_rate: f32,
        tie_rate: f32,
        games: Vec<JsonGame>,
    }

    let output = JsonOutput {
        dark_chain: config.dark.to_string(),
        light_chain: config.light.to_string(),
        total_games: results.games_played,
        dark_chain_wins: results.dark_chain_wins,
        light_chain_wins: results.light_chain_wins,
        ties: results.ties,
        avg_margin: results.avg_margin,
        dark_chain_win_rate: results.dark_chain_win_rate(),
        light_chain_win_rate: results.light_chain_win_rate(),
        tie_rate: results.tie_rate(),
        games: results
            .games
            .iter()
            .enumerate()
            .map(|(i, g)| JsonGame {
                game_number: i + 1,
                dark: g.dark.clone(),
                light: g.light.clone(),
                dark_score: g.dark_score,
                light_score: g.light_score,
                winner: g.winner().map(|p| p.to_string()),
                end_reason: g.end_reason.map(|r| r.to_string()),
                plies: g.turns.len(),
            })
            .collect(),
    };

    serde_json::to_string_pretty(&output)
}

/// Results as a text report
fn text_results(config: &MatchConfig, results: &MatchResult) -> String {
    let mut out = String::new();
    out.push_str("\n=== Match Results ===\n");
    out.push_str(&format!("Total games: {}\n", results.games_played));
    out.push_str(&format!(
        "{} wins:  {} ({:.1}%)\n",
        config.dark,
        results.dark_chain_wins,
        results.dark_chain_win_rate() * 100.0
    ));
    out.push_str(&format!(
        "{} wins:  {} ({:.1}%)\n",
        config.light,
        results.light_chain_wins,
        results.light_chain_win_rate() * 100.0
    ));
    out.push_str(&format!(
        "Ties:        {} ({:.1}%)\n",
        results.ties,
        results.tie_rate() * 100.0
    ));
    out.push_str(&format!("Avg margin:  {:+.1}\n", results.avg_margin));

    out.push_str("\nGame details:\n");
    for (i, game) in results.games.iter().enumerate() {
        let outcome = match game.winner() {
            Some(player) => format!("{} wins", player),
            None => "tie".to_string(),
        };
        let reason = game
            .end_reason
            .map(|r| r.to_string())
            .unwrap_or_else(|| "unfinished".to_string());
        out.push_str(&format!(
            "  Game {}: {} {}-{} ({}; {} as Dark)\n",
            i + 1,
            outcome,
            game.dark_score,
            game.light_score,
            reason,
            game.dark
        ));
    }
    out
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> MatchArgs {
        MatchArgs {
            config: None,
            dark: Strategy::capture_most(),
            light: "play-to-corner".parse().unwrap(),
            games: 2,
            size: 3,
            opening_plies: 0,
            stalemate: StalemateRule::RecordOnly,
            no_alternate: false,
            sequential: true,
            json: false,
        }
    }

    #[test]
    fn test_build_config_from_flags() {
        let config = build_config(&args(), Some(9)).unwrap();
        assert_eq!(config.games, 2);
        assert_eq!(config.game.side_length, 3);
        assert_eq!(config.seed, Some(9));
        assert!(config.alternate_colors);
        assert!(!config.parallel);
    }

    #[test]
    fn test_build_config_missing_file() {
        let mut args = args();
        args.config = Some(PathBuf::from("/nonexistent/match.json"));
        assert!(build_config(&args, None).is_err());
    }

    #[test]
    fn test_reports_empty_match() {
        let config = build_config(&args(), None).unwrap();
        let text = text_results(&config, &MatchResult::empty());
        assert!(text.contains("Total games: 0"));
        assert!(text.contains("capture-most wins:  0 (0.0%)"));

        let json: serde_json::Value =
            serde_json::from_str(&json_results(&config, &MatchResult::empty()).unwrap()).unwrap();
        assert_eq!(json["total_games"], 0);
        assert_eq!(json["light_chain"], "play-to-corner -> capture-most");
        assert_eq!(json["tie_rate"], 0.0);

        assert!(report_results(&config, &MatchResult::empty(), true).is_ok());
        assert!(report_results(&config, &MatchResult::empty(), false).is_ok());
    }

    #[test]
    fn test_reports_played_match() {
        let config = build_config(&args(), Some(1)).unwrap();
        let results = play_match(&config).unwrap();

        let text = text_results(&config, &results);
        assert!(text.contains("Total games: 2"));
        assert!(text.contains("Game 2:"));

        let json: serde_json::Value =
            serde_json::from_str(&json_results(&config, &results).unwrap()).unwrap();
        assert_eq!(json["games"].as_array().unwrap().len(), 2);
        assert_eq!(json["games"][1]["dark"], "play-to-corner -> capture-most");
        let rates = ["dark_chain_win_rate", "light_chain_win_rate", "tie_rate"]
            .iter()
            .map(|key| json[key].as_f64().unwrap())
            .sum::<f64>();
        assert!((rates - 1.0).abs() < 1e-6);
    }
}
