//! Play command - one game in the terminal
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_seat(), report_game()
//! - Level 3: TerminalSource (human input), Announcer (turn log)
//! - Level 4: input parsing

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Args;

use hexreversi_core::{
    render, Coordinate, GameConfig, GameEngine, MoveSource, Player, PlayerAdapter, ReversiView,
    SharedSource, StalemateRule, Strategy, TextView, TurnListener,
};
use hexreversi_tournament::{GameRecord, GameRunner};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Dark seat: human, capture-most, play-to-corner or avoid-corner
    #[arg(long, default_value = "capture-most")]
    pub dark: String,

    /// Light seat: human, capture-most, play-to-corner or avoid-corner
    #[arg(long, default_value = "human")]
    pub light: String,

    /// Board side length
    #[arg(long, default_value = "4")]
    pub size: usize,

    /// Random legal plies before the seats take over
    #[arg(long, default_value = "0")]
    pub opening_plies: usize,

    /// record-only, current-player-blocked or both-players-blocked
    #[arg(long, default_value = "record-only")]
    pub stalemate: StalemateRule,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    // Both human seats read the same stdin
    let terminal = SharedSource::new(TerminalSource::new(
        io::BufReader::new(io::stdin()),
        io::stdout(),
    ));
    let mut dark = build_seat(&args.dark, Player::Dark, &terminal)?;
    let mut light = build_seat(&args.light, Player::Light, &terminal)?;

    let config = GameConfig::default()
        .with_side_length(args.size)
        .with_stalemate(args.stalemate);
    let mut engine = GameEngine::with_config(config)
        .with_context(|| format!("Cannot build a board of side {}", args.size))?;
    for player in Player::ALL {
        engine.listen_for_turn(player, Box::new(Announcer));
    }

    let mut runner = GameRunner::new(config).with_opening(args.opening_plies, seed);
    let record = runner
        .play_on(&mut engine, &mut dark, &mut light)
        .context("Game aborted")?;

    print!("{}", report_game(&engine, &record)?);
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Seat from its command-line name; human seats take a handle on `terminal`
fn build_seat<S>(kind: &str, player: Player, terminal: &SharedSource<S>) -> Result<PlayerAdapter>
where
    S: MoveSource + 'static,
{
    if kind == "human" {
        return Ok(PlayerAdapter::external(player, terminal.clone()));
    }
    let strategy: Strategy = kind
        .parse()
        .with_context(|| format!("Invalid {} seat", player))?;
    Ok(PlayerAdapter::automated(player, strategy))
}

/// Final board and result
fn report_game(engine: &GameEngine, record: &GameRecord) -> Result<String> {
    let mut out = String::new();
    out.push('\n');
    out.push_str(&render(engine.board()?));
    out.push_str(&format!(
        "\nDark ({}): {}\nLight ({}): {}\n",
        record.dark, record.dark_score, record.light, record.light_score
    ));
    match record.winner() {
        Some(player) => out.push_str(&format!("{} wins", player)),
        None => out.push_str("Tie"),
    }
    if let Some(reason) = record.end_reason {
        out.push_str(&format!(" ({})", reason));
    }
    out.push('\n');
    Ok(out)
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Logs each turn change
struct Announcer;

impl TurnListener for Announcer {
    fn on_turn_begin(&mut self, player: Player) {
        tracing::info!("{} to move", player);
    }

    fn on_turn_end(&mut self, player: Player) {
        tracing::debug!("{} done", player);
    }
}

/// Reads coordinates typed at a terminal.
///
/// Shows the board, then prompts until it gets a legal placement or a pass.
/// End of input counts as a pass.
pub struct TerminalSource<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalSource<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn prompt(&mut self, view: &dyn ReversiView, player: Player) -> io::Result<Option<Coordinate>> {
        if let Ok(board) = view.board() {
            write!(self.output, "\n{}", TextView(board))?;
        }
        loop {
            write!(self.output, "{} to move (q r, or pass): ", player)?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            match parse_input(&line) {
                Some(Input::Pass) => return Ok(None),
                Some(Input::Place(coordinate)) => match view.evaluate_dry_run(coordinate, player) {
                    Ok(probe) if probe.legal => return Ok(Some(coordinate)),
                    Ok(_) => writeln!(self.output, "{} is not a legal move", coordinate)?,
                    Err(e) => writeln!(self.output, "{}", e)?,
                },
                None => writeln!(self.output, "Expected two integers \"q r\" or \"pass\"")?,
            }
        }
    }
}

impl<R, W> MoveSource for TerminalSource<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    fn next_coordinate(&mut self, view: &dyn ReversiView, player: Player) -> Option<Coordinate> {
        match self.prompt(view, player) {
            Ok(choice) => choice,
            Err(e) => {
                tracing::warn!("terminal input failed, passing: {}", e);
                None
            }
        }
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Place(Coordinate),
    Pass,
}

/// "q r", "q,r" or "pass"
fn parse_input(line: &str) -> Option<Input> {
    let line = line.trim();
    if line.eq_ignore_ascii_case("pass") {
        return Some(Input::Pass);
    }
    let mut parts = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty());
    let q = parts.next()?.parse().ok()?;
    let r = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Input::Place(Coordinate::new(q, r)))
}

// ============================================================================
// TESTS
// ============================================================================
