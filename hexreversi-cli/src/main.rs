//! HEXREVERSI CLI - Command-line interface
//!
//! Commands:
//! - render: Print the opening board
//! - play: Play a single game (computer or human seats)
//! - match: Play a strategy match

mod match_cmd;
mod play_cmd;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hexreversi_core::{render, GameConfig, GameEngine};

#[derive(Parser)]
#[command(name = "hexreversi")]
#[command(about = "Reversi on a hexagonal board")]
struct Cli {
    /// Random seed for reproducible openings
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Log every move and pass
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the opening position
    Render {
        #[arg(long, default_value = "4")]
        size: usize,
    },
    /// Play a single game
    Play(play_cmd::PlayArgs),
    /// Play a match between two strategy chains
    Match(match_cmd::MatchArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Render { size } => {
            let text = render_opening(size)?;
            print!("{}", text);
            Ok(())
        }
        Commands::Play(args) => play_cmd::run(args, cli.seed),
        Commands::Match(args) => match_cmd::run(args, cli.seed),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn render_opening(size: usize) -> anyhow::Result<String> {
    let mut engine = GameEngine::with_config(GameConfig::default().with_side_length(size))
        .with_context(|| format!("Cannot build a board of side {}", size))?;
    engine.start()?;
    Ok(render(engine.board()?))
}
