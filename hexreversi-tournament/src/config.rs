//! Configuration types for match play
//!
//! Level 4 - Utilities and configuration

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use hexreversi_core::{GameConfig, Strategy};

/// Match configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Chain seated as Dark in the first game
    pub dark: Strategy,
    /// Chain seated as Light in the first game
    pub light: Strategy,
    /// Number of games (should be even when alternating colours)
    pub games: usize,
    /// Swap seats every other game
    pub alternate_colors: bool,
    /// Random legal plies played before the strategies take over
    pub opening_plies: usize,
    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,
    /// Whether to run games in parallel
    pub parallel: bool,
    /// Board and stalemate settings for every game
    pub game: GameConfig,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            dark: Strategy::capture_most(),
            light: Strategy::capture_most(),
            games: 10,
            alternate_colors: true,
            opening_plies: 0,
            seed: None,
            parallel: true,
            game: GameConfig::default(),
        }
    }
}

impl MatchConfig {
    /// Create config for two chains with default settings
    pub fn new(dark: Strategy, light: Strategy) -> Self {
        Self {
            dark,
            light,
            ..Default::default()
        }
    }

    /// Load a match description from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read match config: {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse match config: {}", path.display()))?;
        Ok(config)
    }

    pub fn with_games(mut self, games: usize) -> Self {
        self.games = games;
        self
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_opening_plies(mut self, plies: usize) -> Self {
        self.opening_plies = plies;
        self
    }

    pub fn with_game(mut self, game: GameConfig) -> Self {
        self.game = game;
        self
    }

    /// Keep the same seats for every game
    pub fn without_alternation(mut self) -> Self {
        self.alternate_colors = false;
        self
    }

    /// Play games one after another
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}
