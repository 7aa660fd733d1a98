use anyhow::Context;
use game_core::{Config, Params};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Host settings, loadable from a TOML file; any subset may be given
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub tick_interval_ms: u64,
    pub fast_forward: bool, // Start in quiet mode
    pub auto_trainer: bool, // Start with the trainer paddle tracking the ball
    pub tick_limit: Option<u64>,
    pub corpus_path: Option<PathBuf>, // None = keep the corpus in memory only
    pub seed: u64,
    pub game: Config,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: Params::TICK_INTERVALS_MS[0],
            fast_forward: false,
            auto_trainer: true,
            tick_limit: None,
            corpus_path: Some(PathBuf::from("pong.txt")),
            seed: 12345,
            game: Config::default(),
        }
    }
}

impl HostConfig {
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(text).context("Invalid host config")?;
        config.game.validate().context("Invalid game config")?;
        Ok(config)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("Failed to load {}", path.display()))
    }
}
