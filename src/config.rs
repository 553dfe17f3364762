//! Trainer configuration.
//!
//! Settings are read from `chess_trainer.json` in the working directory when
//! present; a missing or malformed file falls back to the defaults below. The
//! `STOCKFISH_PATH` environment variable overrides the engine path either way.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

/// Name of the optional settings file, looked up in the working directory.
pub const CONFIG_FILE: &str = "chess_trainer.json";

/// Runtime configuration for a trainer session.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Path to the UCI engine binary. When unset, `stockfish` is looked up
    /// on the PATH.
    pub engine_path: Option<String>,
    /// UCI `Skill Level` option passed to the engine at startup.
    pub skill_level: u8,
    /// Fixed search depth used for every engine query.
    pub search_depth: u8,
    /// Deadline for a single engine response, in seconds.
    pub engine_timeout_secs: u64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            engine_path: None,
            skill_level: 20,
            search_depth: 18,
            engine_timeout_secs: 60,
        }
    }
}

impl TrainerConfig {
    /// Loads the configuration from `CONFIG_FILE` and applies the
    /// environment override.
    pub fn load() -> TrainerConfig {
        let mut config = TrainerConfig::load_from(Path::new(CONFIG_FILE));
        if let Ok(path) = env::var("STOCKFISH_PATH") {
            config.engine_path = Some(path);
        }
        config
    }

    fn load_from(path: &Path) -> TrainerConfig {
        match fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(config) => config,
                Err(err) => {
                    log::warn!("ignoring malformed {}: {}", path.display(), err);
                    TrainerConfig::default()
                }
            },
            Err(_) => TrainerConfig::default(),
        }
    }

    /// Engine binaries to try, in order. A configured path wins; otherwise
    /// the usual names are probed on the PATH.
    pub fn engine_candidates(&self) -> Vec<String> {
        match &self.engine_path {
            Some(path) => vec![path.clone()],
            None => vec!["stockfish".to_string(), "stockfish.exe".to_string()],
        }
    }
}
