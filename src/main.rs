//! Chess trainer main module.
//!
//! Plays a human against an external UCI engine and grades every human move
//! against the engine's own choice. Board rules come from the `chess` crate;
//! search and evaluation come from the engine subprocess. This crate only
//! orchestrates: input mapping, the per-move evaluation round-trips, session
//! statistics and the rendering of it all.

pub mod config;
pub mod engine;
pub mod errors;
pub mod evaluator;
pub mod game;
pub mod gui;
pub mod input;
pub mod position;
pub mod stats;

use config::TrainerConfig;
use engine::UciEngine;
use game::GameSession;
use gui::run_gui;

fn main() {
    env_logger::init();

    let config = TrainerConfig::load();
    log::info!(
        "starting with depth {} and skill level {}",
        config.search_depth,
        config.skill_level
    );

    // The engine must be up before any window appears; without it there is
    // neither feedback nor an opponent.
    let engine = match UciEngine::spawn(&config) {
        Ok(engine) => engine,
        Err(err) => {
            log::error!("{}", err);
            eprintln!("Could not start the chess engine: {}", err);
            eprintln!("Set engine_path in chess_trainer.json or the STOCKFISH_PATH variable.");
            std::process::exit(1);
        }
    };

    let session = GameSession::new(engine);
    if let Err(e) = run_gui(session) {
        eprintln!("Error running GUI: {}", e);
    }
}
