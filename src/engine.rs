//! UCI engine client.
//!
//! Wraps a long-lived engine subprocess behind the two queries the trainer
//! needs: the best move for a position and the centipawn score after it.
//! Queries are strictly sequential; one round-trip is in flight at a time.
//! A reader thread pumps the engine's stdout into a channel so every read
//! carries a deadline instead of blocking forever on a hung process.

use crate::config::TrainerConfig;
use crate::errors::{TrainerError, TrainerResult};
use crate::position::Position;
use chess::ChessMove;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::str::FromStr;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

/// The engine queries the trainer depends on.
///
/// Implemented by `UciEngine` for real play; tests substitute scripted
/// implementations so the game loop and evaluator run without a process.
pub trait Engine {
    /// First move of the principal variation for `position`, or `None`
    /// when no legal move exists.
    fn best_move(&mut self, position: &Position) -> TrainerResult<Option<ChessMove>>;

    /// Centipawn score of `position` from the side to move's perspective.
    /// `None` when the engine reports a mate score or no score at all.
    fn score(&mut self, position: &Position) -> TrainerResult<Option<i32>>;
}

/// Client for an external UCI engine process.
#[derive(Debug)]
pub struct UciEngine {
    child: Child,
    stdin: ChildStdin,
    lines: Receiver<String>,
    depth: u8,
    timeout: Duration,
}

impl UciEngine {
    /// Starts the first engine candidate that launches and completes the
    /// UCI handshake. The skill level from `config` is applied before the
    /// engine is handed out.
    pub fn spawn(config: &TrainerConfig) -> TrainerResult<UciEngine> {
        let mut last_error = None;
        for path in config.engine_candidates() {
            match UciEngine::launch(&path, config) {
                Ok(engine) => {
                    log::info!("engine started from '{}'", path);
                    return Ok(engine);
                }
                Err(err) => {
                    log::warn!("engine candidate '{}' failed: {}", path, err);
                    last_error = Some(err);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| TrainerError::EngineUnavailable {
            reason: "no engine path configured".to_string(),
        }))
    }

    fn launch(path: &str, config: &TrainerConfig) -> TrainerResult<UciEngine> {
        let mut child = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|err| TrainerError::EngineUnavailable {
                reason: format!("could not start '{}': {}", path, err),
            })?;

        let stdin = child.stdin.take().ok_or_else(|| TrainerError::EngineUnavailable {
            reason: "engine stdin was not captured".to_string(),
        })?;
        let stdout = child.stdout.take().ok_or_else(|| TrainerError::EngineUnavailable {
            reason: "engine stdout was not captured".to_string(),
        })?;

        // Pump stdout on a dedicated thread; it exits on EOF or once the
        // receiving side is gone.
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let reader = BufReader::new(stdout);
            for line in reader.lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            }
        });

        let mut engine = UciEngine {
            child,
            stdin,
            lines: rx,
            depth: config.search_depth,
            timeout: Duration::from_secs(config.engine_timeout_secs),
        };

        engine.send("uci")?;
        engine.wait_for("uciok")?;
        engine.send(&format!(
            "setoption name Skill Level value {}",
            config.skill_level
        ))?;
        engine.send("isready")?;
        engine.wait_for("readyok")?;
        Ok(engine)
    }

    fn send(&mut self, command: &str) -> TrainerResult<()> {
        log::trace!("-> {}", command);
        writeln!(self.stdin, "{}", command).map_err(|err| TrainerError::EngineUnavailable {
            reason: format!("engine stdin closed: {}", err),
        })
    }

    fn read_line(&mut self) -> TrainerResult<String> {
        match self.lines.recv_timeout(self.timeout) {
            Ok(line) => {
                log::trace!("<- {}", line);
                Ok(line)
            }
            Err(RecvTimeoutError::Timeout) => Err(TrainerError::EngineTimeout {
                timeout_secs: self.timeout.as_secs(),
            }),
            Err(RecvTimeoutError::Disconnected) => Err(TrainerError::EngineUnavailable {
                reason: "engine process closed its output".to_string(),
            }),
        }
    }

    fn wait_for(&mut self, marker: &str) -> TrainerResult<()> {
        loop {
            if self.read_line()?.trim() == marker {
                return Ok(());
            }
        }
    }

    fn go(&mut self, position: &Position) -> TrainerResult<()> {
        self.send(&format!("position fen {}", position.fen()))?;
        self.send(&format!("go depth {}", self.depth))
    }
}

impl Engine for UciEngine {
    fn best_move(&mut self, position: &Position) -> TrainerResult<Option<ChessMove>> {
        self.go(position)?;
        loop {
            let line = self.read_line()?;
            if let Some(token) = parse_bestmove(&line) {
                if token == "(none)" || token == "0000" {
                    return Ok(None);
                }
                let mv = ChessMove::from_str(token).map_err(|_| {
                    TrainerError::EngineUnavailable {
                        reason: format!("engine sent unparseable move '{}'", token),
                    }
                })?;
                return Ok(Some(mv));
            }
        }
    }

    fn score(&mut self, position: &Position) -> TrainerResult<Option<i32>> {
        self.go(position)?;
        let mut score = None;
        loop {
            let line = self.read_line()?;
            if let Some(parsed) = parse_info_score(&line) {
                score = match parsed {
                    UciScore::Centipawns(cp) => Some(cp),
                    UciScore::Mate(_) => None,
                };
            }
            if line.starts_with("bestmove") {
                return Ok(score);
            }
        }
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        let _ = writeln!(self.stdin, "quit");
        let _ = self.child.wait();
        log::info!("engine process stopped");
    }
}

/// Score payload of a UCI `info` line.
#[derive(Debug, PartialEq, Eq)]
enum UciScore {
    Centipawns(i32),
    Mate(i32),
}

/// Extracts the move token from a `bestmove` line.
fn parse_bestmove(line: &str) -> Option<&str> {
    let mut tokens = line.split_whitespace();
    if tokens.next()? != "bestmove" {
        return None;
    }
    tokens.next()
}

/// Extracts the score from an `info` line.
///
/// # Arguments
///
/// * `line` - One line of engine output
///
/// # Returns
///
/// * The centipawn or mate score the line carries, if any
fn parse_info_score(line: &str) -> Option<UciScore> {
    if !line.starts_with("info") {
        return None;
    }
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let at = tokens.iter().position(|&t| t == "score")?;
    match (tokens.get(at + 1), tokens.get(at + 2)) {
        (Some(&"cp"), Some(value)) => value.parse().ok().map(UciScore::Centipawns),
        (Some(&"mate"), Some(value)) => value.parse().ok().map(UciScore::Mate),
        _ => None,
    }
}
