//! Move quality evaluation.
//!
//! Compares a played move against the engine's preferred move for the same
//! position. An optimal move needs a single engine query; a suboptimal one
//! costs a second query to score the resulting position. The position under
//! evaluation is never mutated; the second query runs on a working copy.

use crate::engine::Engine;
use crate::errors::TrainerResult;
use crate::position::Position;
use chess::ChessMove;

/// Quality verdict for a single human move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The played move matches the engine's best move.
    Optimal,
    /// Any other move; carries the score of the resulting position.
    Suboptimal,
}

/// Outcome of evaluating one played move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationResult {
    pub classification: Classification,
    /// The engine's preferred move for the pre-move position.
    pub best_move: Option<ChessMove>,
    pub played_move: ChessMove,
    /// Centipawn score after the played move, side-to-move relative.
    /// Absent for optimal moves and for mate-bearing evaluations.
    pub score_after_played: Option<i32>,
}

impl EvaluationResult {
    /// Feedback line shown in the info box.
    pub fn message(&self) -> String {
        match self.classification {
            Classification::Optimal => "Excellent move! You played the best move.".to_string(),
            Classification::Suboptimal => match (self.best_move, self.score_after_played) {
                (Some(best), Some(score)) => format!(
                    "Best move: {}. Your move: {}. Score: {}",
                    best, self.played_move, score
                ),
                _ => "Try a different move.".to_string(),
            },
        }
    }
}

/// Evaluates `played` against the engine's choice for `position`.
///
/// Must not be called on a terminal position; the game loop checks
/// `is_game_over` before requesting feedback.
pub fn evaluate<E: Engine + ?Sized>(
    engine: &mut E,
    position: &Position,
    played: ChessMove,
) -> TrainerResult<EvaluationResult> {
    let best_move = engine.best_move(position)?;
    if best_move == Some(played) {
        return Ok(EvaluationResult {
            classification: Classification::Optimal,
            best_move,
            played_move: played,
            score_after_played: None,
        });
    }

    let after = position.after(played)?;
    let score_after_played = engine.score(&after)?;
    Ok(EvaluationResult {
        classification: Classification::Suboptimal,
        best_move,
        played_move: played,
        score_after_played,
    })
}
