//! Error types for the trainer.
//!
//! Engine failures are fatal to the running session; an illegal move is
//! recovered locally by discarding the click.

use chess::ChessMove;
use thiserror::Error;

/// Errors raised by the trainer core.
#[derive(Error, Debug)]
pub enum TrainerError {
    /// A candidate move was not in the legal-move set of the current position.
    #[error("{mv} is not legal in the current position")]
    IllegalMove { mv: ChessMove },

    /// The engine process could not be started, or its pipes closed.
    #[error("chess engine unavailable: {reason}")]
    EngineUnavailable { reason: String },

    /// The engine did not answer a query within the configured deadline.
    #[error("chess engine gave no answer within {timeout_secs}s")]
    EngineTimeout { timeout_secs: u64 },
}

impl TrainerError {
    /// Whether the error ends the session. Engine failures do; a rejected
    /// move does not.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, TrainerError::IllegalMove { .. })
    }
}

/// Result type alias for trainer operations.
pub type TrainerResult<T> = Result<T, TrainerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chess::Square;
    use std::str::FromStr;

    #[test]
    fn illegal_move_is_not_fatal() {
        let mv = ChessMove::new(
            Square::from_str("e2").unwrap(),
            Square::from_str("e5").unwrap(),
            None,
        );
        assert!(!TrainerError::IllegalMove { mv }.is_fatal());
    }

    #[test]
    fn engine_errors_are_fatal() {
        let unavailable = TrainerError::EngineUnavailable {
            reason: "gone".to_string(),
        };
        let timeout = TrainerError::EngineTimeout { timeout_secs: 60 };
        assert!(unavailable.is_fatal());
        assert!(timeout.is_fatal());
    }
}
