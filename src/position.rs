//! Position state.
//!
//! Wraps the rules library's board together with the move history of the
//! running game. All legality questions are answered by the library; this
//! module only owns the current configuration, applies validated moves, and
//! reports terminal states.

use crate::errors::{TrainerError, TrainerResult};
use chess::{Board, BoardStatus, ChessMove, Color, MoveGen, Piece, Square};
use std::str::FromStr;

/// The current board configuration plus the stack of applied moves.
///
/// `Position` is the single source of truth for legality and board contents.
/// It is mutated only through `apply`; evaluation works on copies produced
/// by `after` so the live game is never disturbed.
#[derive(Debug, Clone)]
pub struct Position {
    board: Board,
    history: Vec<ChessMove>,
}

/// Terminal result of a finished game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOutcome {
    /// Result string in the usual notation: `1-0`, `0-1` or `1/2-1/2`.
    pub result: &'static str,
    /// True when the game ended in checkmate.
    pub is_checkmate: bool,
    /// The winning side, if any.
    pub winner: Option<Color>,
}

impl GameOutcome {
    /// Human readable description for the info box.
    pub fn describe(&self) -> String {
        match self.winner {
            Some(Color::White) => "Checkmate! White wins.".to_string(),
            Some(Color::Black) => "Checkmate! Black wins.".to_string(),
            None => "Draw by stalemate.".to_string(),
        }
    }
}

impl Position {
    /// Creates a position with the standard starting configuration.
    pub fn new() -> Position {
        Position {
            board: Board::default(),
            history: Vec::new(),
        }
    }

    /// Creates a position from a FEN string with an empty history.
    pub fn from_fen(fen: &str) -> Result<Position, chess::Error> {
        Ok(Position {
            board: Board::from_str(fen)?,
            history: Vec::new(),
        })
    }

    /// All legal moves for the side to move.
    pub fn legal_moves(&self) -> Vec<ChessMove> {
        MoveGen::new_legal(&self.board).collect()
    }

    /// The piece standing on `square`, if any.
    pub fn piece_at(&self, square: Square) -> Option<(Piece, Color)> {
        match (self.board.piece_on(square), self.board.color_on(square)) {
            (Some(piece), Some(color)) => Some((piece, color)),
            _ => None,
        }
    }

    /// Which side moves next.
    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    /// Applies `mv` to the position and records it in the history.
    ///
    /// Fails with `IllegalMove` when the move is not legal for the side to
    /// move; the position is left unchanged in that case.
    pub fn apply(&mut self, mv: ChessMove) -> TrainerResult<()> {
        if !self.board.legal(mv) {
            return Err(TrainerError::IllegalMove { mv });
        }
        self.board = self.board.make_move_new(mv);
        self.history.push(mv);
        Ok(())
    }

    /// Returns a copy of this position with `mv` applied, leaving `self`
    /// untouched.
    pub fn after(&self, mv: ChessMove) -> TrainerResult<Position> {
        let mut copy = self.clone();
        copy.apply(mv)?;
        Ok(copy)
    }

    /// True when the side to move has no legal moves.
    pub fn is_game_over(&self) -> bool {
        self.board.status() != BoardStatus::Ongoing
    }

    /// The terminal result, valid only once the game is over.
    pub fn outcome(&self) -> Option<GameOutcome> {
        match self.board.status() {
            BoardStatus::Ongoing => None,
            BoardStatus::Stalemate => Some(GameOutcome {
                result: "1/2-1/2",
                is_checkmate: false,
                winner: None,
            }),
            BoardStatus::Checkmate => {
                let winner = !self.board.side_to_move();
                Some(GameOutcome {
                    result: match winner {
                        Color::White => "1-0",
                        Color::Black => "0-1",
                    },
                    is_checkmate: true,
                    winner: Some(winner),
                })
            }
        }
    }

    /// Restores the standard starting configuration and clears the history.
    pub fn reset(&mut self) {
        self.board = Board::default();
        self.history.clear();
    }

    /// FEN rendering of the current board, as sent to the engine.
    pub fn fen(&self) -> String {
        self.board.to_string()
    }

    /// Number of half moves played so far.
    pub fn ply_count(&self) -> usize {
        self.history.len()
    }

    /// The applied moves, oldest first.
    pub fn history(&self) -> &[ChessMove] {
        &self.history
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new()
    }
}
