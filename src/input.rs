//! Pointer input mapping.
//!
//! Translates raw pointer coordinates into board squares and tracks the
//! click-click selection state: the first click selects one of the mover's
//! pieces and caches its legal destinations, the second click either
//! produces a move or discards the selection.

use crate::position::Position;
use chess::{ChessMove, File, Piece, Rank, Square};

/// Pixel layout of the rendered board, white's perspective with rank 8 at
/// the top.
#[derive(Debug, Clone, Copy)]
pub struct BoardGeometry {
    pub origin_x: f32,
    pub origin_y: f32,
    pub square_size: f32,
}

impl BoardGeometry {
    pub fn new(origin_x: f32, origin_y: f32, square_size: f32) -> BoardGeometry {
        BoardGeometry {
            origin_x,
            origin_y,
            square_size,
        }
    }

    /// Finds the board square under a pointer position.
    ///
    /// # Arguments
    ///
    /// * `x` - Pointer x coordinate in window pixels
    /// * `y` - Pointer y coordinate in window pixels
    ///
    /// # Returns
    ///
    /// * The square under the pointer, or `None` outside the 8x8 area
    pub fn square_at(&self, x: f32, y: f32) -> Option<Square> {
        if x < self.origin_x || y < self.origin_y {
            return None;
        }
        let file = ((x - self.origin_x) / self.square_size) as usize;
        let row = ((y - self.origin_y) / self.square_size) as usize;
        if file > 7 || row > 7 {
            return None;
        }
        Some(Square::make_square(
            Rank::from_index(7 - row),
            File::from_index(file),
        ))
    }
}

/// Selection state machine: idle, or one selected square with its cached
/// legal destinations.
#[derive(Debug, Default)]
pub struct InputMapper {
    selected: Option<Square>,
    destinations: Vec<Square>,
}

impl InputMapper {
    pub fn new() -> InputMapper {
        InputMapper::default()
    }

    /// Feeds one pointer-down event through the state machine.
    ///
    /// Returns a legal move once a selected piece is sent to one of its
    /// cached destinations. Every second click ends the selection, whether
    /// or not it produced a move. Clicks outside the board are ignored and
    /// leave the selection alone.
    pub fn pointer_down(
        &mut self,
        x: f32,
        y: f32,
        geometry: &BoardGeometry,
        position: &Position,
    ) -> Option<ChessMove> {
        let square = geometry.square_at(x, y)?;
        match self.selected {
            None => {
                if let Some((_, color)) = position.piece_at(square) {
                    if color == position.side_to_move() {
                        self.selected = Some(square);
                        self.destinations.clear();
                        for m in position.legal_moves() {
                            // The four promotion moves share one destination.
                            if m.get_source() == square
                                && !self.destinations.contains(&m.get_dest())
                            {
                                self.destinations.push(m.get_dest());
                            }
                        }
                    }
                }
                None
            }
            Some(from) => {
                let candidate = if self.destinations.contains(&square) {
                    resolve_move(position, from, square)
                } else {
                    None
                };
                self.clear();
                candidate
            }
        }
    }

    /// The currently selected square, if any.
    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    /// Legal destinations cached for the selected square.
    pub fn destinations(&self) -> &[Square] {
        &self.destinations
    }

    /// Drops the selection and its cached destinations.
    pub fn clear(&mut self) {
        self.selected = None;
        self.destinations.clear();
    }
}

/// Finds the legal move from `from` to `to`. Promotions resolve to the
/// queen when several pieces are possible.
fn resolve_move(position: &Position, from: Square, to: Square) -> Option<ChessMove> {
    let mut fallback = None;
    for m in position.legal_moves() {
        if m.get_source() == from && m.get_dest() == to {
            match m.get_promotion() {
                None | Some(Piece::Queen) => return Some(m),
                Some(_) => fallback = Some(m),
            }
        }
    }
    fallback
}
