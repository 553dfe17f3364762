//! egui presentation layer.
//!
//! Renders the board, the selection highlights and the feedback box from
//! read-only session state, and feeds pointer clicks and the rematch/quit
//! keys back into the game loop. Contains no decision logic.

use crate::engine::UciEngine;
use crate::game::{GameSession, Phase};
use crate::input::BoardGeometry;
use chess::{Color, File, Piece, Rank, Square};
use eframe::egui;

const WINDOW_SIZE: f32 = 550.0;
const INFO_BOX_HEIGHT: f32 = 100.0;

pub struct ChessTrainerApp {
    session: GameSession<UciEngine>,
}

impl ChessTrainerApp {
    fn new(session: GameSession<UciEngine>) -> Self {
        ChessTrainerApp { session }
    }

    fn draw_info_box(&self, ui: &mut egui::Ui) {
        ui.add_space(8.0);
        ui.label(egui::RichText::new(self.session.feedback()).size(14.0).strong());
        if let Some(outcome) = self.session.outcome() {
            ui.label(format!("Result: {} ({})", outcome.result, outcome.describe()));
        }
        if let Some(summary) = self.session.summary() {
            ui.label(format!(
                "Average time per move: {:.2} ms | Average accuracy: {:.2}%",
                summary.avg_time_ms, summary.accuracy_pct
            ));
        }
    }

    fn draw_board(&mut self, ui: &mut egui::Ui) {
        let board_size = ui.available_width().min(ui.available_height());
        let square_size = board_size / 8.0;

        let board_rect = egui::Rect::from_min_size(
            ui.cursor().min,
            egui::vec2(board_size, board_size),
        );
        let response = ui.allocate_rect(board_rect, egui::Sense::click());
        let geometry = BoardGeometry::new(board_rect.min.x, board_rect.min.y, square_size);

        let highlight = egui::Color32::from_rgba_unmultiplied(0, 255, 0, 100);
        let painter = ui.painter();

        for rank in 0..8 {
            for file in 0..8 {
                let square =
                    Square::make_square(Rank::from_index(rank), File::from_index(file));
                let rect = egui::Rect::from_min_size(
                    egui::pos2(
                        board_rect.min.x + file as f32 * square_size,
                        board_rect.min.y + (7 - rank) as f32 * square_size,
                    ),
                    egui::vec2(square_size, square_size),
                );

                let base = if (rank + file) % 2 == 0 {
                    egui::Color32::from_rgb(181, 136, 99) // Dark squares
                } else {
                    egui::Color32::from_rgb(240, 217, 181) // Light squares
                };
                painter.rect_filled(rect, 0.0, base);

                let selected = self.session.selected() == Some(square);
                if selected || self.session.destinations().contains(&square) {
                    painter.rect_filled(rect, 0.0, highlight);
                }

                if let Some((piece, color)) = self.session.position().piece_at(square) {
                    painter.text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        piece_glyph(piece, color),
                        egui::FontId::proportional(square_size * 0.8),
                        if color == Color::White {
                            egui::Color32::WHITE
                        } else {
                            egui::Color32::BLACK
                        },
                    );
                }

                // Coordinate labels on the left column and bottom row.
                if file == 0 {
                    painter.text(
                        rect.min + egui::vec2(3.0, 2.0),
                        egui::Align2::LEFT_TOP,
                        format!("{}", rank + 1),
                        egui::FontId::proportional(12.0),
                        egui::Color32::BLACK,
                    );
                }
                if rank == 0 {
                    painter.text(
                        rect.max - egui::vec2(4.0, 2.0),
                        egui::Align2::RIGHT_BOTTOM,
                        ((b'a' + file as u8) as char).to_string(),
                        egui::FontId::proportional(12.0),
                        egui::Color32::BLACK,
                    );
                }
            }
        }

        if self.session.phase() == Phase::AwaitingRematch {
            painter.text(
                board_rect.center(),
                egui::Align2::CENTER_CENTER,
                "Game Over! Press 'R' for rematch or 'Q' to quit.",
                egui::FontId::proportional(22.0),
                egui::Color32::YELLOW,
            );
        }

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.session.pointer_down(pos.x, pos.y, &geometry);
            }
        }
    }
}

impl eframe::App for ChessTrainerApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        if self.session.phase() == Phase::AwaitingRematch {
            let (rematch, quit) =
                ctx.input(|i| (i.key_pressed(egui::Key::R), i.key_pressed(egui::Key::Q)));
            if rematch {
                self.session.rematch();
            } else if quit {
                self.session.quit();
                frame.close();
            }
        }

        egui::TopBottomPanel::bottom("info_box")
            .exact_height(INFO_BOX_HEIGHT)
            .show(ctx, |ui| {
                self.draw_info_box(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_board(ui);
        });

        // Audio decoding lives outside the core; cues surface here.
        for cue in self.session.take_sounds() {
            log::debug!("sound cue: {:?}", cue);
        }

        ctx.request_repaint();
    }
}

fn piece_glyph(piece: Piece, color: Color) -> &'static str {
    match (piece, color) {
        (Piece::Pawn, Color::White) => "♙",
        (Piece::Knight, Color::White) => "♘",
        (Piece::Bishop, Color::White) => "♗",
        (Piece::Rook, Color::White) => "♖",
        (Piece::Queen, Color::White) => "♕",
        (Piece::King, Color::White) => "♔",
        (Piece::Pawn, Color::Black) => "♟",
        (Piece::Knight, Color::Black) => "♞",
        (Piece::Bishop, Color::Black) => "♝",
        (Piece::Rook, Color::Black) => "♜",
        (Piece::Queen, Color::Black) => "♛",
        (Piece::King, Color::Black) => "♚",
    }
}

pub fn run_gui(session: GameSession<UciEngine>) -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        initial_window_size: Some(egui::vec2(WINDOW_SIZE, WINDOW_SIZE + INFO_BOX_HEIGHT)),
        resizable: false,
        ..Default::default()
    };
    eframe::run_native(
        "Chess Trainer",
        options,
        Box::new(move |_cc| Box::new(ChessTrainerApp::new(session))),
    )
}
