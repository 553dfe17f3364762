//! Game loop controller.
//!
//! `GameSession` owns the position, the input mapper, the statistics and the
//! engine handle, and drives one game from the first click to the rematch
//! prompt. Engine queries run synchronously inside the human-move handler;
//! the UI stalls for up to two searches per move, which is the accepted cost
//! of the feedback feature.

use crate::engine::Engine;
use crate::errors::{TrainerError, TrainerResult};
use crate::evaluator;
use crate::input::{BoardGeometry, InputMapper};
use crate::position::{GameOutcome, Position};
use crate::stats::{SessionStats, SessionSummary};
use chess::{ChessMove, Square};
use std::time::Instant;

const WELCOME: &str = "Welcome to Chess Trainer!";

/// Where the session currently is in its turn cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the human to complete a move.
    AwaitingInput,
    /// The played move is being judged against the engine's choice.
    Evaluating,
    /// The engine is searching for its reply.
    AwaitingEngineReply,
    /// The game ended; waiting for the rematch or quit signal.
    AwaitingRematch,
    /// The session is over, either by quit or by a fatal engine error.
    Terminated,
}

/// Audio side effects raised by the game loop, consumed by the presentation
/// layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Move,
    Checkmate,
}

/// One trainer session: a human playing the engine, with feedback.
pub struct GameSession<E: Engine> {
    position: Position,
    input: InputMapper,
    stats: SessionStats,
    engine: Option<E>,
    phase: Phase,
    feedback: String,
    outcome: Option<GameOutcome>,
    summary: Option<SessionSummary>,
    sounds: Vec<SoundCue>,
}

impl<E: Engine> GameSession<E> {
    /// Starts a session from the standard starting position.
    pub fn new(engine: E) -> GameSession<E> {
        GameSession::with_position(engine, Position::new())
    }

    /// Starts a session from an arbitrary position.
    pub fn with_position(engine: E, position: Position) -> GameSession<E> {
        GameSession {
            position,
            input: InputMapper::new(),
            stats: SessionStats::new(),
            engine: Some(engine),
            phase: Phase::AwaitingInput,
            feedback: WELCOME.to_string(),
            outcome: None,
            summary: None,
            sounds: Vec::new(),
        }
    }

    /// Feeds a pointer-down event into the session.
    ///
    /// Outside `AwaitingInput` the click is ignored. A completed legal move
    /// runs the full turn: evaluation, application, the engine's reply and
    /// the timing sample. Engine failures terminate the session with a
    /// visible message and release the engine process.
    pub fn pointer_down(&mut self, x: f32, y: f32, geometry: &BoardGeometry) {
        if self.phase != Phase::AwaitingInput {
            return;
        }
        let mv = match self.input.pointer_down(x, y, geometry, &self.position) {
            Some(mv) => mv,
            None => return,
        };
        match self.play_human_move(mv) {
            Ok(()) => {}
            Err(err) if err.is_fatal() => {
                log::error!("session aborted: {}", err);
                self.feedback = format!("Fatal engine error: {}", err);
                self.phase = Phase::Terminated;
                self.engine = None;
            }
            Err(err) => {
                log::warn!("move rejected: {}", err);
                self.phase = Phase::AwaitingInput;
            }
        }
    }

    fn play_human_move(&mut self, mv: ChessMove) -> TrainerResult<()> {
        let started = Instant::now();

        self.phase = Phase::Evaluating;
        let engine = self.engine.as_mut().ok_or_else(engine_released)?;
        let evaluation = evaluator::evaluate(engine, &self.position, mv)?;
        self.feedback = evaluation.message();

        self.position.apply(mv)?;
        self.sounds.push(SoundCue::Move);

        if !self.position.is_game_over() {
            self.phase = Phase::AwaitingEngineReply;
            let engine = self.engine.as_mut().ok_or_else(engine_released)?;
            if let Some(reply) = engine.best_move(&self.position)? {
                self.position.apply(reply).map_err(|_| {
                    TrainerError::EngineUnavailable {
                        reason: format!("engine replied with illegal move {}", reply),
                    }
                })?;
                self.feedback.push_str(&format!(" | AI played: {}", reply));
            }
        }

        self.stats.record_move(started.elapsed().as_millis() as u64);

        if self.position.is_game_over() {
            self.finish_game();
        } else {
            self.phase = Phase::AwaitingInput;
        }
        Ok(())
    }

    fn finish_game(&mut self) {
        self.phase = Phase::AwaitingRematch;
        let summary = self.stats.summary(self.position.ply_count());
        if let Some(outcome) = self.position.outcome() {
            if outcome.is_checkmate {
                self.sounds.push(SoundCue::Checkmate);
            }
            log::info!("game over, result {}", outcome.result);
            log::info!("average time per move: {:.2} ms", summary.avg_time_ms);
            log::info!("average accuracy: {:.2}%", summary.accuracy_pct);
            self.outcome = Some(outcome);
        }
        self.summary = Some(summary);
    }

    /// Restarts the game after the rematch prompt.
    pub fn rematch(&mut self) {
        if self.phase != Phase::AwaitingRematch {
            return;
        }
        self.position.reset();
        self.stats.reset();
        self.input.clear();
        self.outcome = None;
        self.summary = None;
        self.feedback = WELCOME.to_string();
        self.phase = Phase::AwaitingInput;
        log::info!("rematch started");
    }

    /// Ends the session and releases the engine process.
    pub fn quit(&mut self) {
        self.phase = Phase::Terminated;
        self.engine = None;
    }

    /// Drains the sound cues queued since the last call.
    pub fn take_sounds(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.sounds)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn feedback(&self) -> &str {
        &self.feedback
    }

    pub fn outcome(&self) -> Option<&GameOutcome> {
        self.outcome.as_ref()
    }

    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    /// The square the human has selected, if any.
    pub fn selected(&self) -> Option<Square> {
        self.input.selected()
    }

    /// Legal destinations for the selected square.
    pub fn destinations(&self) -> &[Square] {
        self.input.destinations()
    }
}

fn engine_released() -> TrainerError {
    TrainerError::EngineUnavailable {
        reason: "engine already released".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::str::FromStr;

    struct ScriptedEngine {
        best: VecDeque<Option<ChessMove>>,
        scores: VecDeque<Option<i32>>,
        best_calls: usize,
        score_calls: usize,
        fail: bool,
    }

    impl ScriptedEngine {
        fn new(best: Vec<&str>, scores: Vec<Option<i32>>) -> ScriptedEngine {
            ScriptedEngine {
                best: best.into_iter().map(|s| Some(mv(s))).collect(),
                scores: scores.into(),
                best_calls: 0,
                score_calls: 0,
                fail: false,
            }
        }

        fn failing() -> ScriptedEngine {
            let mut engine = ScriptedEngine::new(vec![], vec![]);
            engine.fail = true;
            engine
        }
    }

    impl Engine for ScriptedEngine {
        fn best_move(&mut self, _position: &Position) -> TrainerResult<Option<ChessMove>> {
            if self.fail {
                return Err(TrainerError::EngineUnavailable {
                    reason: "scripted failure".to_string(),
                });
            }
            self.best_calls += 1;
            Ok(self.best.pop_front().expect("unexpected best_move query"))
        }

        fn score(&mut self, _position: &Position) -> TrainerResult<Option<i32>> {
            self.score_calls += 1;
            Ok(self.scores.pop_front().expect("unexpected score query"))
        }
    }

    fn mv(s: &str) -> ChessMove {
        ChessMove::from_str(s).unwrap()
    }

    fn geometry() -> BoardGeometry {
        BoardGeometry::new(0.0, 0.0, 50.0)
    }

    fn click<E: Engine>(session: &mut GameSession<E>, square: &str) {
        let square = Square::from_str(square).unwrap();
        let x = square.get_file().to_index() as f32 * 50.0 + 25.0;
        let y = (7.0 - square.get_rank().to_index() as f32) * 50.0 + 25.0;
        session.pointer_down(x, y, &geometry());
    }

    #[test]
    fn optimal_first_move_gets_praise_and_a_reply() {
        // The human plays the engine's own top choice as White's first move.
        let engine = ScriptedEngine::new(vec!["e2e4", "e7e5"], vec![]);
        let mut session = GameSession::new(engine);

        click(&mut session, "e2");
        click(&mut session, "e4");

        assert_eq!(session.phase(), Phase::AwaitingInput);
        assert!(session.feedback().starts_with("Excellent move!"));
        assert!(session.feedback().contains("| AI played: e7e5"));
        assert_eq!(session.position().ply_count(), 2);
        assert_eq!(session.take_sounds(), vec![SoundCue::Move]);

        let engine = session.engine.as_ref().unwrap();
        assert_eq!(engine.best_calls, 2);
        assert_eq!(engine.score_calls, 0);
    }

    #[test]
    fn suboptimal_move_reports_best_move_and_score() {
        let engine = ScriptedEngine::new(vec!["d2d4", "e7e5"], vec![Some(-35)]);
        let mut session = GameSession::new(engine);

        click(&mut session, "e2");
        click(&mut session, "e4");

        assert_eq!(
            session.feedback(),
            "Best move: d2d4. Your move: e2e4. Score: -35 | AI played: e7e5"
        );
        assert_eq!(session.engine.as_ref().unwrap().score_calls, 1);
        assert_eq!(session.stats.move_count(), 1);
    }

    #[test]
    fn clicks_that_produce_no_move_cost_no_engine_query() {
        let engine = ScriptedEngine::new(vec![], vec![]);
        let mut session = GameSession::new(engine);

        click(&mut session, "e4");
        click(&mut session, "e2");
        click(&mut session, "h5");

        assert_eq!(session.phase(), Phase::AwaitingInput);
        assert_eq!(session.position().ply_count(), 0);
        assert_eq!(session.engine.as_ref().unwrap().best_calls, 0);
    }

    #[test]
    fn checkmate_by_the_human_skips_the_engine_reply() {
        let engine = ScriptedEngine::new(vec!["e1e8"], vec![]);
        let position = Position::from_fen("6k1/5ppp/8/8/8/8/8/4R1K1 w - - 0 1").unwrap();
        let mut session = GameSession::with_position(engine, position);

        click(&mut session, "e1");
        click(&mut session, "e8");

        assert_eq!(session.phase(), Phase::AwaitingRematch);
        let outcome = session.outcome().unwrap();
        assert!(outcome.is_checkmate);
        assert_eq!(outcome.result, "1-0");

        let summary = session.summary().unwrap();
        assert_eq!(summary.accuracy_pct, 100.0);

        assert_eq!(
            session.take_sounds(),
            vec![SoundCue::Move, SoundCue::Checkmate]
        );
        // Only the evaluation query ran; there was no reply to search for.
        assert_eq!(session.engine.as_ref().unwrap().best_calls, 1);
    }

    #[test]
    fn checkmate_by_the_engine_also_ends_the_game() {
        // Fool's mate: the scripted engine answers 1. f3 with e5 and mates
        // with Qh4 after 2. g4.
        let engine = ScriptedEngine::new(
            vec!["e2e4", "e7e5", "d2d4", "d8h4"],
            vec![Some(-20), Some(-250)],
        );
        let mut session = GameSession::new(engine);

        click(&mut session, "f2");
        click(&mut session, "f3");
        assert_eq!(session.phase(), Phase::AwaitingInput);

        click(&mut session, "g2");
        click(&mut session, "g4");

        assert_eq!(session.phase(), Phase::AwaitingRematch);
        let outcome = session.outcome().unwrap();
        assert!(outcome.is_checkmate);
        assert_eq!(outcome.result, "0-1");

        let summary = session.summary().unwrap();
        assert_eq!(summary.accuracy_pct, 50.0);
    }

    #[test]
    fn engine_failure_terminates_with_a_visible_message() {
        let mut session = GameSession::new(ScriptedEngine::failing());

        click(&mut session, "e2");
        click(&mut session, "e4");

        assert_eq!(session.phase(), Phase::Terminated);
        assert!(session.feedback().starts_with("Fatal engine error:"));
        assert!(session.engine.is_none());

        // Further clicks are ignored once terminated.
        click(&mut session, "d2");
        assert_eq!(session.position().ply_count(), 0);
    }

    #[test]
    fn rematch_resets_position_stats_and_feedback() {
        let engine = ScriptedEngine::new(vec!["e1e8"], vec![]);
        let position = Position::from_fen("6k1/5ppp/8/8/8/8/8/4R1K1 w - - 0 1").unwrap();
        let mut session = GameSession::with_position(engine, position);

        click(&mut session, "e1");
        click(&mut session, "e8");
        assert_eq!(session.phase(), Phase::AwaitingRematch);

        session.rematch();

        assert_eq!(session.phase(), Phase::AwaitingInput);
        assert_eq!(session.position().ply_count(), 0);
        assert_eq!(session.position().legal_moves().len(), 20);
        assert_eq!(session.feedback(), WELCOME);
        assert!(session.outcome().is_none());
        assert!(session.summary().is_none());
    }

    #[test]
    fn rematch_is_only_honored_after_a_finished_game() {
        let engine = ScriptedEngine::new(vec!["d2d4", "e7e5"], vec![Some(0)]);
        let mut session = GameSession::new(engine);

        click(&mut session, "e2");
        click(&mut session, "e4");
        session.rematch();

        assert_eq!(session.position().ply_count(), 2);
        assert_eq!(session.phase(), Phase::AwaitingInput);
    }

    #[test]
    fn quit_terminates_and_releases_the_engine() {
        let mut session = GameSession::new(ScriptedEngine::new(vec![], vec![]));
        session.quit();

        assert_eq!(session.phase(), Phase::Terminated);
        assert!(session.engine.is_none());
    }
}
