//! Per-session move statistics.

/// Accumulates timing samples and the human move count for one game.
#[derive(Debug, Default)]
pub struct SessionStats {
    move_times_ms: Vec<u64>,
    move_count: u32,
}

/// End-of-game aggregate shown with the result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSummary {
    /// Mean wall-clock time per human move, in milliseconds.
    pub avg_time_ms: f64,
    /// Human moves as a percentage of all plies played, including the
    /// engine's replies. A move-count ratio, not a quality measure.
    pub accuracy_pct: f64,
}

impl SessionStats {
    pub fn new() -> SessionStats {
        SessionStats::default()
    }

    /// Records one completed human move and the time it took.
    pub fn record_move(&mut self, elapsed_ms: u64) {
        self.move_times_ms.push(elapsed_ms);
        self.move_count += 1;
    }

    /// Number of human moves recorded so far.
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Computes the end-of-game summary against the final ply count.
    /// Both figures are 0 when nothing was recorded.
    pub fn summary(&self, total_plies: usize) -> SessionSummary {
        let avg_time_ms = if self.move_times_ms.is_empty() {
            0.0
        } else {
            self.move_times_ms.iter().sum::<u64>() as f64 / self.move_times_ms.len() as f64
        };
        let accuracy_pct = if total_plies == 0 {
            0.0
        } else {
            f64::from(self.move_count) * 100.0 / total_plies as f64
        };
        SessionSummary {
            avg_time_ms,
            accuracy_pct,
        }
    }

    /// Clears all samples for a rematch.
    pub fn reset(&mut self) {
        self.move_times_ms.clear();
        self.move_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_summary_is_all_zero() {
        let stats = SessionStats::new();
        let summary = stats.summary(0);
        assert_eq!(summary.avg_time_ms, 0.0);
        assert_eq!(summary.accuracy_pct, 0.0);
    }

    #[test]
    fn summary_averages_samples_and_ratios_plies() {
        let mut stats = SessionStats::new();
        stats.record_move(100);
        stats.record_move(200);
        stats.record_move(300);

        let summary = stats.summary(6);
        assert_eq!(stats.move_count(), 3);
        assert_eq!(summary.avg_time_ms, 200.0);
        assert_eq!(summary.accuracy_pct, 50.0);
    }

    #[test]
    fn zero_plies_yields_zero_accuracy_even_with_samples() {
        let mut stats = SessionStats::new();
        stats.record_move(150);
        let summary = stats.summary(0);
        assert_eq!(summary.avg_time_ms, 150.0);
        assert_eq!(summary.accuracy_pct, 0.0);
    }

    #[test]
    fn reset_clears_everything() {
        let mut stats = SessionStats::new();
        stats.record_move(100);
        stats.reset();

        assert_eq!(stats.move_count(), 0);
        assert_eq!(stats.summary(2).avg_time_ms, 0.0);
    }
}
