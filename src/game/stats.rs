//! Score and time-alive bookkeeping
//!
//! Owned by [`GameState`](super::GameState) and passed explicitly; there is no
//! process-wide stats object.

use serde::{Deserialize, Serialize};

/// Per-run statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStats {
    score: f32,
    /// Simulated seconds since the run started
    elapsed: f32,
}

impl GameStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_score(&mut self, points: f32) {
        self.score += points;
    }

    /// Account for one tick of length `dt`
    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[inline]
    pub fn score(&self) -> f32 {
        self.score
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Elapsed seconds truncated to hundredths, for the end-of-run summary
    pub fn time_alive(&self) -> f32 {
        (self.elapsed * 100.0).floor() / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_accumulates() {
        let mut stats = GameStats::new();
        stats.add_score(0.5);
        stats.add_score(1.75);
        assert_eq!(stats.score(), 2.25);
    }

    #[test]
    fn test_time_alive_truncates() {
        let mut stats = GameStats::new();
        stats.advance(1.239);
        assert!((stats.time_alive() - 1.23).abs() < 1e-6);
    }

    #[test]
    fn test_reset() {
        let mut stats = GameStats::new();
        stats.add_score(3.0);
        stats.advance(2.0);
        stats.reset();
        assert_eq!(stats, GameStats::default());
    }
}
