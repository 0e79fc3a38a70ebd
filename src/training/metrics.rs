use std::collections::VecDeque;

use crate::training::episode::{EpisodeResult, EpisodeSummary};

/// Training metrics tracker with rolling window computations.
pub struct TrainingMetrics {
    episodes: VecDeque<EpisodeSummary>,
    capacity: usize,
    total_episodes: usize, // lifetime count, never capped
    total_successes: usize,
}

impl TrainingMetrics {
    pub fn with_capacity(capacity: usize) -> Self {
        TrainingMetrics {
            episodes: VecDeque::with_capacity(capacity),
            capacity,
            total_episodes: 0,
            total_successes: 0,
        }
    }

    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    pub fn record_episode(&mut self, summary: EpisodeSummary) {
        self.total_episodes += 1;
        if summary.succeeded() {
            self.total_successes += 1;
        }
        self.episodes.push_back(summary);
        if self.episodes.len() > self.capacity {
            self.episodes.pop_front();
        }
    }

    fn mean_over<F>(&self, last_n: usize, f: F) -> f32
    where
        F: Fn(&EpisodeSummary) -> f64,
    {
        let n = self.episodes.len().min(last_n);
        if n == 0 {
            return 0.0;
        }
        let sum: f64 = self.episodes.iter().rev().take(n).map(f).sum();
        (sum / n as f64) as f32
    }

    /// Fraction of the last N episodes that reached the goal.
    pub fn success_rate(&self, last_n: usize) -> f32 {
        self.mean_over(last_n, |e| {
            if e.stats.result == EpisodeResult::Success {
                1.0
            } else {
                0.0
            }
        })
    }

    pub fn average_score(&self, last_n: usize) -> f32 {
        self.mean_over(last_n, |e| e.stats.score)
    }

    pub fn average_steps(&self, last_n: usize) -> f32 {
        self.mean_over(last_n, |e| e.stats.steps as f64)
    }

    pub fn average_walls(&self, last_n: usize) -> f32 {
        self.mean_over(last_n, |e| e.stats.walls as f64)
    }

    /// Mean absolute TD error per learning update over the last N episodes.
    pub fn average_td_error(&self, last_n: usize) -> f32 {
        let n = self.episodes.len().min(last_n);
        let (sum, updates) = self
            .episodes
            .iter()
            .rev()
            .take(n)
            .fold((0.0, 0usize), |(sum, updates), e| {
                (sum + e.stats.abs_td_error, updates + e.stats.learning_updates)
            });
        if updates == 0 {
            return 0.0;
        }
        (sum / updates as f64) as f32
    }

    pub fn total_episodes(&self) -> usize {
        self.total_episodes
    }

    pub fn total_successes(&self) -> usize {
        self.total_successes
    }
}

impl Default for TrainingMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Wall-clock cost of maze episodes and training throughput.
pub struct TimingMetrics {
    episode_micros: VecDeque<u32>,
    capacity: usize,
    window_start: std::time::Instant,
    window_count: usize,
    window_eval_micros: u128, // greedy evaluation time
}

impl TimingMetrics {
    pub fn with_capacity(capacity: usize) -> Self {
        TimingMetrics {
            episode_micros: VecDeque::with_capacity(capacity),
            capacity,
            window_start: std::time::Instant::now(),
            window_count: 0,
            window_eval_micros: 0,
        }
    }

    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    pub fn record_episode_time(&mut self, d: std::time::Duration) {
        self.episode_micros
            .push_back(d.as_micros().min(u32::MAX as u128) as u32);
        if self.episode_micros.len() > self.capacity {
            self.episode_micros.pop_front();
        }
        self.window_count += 1;
    }

    /// Time spent on greedy evaluation runs; not counted as training time.
    pub fn record_eval_time(&mut self, d: std::time::Duration) {
        self.window_eval_micros += d.as_micros();
    }

    /// Mean duration in milliseconds of the last `last_n` episodes.
    pub fn avg_episode_ms(&self, last_n: usize) -> f32 {
        let n = self.episode_micros.len().min(last_n);
        if n == 0 {
            return 0.0;
        }
        let mean = self
            .episode_micros
            .iter()
            .rev()
            .take(n)
            .map(|&v| v as f64)
            .sum::<f64>()
            / n as f64;
        (mean / 1000.0) as f32
    }

    /// Training episodes per second of training time in the current window.
    pub fn episodes_per_sec(&self) -> f32 {
        let total_micros = self.window_start.elapsed().as_micros();
        let net_micros = total_micros.saturating_sub(self.window_eval_micros);
        if net_micros == 0 {
            return 0.0;
        }
        self.window_count as f32 / (net_micros as f32 / 1_000_000.0)
    }

    /// Start a new throughput window. The trainer does this after each
    /// progress log.
    pub fn reset_window(&mut self) {
        self.window_start = std::time::Instant::now();
        self.window_count = 0;
        self.window_eval_micros = 0;
    }
}

impl Default for TimingMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Position;
    use crate::training::episode::EpisodeStats;

    fn summary(result: EpisodeResult, score: f64, steps: usize, walls: usize) -> EpisodeSummary {
        EpisodeSummary {
            episode: 1,
            start: Position::new(0, 0),
            goal: Position::new(4, 4),
            distance: 10,
            stats: EpisodeStats {
                walls,
                steps,
                score,
                result,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_success_rate() {
        let mut m = TrainingMetrics::new();
        for _ in 0..7 {
            m.record_episode(summary(EpisodeResult::Success, 0.0, 10, 0));
        }
        for _ in 0..3 {
            m.record_episode(summary(EpisodeResult::Timeout, 0.0, 10, 0));
        }
        assert!((m.success_rate(10) - 0.7).abs() < 1e-6);
        assert!((m.success_rate(3) - 0.0).abs() < 1e-6);
        assert_eq!(m.total_successes(), 7);
    }

    #[test]
    fn test_averages() {
        let mut m = TrainingMetrics::new();
        m.record_episode(summary(EpisodeResult::Success, 5000.0, 20, 2));
        m.record_episode(summary(EpisodeResult::Timeout, -1000.0, 30, 4));
        assert!((m.average_score(10) - 2000.0).abs() < 1e-3);
        assert!((m.average_steps(10) - 25.0).abs() < 1e-6);
        assert!((m.average_walls(10) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_average_td_error_weights_by_updates() {
        let mut m = TrainingMetrics::new();
        let mut a = summary(EpisodeResult::Timeout, 0.0, 0, 0);
        a.stats.abs_td_error = 30.0;
        a.stats.learning_updates = 3;
        let mut b = summary(EpisodeResult::Timeout, 0.0, 0, 0);
        b.stats.abs_td_error = 10.0;
        b.stats.learning_updates = 1;
        m.record_episode(a);
        m.record_episode(b);
        assert!((m.average_td_error(10) - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_window_is_capped_but_total_is_not() {
        let mut m = TrainingMetrics::with_capacity(5);
        for _ in 0..12 {
            m.record_episode(summary(EpisodeResult::Success, 1.0, 1, 0));
        }
        assert_eq!(m.total_episodes(), 12);
        assert!((m.success_rate(100) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_metrics_are_zero() {
        let m = TrainingMetrics::new();
        assert_eq!(m.success_rate(10), 0.0);
        assert_eq!(m.average_td_error(10), 0.0);
    }

    #[test]
    fn test_timing_avg_episode_ms_last_n() {
        let mut t = TimingMetrics::new();
        t.record_episode_time(std::time::Duration::from_micros(1000));
        t.record_episode_time(std::time::Duration::from_micros(9000));
        t.record_episode_time(std::time::Duration::from_micros(5000)); // 5ms
        assert!((t.avg_episode_ms(1) - 5.0).abs() < 1e-3);
        assert!((t.avg_episode_ms(100) - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_eval_time_excluded_from_eps_per_sec() {
        let mut t = TimingMetrics::new();
        for _ in 0..10 {
            t.record_episode_time(std::time::Duration::from_micros(1000));
        }
        // Eval time longer than any real elapsed time leaves no training time
        t.record_eval_time(std::time::Duration::from_secs(9999));
        assert_eq!(t.episodes_per_sec(), 0.0);

        t.reset_window();
        for _ in 0..5 {
            t.record_episode_time(std::time::Duration::from_micros(1000));
        }
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(t.episodes_per_sec() > 0.0, "eval time should be cleared after reset");
    }
}
