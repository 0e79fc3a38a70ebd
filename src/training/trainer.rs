use std::time::Instant;

use crate::ai::{RandomAgent, TrainableAgent};
use crate::error::MazeError;
use crate::training::episode::EpisodeController;
use crate::training::metrics::{TimingMetrics, TrainingMetrics};

/// Trainer configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub num_episodes: usize,
    /// Decisions per episode before it is stopped as a timeout.
    pub max_steps_per_episode: usize,
    pub log_interval: usize,
    pub eval_interval: usize,
    pub eval_episodes: usize,
    /// Seeds the random baseline agent.
    pub seed: Option<u64>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            num_episodes: 500,
            max_steps_per_episode: 2_000,
            log_interval: 50,
            eval_interval: 100,
            eval_episodes: 10,
            seed: None,
        }
    }
}

/// Outcome of a greedy evaluation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize)]
pub struct EvalReport {
    pub success_rate: f32,
    pub average_steps: f32,
}

/// Result of a whole training run.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct TrainingSummary {
    pub agent: String,
    pub episodes: usize,
    pub successes: usize,
    /// Success rate over the last `log_interval` training episodes.
    pub recent_success_rate: f32,
    pub average_score: f32,
    pub average_steps: f32,
    pub final_epsilon: f64,
    pub curriculum_distance: usize,
    pub eval: EvalReport,
    pub random_baseline: EvalReport,
    pub episodes_per_sec: f32,
}

/// Headless training loop over one maze.
pub struct Trainer {
    config: TrainerConfig,
}

impl Trainer {
    pub fn new(config: TrainerConfig) -> Self {
        Trainer { config }
    }

    /// Run `num_episodes` training episodes on `controller`, then evaluate the
    /// agent greedily and compare it against a uniform-random baseline.
    pub fn train(
        &self,
        agent: &mut dyn TrainableAgent,
        controller: &mut EpisodeController,
    ) -> Result<TrainingSummary, MazeError> {
        let mut metrics = TrainingMetrics::with_capacity(self.config.log_interval.max(1));
        let mut timing = TimingMetrics::new();
        let window = self.config.log_interval.max(1);
        let run_start = Instant::now();

        tracing::info!(
            agent = agent.name(),
            episodes = self.config.num_episodes,
            rows = controller.grid().rows(),
            cols = controller.grid().cols(),
            "starting training"
        );

        for _ in 0..self.config.num_episodes {
            let episode_start = Instant::now();
            let summary = controller.run_episode(agent, self.config.max_steps_per_episode)?;
            timing.record_episode_time(episode_start.elapsed());
            let episode = summary.episode;
            metrics.record_episode(summary);

            if self.config.log_interval > 0 && episode % self.config.log_interval == 0 {
                tracing::info!(
                    episode,
                    epsilon = agent.exploration(),
                    success_rate = metrics.success_rate(window),
                    avg_score = metrics.average_score(window),
                    avg_steps = metrics.average_steps(window),
                    avg_walls = metrics.average_walls(window),
                    td_error = metrics.average_td_error(window),
                    distance = controller.curriculum_distance(),
                    eps_per_sec = timing.episodes_per_sec(),
                    avg_ms = timing.avg_episode_ms(window),
                    "training progress"
                );
                timing.reset_window();
            }

            if self.config.eval_interval > 0 && episode % self.config.eval_interval == 0 {
                let eval_start = Instant::now();
                let report = self.evaluate(agent, controller)?;
                timing.record_eval_time(eval_start.elapsed());
                tracing::info!(
                    episode,
                    success_rate = report.success_rate,
                    avg_steps = report.average_steps,
                    "greedy evaluation"
                );
            }
        }

        let eval = self.evaluate(agent, controller)?;
        let mut random = match self.config.seed {
            Some(seed) => RandomAgent::with_seed(seed),
            None => RandomAgent::new(),
        };
        let random_baseline = self.evaluate(&mut random, controller)?;

        let elapsed = run_start.elapsed().as_secs_f32();
        let summary = TrainingSummary {
            agent: agent.name().to_string(),
            episodes: metrics.total_episodes(),
            successes: metrics.total_successes(),
            recent_success_rate: metrics.success_rate(window),
            average_score: metrics.average_score(window),
            average_steps: metrics.average_steps(window),
            final_epsilon: agent.exploration(),
            curriculum_distance: controller.curriculum_distance(),
            eval,
            random_baseline,
            episodes_per_sec: if elapsed > 0.0 {
                metrics.total_episodes() as f32 / elapsed
            } else {
                0.0
            },
        };
        tracing::info!(
            episodes = summary.episodes,
            successes = summary.successes,
            eval_success_rate = summary.eval.success_rate,
            random_success_rate = summary.random_baseline.success_rate,
            "training complete"
        );
        Ok(summary)
    }

    /// Play `eval_episodes` greedy episodes, each on a fresh evaluation copy
    /// of `controller`. Neither the agent's exploration nor the controller is
    /// changed.
    pub fn evaluate(
        &self,
        agent: &mut dyn TrainableAgent,
        controller: &EpisodeController,
    ) -> Result<EvalReport, MazeError> {
        if self.config.eval_episodes == 0 {
            return Ok(EvalReport::default());
        }
        let saved = agent.enter_eval_mode();
        let mut successes = 0usize;
        let mut steps = 0usize;
        let mut outcome = Ok(());
        for _ in 0..self.config.eval_episodes {
            let mut trial = controller.evaluation_copy();
            match trial.run_episode(agent, self.config.max_steps_per_episode) {
                Ok(summary) => {
                    if summary.succeeded() {
                        successes += 1;
                    }
                    steps += summary.stats.steps;
                }
                Err(e) => {
                    outcome = Err(e);
                    break;
                }
            }
        }
        agent.exit_eval_mode(saved);
        outcome?;

        let n = self.config.eval_episodes as f32;
        Ok(EvalReport {
            success_rate: successes as f32 / n,
            average_steps: steps as f32 / n,
        })
    }
}
