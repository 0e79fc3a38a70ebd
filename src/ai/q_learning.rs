use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use super::agent::{Agent, Experience, TrainableAgent, UpdateMetrics};
use super::q_table::QTable;
use crate::error::MazeError;
use crate::maze::{Action, Position};

/// Tabular Q-learning hyperparameters.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct QLearningConfig {
    pub learning_rate: f64,
    pub discount_factor: f64,
    /// Initial exploration probability.
    pub epsilon: f64,
    /// Multiplier applied to epsilon after each training episode.
    pub epsilon_decay: f64,
    pub min_epsilon: f64,
    /// Exploration restored when leaving test mode.
    pub resume_epsilon: f64,
    /// Upper bound of the uniform noise added to Q-values to break ties.
    pub tiebreak_noise: f64,
    pub seed: Option<u64>,
}

impl Default for QLearningConfig {
    fn default() -> Self {
        QLearningConfig {
            learning_rate: 0.7,
            discount_factor: 0.99,
            epsilon: 1.0,
            epsilon_decay: 0.80,
            min_epsilon: 0.01,
            resume_epsilon: 0.5,
            tiebreak_noise: 1e-5,
            seed: None,
        }
    }
}

/// Epsilon-greedy tabular Q-learning agent over (row, col) states.
pub struct QLearningAgent {
    q_table: QTable,
    config: QLearningConfig,
    epsilon: f64,
    step_count: usize,
    episode_count: usize,
    rng: StdRng,
}

impl QLearningAgent {
    pub fn new(rows: usize, cols: usize, config: QLearningConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        QLearningAgent {
            q_table: QTable::new(rows, cols),
            epsilon: config.epsilon,
            config,
            step_count: 0,
            episode_count: 0,
            rng,
        }
    }

    /// Epsilon-greedy selection.
    ///
    /// Exploration draws uniformly from `valid_moves`, or from every action
    /// when none are supplied. Exploitation takes the arg-max over the full
    /// value row after adding independent tiebreak noise to each slot.
    /// A state outside the table can only be explored.
    fn pick_action(&mut self, state: Position, valid_moves: &[Action]) -> Action {
        let known = self.q_table.check(state).is_ok();
        if !known || self.rng.random::<f64>() < self.epsilon {
            let choices: &[Action] = if valid_moves.is_empty() {
                &Action::ALL
            } else {
                valid_moves
            };
            return choices[self.rng.random_range(0..choices.len())];
        }

        let noise = self.config.tiebreak_noise;
        let mut best_action = Action::Up;
        let mut best_value = f64::NEG_INFINITY;
        for action in Action::ALL {
            let mut value = self.q_table.get(state, action);
            if noise > 0.0 {
                value += self.rng.random_range(0.0..noise);
            }
            if value > best_value {
                best_value = value;
                best_action = action;
            }
        }
        best_action
    }

    /// One-step Q-learning (Bellman) update:
    /// `Q[s,a] += α * (r + γ * max_a' Q[s',a'] * (1 - done) - Q[s,a])`.
    pub fn learn(&mut self, experience: &Experience) -> Result<UpdateMetrics, MazeError> {
        let Experience {
            state,
            action,
            reward,
            next_state,
            done,
        } = *experience;
        self.q_table.check(state)?;
        self.q_table.check(next_state)?;

        let old_value = self.q_table.get(state, action);
        let future = if done {
            0.0
        } else {
            self.q_table.max_value(next_state)
        };
        let td_error = reward + self.config.discount_factor * future - old_value;
        let value = old_value + self.config.learning_rate * td_error;
        self.q_table.set(state, action, value);
        self.step_count += 1;

        Ok(UpdateMetrics { td_error, value })
    }

    /// `ε ← max(min_epsilon, ε · epsilon_decay)`.
    pub fn decay_epsilon(&mut self) {
        self.epsilon = (self.epsilon * self.config.epsilon_decay).max(self.config.min_epsilon);
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Set epsilon directly (e.g. 0.0 for pure greedy inference).
    pub fn set_epsilon(&mut self, eps: f64) {
        self.epsilon = eps.clamp(0.0, 1.0);
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn q_table_mut(&mut self) -> &mut QTable {
        &mut self.q_table
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Drop everything learned and restart exploration, e.g. after the maze
    /// changed shape.
    pub fn reset(&mut self, rows: usize, cols: usize) {
        self.q_table = QTable::new(rows, cols);
        self.epsilon = self.config.epsilon;
        self.step_count = 0;
        self.episode_count = 0;
    }
}

impl Agent for QLearningAgent {
    fn select_action(&mut self, state: Position, valid_moves: &[Action]) -> Action {
        self.pick_action(state, valid_moves)
    }

    fn name(&self) -> &str {
        "Q-learning"
    }

    fn update(&mut self, experience: &Experience) -> Result<UpdateMetrics, MazeError> {
        self.learn(experience)
    }
}

impl TrainableAgent for QLearningAgent {
    fn exploration(&self) -> f64 {
        self.epsilon
    }

    fn set_exploration(&mut self, epsilon: f64) {
        self.set_epsilon(epsilon);
    }

    fn decay_exploration(&mut self) {
        self.episode_count += 1;
        self.decay_epsilon();
    }

    fn episode_count(&self) -> usize {
        self.episode_count
    }

    fn resume_exploration(&self) -> f64 {
        self.config.resume_epsilon
    }
}
