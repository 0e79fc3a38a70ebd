use crate::error::MazeError;
use crate::maze::{Action, Position};

/// A single transition fed back to a learning agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Experience {
    pub state: Position,
    pub action: Action,
    pub reward: f64,
    pub next_state: Position,
    pub done: bool,
}

/// Metrics returned from a learning update.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UpdateMetrics {
    /// Bootstrapped target minus the previous estimate.
    pub td_error: f64,
    /// Estimate for (state, action) after the update.
    pub value: f64,
}

/// Universal interface for maze-navigating agents.
pub trait Agent {
    /// Select an action for the agent standing on `state`. `valid_moves` lists
    /// the actions that lead to open cells; an empty slice means "no hint".
    fn select_action(&mut self, state: Position, valid_moves: &[Action]) -> Action;

    /// Return the agent's display name.
    fn name(&self) -> &str;

    /// Learn from a single transition. Fails without touching learned state
    /// when the transition references cells the agent cannot represent.
    fn update(&mut self, _experience: &Experience) -> Result<UpdateMetrics, MazeError> {
        Ok(UpdateMetrics::default())
    }
}

/// Opaque eval state for enter/exit eval mode.
pub enum EvalState {
    Epsilon(f64),
    NoOp,
}

/// Extension trait for agents driven through full training episodes.
pub trait TrainableAgent: Agent {
    /// Current exploration probability.
    fn exploration(&self) -> f64;
    /// Pin the exploration probability (0.0 acts fully greedily).
    fn set_exploration(&mut self, epsilon: f64);
    /// Called once per completed training episode.
    fn decay_exploration(&mut self);
    /// Number of completed training episodes.
    fn episode_count(&self) -> usize;
    /// Exploration to use when returning from test mode to training.
    fn resume_exploration(&self) -> f64 {
        self.exploration()
    }
    /// Enter eval mode (greedy). Returns state to restore.
    fn enter_eval_mode(&mut self) -> EvalState {
        let saved = self.exploration();
        self.set_exploration(0.0);
        EvalState::Epsilon(saved)
    }
    /// Exit eval mode, restoring previous state.
    fn exit_eval_mode(&mut self, state: EvalState) {
        if let EvalState::Epsilon(eps) = state {
            self.set_exploration(eps);
        }
    }
}
