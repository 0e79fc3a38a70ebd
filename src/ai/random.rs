use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use super::agent::{Agent, EvalState, TrainableAgent};
use crate::maze::{Action, Position};

/// An agent that selects uniformly at random from the valid moves.
pub struct RandomAgent {
    rng: StdRng,
    episodes: usize,
}

impl RandomAgent {
    pub fn new() -> Self {
        RandomAgent {
            rng: StdRng::from_os_rng(),
            episodes: 0,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        RandomAgent {
            rng: StdRng::seed_from_u64(seed),
            episodes: 0,
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn select_action(&mut self, _state: Position, valid_moves: &[Action]) -> Action {
        let choices: &[Action] = if valid_moves.is_empty() {
            &Action::ALL
        } else {
            valid_moves
        };
        choices[self.rng.random_range(0..choices.len())]
    }

    fn name(&self) -> &str {
        "Random"
    }
}

impl TrainableAgent for RandomAgent {
    fn exploration(&self) -> f64 {
        1.0
    }

    fn set_exploration(&mut self, _epsilon: f64) {}

    fn decay_exploration(&mut self) {
        self.episodes += 1;
    }

    fn episode_count(&self) -> usize {
        self.episodes
    }

    fn enter_eval_mode(&mut self) -> EvalState {
        EvalState::NoOp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_agent_selects_valid_move() {
        let mut agent = RandomAgent::with_seed(11);
        let valid = [Action::Down, Action::Right];

        for _ in 0..100 {
            let action = agent.select_action(Position::new(0, 0), &valid);
            assert!(valid.contains(&action), "Action {:?} is not valid", action);
        }
    }

    #[test]
    fn test_random_agent_falls_back_to_all_actions() {
        let mut agent = RandomAgent::with_seed(5);
        let mut seen = [false; Action::COUNT];
        for _ in 0..200 {
            seen[agent.select_action(Position::new(1, 1), &[]).index()] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_random_agent_name() {
        let agent = RandomAgent::new();
        assert_eq!(agent.name(), "Random");
    }
}
