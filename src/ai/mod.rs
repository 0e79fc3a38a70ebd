//! Agents: the shared agent traits, the dense Q-value table, the tabular
//! Q-learning agent and a uniform random baseline.

mod agent;
mod q_learning;
mod q_table;
mod random;

pub use agent::{Agent, EvalState, Experience, TrainableAgent, UpdateMetrics};
pub use q_learning::{QLearningAgent, QLearningConfig};
pub use q_table::QTable;
pub use random::RandomAgent;
