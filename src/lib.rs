//! # ML Maze
//!
//! A grid maze environment with a tabular Q-learning agent. Mazes are carved
//! by a randomized depth-first backtracker, solved with breadth-first search,
//! and learned through shaped rewards and a reverse curriculum.
//!
//! ## Modules
//!
//! - [`maze`] — Grid, positions, actions, maze generation and path finding
//! - [`ai`] — Agent traits, Q-table, Q-learning and random agents
//! - [`training`] — Reward policy, episode controller, curriculum, metrics, trainer
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types

pub mod ai;
pub mod config;
pub mod error;
pub mod maze;
pub mod training;
