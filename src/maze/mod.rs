//! Maze representation and the two algorithms that operate on it: the
//! guaranteed-solvable random generator and the breadth-first path finder.

mod action;
mod generator;
mod grid;
mod pathfinder;

pub use action::Action;
pub use generator::{check_dimensions, MazeConfig, MazeGenerator};
pub use grid::{Grid, Position, Tile};
pub use pathfinder::{shortest_path, Path};
