use std::collections::VecDeque;

use super::{Action, Grid, Position};
use crate::error::MazeError;

/// Ordered, 4-connected sequence of cells from a start to a goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    cells: Vec<Position>,
}

impl Path {
    /// Build a path, checking that it is non-empty and that each cell is
    /// adjacent to the next.
    pub fn new(cells: Vec<Position>) -> Result<Self, MazeError> {
        if cells.is_empty() {
            return Err(MazeError::InvalidPath("path is empty".into()));
        }
        if let Some(pair) = cells.windows(2).find(|w| !w[0].is_adjacent(w[1])) {
            return Err(MazeError::InvalidPath(format!(
                "{} is not adjacent to {}",
                pair[0], pair[1]
            )));
        }
        Ok(Path { cells })
    }

    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    /// Number of cells, including both endpoints.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of moves needed to walk the path.
    pub fn steps(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    pub fn start(&self) -> Position {
        self.cells[0]
    }

    pub fn goal(&self) -> Position {
        self.cells[self.cells.len() - 1]
    }

    /// The cell `distance` moves before the goal, clamped to the path start.
    pub fn cell_before_goal(&self, distance: usize) -> Position {
        let index = self.steps().saturating_sub(distance);
        self.cells[index]
    }

    /// Check every cell is inside `grid` and open.
    pub fn validate_on(&self, grid: &Grid) -> Result<(), MazeError> {
        for &cell in &self.cells {
            grid.check_bounds(cell)?;
            if !grid.is_open(cell) {
                return Err(MazeError::BlockedCell(cell));
            }
        }
        Ok(())
    }
}

/// Breadth-first search over open, 4-connected cells.
///
/// Returns `Ok(None)` when the goal is unreachable (including when either
/// endpoint is a wall) and `Err` when either endpoint lies outside the grid.
/// The first time the goal is dequeued its path is returned, so the result is
/// a shortest path.
pub fn shortest_path(
    grid: &Grid,
    start: Position,
    goal: Position,
) -> Result<Option<Path>, MazeError> {
    grid.check_bounds(start)?;
    grid.check_bounds(goal)?;
    if !grid.is_open(start) || !grid.is_open(goal) {
        return Ok(None);
    }

    let mut parent: Vec<Option<usize>> = vec![None; grid.rows() * grid.cols()];
    let mut visited = vec![false; grid.rows() * grid.cols()];
    let mut frontier = VecDeque::new();

    let start_idx = grid.index(start);
    visited[start_idx] = true;
    frontier.push_back(start);

    while let Some(cell) = frontier.pop_front() {
        if cell == goal {
            return Ok(Some(reconstruct(grid, &parent, goal)));
        }
        for action in Action::ALL {
            let Some(next) = grid.neighbor(cell, action) else {
                continue;
            };
            let idx = grid.index(next);
            if visited[idx] || !grid.is_open(next) {
                continue;
            }
            visited[idx] = true;
            parent[idx] = Some(grid.index(cell));
            frontier.push_back(next);
        }
    }

    Ok(None)
}

fn reconstruct(grid: &Grid, parent: &[Option<usize>], goal: Position) -> Path {
    let mut cells = vec![goal];
    let mut idx = grid.index(goal);
    while let Some(prev) = parent[idx] {
        cells.push(grid.position(prev));
        idx = prev;
    }
    cells.reverse();
    Path { cells }
}
