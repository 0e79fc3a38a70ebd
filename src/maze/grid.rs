use std::fmt;

use serde::{Deserialize, Serialize};

use super::Action;
use crate::error::MazeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tile {
    Wall,
    Open,
}

/// A (row, column) coordinate. Row 0 is the top of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }

    /// Manhattan (L1) distance to another cell.
    pub fn manhattan(self, other: Position) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// The neighboring cell in `action`'s direction, or `None` when it would
    /// leave a `rows` x `cols` grid.
    pub fn step(self, action: Action, rows: usize, cols: usize) -> Option<Position> {
        let (row, col) = match action {
            Action::Up => (self.row.checked_sub(1)?, self.col),
            Action::Down => (self.row + 1, self.col),
            Action::Left => (self.row, self.col.checked_sub(1)?),
            Action::Right => (self.row, self.col + 1),
        };
        (row < rows && col < cols).then_some(Position { row, col })
    }

    /// True when the two cells share an edge.
    pub fn is_adjacent(self, other: Position) -> bool {
        self.manhattan(other) == 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Rectangular occupancy grid, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Create a grid with every cell set to `tile`.
    pub fn filled(rows: usize, cols: usize, tile: Tile) -> Self {
        Grid {
            rows,
            cols,
            tiles: vec![tile; rows * cols],
        }
    }

    /// Parse a grid from text where `#` is a wall and `.` is open.
    /// Blank lines and surrounding whitespace are ignored.
    pub fn from_ascii(text: &str) -> Result<Self, MazeError> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let rows = lines.len();
        let cols = lines.first().map_or(0, |line| line.chars().count());
        if rows == 0 || cols == 0 {
            return Err(MazeError::InvalidGridSize {
                rows,
                cols,
                reason: "grid text is empty",
            });
        }

        let mut tiles = Vec::with_capacity(rows * cols);
        for line in &lines {
            if line.chars().count() != cols {
                return Err(MazeError::InvalidGridSize {
                    rows,
                    cols,
                    reason: "rows have different lengths",
                });
            }
            for ch in line.chars() {
                tiles.push(match ch {
                    '#' => Tile::Wall,
                    '.' => Tile::Open,
                    _ => {
                        return Err(MazeError::InvalidGridSize {
                            rows,
                            cols,
                            reason: "unexpected tile character",
                        })
                    }
                });
            }
        }

        Ok(Grid { rows, cols, tiles })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Fail with `CellOutOfBounds` unless `pos` lies inside the grid.
    pub fn check_bounds(&self, pos: Position) -> Result<(), MazeError> {
        if self.contains(pos) {
            Ok(())
        } else {
            Err(MazeError::CellOutOfBounds {
                cell: pos,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    pub fn get(&self, pos: Position) -> Option<Tile> {
        self.contains(pos).then(|| self.tiles[self.index(pos)])
    }

    /// Out-of-bounds cells count as walls.
    pub fn is_open(&self, pos: Position) -> bool {
        self.get(pos) == Some(Tile::Open)
    }

    pub(crate) fn set(&mut self, pos: Position, tile: Tile) {
        let idx = self.index(pos);
        self.tiles[idx] = tile;
    }

    /// Row-major index of an in-bounds cell.
    pub(crate) fn index(&self, pos: Position) -> usize {
        pos.row * self.cols + pos.col
    }

    pub(crate) fn position(&self, index: usize) -> Position {
        Position::new(index / self.cols, index % self.cols)
    }

    /// The in-bounds neighbor of `pos` in `action`'s direction.
    pub fn neighbor(&self, pos: Position, action: Action) -> Option<Position> {
        pos.step(action, self.rows, self.cols)
    }

    /// Actions from `pos` that land on an open, in-bounds cell, in encoding order.
    pub fn valid_moves(&self, pos: Position) -> Vec<Action> {
        Action::ALL
            .into_iter()
            .filter(|&action| {
                self.neighbor(pos, action)
                    .is_some_and(|next| self.is_open(next))
            })
            .collect()
    }

    pub fn open_count(&self) -> usize {
        self.tiles.iter().filter(|&&t| t == Tile::Open).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manhattan() {
        assert_eq!(Position::new(0, 0).manhattan(Position::new(4, 4)), 8);
        assert_eq!(Position::new(0, 1).manhattan(Position::new(4, 4)), 7);
        assert_eq!(Position::new(3, 2).manhattan(Position::new(3, 2)), 0);
    }

    #[test]
    fn test_step_respects_bounds() {
        let origin = Position::new(0, 0);
        assert_eq!(origin.step(Action::Up, 3, 3), None);
        assert_eq!(origin.step(Action::Left, 3, 3), None);
        assert_eq!(origin.step(Action::Down, 3, 3), Some(Position::new(1, 0)));
        assert_eq!(origin.step(Action::Right, 3, 3), Some(Position::new(0, 1)));

        let corner = Position::new(2, 2);
        assert_eq!(corner.step(Action::Down, 3, 3), None);
        assert_eq!(corner.step(Action::Right, 3, 3), None);
    }

    #[test]
    fn test_from_ascii() {
        let grid = Grid::from_ascii(
            "
            ..#
            #..
            ",
        )
        .unwrap();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.get(Position::new(0, 2)), Some(Tile::Wall));
        assert_eq!(grid.get(Position::new(1, 1)), Some(Tile::Open));
        assert_eq!(grid.get(Position::new(2, 0)), None);
        assert_eq!(grid.open_count(), 4);
    }

    #[test]
    fn test_from_ascii_rejects_ragged_rows() {
        let err = Grid::from_ascii("...\n..").unwrap_err();
        assert!(matches!(err, MazeError::InvalidGridSize { .. }));
    }

    #[test]
    fn test_from_ascii_rejects_unknown_tiles() {
        assert!(Grid::from_ascii(".x.").is_err());
    }

    #[test]
    fn test_out_of_bounds_is_wall() {
        let grid = Grid::filled(3, 3, Tile::Open);
        assert!(!grid.is_open(Position::new(3, 0)));
        assert!(grid.check_bounds(Position::new(0, 3)).is_err());
        assert!(grid.check_bounds(Position::new(2, 2)).is_ok());
    }

    #[test]
    fn test_valid_moves() {
        let grid = Grid::from_ascii(
            "
            .#.
            ...
            #..
            ",
        )
        .unwrap();
        assert_eq!(grid.valid_moves(Position::new(0, 0)), vec![Action::Down]);
        assert_eq!(
            grid.valid_moves(Position::new(1, 1)),
            vec![Action::Down, Action::Left, Action::Right]
        );
    }

    #[test]
    fn test_index_round_trip() {
        let grid = Grid::filled(3, 5, Tile::Wall);
        let pos = Position::new(2, 3);
        assert_eq!(grid.position(grid.index(pos)), pos);
    }
}
