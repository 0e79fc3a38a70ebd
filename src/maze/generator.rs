use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::{shortest_path, Grid, Path, Position, Tile};
use crate::error::MazeError;

/// Maze dimensions and generation limits.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    pub rows: usize,
    pub cols: usize,
    /// Regeneration cap before giving up with `GenerationExhausted`.
    pub max_attempts: usize,
    /// Reject even dimensions; carving lands on even coordinates only.
    pub require_odd: bool,
    pub seed: Option<u64>,
}

impl Default for MazeConfig {
    fn default() -> Self {
        MazeConfig {
            rows: 21,
            cols: 31,
            max_attempts: 1000,
            require_odd: true,
            seed: None,
        }
    }
}

/// Check that a `rows` x `cols` grid can be carved.
pub fn check_dimensions(rows: usize, cols: usize, require_odd: bool) -> Result<(), MazeError> {
    if rows < 3 || cols < 3 {
        return Err(MazeError::InvalidGridSize {
            rows,
            cols,
            reason: "rows and cols must be >= 3",
        });
    }
    if require_odd && (rows % 2 == 0 || cols % 2 == 0) {
        return Err(MazeError::InvalidGridSize {
            rows,
            cols,
            reason: "rows and cols must be odd",
        });
    }
    Ok(())
}

/// Randomized depth-first carver producing perfect mazes that are always
/// solvable from the top-left to the bottom-right corner.
pub struct MazeGenerator {
    rng: StdRng,
    max_attempts: usize,
    require_odd: bool,
}

/// One pending carve step: the cell and its shuffled two-step directions.
struct Frame {
    cell: Position,
    directions: [(isize, isize); 4],
    next: usize,
}

const CARVE_DIRECTIONS: [(isize, isize); 4] = [(0, 2), (0, -2), (2, 0), (-2, 0)];

impl MazeGenerator {
    /// Seeded generator, or one seeded from the OS when `seed` is `None`.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let defaults = MazeConfig::default();
        MazeGenerator {
            rng,
            max_attempts: defaults.max_attempts,
            require_odd: defaults.require_odd,
        }
    }

    pub fn from_config(config: &MazeConfig) -> Self {
        MazeGenerator::new(config.seed)
            .with_max_attempts(config.max_attempts)
            .with_require_odd(config.require_odd)
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_require_odd(mut self, require_odd: bool) -> Self {
        self.require_odd = require_odd;
        self
    }

    /// Generate a maze together with its shortest reference path from
    /// (0, 0) to (rows - 1, cols - 1).
    pub fn generate(&mut self, rows: usize, cols: usize) -> Result<(Grid, Path), MazeError> {
        check_dimensions(rows, cols, self.require_odd)?;

        let start = Position::new(0, 0);
        let goal = Position::new(rows - 1, cols - 1);

        for attempt in 1..=self.max_attempts {
            let mut grid = Grid::filled(rows, cols, Tile::Wall);
            self.carve(&mut grid, start);

            grid.set(start, Tile::Open);
            grid.set(Position::new(0, 1), Tile::Open);
            grid.set(goal, Tile::Open);
            grid.set(Position::new(rows - 1, cols - 2), Tile::Open);

            if let Some(path) = shortest_path(&grid, start, goal)? {
                tracing::debug!(
                    rows,
                    cols,
                    attempt,
                    open = grid.open_count(),
                    path_len = path.len(),
                    "maze generated"
                );
                return Ok((grid, path));
            }
            tracing::debug!(attempt, "maze unsolvable, regenerating");
        }

        Err(MazeError::GenerationExhausted {
            attempts: self.max_attempts,
        })
    }

    /// Depth-first carving with an explicit stack. Visits neighbors in the
    /// same order a recursive carver would.
    fn carve(&mut self, grid: &mut Grid, origin: Position) {
        grid.set(origin, Tile::Open);
        let mut stack = vec![self.frame(origin)];

        while let Some(top) = stack.last_mut() {
            if top.next == top.directions.len() {
                stack.pop();
                continue;
            }
            let (dr, dc) = top.directions[top.next];
            top.next += 1;
            let cell = top.cell;

            let Some(next) = offset(cell, dr, dc, grid) else {
                continue;
            };
            if grid.get(next) != Some(Tile::Wall) {
                continue;
            }
            let Some(between) = offset(cell, dr / 2, dc / 2, grid) else {
                continue;
            };
            grid.set(between, Tile::Open);
            grid.set(next, Tile::Open);
            let frame = self.frame(next);
            stack.push(frame);
        }
    }

    fn frame(&mut self, cell: Position) -> Frame {
        let mut directions = CARVE_DIRECTIONS;
        directions.shuffle(&mut self.rng);
        Frame {
            cell,
            directions,
            next: 0,
        }
    }
}

fn offset(cell: Position, dr: isize, dc: isize, grid: &Grid) -> Option<Position> {
    let row = cell.row.checked_add_signed(dr)?;
    let col = cell.col.checked_add_signed(dc)?;
    let pos = Position::new(row, col);
    grid.contains(pos).then_some(pos)
}
