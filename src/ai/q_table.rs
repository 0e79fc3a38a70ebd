use crate::error::MazeError;
use crate::maze::{Action, Position};

/// Dense rows x cols x 4 table of action values, zero-initialized and stored
/// contiguously with the four action slots of a cell side by side.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl QTable {
    pub fn new(rows: usize, cols: usize) -> Self {
        QTable {
            rows,
            cols,
            values: vec![0.0; rows * cols * Action::COUNT],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Fail with `CellOutOfBounds` unless `state` has a row in this table.
    pub fn check(&self, state: Position) -> Result<(), MazeError> {
        if state.row < self.rows && state.col < self.cols {
            Ok(())
        } else {
            Err(MazeError::CellOutOfBounds {
                cell: state,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    fn offset(&self, state: Position) -> usize {
        (state.row * self.cols + state.col) * Action::COUNT
    }

    /// The four action values of `state`, in action encoding order.
    ///
    /// Panics if `state` is outside the table; use [`QTable::check`] first for
    /// untrusted input.
    pub fn row(&self, state: Position) -> &[f64] {
        let start = self.offset(state);
        &self.values[start..start + Action::COUNT]
    }

    pub fn get(&self, state: Position, action: Action) -> f64 {
        self.values[self.offset(state) + action.index()]
    }

    pub fn set(&mut self, state: Position, action: Action, value: f64) {
        let idx = self.offset(state) + action.index();
        self.values[idx] = value;
    }

    /// Highest action value of `state`.
    pub fn max_value(&self, state: Position) -> f64 {
        self.row(state)
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_table_is_zero() {
        let table = QTable::new(3, 4);
        for row in 0..3 {
            for col in 0..4 {
                assert_eq!(table.row(Position::new(row, col)), &[0.0; 4]);
            }
        }
    }

    #[test]
    fn test_set_and_get_are_isolated() {
        let mut table = QTable::new(2, 2);
        table.set(Position::new(1, 0), Action::Left, 3.5);
        assert_eq!(table.get(Position::new(1, 0), Action::Left), 3.5);
        assert_eq!(table.get(Position::new(1, 0), Action::Right), 0.0);
        assert_eq!(table.get(Position::new(0, 1), Action::Left), 0.0);
        assert_eq!(table.row(Position::new(1, 0)), &[0.0, 0.0, 3.5, 0.0]);
    }

    #[test]
    fn test_max_value() {
        let mut table = QTable::new(1, 1);
        let s = Position::new(0, 0);
        table.set(s, Action::Up, -1.0);
        table.set(s, Action::Down, 2.0);
        table.set(s, Action::Left, 7.0);
        table.set(s, Action::Right, 7.0);
        assert_eq!(table.max_value(s), 7.0);
    }

    #[test]
    fn test_check_bounds() {
        let table = QTable::new(2, 3);
        assert!(table.check(Position::new(1, 2)).is_ok());
        assert!(table.check(Position::new(2, 0)).is_err());
    }
}
