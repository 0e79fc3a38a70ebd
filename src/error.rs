use std::path::PathBuf;

use crate::maze::Position;

/// Errors raised by maze construction, path queries and agent placement.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MazeError {
    #[error("invalid grid size {rows}x{cols}: {reason}")]
    InvalidGridSize {
        rows: usize,
        cols: usize,
        reason: &'static str,
    },

    #[error("no solvable maze after {attempts} attempts")]
    GenerationExhausted { attempts: usize },

    #[error("cell {cell} is outside the {rows}x{cols} grid")]
    CellOutOfBounds {
        cell: Position,
        rows: usize,
        cols: usize,
    },

    #[error("cell {0} is a wall")]
    BlockedCell(Position),

    #[error("invalid reference path: {0}")]
    InvalidPath(String),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_grid_size_display() {
        let err = MazeError::InvalidGridSize {
            rows: 2,
            cols: 7,
            reason: "rows and cols must be >= 3",
        };
        assert_eq!(
            err.to_string(),
            "invalid grid size 2x7: rows and cols must be >= 3"
        );
    }

    #[test]
    fn test_out_of_bounds_display() {
        let err = MazeError::CellOutOfBounds {
            cell: Position::new(5, 1),
            rows: 5,
            cols: 5,
        };
        assert_eq!(err.to_string(), "cell (5, 1) is outside the 5x5 grid");
    }

    #[test]
    fn test_generation_exhausted_display() {
        let err = MazeError::GenerationExhausted { attempts: 1000 };
        assert_eq!(err.to_string(), "no solvable maze after 1000 attempts");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("agent.learning_rate must be in (0, 1]".to_string());
        assert_eq!(
            err.to_string(),
            "config validation error: agent.learning_rate must be in (0, 1]"
        );
    }
}
