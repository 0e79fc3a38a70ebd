use crate::maze::{Path, Position};

/// Reverse-curriculum settings.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CurriculumConfig {
    /// Moves before the goal at which the first episode starts.
    pub initial_distance: usize,
    /// Added to the distance after every successful episode.
    pub advance_on_success: usize,
}

impl Default for CurriculumConfig {
    fn default() -> Self {
        CurriculumConfig {
            initial_distance: 10,
            advance_on_success: 1,
        }
    }
}

/// Places episode starts along the reference path, moving them further from
/// the goal as the agent succeeds.
#[derive(Debug, Clone)]
pub struct Curriculum {
    config: CurriculumConfig,
    distance: usize,
}

impl Curriculum {
    pub fn new(config: CurriculumConfig) -> Self {
        let distance = config.initial_distance;
        Curriculum { config, distance }
    }

    pub fn distance(&self) -> usize {
        self.distance
    }

    pub fn advance(&mut self) {
        self.distance = self.distance.saturating_add(self.config.advance_on_success);
    }

    /// Back to the initial distance, used when the maze changes.
    pub fn reset(&mut self) {
        self.distance = self.config.initial_distance;
    }

    /// Start cell on `path` for the current distance, clamped to the path start.
    pub fn start_on(&self, path: &Path) -> Position {
        path.cell_before_goal(self.distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_path(len: usize) -> Path {
        Path::new((0..len).map(|c| Position::new(0, c)).collect()).unwrap()
    }

    #[test]
    fn test_start_moves_back_on_advance() {
        let path = straight_path(20);
        let mut c = Curriculum::new(CurriculumConfig::default());
        assert_eq!(c.start_on(&path), Position::new(0, 9));
        c.advance();
        assert_eq!(c.distance(), 11);
        assert_eq!(c.start_on(&path), Position::new(0, 8));
    }

    #[test]
    fn test_start_clamps_to_path_start() {
        let path = straight_path(5);
        let c = Curriculum::new(CurriculumConfig::default());
        assert_eq!(c.start_on(&path), Position::new(0, 0));
    }

    #[test]
    fn test_reset() {
        let mut c = Curriculum::new(CurriculumConfig {
            initial_distance: 3,
            advance_on_success: 2,
        });
        c.advance();
        c.advance();
        assert_eq!(c.distance(), 7);
        c.reset();
        assert_eq!(c.distance(), 3);
    }
}
