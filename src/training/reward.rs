use std::collections::HashSet;

use crate::maze::{Action, Grid, Position};

/// Reward shaping constants.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Moving into a wall or off the grid.
    pub collision: f64,
    /// Reaching the goal.
    pub goal: f64,
    /// Cost of living, applied to every non-collision, non-goal move.
    pub step_cost: f64,
    /// Bonus for a new cell that is strictly closer (Manhattan) to the goal.
    pub closer_bonus: f64,
    /// Bonus for a new cell that is not closer.
    pub new_tile_bonus: f64,
    /// Penalty for re-entering a cell already visited this episode.
    pub revisit_penalty: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        RewardConfig {
            collision: -50.0,
            goal: 5000.0,
            step_cost: -5.0,
            closer_bonus: 200.0,
            new_tile_bonus: 20.0,
            revisit_penalty: -50.0,
        }
    }
}

/// Classification of a single move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// Wall or boundary hit; the agent stays put.
    Collision,
    Goal,
    /// New cell, Manhattan distance to the goal strictly decreased.
    Closer,
    /// New cell, not closer.
    NewTile,
    /// Cell already visited this episode.
    Revisit,
}

impl Transition {
    pub fn is_terminal(self) -> bool {
        self == Transition::Goal
    }

    /// True for transitions that discover a cell.
    pub fn is_new_tile(self) -> bool {
        matches!(self, Transition::Closer | Transition::NewTile)
    }

    pub fn name(self) -> &'static str {
        match self {
            Transition::Collision => "collision",
            Transition::Goal => "goal",
            Transition::Closer => "closer",
            Transition::NewTile => "new_tile",
            Transition::Revisit => "revisit",
        }
    }
}

/// Maps moves to shaped rewards.
///
/// The "closer" check only looks at immediate Manhattan distance, so a move
/// into a dead end that is nominally closer still earns the closer bonus.
#[derive(Debug, Clone)]
pub struct RewardPolicy {
    config: RewardConfig,
}

impl RewardPolicy {
    pub fn new(config: RewardConfig) -> Self {
        RewardPolicy { config }
    }

    /// Classify the move of `action` from `current`, returning the transition
    /// and the cell the agent ends up on.
    pub fn classify(
        &self,
        grid: &Grid,
        current: Position,
        action: Action,
        goal: Position,
        visited: &HashSet<Position>,
    ) -> (Transition, Position) {
        let candidate = match grid.neighbor(current, action) {
            Some(next) if grid.is_open(next) => next,
            _ => return (Transition::Collision, current),
        };

        if candidate == goal {
            return (Transition::Goal, candidate);
        }

        let transition = if visited.contains(&candidate) {
            Transition::Revisit
        } else if candidate.manhattan(goal) < current.manhattan(goal) {
            Transition::Closer
        } else {
            Transition::NewTile
        };
        (transition, candidate)
    }

    /// Net reward of a transition.
    pub fn reward(&self, transition: Transition) -> f64 {
        let c = &self.config;
        match transition {
            Transition::Collision => c.collision,
            Transition::Goal => c.goal,
            Transition::Closer => c.step_cost + c.closer_bonus,
            Transition::NewTile => c.step_cost + c.new_tile_bonus,
            Transition::Revisit => c.step_cost + c.revisit_penalty,
        }
    }
}

impl Default for RewardPolicy {
    fn default() -> Self {
        RewardPolicy::new(RewardConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Grid {
        Grid::from_ascii(
            "
            .....
            #.#..
            .....
            .#...
            #....
            ",
        )
        .unwrap()
    }

    const GOAL: Position = Position::new(4, 4);

    #[test]
    fn test_new_closer_cell() {
        let policy = RewardPolicy::default();
        let visited = HashSet::new();
        let (t, next) =
            policy.classify(&grid(), Position::new(0, 0), Action::Right, GOAL, &visited);
        assert_eq!(t, Transition::Closer);
        assert_eq!(next, Position::new(0, 1));
        assert_eq!(policy.reward(t), 195.0);
    }

    #[test]
    fn test_wall_collision_keeps_position() {
        let policy = RewardPolicy::default();
        let visited = HashSet::new();
        let (t, next) = policy.classify(&grid(), Position::new(0, 0), Action::Down, GOAL, &visited);
        assert_eq!(t, Transition::Collision);
        assert_eq!(next, Position::new(0, 0));
        assert_eq!(policy.reward(t), -50.0);
    }

    #[test]
    fn test_boundary_collision_matches_wall_collision() {
        let policy = RewardPolicy::default();
        let visited = HashSet::new();
        let g = grid();
        let up = policy.classify(&g, Position::new(0, 0), Action::Up, GOAL, &visited);
        let left = policy.classify(&g, Position::new(0, 0), Action::Left, GOAL, &visited);
        let wall = policy.classify(&g, Position::new(0, 0), Action::Down, GOAL, &visited);
        assert_eq!(up, wall);
        assert_eq!(left, wall);
    }

    #[test]
    fn test_revisit_penalty() {
        let policy = RewardPolicy::default();
        let visited: HashSet<Position> = [Position::new(0, 1)].into_iter().collect();
        let (t, next) =
            policy.classify(&grid(), Position::new(0, 0), Action::Right, GOAL, &visited);
        assert_eq!(t, Transition::Revisit);
        assert_eq!(next, Position::new(0, 1));
        assert_eq!(policy.reward(t), -55.0);
    }

    #[test]
    fn test_new_cell_not_closer() {
        let policy = RewardPolicy::default();
        let visited = HashSet::new();
        let (t, _) = policy.classify(&grid(), Position::new(0, 1), Action::Left, GOAL, &visited);
        assert_eq!(t, Transition::NewTile);
        assert_eq!(policy.reward(t), 15.0);
    }

    #[test]
    fn test_goal_wins_over_revisit() {
        let policy = RewardPolicy::default();
        let visited: HashSet<Position> = [GOAL].into_iter().collect();
        let (t, next) =
            policy.classify(&grid(), Position::new(4, 3), Action::Right, GOAL, &visited);
        assert_eq!(t, Transition::Goal);
        assert!(t.is_terminal());
        assert_eq!(next, GOAL);
        assert_eq!(policy.reward(t), 5000.0);
    }

    #[test]
    fn test_dead_end_counts_as_closer() {
        // (3, 0) is closer to the goal than (2, 0) by L1 but is a dead end.
        let policy = RewardPolicy::default();
        let visited = HashSet::new();
        let (t, _) = policy.classify(&grid(), Position::new(2, 0), Action::Down, GOAL, &visited);
        assert_eq!(t, Transition::Closer);
    }

    #[test]
    fn test_only_closer_and_new_tile_discover_cells() {
        assert!(Transition::Closer.is_new_tile());
        assert!(Transition::NewTile.is_new_tile());
        assert!(!Transition::Revisit.is_new_tile());
        assert!(!Transition::Collision.is_new_tile());
        assert!(!Transition::Goal.is_new_tile());
        assert_eq!(Transition::NewTile.name(), "new_tile");
    }
}
