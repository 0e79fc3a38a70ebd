use std::collections::HashSet;

use crate::ai::{Experience, TrainableAgent};
use crate::error::MazeError;
use crate::maze::{shortest_path, Action, Grid, MazeGenerator, Path, Position};
use crate::training::curriculum::{Curriculum, CurriculumConfig};
use crate::training::reward::{RewardConfig, RewardPolicy, Transition};

/// How an episode ended, or `Running` while it is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub enum EpisodeResult {
    #[default]
    Running,
    Success,
    /// Stopped externally before reaching the goal.
    Timeout,
}

/// Per-episode counters.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct EpisodeStats {
    pub walls: usize,
    /// New tiles discovered.
    pub explored: usize,
    /// Moves onto non-goal cells.
    pub steps: usize,
    /// Sum of rewards.
    pub score: f64,
    pub result: EpisodeResult,
    pub learning_updates: usize,
    pub abs_td_error: f64,
}

/// What happened on one simulation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub experience: Experience,
    pub transition: Transition,
}

/// Record of a finished episode.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeSummary {
    /// 1-based episode number.
    pub episode: usize,
    pub start: Position,
    pub goal: Position,
    /// Curriculum distance the episode was played at.
    pub distance: usize,
    pub stats: EpisodeStats,
}

impl EpisodeSummary {
    pub fn succeeded(&self) -> bool {
        self.stats.result == EpisodeResult::Success
    }
}

/// Transient per-episode bookkeeping.
#[derive(Debug, Clone)]
struct EpisodeState {
    agent: Position,
    start: Position,
    visited: HashSet<Position>,
    stats: EpisodeStats,
}

impl EpisodeState {
    fn starting_at(start: Position) -> Self {
        EpisodeState {
            agent: start,
            start,
            visited: HashSet::new(),
            stats: EpisodeStats::default(),
        }
    }
}

/// Drives the agent/environment loop on one maze: picks actions, applies the
/// reward policy, feeds transitions back to the agent and manages episode
/// boundaries, the reverse curriculum, placement and test mode.
#[derive(Debug, Clone)]
pub struct EpisodeController {
    grid: Grid,
    reference: Option<Path>,
    goal: Position,
    policy: RewardPolicy,
    curriculum: Curriculum,
    state: EpisodeState,
    episode: usize,
    test_mode: bool,
}

impl EpisodeController {
    /// Build a controller on `grid` whose goal is the end of `reference`.
    /// The first episode starts at the curriculum's initial distance.
    pub fn new(
        grid: Grid,
        reference: Path,
        rewards: RewardConfig,
        curriculum: CurriculumConfig,
    ) -> Result<Self, MazeError> {
        reference.validate_on(&grid)?;
        let curriculum = Curriculum::new(curriculum);
        let start = curriculum.start_on(&reference);
        Ok(EpisodeController {
            goal: reference.goal(),
            grid,
            reference: Some(reference),
            policy: RewardPolicy::new(rewards),
            curriculum,
            state: EpisodeState::starting_at(start),
            episode: 1,
            test_mode: false,
        })
    }

    /// Generate a fresh maze and build a controller on it.
    pub fn generate(
        generator: &mut MazeGenerator,
        rows: usize,
        cols: usize,
        rewards: RewardConfig,
        curriculum: CurriculumConfig,
    ) -> Result<Self, MazeError> {
        let (grid, reference) = generator.generate(rows, cols)?;
        EpisodeController::new(grid, reference, rewards, curriculum)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Agent cell.
    pub fn state(&self) -> Position {
        self.state.agent
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    /// Reference path used for hints and curriculum placement. `None` when the
    /// goal was moved somewhere unreachable.
    pub fn hint_path(&self) -> Option<&Path> {
        self.reference.as_ref()
    }

    /// 1-based number of the episode in progress.
    pub fn episode(&self) -> usize {
        self.episode
    }

    pub fn stats(&self) -> &EpisodeStats {
        &self.state.stats
    }

    pub fn curriculum_distance(&self) -> usize {
        self.curriculum.distance()
    }

    pub fn is_test_mode(&self) -> bool {
        self.test_mode
    }

    /// Moves from the agent cell that land on open cells; all four actions
    /// when the agent is boxed in.
    pub fn valid_moves(&self) -> Vec<Action> {
        let moves = self.grid.valid_moves(self.state.agent);
        if moves.is_empty() {
            Action::ALL.to_vec()
        } else {
            moves
        }
    }

    /// One decision, one environment update and, outside test mode, one
    /// learning update.
    pub fn step(&mut self, agent: &mut dyn TrainableAgent) -> Result<StepOutcome, MazeError> {
        let current = self.state.agent;
        let valid = self.valid_moves();
        let action = agent.select_action(current, &valid);

        let (transition, next_state) =
            self.policy
                .classify(&self.grid, current, action, self.goal, &self.state.visited);
        let reward = self.policy.reward(transition);
        let done = transition.is_terminal();

        let experience = Experience {
            state: current,
            action,
            reward,
            next_state,
            done,
        };
        if !self.test_mode {
            let metrics = agent.update(&experience)?;
            self.state.stats.learning_updates += 1;
            self.state.stats.abs_td_error += metrics.td_error.abs();
        }

        let stats = &mut self.state.stats;
        stats.score += reward;
        match transition {
            Transition::Collision => stats.walls += 1,
            Transition::Goal => stats.result = EpisodeResult::Success,
            _ => stats.steps += 1,
        }
        if transition.is_new_tile() {
            stats.explored += 1;
            self.state.visited.insert(next_state);
        }
        self.state.agent = next_state;
        tracing::trace!(
            %current,
            action = action.name(),
            transition = transition.name(),
            reward,
            "step"
        );

        Ok(StepOutcome {
            experience,
            transition,
        })
    }

    /// Close the current episode and set up the next one.
    ///
    /// Outside test mode the agent's exploration decays. A success pushes the
    /// next start one curriculum step further from the goal.
    pub fn finish_episode(&mut self, agent: &mut dyn TrainableAgent) -> EpisodeSummary {
        let mut stats = std::mem::take(&mut self.state.stats);
        if stats.result == EpisodeResult::Running {
            stats.result = EpisodeResult::Timeout;
        }
        let summary = EpisodeSummary {
            episode: self.episode,
            start: self.state.start,
            goal: self.goal,
            distance: self.curriculum.distance(),
            stats,
        };

        if !self.test_mode {
            agent.decay_exploration();
        }
        if summary.succeeded() {
            self.curriculum.advance();
        }
        self.episode += 1;

        let start = match &self.reference {
            Some(path) => self.curriculum.start_on(path),
            None => self.state.start,
        };
        self.state = EpisodeState::starting_at(start);
        summary
    }

    /// Step until the goal is reached or `max_steps` decisions were made, then
    /// finish the episode.
    pub fn run_episode(
        &mut self,
        agent: &mut dyn TrainableAgent,
        max_steps: usize,
    ) -> Result<EpisodeSummary, MazeError> {
        for _ in 0..max_steps {
            if self.step(agent)?.transition.is_terminal() {
                break;
            }
        }
        Ok(self.finish_episode(agent))
    }

    /// Test mode pins exploration to zero and suspends learning and decay.
    /// Leaving it restores the agent's resume exploration.
    pub fn set_test_mode(&mut self, agent: &mut dyn TrainableAgent, enabled: bool) {
        self.test_mode = enabled;
        if enabled {
            agent.set_exploration(0.0);
        } else {
            agent.set_exploration(agent.resume_exploration());
        }
        tracing::debug!(enabled, epsilon = agent.exploration(), "test mode toggled");
    }

    /// A copy for side-effect free evaluation: test mode on, fresh episode
    /// bookkeeping at the current start cell.
    pub fn evaluation_copy(&self) -> Self {
        let mut copy = self.clone();
        copy.test_mode = true;
        copy.state = EpisodeState::starting_at(self.state.start);
        copy
    }

    fn check_placeable(&self, cell: Position) -> Result<(), MazeError> {
        self.grid.check_bounds(cell)?;
        if !self.grid.is_open(cell) {
            return Err(MazeError::BlockedCell(cell));
        }
        Ok(())
    }

    /// Move the agent to an open cell; it becomes the start of the current
    /// episode.
    pub fn place_agent(&mut self, cell: Position) -> Result<(), MazeError> {
        self.check_placeable(cell)?;
        self.state.agent = cell;
        self.state.start = cell;
        tracing::debug!(%cell, "agent placed");
        Ok(())
    }

    /// Move the goal to an open cell and recompute the reference path from the
    /// agent cell. Returns whether the new goal is reachable.
    pub fn place_goal(&mut self, cell: Position) -> Result<bool, MazeError> {
        self.check_placeable(cell)?;
        self.goal = cell;
        self.reference = shortest_path(&self.grid, self.state.agent, cell)?;
        let reachable = self.reference.is_some();
        tracing::debug!(%cell, reachable, "goal placed");
        Ok(reachable)
    }

    /// Replace the maze with a freshly generated one of the same size. The goal
    /// returns to the far corner and the curriculum restarts.
    pub fn regenerate(&mut self, generator: &mut MazeGenerator) -> Result<(), MazeError> {
        let (grid, reference) = generator.generate(self.grid.rows(), self.grid.cols())?;
        self.goal = reference.goal();
        self.curriculum.reset();
        let start = self.curriculum.start_on(&reference);
        self.grid = grid;
        self.reference = Some(reference);
        self.state = EpisodeState::starting_at(start);
        Ok(())
    }
}
