use std::path::Path;

use crate::ai::QLearningConfig;
use crate::error::ConfigError;
use crate::maze::{check_dimensions, MazeConfig};
use crate::training::{CurriculumConfig, RewardConfig, TrainerConfig};

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub maze: MazeConfig,
    pub agent: QLearningConfig,
    pub rewards: RewardConfig,
    pub curriculum: CurriculumConfig,
    pub training: TrainerConfig,
}

fn in_unit_interval(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_dimensions(self.maze.rows, self.maze.cols, self.maze.require_odd)
            .map_err(|e| ConfigError::Validation(format!("maze: {e}")))?;
        if self.maze.max_attempts == 0 {
            return Err(ConfigError::Validation(
                "maze.max_attempts must be >= 1".into(),
            ));
        }

        let agent = &self.agent;
        if agent.learning_rate <= 0.0 || agent.learning_rate > 1.0 {
            return Err(ConfigError::Validation(
                "agent.learning_rate must be in (0, 1]".into(),
            ));
        }
        if !in_unit_interval(agent.discount_factor) {
            return Err(ConfigError::Validation(
                "agent.discount_factor must be in [0, 1]".into(),
            ));
        }
        if !in_unit_interval(agent.epsilon) {
            return Err(ConfigError::Validation(
                "agent.epsilon must be in [0, 1]".into(),
            ));
        }
        if !in_unit_interval(agent.min_epsilon) {
            return Err(ConfigError::Validation(
                "agent.min_epsilon must be in [0, 1]".into(),
            ));
        }
        if agent.min_epsilon > agent.epsilon {
            return Err(ConfigError::Validation(
                "agent.min_epsilon must be <= agent.epsilon".into(),
            ));
        }
        if !in_unit_interval(agent.resume_epsilon) {
            return Err(ConfigError::Validation(
                "agent.resume_epsilon must be in [0, 1]".into(),
            ));
        }
        if agent.epsilon_decay <= 0.0 || agent.epsilon_decay > 1.0 {
            return Err(ConfigError::Validation(
                "agent.epsilon_decay must be in (0, 1]".into(),
            ));
        }
        if agent.tiebreak_noise < 0.0 {
            return Err(ConfigError::Validation(
                "agent.tiebreak_noise must be >= 0".into(),
            ));
        }

        if self.training.num_episodes == 0 {
            return Err(ConfigError::Validation(
                "training.num_episodes must be > 0".into(),
            ));
        }
        if self.training.max_steps_per_episode == 0 {
            return Err(ConfigError::Validation(
                "training.max_steps_per_episode must be > 0".into(),
            ));
        }
        if self.training.log_interval == 0 {
            return Err(ConfigError::Validation(
                "training.log_interval must be > 0".into(),
            ));
        }
        if self.training.eval_interval == 0 {
            return Err(ConfigError::Validation(
                "training.eval_interval must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}
