//! Training infrastructure: reward shaping, episode control, the reverse
//! curriculum, rolling metrics and the headless trainer.
pub mod curriculum;
pub mod episode;
pub mod metrics;
pub mod reward;
pub mod trainer;

pub use curriculum::{Curriculum, CurriculumConfig};
pub use episode::{EpisodeController, EpisodeResult, EpisodeStats, EpisodeSummary, StepOutcome};
pub use metrics::{TimingMetrics, TrainingMetrics};
pub use reward::{RewardConfig, RewardPolicy, Transition};
pub use trainer::{EvalReport, Trainer, TrainerConfig, TrainingSummary};
