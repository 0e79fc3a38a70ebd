use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use ml_maze::ai::QLearningAgent;
use ml_maze::config::AppConfig;
use ml_maze::maze::MazeGenerator;
use ml_maze::training::{EpisodeController, Trainer};

/// Train a tabular Q-learning agent to solve a generated maze.
#[derive(Parser)]
#[command(name = "train", about = "Train a Q-learning agent on a random maze")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Override number of training episodes
    #[arg(long)]
    episodes: Option<usize>,

    /// Override maze height
    #[arg(long)]
    rows: Option<usize>,

    /// Override maze width
    #[arg(long)]
    cols: Option<usize>,

    /// Seed the maze generator, the agent and the random baseline
    #[arg(long)]
    seed: Option<u64>,

    /// Override learning rate
    #[arg(long)]
    lr: Option<f64>,

    /// Print the training summary as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    // Load configuration
    let mut app_config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(episodes) = cli.episodes {
        app_config.training.num_episodes = episodes;
    }
    if let Some(rows) = cli.rows {
        app_config.maze.rows = rows;
    }
    if let Some(cols) = cli.cols {
        app_config.maze.cols = cols;
    }
    if let Some(seed) = cli.seed {
        app_config.maze.seed = Some(seed);
        app_config.agent.seed = Some(seed.wrapping_add(1));
        app_config.training.seed = Some(seed.wrapping_add(2));
    }
    if let Some(lr) = cli.lr {
        app_config.agent.learning_rate = lr;
    }
    app_config.validate().context("validating configuration")?;

    let rows = app_config.maze.rows;
    let cols = app_config.maze.cols;
    let mut generator = MazeGenerator::from_config(&app_config.maze);
    let mut controller = EpisodeController::generate(
        &mut generator,
        rows,
        cols,
        app_config.rewards.clone(),
        app_config.curriculum.clone(),
    )
    .with_context(|| format!("generating a {rows}x{cols} maze"))?;

    let mut agent = QLearningAgent::new(rows, cols, app_config.agent.clone());
    let trainer = Trainer::new(app_config.training.clone());
    let summary = trainer
        .train(&mut agent, &mut controller)
        .context("training")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("serializing summary")?
        );
    } else {
        println!(
            "Trained {} episodes: {} successes, eval {:.1}% vs random {:.1}%, epsilon {:.3}, curriculum distance {}",
            summary.episodes,
            summary.successes,
            summary.eval.success_rate * 100.0,
            summary.random_baseline.success_rate * 100.0,
            summary.final_epsilon,
            summary.curriculum_distance,
        );
    }
    Ok(())
}
