use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};
use simplelog::{Config, WriteLogger};
use snake_engine::game::{Difficulty, GameConfig, JsonFileStore};
use snake_engine::modes::HumanMode;
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "snake")]
#[command(version, about = "Grid snake with difficulty tiers and a persistent high score")]
struct Cli {
    /// Grid width (overrides the config file)
    #[arg(long)]
    width: Option<usize>,

    /// Grid height (overrides the config file)
    #[arg(long)]
    height: Option<usize>,

    /// Starting difficulty: easy, medium or hard
    #[arg(long)]
    difficulty: Option<Difficulty>,

    /// JSON file with a game configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where the high score is kept
    #[arg(long, default_value = ".snake_scores.json")]
    scores: PathBuf,

    /// Log file (the terminal is used by the game)
    #[arg(long, default_value = "snake.log")]
    log: PathBuf,
}

fn load_config(path: &Path) -> Result<GameConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse config file: {:?}", path))
}

fn build_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GameConfig::default(),
    };

    if let Some(width) = cli.width {
        config.grid_width = width;
    }
    if let Some(height) = cli.height {
        config.grid_height = height;
    }
    if let Some(difficulty) = cli.difficulty {
        config.difficulty = difficulty;
    }

    config.validate().context("Invalid game configuration")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_file = File::create(&cli.log)
        .with_context(|| format!("Failed to create log file: {:?}", cli.log))?;
    WriteLogger::init(LevelFilter::Info, Config::default(), log_file)
        .context("Failed to initialize logger")?;

    let config = build_config(&cli)?;
    info!(
        "starting {}x{} game on {} (scores in {:?})",
        config.grid_width, config.grid_height, config.difficulty, cli.scores
    );

    let store = JsonFileStore::new(&cli.scores);
    let mut human_mode = HumanMode::new(config, store)?;
    human_mode.run().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_cli_overrides_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("game.json");
        std::fs::write(&path, r#"{"grid_width": 30, "grid_height": 15, "difficulty": "easy"}"#)
            .unwrap();

        let cli = Cli::parse_from([
            "snake",
            "--config",
            path.to_str().unwrap(),
            "--height",
            "25",
            "--difficulty",
            "hard",
        ]);
        let config = build_config(&cli).unwrap();

        assert_eq!(config.grid_width, 30);
        assert_eq!(config.grid_height, 25);
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(cli.scores, PathBuf::from(".snake_scores.json"));
    }

    #[test]
    fn test_invalid_sizes_rejected() {
        let cli = Cli::parse_from(["snake", "--width", "2"]);
        assert!(build_config(&cli).is_err());
    }

    #[test]
    fn test_unknown_difficulty_rejected_by_parser() {
        assert!(Cli::try_parse_from(["snake", "--difficulty", "nightmare"]).is_err());
    }
}
