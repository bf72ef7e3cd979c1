use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vitrine_core::AppConfig;

mod commands;

use commands::simulate::Scenario;

#[derive(Parser)]
#[command(name = "vitrine")]
#[command(author, version, about = "A terminal storefront with spring-driven motion")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Use this config file instead of ~/.config/vitrine/config.toml
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI
    Run,
    /// Run a motion scenario headless and print per-frame snapshots as JSON lines
    Simulate {
        #[arg(short = 's', long, value_enum, default_value_t = Scenario::Indicator)]
        scenario: Scenario,
        /// Number of frames to step
        #[arg(short = 'n', long, default_value_t = 60)]
        frames: usize,
        /// Frames per second
        #[arg(long, default_value_t = 60)]
        fps: u32,
    },
    /// Print the effective configuration
    Config {
        /// Write the default configuration file
        #[arg(long)]
        init: bool,
        /// Print the configuration file path only
        #[arg(long)]
        path: bool,
    },
}

/// Initialize logging
///
/// While the TUI owns the terminal, logs go to a file so they cannot tear
/// the alternate screen.
fn init_logging(config: &AppConfig, to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if to_file {
        let path = config.log_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("opening log file {}", path.display()))?;
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = cli.config.unwrap_or_else(AppConfig::config_path);
    let config = Arc::new(
        AppConfig::load_from(&config_path)
            .with_context(|| format!("loading {}", config_path.display()))?,
    );

    let tui = matches!(cli.command, Some(Commands::Run) | None);
    init_logging(&config, tui)?;

    // Handle commands
    match cli.command {
        Some(Commands::Run) | None => commands::run::run(config).await,
        Some(Commands::Simulate {
            scenario,
            frames,
            fps,
        }) => commands::simulate::run(&config, scenario, frames, fps),
        Some(Commands::Config { init, path }) => {
            commands::config::run(&config, &config_path, init, path)
        }
    }
}
