use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use rollout_target::config::{self, Overrides};
use rollout_target::lifecycle::startup;
use rollout_target::observability::logging;

#[derive(Parser)]
#[command(name = "rollout-target")]
#[command(about = "Synthetic behavior-injection target for rollout validation", long_about = None)]
struct Cli {
    /// TOML config file (also read from ROLLOUT_TARGET_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port, overrides PORT
    #[arg(short, long)]
    port: Option<String>,

    /// Behavior mode, overrides BEHAVIOR
    #[arg(short, long)]
    behavior: Option<String>,

    /// Version label, overrides VERSION
    #[arg(long = "version-label")]
    version_label: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let overrides = Overrides {
        config_path: cli.config,
        port: cli.port,
        behavior: cli.behavior,
        version: cli.version_label,
    };

    let config = match config::load_config(&overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    logging::init(&config.observability);

    match startup::run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Server error");
            ExitCode::FAILURE
        }
    }
}
