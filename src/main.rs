// ABOUTME: Entry point for the bg-restage CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use bg_restage::config::{self, Config};
use bg_restage::error::Result;
use bg_restage::output::{Output, OutputMode};
use clap::Parser;
use cli::{Cli, Commands};
use commands::Recipe;
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbose flag when set.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };

    if let Err(e) = run(cli, mode).await {
        let output = Output::new(mode);
        output.error(&e.to_string());
        if e.requires_manual_intervention() {
            output.warning("rollback did not complete; verify the application state manually");
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli, mode: OutputMode) -> Result<()> {
    let cwd = env::current_dir()?;
    let output = Output::new(mode);

    match cli.command {
        Commands::Init { force } => {
            config::init_config(&cwd, force)?;
            output.success(&format!("Wrote {}", config::CONFIG_FILENAME));
            Ok(())
        }
        Commands::Restage(opts) => {
            let config = load_config(cli.config.as_deref(), &cwd)?;
            commands::redeploy(Recipe::Restage, config, opts, output).await
        }
        Commands::Restart(opts) => {
            let config = load_config(cli.config.as_deref(), &cwd)?;
            commands::redeploy(Recipe::Restart, config, opts, output).await
        }
    }
}

fn load_config(explicit: Option<&std::path::Path>, cwd: &std::path::Path) -> Result<Config> {
    match explicit {
        Some(path) => Config::load(path),
        None => Config::discover(cwd),
    }
}
