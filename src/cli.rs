// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use bg_restage::types::AppName;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bg-restage")]
#[command(about = "Zero-downtime restage and restart of Cloud Foundry applications")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output for CI (only the final result)
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// JSON lines output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file to use instead of discovering one in the working directory
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rebuild an application from its current bits without downtime
    Restage(RedeployOpts),

    /// Restart an application on its current droplet without downtime
    Restart(RedeployOpts),

    /// Write a bg-restage.yml with the default settings
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Args)]
pub struct RedeployOpts {
    /// Application to redeploy
    pub app: AppName,

    /// Stop the old instance instead of deleting it
    #[arg(long)]
    pub stop_only: bool,

    /// Leave the old instance running
    #[arg(long)]
    pub no_delete: bool,

    /// Suffix for the old instance's temporary name (overrides config)
    #[arg(long)]
    pub suffix: Option<String>,
}
