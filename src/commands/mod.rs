//! CLI command definitions and dispatch.

use clap::{Parser, Subcommand};

use eduportal_core::AppResult;
use eduportal_core::config::PortalConfig;
use eduportal_sync::JsonFileStore;

use crate::output::OutputFormat;

mod inspect;
mod notify;
mod reset;
mod seed;

/// EduPortal sync state tool
#[derive(Debug, Parser)]
#[command(name = "eduportal", version, about = "Inspect and maintain persisted portal sync state")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// State directory (overrides the configuration)
    #[arg(long)]
    pub state_dir: Option<String>,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show persisted notifications and role state
    Inspect(inspect::InspectArgs),
    /// Add a notification to the persisted store
    Notify(notify::NotifyArgs),
    /// Write the default notification set into the state directory
    Seed(seed::SeedArgs),
    /// Clear all persisted sync state
    Reset(reset::ResetArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(&self, config: &PortalConfig) -> AppResult<()> {
        let state = self.open_state(config)?;
        match &self.command {
            Commands::Inspect(args) => inspect::execute(args, &state, self.format),
            Commands::Notify(args) => notify::execute(args, state),
            Commands::Seed(args) => seed::execute(args, &state),
            Commands::Reset(args) => reset::execute(args, &state),
        }
    }

    /// Helper: open the state directory from the flag or the configuration
    fn open_state(&self, config: &PortalConfig) -> AppResult<JsonFileStore> {
        let dir = self
            .state_dir
            .as_deref()
            .unwrap_or(&config.persistence.state_dir);
        tracing::debug!("using state directory '{}'", dir);
        JsonFileStore::new(dir)
    }
}
