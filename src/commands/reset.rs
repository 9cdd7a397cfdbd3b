//! Persisted state reset command.

use clap::Args;

use eduportal_core::traits::StateStore;
use eduportal_core::{AppError, AppResult};
use eduportal_sync::{JsonFileStore, keys};

use crate::output;

/// Arguments for the reset command
#[derive(Debug, Args)]
pub struct ResetArgs {
    /// Skip confirmation prompt
    #[arg(long)]
    pub force: bool,
}

/// Execute the reset command
pub fn execute(args: &ResetArgs, state: &JsonFileStore) -> AppResult<()> {
    if !args.force {
        let confirm = dialoguer::Confirm::new()
            .with_prompt("This will clear all persisted sync state. Continue?")
            .default(false)
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {}", e)))?;

        if !confirm {
            println!("Cancelled.");
            return Ok(());
        }
    }

    state.clear(keys::NOTIFICATIONS)?;
    state.clear(keys::ROLE)?;

    output::print_success("Persisted sync state cleared.");
    Ok(())
}
