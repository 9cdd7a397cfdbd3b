//! Default notification seeding command.

use clap::Args;

use eduportal_core::traits::StateStore;
use eduportal_core::{AppError, AppResult};
use eduportal_sync::notification::codec::encode_notifications;
use eduportal_sync::notification::seed::default_notifications;
use eduportal_sync::{JsonFileStore, keys};

use crate::output;

/// Arguments for the seed command
#[derive(Debug, Args)]
pub struct SeedArgs {
    /// Overwrite existing state without confirmation
    #[arg(long)]
    pub force: bool,
}

/// Execute the seed command
pub fn execute(args: &SeedArgs, state: &JsonFileStore) -> AppResult<()> {
    if state.load(keys::NOTIFICATIONS)?.is_some() && !args.force {
        let confirm = dialoguer::Confirm::new()
            .with_prompt("Notification state already exists. Overwrite with defaults?")
            .default(false)
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {}", e)))?;

        if !confirm {
            println!("Cancelled.");
            return Ok(());
        }
        output::print_warning("Overwriting existing notification state");
    }

    let seeds = default_notifications();
    let encoded = encode_notifications(&seeds)?;
    state.save(keys::NOTIFICATIONS, &encoded)?;

    output::print_success(&format!("Seeded {} default notifications", seeds.len()));
    Ok(())
}
