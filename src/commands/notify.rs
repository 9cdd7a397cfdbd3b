//! Notification publishing command.

use std::sync::Arc;

use clap::Args;

use eduportal_core::{AppError, AppResult};
use eduportal_sync::{JsonFileStore, NewNotification, NotificationKind, NotificationStore, SyncBus};

use crate::output;

/// Arguments for the notify command
#[derive(Debug, Args)]
pub struct NotifyArgs {
    /// Title
    #[arg(short, long)]
    pub title: String,
    /// Message body
    #[arg(short, long)]
    pub message: String,
    /// Severity: info, success, warning, error
    #[arg(short, long, default_value = "info")]
    pub kind: String,
    /// Portal route to open when the notification is activated
    #[arg(short, long)]
    pub action: Option<String>,
}

/// Execute the notify command
///
/// Goes through a real [`NotificationStore`] over a disconnected bus,
/// so the record lands in the persisted slot exactly the way a portal
/// context would write it and is picked up on the next hydration.
pub fn execute(args: &NotifyArgs, state: JsonFileStore) -> AppResult<()> {
    let kind = parse_kind(&args.kind)?;

    let store = NotificationStore::new(SyncBus::disconnected(), Arc::new(state));

    let mut draft = NewNotification::new(kind, &args.title, &args.message);
    if let Some(target) = &args.action {
        draft = draft.with_action(target);
    }

    let added = store.add(draft);
    output::print_success(&format!(
        "Notification '{}' added ({})",
        added.title, added.id
    ));

    Ok(())
}

fn parse_kind(raw: &str) -> AppResult<NotificationKind> {
    match raw {
        "info" => Ok(NotificationKind::Info),
        "success" => Ok(NotificationKind::Success),
        "warning" => Ok(NotificationKind::Warning),
        "error" => Ok(NotificationKind::Error),
        other => Err(AppError::validation(format!(
            "Unknown kind '{}'. Expected one of: info, success, warning, error",
            other
        ))),
    }
}
