//! Persisted state inspection command.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use eduportal_core::AppResult;
use eduportal_core::traits::StateStore;
use eduportal_sync::notification::codec::decode_notifications;
use eduportal_sync::{JsonFileStore, Notification, Role, keys};

use crate::output::{self, OutputFormat};

/// Arguments for the inspect command
#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Show unread notifications only
    #[arg(short, long)]
    pub unread: bool,
}

/// Notification display row for table output
#[derive(Debug, Serialize, Tabled)]
struct NotificationRow {
    /// Notification ID
    id: String,
    /// Severity
    kind: String,
    /// Title
    title: String,
    /// Body
    message: String,
    /// Read flag
    read: bool,
    /// Created at
    created_at: String,
}

/// Full report for JSON output
#[derive(Debug, Serialize)]
struct InspectReport {
    role: String,
    unread: usize,
    notifications: Vec<NotificationRow>,
}

/// Execute the inspect command
///
/// Reads the state slots directly rather than going through the
/// stores, so missing or unreadable state is reported instead of
/// being papered over with seeded defaults.
pub fn execute(args: &InspectArgs, state: &JsonFileStore, format: OutputFormat) -> AppResult<()> {
    let role = match state.load(keys::ROLE)? {
        Some(raw) => match raw.trim().parse::<Role>() {
            Ok(role) => role.as_str().to_string(),
            Err(_) => format!("(unrecognized: {})", raw.trim()),
        },
        None => "(unset)".to_string(),
    };

    let entries = match state.load(keys::NOTIFICATIONS)? {
        Some(raw) => match decode_notifications(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                output::print_warning(&format!("Notification state is unreadable: {}", e));
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    let unread = entries.iter().filter(|n| n.is_unread()).count();
    let rows: Vec<NotificationRow> = entries
        .iter()
        .filter(|n| !args.unread || n.is_unread())
        .map(to_row)
        .collect();

    match format {
        OutputFormat::Table => {
            output::print_kv("Role", &role);
            output::print_kv("Unread", &unread.to_string());
            output::print_list(&rows, format);
        }
        OutputFormat::Json => {
            output::print_json(&InspectReport {
                role,
                unread,
                notifications: rows,
            });
        }
    }

    Ok(())
}

fn to_row(n: &Notification) -> NotificationRow {
    NotificationRow {
        id: n.id.to_string(),
        kind: n.kind.to_string(),
        title: n.title.clone(),
        message: n.message.clone(),
        read: n.read,
        created_at: n.created_at.format("%Y-%m-%d %H:%M").to_string(),
    }
}
