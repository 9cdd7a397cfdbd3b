//! Serialization boundary for the persisted notification collection.
//!
//! The slot holds a JSON array, newest first, with `created_at` as an
//! RFC 3339 string. [`StoredNotification`] pins that stored shape
//! independently of the in-memory entity, and decoding revives timestamps
//! into `DateTime<Utc>` here rather than on every read of the collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use eduportal_core::error::{AppError, ErrorKind};
use eduportal_core::result::AppResult;
use eduportal_core::types::id::NotificationId;

use super::model::{Notification, NotificationKind};

/// On-disk form of one notification.
#[derive(Debug, Serialize, Deserialize)]
struct StoredNotification {
    id: NotificationId,
    kind: NotificationKind,
    title: String,
    message: String,
    /// RFC 3339, e.g. `"2026-03-14T08:30:00+00:00"`.
    created_at: String,
    read: bool,
    action_target: Option<String>,
}

/// Serialize the collection for its state slot.
pub fn encode_notifications(entries: &[Notification]) -> AppResult<String> {
    let stored: Vec<StoredNotification> = entries
        .iter()
        .map(|n| StoredNotification {
            id: n.id,
            kind: n.kind,
            title: n.title.clone(),
            message: n.message.clone(),
            created_at: n.created_at.to_rfc3339(),
            read: n.read,
            action_target: n.action_target.clone(),
        })
        .collect();
    Ok(serde_json::to_string(&stored)?)
}

/// Deserialize a state slot back into the collection.
pub fn decode_notifications(raw: &str) -> AppResult<Vec<Notification>> {
    let stored: Vec<StoredNotification> = serde_json::from_str(raw)?;
    stored.into_iter().map(revive).collect()
}

fn revive(stored: StoredNotification) -> AppResult<Notification> {
    let created_at = DateTime::parse_from_rfc3339(&stored.created_at)
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("invalid created_at '{}'", stored.created_at),
                e,
            )
        })?
        .with_timezone(&Utc);

    Ok(Notification {
        id: stored.id,
        kind: stored.kind,
        title: stored.title,
        message: stored.message,
        created_at,
        read: stored.read,
        action_target: stored.action_target,
    })
}
