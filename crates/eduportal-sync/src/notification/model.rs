//! Notification entity model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use eduportal_core::types::id::NotificationId;

/// A notification shown in the portal header and notification panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique notification identifier; also the cross-context merge key.
    pub id: NotificationId,
    /// Severity used for iconography and filtering.
    pub kind: NotificationKind,
    /// Short title.
    pub title: String,
    /// Body text.
    pub message: String,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
    /// Whether the user has read this notification.
    pub read: bool,
    /// Optional in-portal route to open when activated.
    pub action_target: Option<String>,
}

impl Notification {
    /// Check if the notification has not been read yet.
    pub fn is_unread(&self) -> bool {
        !self.read
    }
}

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationKind {
    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Input for creating a notification.
///
/// The store assigns the id, timestamp, and unread flag.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub action_target: Option<String>,
}

impl NewNotification {
    /// Draft a notification with no action target.
    pub fn new(kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            action_target: None,
        }
    }

    /// Attach an in-portal route to open when the notification is activated.
    pub fn with_action(mut self, target: impl Into<String>) -> Self {
        self.action_target = Some(target.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_unread() {
        let mut notification = Notification {
            id: NotificationId::new(),
            kind: NotificationKind::Info,
            title: "Welcome".to_string(),
            message: "Hello".to_string(),
            created_at: Utc::now(),
            read: false,
            action_target: None,
        };
        assert!(notification.is_unread());
        notification.read = true;
        assert!(!notification.is_unread());
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&NotificationKind::Warning).expect("serialize");
        assert_eq!(json, r#""warning""#);
    }

    #[test]
    fn test_draft_builder() {
        let draft = NewNotification::new(NotificationKind::Success, "Timetable", "Published")
            .with_action("/timetable");
        assert_eq!(draft.action_target.as_deref(), Some("/timetable"));
    }
}
