//! Built-in notifications used when no persisted state exists.

use chrono::Utc;

use eduportal_core::types::id::NotificationId;

use super::model::{Notification, NotificationKind};

/// The collection a brand-new profile starts with, newest first.
///
/// Ids are freshly generated per call; two sibling contexts only ever seed
/// once because the first mutation persists the collection for both.
pub fn default_notifications() -> Vec<Notification> {
    let now = Utc::now();
    vec![
        Notification {
            id: NotificationId::new(),
            kind: NotificationKind::Info,
            title: "Welcome to EduPortal".to_string(),
            message: "Your portal is ready. Notifications stay in sync across every open window."
                .to_string(),
            created_at: now,
            read: false,
            action_target: None,
        },
        Notification {
            id: NotificationId::new(),
            kind: NotificationKind::Success,
            title: "Timetable published".to_string(),
            message: "The Term 2 timetable is now available.".to_string(),
            created_at: now,
            read: false,
            action_target: Some("/timetable".to_string()),
        },
        Notification {
            id: NotificationId::new(),
            kind: NotificationKind::Warning,
            title: "Fee reminder".to_string(),
            message: "A tuition invoice is due this Friday.".to_string(),
            created_at: now,
            read: false,
            action_target: Some("/payments".to_string()),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeds_start_unread() {
        let seeds = default_notifications();
        assert!(!seeds.is_empty());
        assert!(seeds.iter().all(|n| n.is_unread()));
    }

    #[test]
    fn test_seed_ids_are_unique() {
        let seeds = default_notifications();
        for (i, a) in seeds.iter().enumerate() {
            for b in seeds.iter().skip(i + 1) {
                assert_ne!(a.id, b.id);
            }
        }
    }
}
