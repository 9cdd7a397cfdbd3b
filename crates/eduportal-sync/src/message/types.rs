//! Cross-context message taxonomy.
//!
//! Every frame on the sync channel is one [`SyncMessage`], serialized as
//! `{"type": "...", "payload": ...}`. Tags are part of the wire contract;
//! contexts running older portal versions silently drop tags they do not
//! know.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use eduportal_core::types::id::{NotificationId, ResourceId, StudentId, VehicleId};

use crate::notification::model::Notification;
use crate::role::model::Role;

/// A typed message exchanged between execution contexts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum SyncMessage {
    /// The active role changed; payload is the new role identifier.
    RoleChanged(Role),
    /// A notification was created; payload is the full record.
    NotificationAdded(Notification),
    /// One notification was marked read; payload is only its id.
    NotificationRead(NotificationId),
    /// Every notification was marked read.
    NotificationsReadAll,
    /// One notification was removed; payload is only its id.
    NotificationRemoved(NotificationId),
    /// The whole notification collection was cleared.
    NotificationsCleared,
    /// The UI theme changed.
    ThemeChanged(ThemeMode),
    /// A named client store refreshed itself; `detail` is store-defined.
    StoreUpdated {
        store: String,
        detail: Option<serde_json::Value>,
    },
    /// A grade was posted or corrected.
    GradeUpdated(GradeUpdate),
    /// A transport vehicle reported its position.
    VehicleLocation(VehicleLocation),
    /// A learning resource was added or edited.
    ResourceUpdated(ResourceUpdate),
}

impl SyncMessage {
    /// Returns the kind discriminant of this message.
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::RoleChanged(_) => MessageKind::RoleChanged,
            Self::NotificationAdded(_) => MessageKind::NotificationAdded,
            Self::NotificationRead(_) => MessageKind::NotificationRead,
            Self::NotificationsReadAll => MessageKind::NotificationsReadAll,
            Self::NotificationRemoved(_) => MessageKind::NotificationRemoved,
            Self::NotificationsCleared => MessageKind::NotificationsCleared,
            Self::ThemeChanged(_) => MessageKind::ThemeChanged,
            Self::StoreUpdated { .. } => MessageKind::StoreUpdated,
            Self::GradeUpdated(_) => MessageKind::GradeUpdated,
            Self::VehicleLocation(_) => MessageKind::VehicleLocation,
            Self::ResourceUpdated(_) => MessageKind::ResourceUpdated,
        }
    }
}

/// Kind discriminant of a [`SyncMessage`], used to key subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    RoleChanged,
    NotificationAdded,
    NotificationRead,
    NotificationsReadAll,
    NotificationRemoved,
    NotificationsCleared,
    ThemeChanged,
    StoreUpdated,
    GradeUpdated,
    VehicleLocation,
    ResourceUpdated,
}

impl MessageKind {
    /// Every kind, in wire-tag order.
    pub const ALL: [MessageKind; 11] = [
        MessageKind::RoleChanged,
        MessageKind::NotificationAdded,
        MessageKind::NotificationRead,
        MessageKind::NotificationsReadAll,
        MessageKind::NotificationRemoved,
        MessageKind::NotificationsCleared,
        MessageKind::ThemeChanged,
        MessageKind::StoreUpdated,
        MessageKind::GradeUpdated,
        MessageKind::VehicleLocation,
        MessageKind::ResourceUpdated,
    ];

    /// Return the wire tag for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RoleChanged => "role_changed",
            Self::NotificationAdded => "notification_added",
            Self::NotificationRead => "notification_read",
            Self::NotificationsReadAll => "notifications_read_all",
            Self::NotificationRemoved => "notification_removed",
            Self::NotificationsCleared => "notifications_cleared",
            Self::ThemeChanged => "theme_changed",
            Self::StoreUpdated => "store_updated",
            Self::GradeUpdated => "grade_updated",
            Self::VehicleLocation => "vehicle_location",
            Self::ResourceUpdated => "resource_updated",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Color scheme selected in the portal shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    /// Follow the host platform preference.
    System,
}

/// Payload of a grade posting or correction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeUpdate {
    /// Student the grade belongs to.
    pub student_id: StudentId,
    /// Subject name as shown on the report card.
    pub subject: String,
    /// Score on the school's grading scale.
    pub score: f64,
    /// Term label, e.g. `"Term 2"`. Absent for ungraded coursework.
    pub term: Option<String>,
}

/// Payload of a school-transport position report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleLocation {
    /// Reporting vehicle.
    pub vehicle_id: VehicleId,
    /// Route label, e.g. `"R12"`.
    pub route: String,
    pub latitude: f64,
    pub longitude: f64,
    /// When the position was sampled, not when it was broadcast.
    pub recorded_at: DateTime<Utc>,
}

/// Payload describing a changed learning resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceUpdate {
    /// Resource that changed.
    pub resource_id: ResourceId,
    /// Resource category, e.g. `"past-papers"`.
    pub category: String,
    /// New title if it changed, otherwise `None`.
    pub title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape_is_type_plus_payload() {
        let msg = SyncMessage::RoleChanged(Role::Teacher);
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&msg).expect("serialize"))
                .expect("valid json");
        assert_eq!(json["type"], "role_changed");
        assert_eq!(json["payload"], "teacher");
    }

    #[test]
    fn test_unit_variant_has_no_payload() {
        let json = serde_json::to_string(&SyncMessage::NotificationsCleared).expect("serialize");
        assert_eq!(json, r#"{"type":"notifications_cleared"}"#);
    }

    #[test]
    fn test_kind_matches_wire_tag() {
        for msg in [
            SyncMessage::RoleChanged(Role::Admin),
            SyncMessage::NotificationsReadAll,
            SyncMessage::ThemeChanged(ThemeMode::Dark),
            SyncMessage::StoreUpdated {
                store: "grades".to_string(),
                detail: None,
            },
        ] {
            let json: serde_json::Value =
                serde_json::from_str(&serde_json::to_string(&msg).expect("serialize"))
                    .expect("valid json");
            assert_eq!(json["type"], msg.kind().as_str());
        }
    }

    #[test]
    fn test_all_kinds_are_distinct() {
        for (i, a) in MessageKind::ALL.iter().enumerate() {
            for b in MessageKind::ALL.iter().skip(i + 1) {
                assert_ne!(a.as_str(), b.as_str());
            }
        }
    }

    #[test]
    fn test_grade_update_roundtrip() {
        let msg = SyncMessage::GradeUpdated(GradeUpdate {
            student_id: StudentId::new(),
            subject: "Mathematics".to_string(),
            score: 87.5,
            term: Some("Term 2".to_string()),
        });
        let json = serde_json::to_string(&msg).expect("serialize");
        let parsed: SyncMessage = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, msg);
    }

    #[test]
    fn test_vehicle_location_roundtrip() {
        let msg = SyncMessage::VehicleLocation(VehicleLocation {
            vehicle_id: VehicleId::new(),
            route: "R12".to_string(),
            latitude: -1.2921,
            longitude: 36.8219,
            recorded_at: Utc::now(),
        });
        let json = serde_json::to_string(&msg).expect("serialize");
        let parsed: SyncMessage = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, msg);
    }
}
