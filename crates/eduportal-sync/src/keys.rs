//! Fixed identifiers shared by every execution context.
//!
//! The channel name and slot keys are part of the persisted/wire contract:
//! changing them orphans existing state and splits old and new contexts onto
//! different channels.

// ── Broadcast channel ─────────────────────────────────────────

/// Name of the shared cross-context broadcast channel.
pub const SYNC_CHANNEL: &str = "eduportal.sync";

// ── Persisted-state slots ─────────────────────────────────────

/// Slot holding the notification collection (JSON array, newest first).
pub const NOTIFICATIONS: &str = "eduportal.notifications";

/// Slot holding the current role (plain string identifier).
pub const ROLE: &str = "eduportal.role";
