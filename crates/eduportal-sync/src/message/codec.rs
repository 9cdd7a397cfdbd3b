//! JSON wire codec for sync messages.
//!
//! Errors stay as `serde_json::Error` so the dispatch path can treat an
//! undecodable frame (unknown tag, malformed payload) as ignorable rather
//! than fatal.

use serde_json;

use super::types::SyncMessage;

/// Serialize a message to its wire form.
pub fn encode_message(msg: &SyncMessage) -> Result<String, serde_json::Error> {
    serde_json::to_string(msg)
}

/// Deserialize a message from its wire form.
pub fn decode_message(body: &str) -> Result<SyncMessage, serde_json::Error> {
    serde_json::from_str(body)
}
