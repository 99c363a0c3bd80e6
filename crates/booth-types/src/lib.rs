//! Core types and structures for booth-assistant
//!
//! This crate provides the record type persisted by the history store and the
//! constants shared by the client, storage and application crates.

use chrono::{Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Constants
// ============================================================================

/// Key of the single persisted value holding the whole question history
pub const HISTORY_STORAGE_KEY: &str = "question_history";

/// Model used when nothing else is configured
pub const DEFAULT_MODEL: &str = "gpt-4.1-nano";

/// MCP server passed through to the assistant service by default
pub const DEFAULT_MCP_SERVER_LABEL: &str = "yumemi-openhandbook";
pub const DEFAULT_MCP_SERVER_URL: &str = "https://openhandbook.mcp.yumemi.jp/sse";

/// Language hint handed to the speech engine
pub const DEFAULT_SPEECH_LANGUAGE: &str = "ja-JP";

/// Display format for history timestamps
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Milliseconds since the Unix epoch for the current instant
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

// ============================================================================
// History Types
// ============================================================================

/// One recorded question/answer exchange.
///
/// Serialized as `{ "id", "question", "answer", "timestamp" }` with the
/// timestamp in epoch milliseconds. An empty `id` means "not assigned yet";
/// the history store fills it in on insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    #[serde(default)]
    pub id: String,
    pub question: String,
    #[serde(default)]
    pub answer: String,
    pub timestamp: i64,
}

impl HistoryItem {
    /// Create a record stamped with the current instant, its id derived from
    /// that instant.
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        let timestamp = now_millis();
        Self {
            id: timestamp.to_string(),
            question: question.into(),
            answer: answer.into(),
            timestamp,
        }
    }

    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }

    /// Timestamp rendered in the local time zone, or the raw value when it is
    /// out of range.
    pub fn local_time(&self) -> String {
        match Local.timestamp_millis_opt(self.timestamp).single() {
            Some(dt) => dt.format(TIMESTAMP_FORMAT).to_string(),
            None => self.timestamp.to_string(),
        }
    }
}
