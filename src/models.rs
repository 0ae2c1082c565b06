// Data model for the book service

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Creator recorded on the demo seed rows.
pub const SEED_CREATOR: &str = "System";

/// Creator recorded when a create request omits the field.
pub const DEFAULT_CREATOR: &str = "Unknown";

/// One book record as stored and served.
///
/// `id` and `created_at` are assigned by the store on creation and never
/// change afterwards. Field names on the wire are camelCase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    /// RFC 3339 instant, UTC, millisecond precision.
    pub created_at: String,
    pub created_by: String,
}

/// Request body for create and update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

impl BookInput {
    pub fn new(title: impl Into<String>, author: impl Into<String>, created_by: Option<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            created_by,
        }
    }

    /// Creator to store, falling back to the sentinel when absent or blank.
    pub fn creator(&self) -> &str {
        match self.created_by.as_deref() {
            Some(c) if !c.trim().is_empty() => c,
            _ => DEFAULT_CREATOR,
        }
    }
}

/// Render a timestamp the way the store persists it.
pub fn to_stored_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}
