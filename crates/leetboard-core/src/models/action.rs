//! Append-only audit records attached to problems
//!
//! Every mutation through the store appends an [`Action`] per changed field.
//! Actions are never edited or removed once recorded.

use crate::models::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What kind of change an action records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Created,
    StatusChanged,
    NotesUpdated,
    TagsUpdated,
    CompaniesUpdated,
    AttemptsUpdated,
    TimeUpdated,
    /// Catch-all for fields without a dedicated kind
    FieldUpdated,
}

impl ActionKind {
    /// Default description used when the caller does not supply one
    pub fn default_label(&self) -> &'static str {
        match self {
            ActionKind::Created => "Problem created",
            ActionKind::StatusChanged => "Status changed",
            ActionKind::NotesUpdated => "Notes updated",
            ActionKind::TagsUpdated => "Tags updated",
            ActionKind::CompaniesUpdated => "Companies updated",
            ActionKind::AttemptsUpdated => "Attempt count updated",
            ActionKind::TimeUpdated => "Time spent updated",
            ActionKind::FieldUpdated => "Field updated",
        }
    }

    /// Maps a serialized field name to the action kind recorded for it
    pub fn for_field(field: &str) -> ActionKind {
        match field {
            "status" => ActionKind::StatusChanged,
            "notes" => ActionKind::NotesUpdated,
            "tags" => ActionKind::TagsUpdated,
            "companies" => ActionKind::CompaniesUpdated,
            "attempts" => ActionKind::AttemptsUpdated,
            "timeSpentMinutes" => ActionKind::TimeUpdated,
            _ => ActionKind::FieldUpdated,
        }
    }
}

/// One recorded change
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub kind: ActionKind,

    /// Serialized field name the change applies to; None for Created
    #[serde(default)]
    pub field: Option<String>,

    /// Value before the change, if any
    #[serde(default)]
    pub old_value: Option<Value>,

    /// Value after the change, if any
    #[serde(default)]
    pub new_value: Option<Value>,

    pub description: String,

    pub timestamp: DateTime<Utc>,

    pub user_id: UserId,
}
