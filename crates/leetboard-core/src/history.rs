//! Action construction
//!
//! Pure helpers that build audit [`Action`] records. The store owns appending
//! them; nothing here touches storage.

use crate::models::{Action, ActionKind, UserId};
use chrono::Utc;
use serde_json::Value;

/// Build an action for a single field change.
///
/// Falls back to the kind's default label when no description is given.
pub fn record(
    kind: ActionKind,
    user: &UserId,
    field: Option<&str>,
    old_value: Option<Value>,
    new_value: Option<Value>,
    description: Option<String>,
) -> Action {
    Action {
        kind,
        field: field.map(str::to_string),
        old_value,
        new_value,
        description: description.unwrap_or_else(|| kind.default_label().to_string()),
        timestamp: Utc::now(),
        user_id: user.clone(),
    }
}

/// Build the creation action that opens every problem's history
pub fn record_created(user: &UserId) -> Action {
    record(ActionKind::Created, user, None, None, None, None)
}

/// Build the action for a changed field, choosing the kind from the field name
pub fn record_field_change(
    user: &UserId,
    field: &str,
    old_value: Value,
    new_value: Value,
    description: Option<String>,
) -> Action {
    record(
        ActionKind::for_field(field),
        user,
        Some(field),
        Some(old_value),
        Some(new_value),
        description,
    )
}
