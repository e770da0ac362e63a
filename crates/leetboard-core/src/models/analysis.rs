//! Cached AI analysis records

use crate::models::UserId;
use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Newtype for analysis record IDs
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisId(String);

impl AnalysisId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn unassigned() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for AnalysisId {
    fn default() -> Self {
        Self::unassigned()
    }
}

impl From<String> for AnalysisId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AnalysisId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for AnalysisId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for AnalysisId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl ToSql for AnalysisId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0.as_str()))
    }
}

impl FromSql for AnalysisId {
    fn column_result(value: ValueRef<'_>) -> Result<Self, FromSqlError> {
        value.as_str().map(AnalysisId::from)
    }
}

/// One stored AI analysis of a problem
///
/// The payload is schemaless JSON; the `version` tag names the prompt
/// generation that produced it, so older generations can be ignored without
/// being deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedAnalysis {
    #[serde(default)]
    pub id: AnalysisId,
    pub user_id: UserId,
    /// Numeric catalog id of the analyzed problem
    pub problem_id: u32,
    #[serde(default)]
    pub title_slug: Option<String>,
    /// Problem title at analysis time, for display without a problem lookup
    #[serde(default)]
    pub title: Option<String>,
    pub version: String,
    pub analysis: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CachedAnalysis {
    /// Key used by the in-memory tier
    pub fn cache_key(problem_id: u32, title_slug: Option<&str>) -> String {
        format!("{}:{}", problem_id, title_slug.unwrap_or(""))
    }
}
