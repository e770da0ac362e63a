//! Problem models for the tracker

use crate::models::Action;
use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::borrow::{Borrow, Cow};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

/// Title given to drafts submitted without one
pub const UNTITLED_PLACEHOLDER: &str = "Untitled problem";

/// Newtype for Problem ID - zero-cost type safety
///
/// Assigned by the remote store on insert (UUID v4). An empty id marks a
/// record that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProblemId(String);

impl ProblemId {
    /// Create a new ProblemId
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// Generate a fresh store id
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Placeholder id for records not yet persisted
    pub fn unassigned() -> Self {
        Self(String::new())
    }

    /// View the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take the owned String out
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Check if the id is empty (not yet persisted)
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check if the id starts with a given pattern
    pub fn starts_with(&self, pattern: &str) -> bool {
        self.0.starts_with(pattern)
    }

    /// Get the length of the id
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<String> for ProblemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProblemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for ProblemId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ProblemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ProblemId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ProblemId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl ToSql for ProblemId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0.as_str()))
    }
}

impl FromSql for ProblemId {
    fn column_result(value: ValueRef<'_>) -> Result<Self, FromSqlError> {
        value.as_str().map(ProblemId::from)
    }
}

impl Borrow<str> for ProblemId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Deref for ProblemId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> From<&'a ProblemId> for Cow<'a, str> {
    fn from(id: &'a ProblemId) -> Self {
        Cow::Borrowed(id.as_str())
    }
}

/// Newtype for User ID - zero-cost type safety
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a new UserId
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// View the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take the owned String out
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Check if the user id is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for UserId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for UserId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl ToSql for UserId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0.as_str()))
    }
}

impl FromSql for UserId {
    fn column_result(value: ValueRef<'_>) -> Result<Self, FromSqlError> {
        value.as_str().map(UserId::from)
    }
}

impl Deref for UserId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Problem difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!(
                "Unknown difficulty '{}' (expected easy, medium, or hard)",
                other
            )),
        }
    }
}

/// Progress status of a tracked problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    NotAttempted,
    Attempted,
    Solved,
    Reviewed,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::NotAttempted => "not_attempted",
            Status::Attempted => "attempted",
            Status::Solved => "solved",
            Status::Reviewed => "reviewed",
        }
    }

    /// Human label for display
    pub fn label(&self) -> &'static str {
        match self {
            Status::NotAttempted => "Not Attempted",
            Status::Attempted => "Attempted",
            Status::Solved => "Solved",
            Status::Reviewed => "Reviewed",
        }
    }

    /// Whether entering this status counts as working on the problem
    /// (drives first/last attempt timestamps)
    pub fn counts_as_attempt(&self) -> bool {
        matches!(self, Status::Attempted | Status::Solved)
    }

    /// Whether this status means the problem is currently solved.
    /// Reviewed is a post-solve state and does not count for solve stats.
    pub fn is_solved(&self) -> bool {
        matches!(self, Status::Solved)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "not_attempted" | "todo" => Ok(Status::NotAttempted),
            "attempted" => Ok(Status::Attempted),
            "solved" => Ok(Status::Solved),
            "reviewed" => Ok(Status::Reviewed),
            other => Err(format!(
                "Unknown status '{}' (expected not-attempted, attempted, solved, or reviewed)",
                other
            )),
        }
    }
}

/// A tracked coding problem owned by a single user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    /// Store-assigned id (empty until persisted)
    #[serde(default)]
    pub id: ProblemId,

    /// Owning user; problems are never shared
    pub user_id: UserId,

    /// Numeric id in the external catalog (0 for manual drafts)
    #[serde(default)]
    pub leetcode_id: u32,

    pub title: String,

    /// Catalog slug, set when imported; used for links and analysis lookups
    #[serde(default)]
    pub title_slug: Option<String>,

    #[serde(default)]
    pub difficulty: Difficulty,

    #[serde(default)]
    pub status: Status,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub companies: Vec<String>,

    #[serde(default)]
    pub notes: String,

    /// Number of attempts the user has logged
    #[serde(default)]
    pub attempts: u32,

    /// Cumulative minutes spent
    #[serde(default)]
    pub time_spent_minutes: u32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(default)]
    pub first_attempt_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub last_attempt_at: Option<DateTime<Utc>>,

    /// Set the first time the problem reaches Solved; never cleared
    #[serde(default)]
    pub first_solved_at: Option<DateTime<Utc>>,

    /// Most recent solve; cleared when the problem leaves Solved
    #[serde(default)]
    pub solved_at: Option<DateTime<Utc>>,

    /// Append-only audit trail
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl Default for ProblemId {
    fn default() -> Self {
        Self::unassigned()
    }
}

impl Problem {
    /// Link to the problem on the catalog site, when the slug is known
    pub fn url(&self) -> Option<String> {
        self.title_slug
            .as_ref()
            .map(|slug| format!("https://leetcode.com/problems/{}/", slug))
    }
}

/// Input for creating a problem; every field is optional and defaulted
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProblemDraft {
    pub leetcode_id: Option<u32>,
    pub title: Option<String>,
    pub title_slug: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub status: Option<Status>,
    pub tags: Option<Vec<String>>,
    pub companies: Option<Vec<String>>,
    pub notes: Option<String>,
    pub attempts: Option<u32>,
    pub time_spent_minutes: Option<u32>,
}

/// Field-level patch for an existing problem; absent fields are untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProblemPatch {
    pub title: Option<String>,
    pub title_slug: Option<String>,
    pub leetcode_id: Option<u32>,
    pub difficulty: Option<Difficulty>,
    pub status: Option<Status>,
    pub tags: Option<Vec<String>>,
    pub companies: Option<Vec<String>>,
    pub notes: Option<String>,
    pub attempts: Option<u32>,
    pub time_spent_minutes: Option<u32>,
}

impl ProblemPatch {
    /// Patch that only changes the status
    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.title_slug.is_none()
            && self.leetcode_id.is_none()
            && self.difficulty.is_none()
            && self.status.is_none()
            && self.tags.is_none()
            && self.companies.is_none()
            && self.notes.is_none()
            && self.attempts.is_none()
            && self.time_spent_minutes.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_parse() {
        assert_eq!("easy".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert_eq!("Medium".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert_eq!("HARD".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("expert".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_status_parse_variants() {
        assert_eq!(
            "not-attempted".parse::<Status>().unwrap(),
            Status::NotAttempted
        );
        assert_eq!(
            "not_attempted".parse::<Status>().unwrap(),
            Status::NotAttempted
        );
        assert_eq!("todo".parse::<Status>().unwrap(), Status::NotAttempted);
        assert_eq!("Solved".parse::<Status>().unwrap(), Status::Solved);
        assert!("done".parse::<Status>().is_err());
    }

    #[test]
    fn test_status_helpers() {
        assert!(Status::Attempted.counts_as_attempt());
        assert!(Status::Solved.counts_as_attempt());
        assert!(!Status::NotAttempted.counts_as_attempt());
        assert!(!Status::Reviewed.counts_as_attempt());

        assert!(Status::Solved.is_solved());
        assert!(!Status::Reviewed.is_solved());
    }

    #[test]
    fn test_draft_deserializes_with_all_fields_missing() {
        let draft: ProblemDraft = serde_json::from_str("{}").unwrap();
        assert!(draft.title.is_none());
        assert!(draft.tags.is_none());
        assert!(draft.attempts.is_none());
    }

    #[test]
    fn test_problem_url_from_slug() {
        let json = r#"{
            "userId": "u1",
            "title": "Two Sum",
            "titleSlug": "two-sum",
            "createdAt": "2026-01-01T00:00:00Z",
            "updatedAt": "2026-01-01T00:00:00Z"
        }"#;
        let problem: Problem = serde_json::from_str(json).unwrap();
        assert_eq!(
            problem.url().unwrap(),
            "https://leetcode.com/problems/two-sum/"
        );
        assert_eq!(problem.status, Status::NotAttempted);
        assert_eq!(problem.difficulty, Difficulty::Medium);
        assert!(problem.id.is_empty());
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(ProblemPatch::default().is_empty());
        assert!(!ProblemPatch::status(Status::Solved).is_empty());
    }
}
