//! Problem state store with DashMap + parking_lot::RwLock
//!
//! The authoritative in-memory view of the signed-in user's problems, plus
//! the derived [`UserStats`] snapshot. The store is the single writer of
//! statistics: every mutation, sign-in/out, and external-change refresh
//! re-derives them and publishes events on the bus. With nobody signed in the
//! store exposes an empty list and zeroed stats.

use crate::auth::AuthSession;
use crate::error::CoreError;
use crate::event::{EventBus, StoreEvent};
use crate::history;
use crate::models::{
    Problem, ProblemDraft, ProblemId, ProblemPatch, Status, UserId, UserStats,
    UNTITLED_PLACEHOLDER,
};
use crate::remote::RemoteStore;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

/// Central state store for a single user's tracked problems
pub struct ProblemStore {
    remote: Arc<RemoteStore>,
    auth: Arc<AuthSession>,

    /// Current problem list; Arc values for cheap cloning into snapshots
    problems: DashMap<ProblemId, Arc<Problem>>,

    /// Derived statistics (low contention, frequent reads)
    stats: RwLock<UserStats>,

    /// Bus that change notifications go out on
    event_bus: EventBus,
}

impl ProblemStore {
    pub fn new(remote: Arc<RemoteStore>, auth: Arc<AuthSession>) -> Self {
        Self {
            remote,
            auth,
            problems: DashMap::new(),
            stats: RwLock::new(UserStats::default()),
            event_bus: EventBus::default_capacity(),
        }
    }

    /// Bus handle for subscribing to updates
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Sign a user in and load their problems
    pub async fn sign_in(&self, user: UserId) {
        self.auth.sign_in(user.clone());
        self.event_bus.publish(StoreEvent::UserChanged(Some(user)));
        self.refresh().await;
    }

    /// Sign out, emptying the list and zeroing stats
    pub async fn sign_out(&self) {
        self.auth.sign_out();
        self.event_bus.publish(StoreEvent::UserChanged(None));
        self.refresh().await;
    }

    /// Reload the problem list from the remote store.
    ///
    /// Called after sign-in/out and whenever the backing store changes out
    /// of process. Read failures keep the last good snapshot (degraded, not
    /// fatal) and surface as a `SyncError` event.
    pub async fn refresh(&self) {
        match self.auth.current() {
            Some(user) => match self.remote.list_problems(&user) {
                Ok(list) => {
                    self.problems.clear();
                    for problem in list {
                        self.problems
                            .insert(problem.id.clone(), Arc::new(problem));
                    }
                    debug!(count = self.problems.len(), user = %user, "Problem list reloaded");
                }
                Err(e) => {
                    warn!(error = %e, "Failed to reload problems, keeping current snapshot");
                    self.event_bus.publish(StoreEvent::SyncError(e.to_string()));
                    return;
                }
            },
            None => self.problems.clear(),
        }

        self.event_bus.publish(StoreEvent::ProblemsReloaded);
        self.recompute_stats();
    }

    // ===================
    // Read accessors
    // ===================

    /// Snapshot of the current list, most recently updated first
    pub fn problems(&self) -> Vec<Arc<Problem>> {
        let mut list: Vec<_> = self
            .problems
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        list.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        list
    }

    pub fn get(&self, id: &ProblemId) -> Option<Arc<Problem>> {
        self.problems.get(id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn count(&self) -> usize {
        self.problems.len()
    }

    /// Current derived statistics snapshot
    pub fn stats(&self) -> UserStats {
        self.stats.read().clone()
    }

    // ===================
    // Mutations
    // ===================

    /// Create a problem from a draft, defaulting every missing field.
    ///
    /// Missing numerics become 0, missing lists empty, a missing or empty
    /// title the placeholder. An initial status that already implies an
    /// attempt or a solve back-fills the matching date fields. The audit
    /// trail opens with a `Created` action, plus a synthetic status change
    /// when the initial status is not the default.
    pub async fn add_problem(&self, draft: ProblemDraft) -> Result<Problem, CoreError> {
        let user = self.auth.require("add_problem")?;
        let now = Utc::now();
        let status = draft.status.unwrap_or_default();

        let mut problem = Problem {
            id: ProblemId::unassigned(),
            user_id: user.clone(),
            leetcode_id: draft.leetcode_id.unwrap_or(0),
            title: draft
                .title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| UNTITLED_PLACEHOLDER.to_string()),
            title_slug: draft.title_slug,
            difficulty: draft.difficulty.unwrap_or_default(),
            status: Status::default(),
            tags: draft.tags.unwrap_or_default(),
            companies: draft.companies.unwrap_or_default(),
            notes: draft.notes.unwrap_or_default(),
            attempts: draft.attempts.unwrap_or(0),
            time_spent_minutes: draft.time_spent_minutes.unwrap_or(0),
            created_at: now,
            updated_at: now,
            first_attempt_at: None,
            last_attempt_at: None,
            first_solved_at: None,
            solved_at: None,
            actions: vec![history::record_created(&user)],
        };

        if status != Status::default() {
            let description = apply_status_transition(&mut problem, Status::default(), status, now);
            problem.actions.push(history::record_field_change(
                &user,
                "status",
                json!(Status::default()),
                json!(status),
                description,
            ));
            problem.status = status;
        }

        let stored = self.remote.insert_problem(&problem)?;

        self.problems
            .insert(stored.id.clone(), Arc::new(stored.clone()));
        self.event_bus
            .publish(StoreEvent::ProblemAdded(stored.id.clone()));
        self.recompute_stats();

        debug!(id = %stored.id, title = %stored.title, "Problem added");
        Ok(stored)
    }

    /// Apply a field-level patch, recording one action per changed field.
    ///
    /// Diffs are by value equality: a patch field equal to the current value
    /// produces no action and no side effect, so re-submitting a form with
    /// unchanged values leaves the audit trail alone. An empty diff skips
    /// the write entirely.
    pub async fn update_problem(
        &self,
        id: &ProblemId,
        patch: ProblemPatch,
    ) -> Result<Problem, CoreError> {
        let user = self.auth.require("update_problem")?;

        let old = self
            .get(id)
            .ok_or_else(|| CoreError::ProblemNotFound { id: id.to_string() })?;

        let now = Utc::now();
        let mut updated = (*old).clone();
        let mut actions = Vec::new();

        if let Some(title) = patch.title {
            if title != old.title {
                actions.push(history::record_field_change(
                    &user,
                    "title",
                    json!(old.title),
                    json!(title),
                    None,
                ));
                updated.title = title;
            }
        }

        if let Some(title_slug) = patch.title_slug {
            if Some(&title_slug) != old.title_slug.as_ref() {
                actions.push(history::record_field_change(
                    &user,
                    "titleSlug",
                    json!(old.title_slug),
                    json!(title_slug),
                    None,
                ));
                updated.title_slug = Some(title_slug);
            }
        }

        if let Some(leetcode_id) = patch.leetcode_id {
            if leetcode_id != old.leetcode_id {
                actions.push(history::record_field_change(
                    &user,
                    "leetcodeId",
                    json!(old.leetcode_id),
                    json!(leetcode_id),
                    None,
                ));
                updated.leetcode_id = leetcode_id;
            }
        }

        if let Some(difficulty) = patch.difficulty {
            if difficulty != old.difficulty {
                actions.push(history::record_field_change(
                    &user,
                    "difficulty",
                    json!(old.difficulty),
                    json!(difficulty),
                    None,
                ));
                updated.difficulty = difficulty;
            }
        }

        if let Some(tags) = patch.tags {
            if tags != old.tags {
                actions.push(history::record_field_change(
                    &user,
                    "tags",
                    json!(old.tags),
                    json!(tags),
                    None,
                ));
                updated.tags = tags;
            }
        }

        if let Some(companies) = patch.companies {
            if companies != old.companies {
                actions.push(history::record_field_change(
                    &user,
                    "companies",
                    json!(old.companies),
                    json!(companies),
                    None,
                ));
                updated.companies = companies;
            }
        }

        if let Some(notes) = patch.notes {
            if notes != old.notes {
                actions.push(history::record_field_change(
                    &user,
                    "notes",
                    json!(old.notes),
                    json!(notes),
                    None,
                ));
                updated.notes = notes;
            }
        }

        if let Some(attempts) = patch.attempts {
            if attempts != old.attempts {
                actions.push(history::record_field_change(
                    &user,
                    "attempts",
                    json!(old.attempts),
                    json!(attempts),
                    None,
                ));
                updated.attempts = attempts;
            }
        }

        if let Some(time_spent) = patch.time_spent_minutes {
            if time_spent != old.time_spent_minutes {
                actions.push(history::record_field_change(
                    &user,
                    "timeSpentMinutes",
                    json!(old.time_spent_minutes),
                    json!(time_spent),
                    None,
                ));
                updated.time_spent_minutes = time_spent;
            }
        }

        if let Some(status) = patch.status {
            if status != old.status {
                let description = apply_status_transition(&mut updated, old.status, status, now);
                actions.push(history::record_field_change(
                    &user,
                    "status",
                    json!(old.status),
                    json!(status),
                    description,
                ));
                updated.status = status;
            }
        }

        if actions.is_empty() {
            debug!(id = %id, "Update changed nothing, skipping write");
            return Ok((*old).clone());
        }

        updated.updated_at = now;
        updated.actions.extend(actions);

        self.remote.update_problem(&updated)?;

        self.problems
            .insert(updated.id.clone(), Arc::new(updated.clone()));
        self.event_bus
            .publish(StoreEvent::ProblemUpdated(updated.id.clone()));
        self.recompute_stats();

        debug!(id = %updated.id, "Problem updated");
        Ok(updated)
    }

    /// Unconditional hard delete. Deleting an unknown id succeeds.
    pub async fn delete_problem(&self, id: &ProblemId) -> Result<(), CoreError> {
        let user = self.auth.require("delete_problem")?;

        self.remote.delete_problem(&user, id)?;

        if self.problems.remove(id).is_some() {
            self.event_bus
                .publish(StoreEvent::ProblemDeleted(id.clone()));
            self.recompute_stats();
            debug!(id = %id, "Problem deleted");
        }

        Ok(())
    }

    /// Recompute the stats snapshot from the current list and publish.
    /// Internal: triggered by every list change, never by callers.
    fn recompute_stats(&self) {
        let problems = self.problems();
        let stats = UserStats::compute(&problems, Utc::now().date_naive());
        *self.stats.write() = stats;
        self.event_bus.publish(StoreEvent::StatsUpdated);
    }
}

/// Apply the date side effects of a status change to `updated`.
///
/// Returns an action description override when the transition deserves one
/// (currently only the first solve).
///
/// Rules:
/// - Entering Attempted/Solved from Not Attempted back-fills
///   `first_attempt_at` when unset.
/// - Entering Attempted/Solved always stamps `last_attempt_at`.
/// - Entering Solved stamps `solved_at`; the first time also stamps
///   `first_solved_at`.
/// - Leaving Solved clears `solved_at`. `first_solved_at` is permanent.
fn apply_status_transition(
    updated: &mut Problem,
    old: Status,
    new: Status,
    now: DateTime<Utc>,
) -> Option<String> {
    if new.counts_as_attempt() {
        if old == Status::NotAttempted && updated.first_attempt_at.is_none() {
            updated.first_attempt_at = Some(now);
        }
        updated.last_attempt_at = Some(now);
    }

    if new.is_solved() && !old.is_solved() {
        updated.solved_at = Some(now);
        if updated.first_solved_at.is_none() {
            updated.first_solved_at = Some(now);
            return Some("Solved for the first time".to_string());
        }
    } else if old.is_solved() && !new.is_solved() {
        updated.solved_at = None;
    }

    None
}
