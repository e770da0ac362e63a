//! Two-tier cache for AI problem analyses
//!
//! Tier 1 is a bounded moka cache holding `Arc<CachedAnalysis>` for repeat
//! lookups within a run. Tier 2 is the durable `analyses` collection in the
//! remote store, which survives restarts.
//!
//! Invalidation is by version tag, not by age: every record carries the
//! [`ANALYSIS_VERSION`] it was produced under, and lookups filter on the
//! current value. Bumping the version makes every older record invisible
//! without deleting anything.

use crate::auth::AuthSession;
use crate::error::CoreError;
use crate::models::{AnalysisId, CachedAnalysis, Problem, UserId};
use crate::remote::RemoteStore;
use chrono::Utc;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Current analysis format version
///
/// **IMPORTANT**: Bump this when the analysis prompt or the expected JSON
/// shape changes, so stale records stop being served.
///
/// v1 was free-form text; v2 added the structured sections
/// (summary, approach, complexity, pitfalls).
pub const ANALYSIS_VERSION: &str = "v2";

/// Configuration for the analysis cache
#[derive(Debug, Clone)]
pub struct AnalysisCacheConfig {
    /// Maximum analyses held in the memory tier
    pub memory_capacity: u64,
}

impl Default for AnalysisCacheConfig {
    fn default() -> Self {
        Self {
            memory_capacity: 256,
        }
    }
}

/// Two-tier analysis cache scoped to the signed-in user
pub struct AnalysisCache {
    remote: Arc<RemoteStore>,
    auth: Arc<AuthSession>,

    /// Memory tier (LRU-ish, idle expiry falls back to the durable tier)
    memory: moka::sync::Cache<String, Arc<CachedAnalysis>>,

    hits: AtomicU64,
    misses: AtomicU64,
}

impl AnalysisCache {
    pub fn new(remote: Arc<RemoteStore>, auth: Arc<AuthSession>) -> Self {
        Self::with_config(remote, auth, AnalysisCacheConfig::default())
    }

    pub fn with_config(
        remote: Arc<RemoteStore>,
        auth: Arc<AuthSession>,
        config: AnalysisCacheConfig,
    ) -> Self {
        let memory = moka::sync::Cache::builder()
            .max_capacity(config.memory_capacity)
            .time_to_idle(Duration::from_secs(300))
            .build();

        Self {
            remote,
            auth,
            memory,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Cached analysis for a problem under the current version, or None.
    ///
    /// Checks the memory tier, then the durable tier. A durable read failure
    /// degrades to a miss with a warning so callers can regenerate.
    pub fn get(&self, problem: &Problem) -> Result<Option<Arc<CachedAnalysis>>, CoreError> {
        let user = self.auth.require("get_analysis")?;
        let key = memory_key(&user, problem);

        if let Some(cached) = self.memory.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(key = %key, "Analysis cache hit (memory)");
            return Ok(Some(cached));
        }

        let durable = self.remote.latest_analysis(
            &user,
            problem.leetcode_id,
            problem.title_slug.as_deref(),
            ANALYSIS_VERSION,
        );

        match durable {
            Ok(Some(analysis)) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                let analysis = Arc::new(analysis);
                self.memory.insert(key.clone(), Arc::clone(&analysis));
                debug!(key = %key, "Analysis cache hit (durable)");
                Ok(Some(analysis))
            }
            Ok(None) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "Analysis cache miss");
                Ok(None)
            }
            Err(e) if e.is_degradable() => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                warn!(error = %e, "Analysis lookup failed, treating as miss");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Whether a current-version analysis exists, without serving it.
    /// Does not count toward hit/miss statistics.
    ///
    /// Degrades the same way [`get`](Self::get) does: a durable read failure
    /// reads as absent.
    pub fn has(&self, problem: &Problem) -> Result<bool, CoreError> {
        let user = self.auth.require("has_analysis")?;

        if self.memory.contains_key(&memory_key(&user, problem)) {
            return Ok(true);
        }

        match self.remote.latest_analysis(
            &user,
            problem.leetcode_id,
            problem.title_slug.as_deref(),
            ANALYSIS_VERSION,
        ) {
            Ok(found) => Ok(found.is_some()),
            Err(e) if e.is_degradable() => {
                warn!(error = %e, "Analysis lookup failed, treating as miss");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Store a freshly generated analysis as a new record under the current
    /// version, and serve it from memory immediately.
    pub fn put(&self, problem: &Problem, analysis: Value) -> Result<Arc<CachedAnalysis>, CoreError> {
        let user = self.auth.require("put_analysis")?;
        let now = Utc::now();

        let record = CachedAnalysis {
            id: AnalysisId::unassigned(),
            user_id: user.clone(),
            problem_id: problem.leetcode_id,
            title_slug: problem.title_slug.clone(),
            title: Some(problem.title.clone()),
            version: ANALYSIS_VERSION.to_string(),
            analysis,
            created_at: now,
            updated_at: now,
        };

        let stored = Arc::new(self.remote.insert_analysis(&record)?);
        self.memory
            .insert(memory_key(&user, problem), Arc::clone(&stored));

        debug!(id = %stored.id, problem_id = stored.problem_id, "Analysis cached");
        Ok(stored)
    }

    /// Revise an existing record in place with a regenerated analysis.
    /// Keeps the record id and `created_at`, refreshes `updated_at`.
    pub fn update(
        &self,
        current: &CachedAnalysis,
        analysis: Value,
    ) -> Result<Arc<CachedAnalysis>, CoreError> {
        self.auth.require("update_analysis")?;

        let mut revised = current.clone();
        revised.analysis = analysis;
        revised.version = ANALYSIS_VERSION.to_string();
        revised.updated_at = Utc::now();

        self.remote.update_analysis(&revised)?;

        // Memory key follows the record's owner, same as the durable row
        let revised = Arc::new(revised);
        let key = format!(
            "{}:{}",
            revised.user_id,
            CachedAnalysis::cache_key(revised.problem_id, revised.title_slug.as_deref())
        );
        self.memory.insert(key, Arc::clone(&revised));

        debug!(id = %revised.id, "Analysis revised");
        Ok(revised)
    }

    /// Drop every stored analysis for a problem, both tiers.
    /// Returns the number of durable records removed.
    pub fn invalidate_problem(&self, problem: &Problem) -> Result<usize, CoreError> {
        let user = self.auth.require("invalidate_analysis")?;

        let removed = self
            .remote
            .delete_analyses_for(&user, problem.leetcode_id, problem.title_slug.as_deref())?;
        self.memory.invalidate(&memory_key(&user, problem));

        debug!(
            problem_id = problem.leetcode_id,
            removed, "Analyses invalidated"
        );
        Ok(removed)
    }

    /// Memory tier statistics
    pub fn stats(&self) -> CacheStats {
        self.memory.run_pending_tasks();
        CacheStats {
            memory_entries: self.memory.entry_count(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

fn memory_key(user: &UserId, problem: &Problem) -> String {
    format!(
        "{}:{}",
        user,
        CachedAnalysis::cache_key(problem.leetcode_id, problem.title_slug.as_deref())
    )
}

/// Hit and miss counters plus the memory-tier entry count
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub memory_entries: u64,
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            return 0.0;
        }
        (self.hits as f64) / (total as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, ProblemId, Status};
    use crate::remote::STORE_FILE;
    use serde_json::json;
    use tempfile::tempdir;

    fn fixtures(dir: &std::path::Path) -> (Arc<RemoteStore>, Arc<AuthSession>) {
        let remote = Arc::new(RemoteStore::open(dir).unwrap());
        let auth = Arc::new(AuthSession::new());
        auth.sign_in(UserId::from("u1"));
        (remote, auth)
    }

    fn problem(leetcode_id: u32, slug: &str) -> Problem {
        let now = Utc::now();
        Problem {
            id: ProblemId::generate(),
            user_id: UserId::from("u1"),
            leetcode_id,
            title: "Two Sum".to_string(),
            title_slug: Some(slug.to_string()),
            difficulty: Difficulty::Easy,
            status: Status::Solved,
            tags: vec![],
            companies: vec![],
            notes: String::new(),
            attempts: 1,
            time_spent_minutes: 0,
            created_at: now,
            updated_at: now,
            first_attempt_at: None,
            last_attempt_at: None,
            first_solved_at: Some(now),
            solved_at: Some(now),
            actions: vec![],
        }
    }

    #[test]
    fn test_get_requires_sign_in() {
        let dir = tempdir().unwrap();
        let remote = Arc::new(RemoteStore::open(dir.path()).unwrap());
        let cache = AnalysisCache::new(remote, Arc::new(AuthSession::new()));

        let err = cache.get(&problem(1, "two-sum")).unwrap_err();
        assert!(matches!(err, CoreError::NotAuthenticated { .. }));
    }

    #[test]
    fn test_miss_then_put_then_hit() {
        let dir = tempdir().unwrap();
        let (remote, auth) = fixtures(dir.path());
        let cache = AnalysisCache::new(remote, auth);
        let p = problem(1, "two-sum");

        assert!(cache.get(&p).unwrap().is_none());

        let stored = cache.put(&p, json!({"summary": "hash map"})).unwrap();
        assert_eq!(stored.version, ANALYSIS_VERSION);
        assert_eq!(stored.title.as_deref(), Some("Two Sum"));

        let served = cache.get(&p).unwrap().unwrap();
        assert_eq!(served.analysis["summary"], "hash map");

        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
    }

    #[test]
    fn test_durable_tier_survives_new_cache() {
        let dir = tempdir().unwrap();
        let (remote, auth) = fixtures(dir.path());
        let p = problem(1, "two-sum");

        {
            let cache = AnalysisCache::new(Arc::clone(&remote), Arc::clone(&auth));
            cache.put(&p, json!({"summary": "hash map"})).unwrap();
        }

        // Fresh memory tier, same durable rows
        let cache = AnalysisCache::new(remote, auth);
        let served = cache.get(&p).unwrap().unwrap();
        assert_eq!(served.analysis["summary"], "hash map");
    }

    #[test]
    fn test_stale_version_is_invisible() {
        let dir = tempdir().unwrap();
        let (remote, auth) = fixtures(dir.path());
        let p = problem(1, "two-sum");

        let old = CachedAnalysis {
            id: AnalysisId::unassigned(),
            user_id: UserId::from("u1"),
            problem_id: 1,
            title_slug: Some("two-sum".to_string()),
            title: Some("Two Sum".to_string()),
            version: "v0".to_string(),
            analysis: json!({"summary": "outdated"}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        remote.insert_analysis(&old).unwrap();

        let cache = AnalysisCache::new(remote, auth);
        assert!(cache.get(&p).unwrap().is_none());
        assert!(!cache.has(&p).unwrap());
    }

    #[test]
    fn test_durable_failure_reads_as_miss() {
        let dir = tempdir().unwrap();
        let (remote, auth) = fixtures(dir.path());
        let cache = AnalysisCache::new(remote, auth);
        let p = problem(1, "two-sum");

        // Break the durable tier underneath the open store
        let conn = rusqlite::Connection::open(dir.path().join(STORE_FILE)).unwrap();
        conn.execute_batch("DROP TABLE analyses;").unwrap();

        assert!(cache.get(&p).unwrap().is_none());
        assert!(!cache.has(&p).unwrap());
    }

    #[test]
    fn test_update_revises_in_place() {
        let dir = tempdir().unwrap();
        let (remote, auth) = fixtures(dir.path());
        let cache = AnalysisCache::new(remote, auth);
        let p = problem(1, "two-sum");

        let stored = cache.put(&p, json!({"summary": "brute force"})).unwrap();
        let revised = cache
            .update(&stored, json!({"summary": "hash map"}))
            .unwrap();

        assert_eq!(revised.id, stored.id);
        assert_eq!(revised.created_at, stored.created_at);
        assert!(revised.updated_at >= stored.updated_at);

        let served = cache.get(&p).unwrap().unwrap();
        assert_eq!(served.analysis["summary"], "hash map");
    }

    #[test]
    fn test_update_keys_memory_by_record_owner() {
        let dir = tempdir().unwrap();
        let (remote, auth) = fixtures(dir.path());
        let cache = AnalysisCache::new(remote, Arc::clone(&auth));
        let p = problem(1, "two-sum");

        let stored = cache.put(&p, json!({"summary": "brute force"})).unwrap();

        // Revising another user's record must not plant it under this session
        auth.sign_in(UserId::from("u2"));
        cache
            .update(&stored, json!({"summary": "hash map"}))
            .unwrap();
        assert!(cache.get(&p).unwrap().is_none());

        auth.sign_in(UserId::from("u1"));
        let served = cache.get(&p).unwrap().unwrap();
        assert_eq!(served.analysis["summary"], "hash map");
    }

    #[test]
    fn test_invalidate_problem_clears_both_tiers() {
        let dir = tempdir().unwrap();
        let (remote, auth) = fixtures(dir.path());
        let cache = AnalysisCache::new(remote, auth);
        let p = problem(1, "two-sum");
        let other = problem(2, "three-sum");

        cache.put(&p, json!({"summary": "hash map"})).unwrap();
        cache.put(&other, json!({"summary": "sorting"})).unwrap();

        let removed = cache.invalidate_problem(&p).unwrap();
        assert_eq!(removed, 1);

        assert!(cache.get(&p).unwrap().is_none());
        assert!(cache.get(&other).unwrap().is_some());
    }

    #[test]
    fn test_users_do_not_share_entries() {
        let dir = tempdir().unwrap();
        let (remote, auth) = fixtures(dir.path());
        let cache = AnalysisCache::new(remote, Arc::clone(&auth));
        let p = problem(1, "two-sum");

        cache.put(&p, json!({"summary": "hash map"})).unwrap();

        auth.sign_in(UserId::from("u2"));
        assert!(cache.get(&p).unwrap().is_none());

        auth.sign_in(UserId::from("u1"));
        assert!(cache.get(&p).unwrap().is_some());
    }
}
