//! Integration tests for the two-tier analysis cache over a real database

use leetboard_core::models::{AnalysisId, CachedAnalysis, Difficulty, Problem, ProblemDraft, UserId};
use leetboard_core::{AnalysisCache, AuthSession, ProblemStore, RemoteStore, ANALYSIS_VERSION};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

struct Harness {
    remote: Arc<RemoteStore>,
    auth: Arc<AuthSession>,
    store: ProblemStore,
}

impl Harness {
    fn open(dir: &TempDir) -> Self {
        let remote = Arc::new(RemoteStore::open(dir.path()).unwrap());
        let auth = Arc::new(AuthSession::new());
        let store = ProblemStore::new(Arc::clone(&remote), Arc::clone(&auth));
        Self {
            remote,
            auth,
            store,
        }
    }

    fn cache(&self) -> AnalysisCache {
        AnalysisCache::new(Arc::clone(&self.remote), Arc::clone(&self.auth))
    }

    async fn seed_problem(&self) -> Problem {
        self.store.sign_in(UserId::from("alice")).await;
        self.store
            .add_problem(ProblemDraft {
                leetcode_id: Some(42),
                title: Some("Trapping Rain Water".to_string()),
                title_slug: Some("trapping-rain-water".to_string()),
                difficulty: Some(Difficulty::Hard),
                ..Default::default()
            })
            .await
            .unwrap()
    }
}

#[tokio::test]
async fn test_memory_tier_serves_after_durable_wipe() {
    let dir = TempDir::new().unwrap();
    let harness = Harness::open(&dir);
    let problem = harness.seed_problem().await;
    let cache = harness.cache();

    cache
        .put(&problem, json!({"summary": "two pointers"}))
        .unwrap();

    // Remove the durable rows out from under the cache
    let removed = harness
        .remote
        .delete_analyses_for(
            &UserId::from("alice"),
            problem.leetcode_id,
            problem.title_slug.as_deref(),
        )
        .unwrap();
    assert_eq!(removed, 1);

    // The memory tier still answers
    let hit = cache.get(&problem).unwrap().unwrap();
    assert_eq!(hit.analysis["summary"], "two pointers");
    assert_eq!(cache.stats().hits, 1);
}

#[tokio::test]
async fn test_durable_tier_survives_cache_instance() {
    let dir = TempDir::new().unwrap();
    let harness = Harness::open(&dir);
    let problem = harness.seed_problem().await;

    let stored_id = {
        let cache = harness.cache();
        let stored = cache.put(&problem, json!({"summary": "stack"})).unwrap();
        stored.id.clone()
    };

    // Fresh instance, empty memory tier
    let cache = harness.cache();
    let hit = cache.get(&problem).unwrap().unwrap();
    assert_eq!(hit.id, stored_id);
    assert_eq!(hit.version, ANALYSIS_VERSION);
    assert_eq!(hit.analysis["summary"], "stack");
}

#[tokio::test]
async fn test_stale_version_rows_are_invisible() {
    let dir = TempDir::new().unwrap();
    let harness = Harness::open(&dir);
    let problem = harness.seed_problem().await;

    let now = chrono::Utc::now();
    harness
        .remote
        .insert_analysis(&CachedAnalysis {
            id: AnalysisId::unassigned(),
            user_id: UserId::from("alice"),
            problem_id: problem.leetcode_id,
            title_slug: problem.title_slug.clone(),
            title: Some(problem.title.clone()),
            version: "v0".to_string(),
            analysis: json!({"summary": "outdated prompt output"}),
            created_at: now,
            updated_at: now,
        })
        .unwrap();

    let cache = harness.cache();
    assert!(cache.get(&problem).unwrap().is_none());
    assert!(!cache.has(&problem).unwrap());
}

#[tokio::test]
async fn test_invalidate_is_visible_to_other_instances() {
    let dir = TempDir::new().unwrap();
    let harness = Harness::open(&dir);
    let problem = harness.seed_problem().await;

    let cache = harness.cache();
    cache.put(&problem, json!({"summary": "stack"})).unwrap();
    assert_eq!(cache.invalidate_problem(&problem).unwrap(), 1);

    assert!(cache.get(&problem).unwrap().is_none());
    // Durable rows are gone too, not just this instance's memory tier
    let other = harness.cache();
    assert!(other.get(&problem).unwrap().is_none());
}

#[tokio::test]
async fn test_update_revises_durably() {
    let dir = TempDir::new().unwrap();
    let harness = Harness::open(&dir);
    let problem = harness.seed_problem().await;

    let cache = harness.cache();
    let first = cache.put(&problem, json!({"summary": "brute force"})).unwrap();
    cache
        .update(&first, json!({"summary": "two pointers"}))
        .unwrap();

    // A fresh instance reads the revised record under the same id
    let other = harness.cache();
    let hit = other.get(&problem).unwrap().unwrap();
    assert_eq!(hit.id, first.id);
    assert_eq!(hit.analysis["summary"], "two pointers");
}
