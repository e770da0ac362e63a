//! Integration tests for the problem store over a real on-disk database

use leetboard_core::models::{Difficulty, ProblemDraft, ProblemPatch, Status, UserId};
use leetboard_core::{AuthSession, ProblemStore, RemoteStore, StoreEvent};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::broadcast::Receiver;

fn open_store(dir: &TempDir) -> ProblemStore {
    let remote = Arc::new(RemoteStore::open(dir.path()).unwrap());
    ProblemStore::new(remote, Arc::new(AuthSession::new()))
}

fn draft(leetcode_id: u32, title: &str, difficulty: Difficulty) -> ProblemDraft {
    ProblemDraft {
        leetcode_id: Some(leetcode_id),
        title: Some(title.to_string()),
        title_slug: Some(title.to_lowercase().replace(' ', "-")),
        difficulty: Some(difficulty),
        ..Default::default()
    }
}

fn drain(rx: &mut Receiver<StoreEvent>) -> Vec<StoreEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn test_full_problem_lifecycle() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    store.sign_in(UserId::from("alice")).await;

    let added = store
        .add_problem(draft(1, "Two Sum", Difficulty::Easy))
        .await
        .unwrap();
    assert_eq!(store.count(), 1);
    assert_eq!(store.stats().total, 1);
    assert_eq!(added.actions.len(), 1);

    let updated = store
        .update_problem(
            &added.id,
            ProblemPatch {
                status: Some(Status::Solved),
                notes: Some("hash map, one pass".to_string()),
                attempts: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.status, Status::Solved);
    assert!(updated.solved_at.is_some());
    assert_eq!(updated.notes, "hash map, one pass");
    // Created + three field changes
    assert_eq!(updated.actions.len(), 4);
    assert_eq!(store.stats().solved, 1);
    assert_eq!(store.stats().easy_solved, 1);

    store.delete_problem(&added.id).await.unwrap();
    assert_eq!(store.count(), 0);
    assert_eq!(store.stats().total, 0);
}

#[tokio::test]
async fn test_state_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let solved_id;
    {
        let store = open_store(&dir);
        store.sign_in(UserId::from("alice")).await;
        let solved = store
            .add_problem(draft(1, "Two Sum", Difficulty::Easy))
            .await
            .unwrap();
        store
            .update_problem(&solved.id, ProblemPatch::status(Status::Solved))
            .await
            .unwrap();
        store
            .add_problem(draft(200, "Number of Islands", Difficulty::Medium))
            .await
            .unwrap();
        solved_id = solved.id;
    }

    let store = open_store(&dir);
    store.sign_in(UserId::from("alice")).await;

    assert_eq!(store.count(), 2);
    let solved = store.get(&solved_id).unwrap();
    assert_eq!(solved.title, "Two Sum");
    assert_eq!(solved.status, Status::Solved);
    assert!(solved.solved_at.is_some());
    // Created + status change survived in the audit trail
    assert_eq!(solved.actions.len(), 2);

    let stats = store.stats();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.solved, 1);
}

#[tokio::test]
async fn test_first_solved_at_survives_unsolve_and_reload() {
    let dir = TempDir::new().unwrap();
    let id;
    let first_solved;
    {
        let store = open_store(&dir);
        store.sign_in(UserId::from("alice")).await;
        let added = store
            .add_problem(draft(1, "Two Sum", Difficulty::Easy))
            .await
            .unwrap();
        id = added.id.clone();

        let solved = store
            .update_problem(&id, ProblemPatch::status(Status::Solved))
            .await
            .unwrap();
        first_solved = solved.first_solved_at.unwrap();

        let reopened = store
            .update_problem(&id, ProblemPatch::status(Status::Attempted))
            .await
            .unwrap();
        assert!(reopened.solved_at.is_none());
        assert_eq!(reopened.first_solved_at, Some(first_solved));

        store
            .update_problem(&id, ProblemPatch::status(Status::Solved))
            .await
            .unwrap();
    }

    let store = open_store(&dir);
    store.sign_in(UserId::from("alice")).await;

    let problem = store.get(&id).unwrap();
    assert_eq!(problem.first_solved_at, Some(first_solved));
    assert!(problem.solved_at.unwrap() >= first_solved);
}

#[tokio::test]
async fn test_refresh_picks_up_writes_from_another_instance() {
    let dir = TempDir::new().unwrap();
    let remote = Arc::new(RemoteStore::open(dir.path()).unwrap());

    let writer = ProblemStore::new(Arc::clone(&remote), Arc::new(AuthSession::new()));
    let reader = ProblemStore::new(Arc::clone(&remote), Arc::new(AuthSession::new()));
    writer.sign_in(UserId::from("alice")).await;
    reader.sign_in(UserId::from("alice")).await;
    assert_eq!(reader.count(), 0);

    writer
        .add_problem(draft(1, "Two Sum", Difficulty::Easy))
        .await
        .unwrap();

    // The reader's snapshot is stale until it refreshes
    assert_eq!(reader.count(), 0);
    reader.refresh().await;
    assert_eq!(reader.count(), 1);
    assert_eq!(reader.stats().total, 1);
}

#[tokio::test]
async fn test_mutations_publish_events_in_order() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    store.sign_in(UserId::from("alice")).await;

    let mut rx = store.event_bus().subscribe();

    let added = store
        .add_problem(draft(1, "Two Sum", Difficulty::Easy))
        .await
        .unwrap();
    let events = drain(&mut rx);
    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], StoreEvent::ProblemAdded(id) if *id == added.id));
    assert!(matches!(events[1], StoreEvent::StatsUpdated));

    store
        .update_problem(&added.id, ProblemPatch::status(Status::Attempted))
        .await
        .unwrap();
    let events = drain(&mut rx);
    assert!(matches!(&events[0], StoreEvent::ProblemUpdated(id) if *id == added.id));
    assert!(matches!(events[1], StoreEvent::StatsUpdated));

    store.delete_problem(&added.id).await.unwrap();
    let events = drain(&mut rx);
    assert!(matches!(&events[0], StoreEvent::ProblemDeleted(id) if *id == added.id));
    assert!(matches!(events[1], StoreEvent::StatsUpdated));
}
