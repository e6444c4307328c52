//! Integration tests for Store dispatch ordering and shutdown
//!
//! Exercises the store the way a loading indicator uses it: a caller raises
//! a flag, does its own async work and lowers the flag again, while other
//! senders keep editing state.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use std::sync::Arc;
use std::time::Duration;
use todolists_core::reducer::Reducer;
use todolists_runtime::{Dispatch, Store, StoreConfig, StoreError};

// ============================================================================
// Test Fixtures
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum SyncAction {
    SetFetching(bool),
    /// One page arrived
    PageLoaded { page: u32 },
    /// Local edit
    Rename(String),
}

#[derive(Debug, Clone, Default)]
struct SyncState {
    is_fetching: bool,
    pages: Vec<u32>,
    title: String,
}

#[derive(Clone)]
struct SyncReducer;

impl Reducer for SyncReducer {
    type State = SyncState;
    type Action = SyncAction;
    type Environment = ();

    fn reduce(&self, state: &mut SyncState, action: SyncAction, _env: &()) {
        match action {
            SyncAction::SetFetching(is_fetching) => state.is_fetching = is_fetching,
            SyncAction::PageLoaded { page } => state.pages.push(page),
            SyncAction::Rename(title) => state.title = title,
        }
    }
}

fn store() -> Store<SyncState, SyncAction, (), SyncReducer> {
    Store::new(SyncState::default(), SyncReducer, ())
}

/// Raise the flag, load pages one after another, lower the flag
async fn load_pages<D: Dispatch<SyncAction>>(sink: &D, count: u32) -> Result<(), StoreError> {
    sink.dispatch(SyncAction::SetFetching(true)).await?;
    for page in 1..=count {
        tokio::time::sleep(Duration::from_millis(2)).await;
        sink.dispatch(SyncAction::PageLoaded { page }).await?;
    }
    sink.dispatch(SyncAction::SetFetching(false)).await
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn state_is_updated_before_send_returns() {
    let store = store();
    store.send(SyncAction::SetFetching(true)).await.unwrap();

    assert!(store.state(|s| s.is_fetching).await);
}

#[tokio::test]
async fn caller_driven_loading_keeps_order() {
    let store = store();

    load_pages(&store, 3).await.unwrap();

    let (fetching, pages) = store.state(|s| (s.is_fetching, s.pages.clone())).await;
    assert!(!fetching);
    assert_eq!(pages, vec![1, 2, 3]);
}

#[tokio::test]
async fn local_edits_interleave_with_loading() {
    let store = store();
    let loader = store.clone();

    let loading = tokio::spawn(async move { load_pages(&loader, 5).await });
    store.send(SyncAction::Rename("groceries".into())).await.unwrap();
    loading.await.expect("loader panicked").unwrap();

    let (title, pages) = store.state(|s| (s.title.clone(), s.pages.len())).await;
    assert_eq!(title, "groceries");
    assert_eq!(pages, 5);
}

#[tokio::test]
async fn clones_share_state() {
    let store = store();
    let view = store.clone();

    store.send(SyncAction::Rename("shared".into())).await.unwrap();
    assert_eq!(view.state(|s| s.title.clone()).await, "shared");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_senders_do_not_lose_updates() {
    let store = Arc::new(store());
    let changes = store.subscribe_changes();
    let mut tasks = Vec::new();

    for page in 0..20 {
        let store = Arc::clone(&store);
        tasks.push(tokio::spawn(async move {
            store.send(SyncAction::PageLoaded { page }).await
        }));
    }
    for task in tasks {
        task.await.expect("sender panicked").unwrap();
    }

    let mut pages = store.state(|s| s.pages.clone()).await;
    pages.sort_unstable();
    assert_eq!(pages, (0..20).collect::<Vec<_>>());
    assert_eq!(*changes.borrow(), 20);
    assert_eq!(store.in_flight(), 0);
}

#[tokio::test]
async fn change_notifications_coalesce() {
    let store = store();
    let mut changes = store.subscribe_changes();
    changes.borrow_and_update();

    store.send(SyncAction::Rename("a".into())).await.unwrap();
    store.send(SyncAction::Rename("b".into())).await.unwrap();

    tokio::time::timeout(Duration::from_secs(1), changes.changed())
        .await
        .expect("no change notification")
        .unwrap();
    assert_eq!(*changes.borrow_and_update(), 2);
    assert!(!changes.has_changed().unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn shutdown_waits_for_admitted_sends() {
    let store = store();

    // A slow reader holds the state lock so the next send queues behind it
    let reader = store.clone();
    let reading = tokio::spawn(async move {
        reader
            .state(|_| std::thread::sleep(Duration::from_millis(200)))
            .await;
    });
    tokio::time::sleep(Duration::from_millis(20)).await;

    let sender = store.clone();
    let sending = tokio::spawn(async move { sender.send(SyncAction::Rename("late".into())).await });
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(store.in_flight(), 1);

    let result = store.shutdown(Duration::from_millis(30)).await;
    assert!(matches!(result, Err(StoreError::ShutdownTimeout(1))));

    // The admitted send still lands once the reader lets go
    reading.await.unwrap();
    sending.await.unwrap().unwrap();
    assert_eq!(store.state(|s| s.title.clone()).await, "late");

    store.shutdown(Duration::from_secs(1)).await.unwrap();
    assert!(matches!(
        store.send(SyncAction::Rename("too late".into())).await,
        Err(StoreError::ShutdownInProgress)
    ));
}

#[tokio::test]
async fn shutdown_default_uses_configured_timeout() {
    let store = Store::with_config(
        SyncState::default(),
        SyncReducer,
        (),
        StoreConfig::default().with_shutdown_timeout(Duration::from_millis(50)),
    );

    store.shutdown_default().await.unwrap();
    let result = load_pages(&store, 1).await;
    assert!(matches!(result, Err(StoreError::ShutdownInProgress)));
    assert!(!store.state(|s| s.is_fetching).await);
}
