//! The reducer driven through a real store, with thunks on top.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;
use std::time::Duration;
use todolists::{
    actions, thunks, Config, FilterValue, TodoListEnvironment, TodoListId, TodoListReducer,
    TodoListState, TodoListStore,
};
use todolists_runtime::StoreError;
use todolists_testing::{test_clock, ApiCall, MockFailure, MockTodoListApi, SequentialIds};

fn store() -> TodoListStore {
    TodoListStore::new(
        TodoListState::default(),
        TodoListReducer::new(),
        TodoListEnvironment::new(Arc::new(test_clock()), Arc::new(SequentialIds::new("id"))),
    )
}

#[tokio::test]
async fn test_local_editing_session() {
    let store = store();

    store.send(actions::add_todolist("What to learn")).await.unwrap();
    store.send(actions::add_task("id-1", "HTML")).await.unwrap();
    store.send(actions::add_task("id-1", "REACT")).await.unwrap();
    store
        .send(actions::change_task_checked("id-1", "id-2", true))
        .await
        .unwrap();
    store
        .send(actions::update_todolist_filter(FilterValue::Active, "id-1"))
        .await
        .unwrap();

    let visible: Vec<String> = store
        .state(|s| {
            s.visible_tasks(&TodoListId::new("id-1"))
                .into_iter()
                .map(|t| t.title.clone())
                .collect()
        })
        .await;
    assert_eq!(visible, vec!["REACT"]);
}

#[tokio::test]
async fn test_unchanged_subtrees_stay_shared() {
    let store = store();
    store.send(actions::add_todolist("What to learn")).await.unwrap();
    store.send(actions::add_task("id-1", "HTML")).await.unwrap();

    let (lists_before, tasks_before) =
        store.state(|s| (Arc::clone(&s.todo_lists), Arc::clone(&s.tasks))).await;

    store.send(actions::set_is_fetching(true)).await.unwrap();
    store.send(actions::remove_task("id-1", "missing")).await.unwrap();

    store
        .state(|s| {
            assert!(Arc::ptr_eq(&lists_before, &s.todo_lists));
            assert!(Arc::ptr_eq(&tasks_before, &s.tasks));
        })
        .await;

    store
        .send(actions::change_todolist_title("id-1", "What to master"))
        .await
        .unwrap();

    store
        .state(|s| {
            assert!(!Arc::ptr_eq(&lists_before, &s.todo_lists));
            assert!(Arc::ptr_eq(&tasks_before, &s.tasks));
        })
        .await;
}

#[tokio::test]
async fn test_change_notifications_follow_each_action() {
    let store = store();
    let mut changes = store.subscribe_changes();
    let start = *changes.borrow_and_update();

    store.send(actions::add_todolist("A")).await.unwrap();
    store.send(actions::add_todolist("B")).await.unwrap();

    tokio::time::timeout(Duration::from_secs(1), changes.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(*changes.borrow(), start + 2);
}

#[tokio::test]
async fn test_fetch_through_store() {
    let store = store();
    let api = MockTodoListApi::new()
        .with_todo_list("l1", "What to learn")
        .with_todo_list("l2", "What to buy");

    thunks::fetch_todo_lists(&store, &api).await.unwrap();

    let (titles, is_fetching) = store
        .state(|s| {
            (
                s.todo_lists.iter().map(|l| l.title.clone()).collect::<Vec<_>>(),
                s.is_fetching,
            )
        })
        .await;
    assert_eq!(titles, vec!["What to learn", "What to buy"]);
    assert!(!is_fetching);
}

#[tokio::test]
async fn test_task_pages_use_configured_size() {
    let config = Config::from_lookup(|name| {
        (name == "TODOLISTS_TASK_PAGE_SIZE").then(|| "3".to_string())
    })
    .unwrap();
    let store = store();
    let api = ["HTML", "CSS", "JS", "REACT"].iter().enumerate().fold(
        MockTodoListApi::new().with_todo_list("l1", "What to learn"),
        |api, (i, title)| api.with_task(MockTodoListApi::task("l1", &format!("t-{i}"), title)),
    );

    thunks::fetch_todo_lists(&store, &api).await.unwrap();
    let lists = store
        .state(|s| s.todo_lists.iter().map(|l| l.id.clone()).collect::<Vec<_>>())
        .await;
    for list in &lists {
        let page = thunks::get_tasks(&api, list, Some(config.task_page_size))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.total_count, 4);
    }

    assert_eq!(
        api.calls(),
        vec![
            ApiCall::GetTodoLists,
            ApiCall::GetTasks {
                todo_list_id: "l1".into(),
                page_size: 3,
            },
        ]
    );
}

#[tokio::test]
async fn test_failed_fetch_keeps_lists_and_lowers_flag() {
    let store = store();
    store.send(actions::add_todolist("Local")).await.unwrap();
    let api = MockTodoListApi::new().failing_with(MockFailure::RateLimited);

    assert!(thunks::fetch_todo_lists(&store, &api).await.is_err());

    let (count, is_fetching) = store.state(|s| (s.todo_lists.len(), s.is_fetching)).await;
    assert_eq!(count, 1);
    assert!(!is_fetching);
}

#[tokio::test]
async fn test_auth_through_store() {
    let store = store();
    let api = MockTodoListApi::new();

    assert!(thunks::auth(&store, &api).await.unwrap());
    assert!(store.state(|s| s.is_auth).await);
}

#[tokio::test]
async fn test_update_task_applies_before_call_returns() {
    let store = store();
    store.send(actions::add_todolist("What to learn")).await.unwrap();
    store.send(actions::add_task("id-1", "HTML")).await.unwrap();

    let edited = store
        .state(|s| s.tasks_for(&TodoListId::new("id-1"))[0].with_priority_raised())
        .await;
    let api = MockTodoListApi::new().failing_with(MockFailure::Transport);

    let list = TodoListId::new("id-1");
    let task_id = edited.id.clone();
    assert!(thunks::update_task(&store, &api, edited, &list, &task_id).await.is_err());

    let priority = store.state(|s| s.tasks_for(&list)[0].priority).await;
    assert_eq!(priority, 1);
}

#[tokio::test]
async fn test_thunks_fail_after_shutdown() {
    let store = store();
    store.shutdown(Duration::from_secs(1)).await.unwrap();
    let api = MockTodoListApi::new();

    let result = thunks::auth(&store, &api).await;

    assert!(matches!(
        result,
        Err(todolists::ThunkError::Dispatch(StoreError::ShutdownInProgress))
    ));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_state_snapshot_serializes() {
    let store = store();
    store.send(actions::add_todolist("What to learn")).await.unwrap();
    store.send(actions::add_task("id-1", "HTML")).await.unwrap();

    let json = store.state(|s| serde_json::to_value(s).unwrap()).await;
    assert_eq!(json["todoLists"][0]["id"], "id-1");
    assert_eq!(json["tasks"]["id-1"][0]["title"], "HTML");
    assert_eq!(json["isAuth"], false);
}
