//! Todolists demo binary
//!
//! Checks the session, loads lists and their first task pages from the
//! backend, applies a few local edits and prints the resulting state.

use anyhow::Context;
use todolists::{
    actions, logging, thunks, Config, FilterValue, TodoListEnvironment, TodoListReducer,
    TodoListState, TodoListStore,
};
use todolists_api::HttpTodoListApi;
use todolists_runtime::StoreConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("invalid configuration")?;
    logging::init_logging(&config.log_level);

    tracing::info!(api_url = %config.api_url, "Starting todolists");

    let mut api = HttpTodoListApi::with_timeout(&config.api_url, config.request_timeout())
        .context("failed to build HTTP client")?;
    if let Some(key) = &config.api_key {
        api = api.with_api_key(key);
    }

    let store: TodoListStore = TodoListStore::with_config(
        TodoListState::default(),
        TodoListReducer::new(),
        TodoListEnvironment::production(),
        StoreConfig::default().with_shutdown_timeout(config.shutdown_timeout()),
    );

    // Backend failures are logged and the demo continues offline
    match thunks::auth(&store, &api).await {
        Ok(authenticated) => tracing::info!(authenticated, "Auth check finished"),
        Err(error) => tracing::warn!(%error, "Auth check failed"),
    }
    if let Err(error) = thunks::fetch_todo_lists(&store, &api).await {
        tracing::warn!(%error, "Could not load todo lists");
    }

    let fetched = store
        .state(|s| s.todo_lists.iter().map(|list| list.id.clone()).collect::<Vec<_>>())
        .await;
    for list_id in &fetched {
        match thunks::get_tasks(&api, list_id, Some(config.task_page_size)).await {
            Ok(page) => tracing::info!(
                todo_list_id = %list_id,
                loaded = page.items.len(),
                total = page.total_count,
                "First task page"
            ),
            Err(error) => tracing::warn!(%error, todo_list_id = %list_id, "Could not load tasks"),
        }
    }

    store.send(actions::add_todolist("What to learn")).await?;
    let list_id = store
        .state(|s| s.todo_lists.first().map(|list| list.id.clone()))
        .await
        .context("list was not added")?;

    store.send(actions::add_task(list_id.clone(), "HTML")).await?;
    store.send(actions::add_task(list_id.clone(), "REACT")).await?;
    let first_task = store
        .state(|s| s.tasks_for(&list_id).last().map(|task| task.id.clone()))
        .await
        .context("task was not added")?;
    store
        .send(actions::change_task_checked(list_id.clone(), first_task, true))
        .await?;
    store
        .send(actions::update_todolist_filter(FilterValue::Active, list_id.clone()))
        .await?;

    let visible = store
        .state(|s| {
            s.visible_tasks(&list_id)
                .into_iter()
                .map(|task| task.title.clone())
                .collect::<Vec<_>>()
        })
        .await;
    tracing::info!(?visible, "Active tasks");

    let snapshot = store.state(|s| serde_json::to_string_pretty(s)).await?;
    println!("{snapshot}");

    store.shutdown_default().await?;
    tracing::info!("Shut down cleanly");
    Ok(())
}
