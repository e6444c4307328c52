//! Async procedures that talk to the backend and dispatch around the call.
//!
//! Each thunk awaits exactly one network call. The ones that drive the
//! loading indicator raise `isFetching` first and always lower it again,
//! including when the call fails. Failures are returned to the caller, never
//! swallowed.

use crate::actions::{self, TodoListAction};
use crate::types::{Task, TaskId, TodoList, TodoListId};
use std::future::Future;
use thiserror::Error;
use todolists_api::types::{ApiResponse, TaskDto, TasksPage, TodoListDto};
use todolists_api::{ApiError, TodoListApi, DEFAULT_TASK_PAGE_SIZE};
use todolists_runtime::{Dispatch, StoreError};

/// Errors returned by thunks
#[derive(Debug, Error)]
pub enum ThunkError {
    /// The network call failed or returned unusable data
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The store refused an action
    #[error("Dispatch failed: {0}")]
    Dispatch(#[from] StoreError),

    /// The backend answered with a non-zero result code
    #[error("Backend rejected the request (result code {result_code}): {}", .messages.join("; "))]
    Rejected {
        /// Result code from the envelope
        result_code: i32,
        /// Messages from the envelope
        messages: Vec<String>,
    },
}

/// Unwrap an envelope, turning a non-zero result code into an error
fn accepted<D>(response: ApiResponse<D>) -> Result<D, ThunkError> {
    if response.is_success() {
        Ok(response.data)
    } else {
        Err(ThunkError::Rejected {
            result_code: response.result_code,
            messages: response.messages,
        })
    }
}

/// Run `call` between `SetIsFetching(true)` and `SetIsFetching(false)`
///
/// The flag is lowered whatever `call` returns. An error from `call` wins
/// over an error lowering the flag.
async fn while_fetching<D, F, O>(dispatch: &D, call: F) -> Result<O, ThunkError>
where
    D: Dispatch<TodoListAction>,
    F: Future<Output = Result<O, ThunkError>>,
{
    dispatch.dispatch(actions::set_is_fetching(true)).await?;
    let result = call.await;
    let lowered = dispatch.dispatch(actions::set_is_fetching(false)).await;
    let value = result?;
    lowered?;
    Ok(value)
}

/// Load every list and replace the lists in state
///
/// Dispatches `SET_IS_FETCHING(true)`, `SET_TODOLISTS`, `SET_IS_FETCHING(false)`.
/// A list with an empty id rejects the whole response and nothing is replaced.
///
/// # Errors
///
/// Returns [`ThunkError`] if the call fails, a record is invalid, or the
/// dispatcher refuses an action.
#[tracing::instrument(skip_all)]
pub async fn fetch_todo_lists<D, T>(dispatch: &D, api: &T) -> Result<(), ThunkError>
where
    D: Dispatch<TodoListAction>,
    T: TodoListApi,
{
    while_fetching(dispatch, async {
        let dtos = api.get_todo_lists().await.inspect_err(|error| {
            tracing::warn!(%error, "Failed to load todo lists");
        })?;
        let todo_lists = dtos
            .into_iter()
            .map(TodoList::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(count = todo_lists.len(), "Loaded todo lists");
        dispatch.dispatch(actions::set_todolists(todo_lists)).await?;
        Ok::<_, ThunkError>(())
    })
    .await
}

/// Create a list on the backend
///
/// Dispatches nothing. Local state picks the list up on the next
/// [`fetch_todo_lists`].
///
/// # Errors
///
/// Returns [`ThunkError`] if the call fails or the backend rejects it.
#[tracing::instrument(skip(api))]
pub async fn add_todo_list<T: TodoListApi>(api: &T, title: &str) -> Result<TodoListDto, ThunkError> {
    let response = api.add_todo_list(title).await.inspect_err(|error| {
        tracing::warn!(%error, "Failed to create todo list");
    })?;
    let created = accepted(response)?.item;
    tracing::info!(id = %created.id, "Created todo list");
    Ok(created)
}

/// Delete a list on the backend
///
/// # Errors
///
/// Returns [`ThunkError`] if the call fails or the backend rejects it.
#[tracing::instrument(skip(api), fields(todo_list_id = %todo_list_id))]
pub async fn delete_todo_list<T: TodoListApi>(
    api: &T,
    todo_list_id: &TodoListId,
) -> Result<(), ThunkError> {
    let response = api
        .delete_todo_list(todo_list_id.as_str())
        .await
        .inspect_err(|error| tracing::warn!(%error, "Failed to delete todo list"))?;
    accepted(response)?;
    tracing::info!("Deleted todo list");
    Ok(())
}

/// Create a task on the backend
///
/// # Errors
///
/// Returns [`ThunkError`] if the call fails or the backend rejects it.
#[tracing::instrument(skip(api), fields(todo_list_id = %todo_list_id))]
pub async fn add_task<T: TodoListApi>(
    api: &T,
    todo_list_id: &TodoListId,
    title: &str,
) -> Result<TaskDto, ThunkError> {
    let response = api
        .add_task(todo_list_id.as_str(), title)
        .await
        .inspect_err(|error| tracing::warn!(%error, "Failed to create task"))?;
    let created = accepted(response)?.item;
    tracing::info!(task_id = %created.id, "Created task");
    Ok(created)
}

/// Load one page of tasks for a list
///
/// `page_size` defaults to [`DEFAULT_TASK_PAGE_SIZE`].
///
/// # Errors
///
/// Returns [`ThunkError`] if the call fails or the page reports an error.
#[tracing::instrument(skip(api), fields(todo_list_id = %todo_list_id))]
pub async fn get_tasks<T: TodoListApi>(
    api: &T,
    todo_list_id: &TodoListId,
    page_size: Option<u32>,
) -> Result<TasksPage, ThunkError> {
    let page_size = page_size.unwrap_or(DEFAULT_TASK_PAGE_SIZE);
    let page = api
        .get_tasks(todo_list_id.as_str(), page_size)
        .await
        .inspect_err(|error| tracing::warn!(%error, "Failed to load tasks"))?;
    tracing::info!(
        returned = page.items.len(),
        total = page.total_count,
        "Loaded tasks"
    );
    Ok(page)
}

/// Rename a list on the backend
///
/// # Errors
///
/// Returns [`ThunkError`] if the call fails or the backend rejects it.
#[tracing::instrument(skip(api), fields(todo_list_id = %todo_list_id))]
pub async fn update_todo_list_title<T: TodoListApi>(
    api: &T,
    todo_list_id: &TodoListId,
    title: &str,
) -> Result<(), ThunkError> {
    let response = api
        .update_todo_list_title(todo_list_id.as_str(), title)
        .await
        .inspect_err(|error| tracing::warn!(%error, "Failed to rename todo list"))?;
    accepted(response)?;
    tracing::info!("Renamed todo list");
    Ok(())
}

/// Save an edited task
///
/// `REPLACE_TASK` is dispatched before the call so the edit shows at once.
/// It is not rolled back if the call fails.
///
/// # Errors
///
/// Returns [`ThunkError`] if the dispatcher refuses the action, the call
/// fails, or the backend rejects it.
#[tracing::instrument(skip(dispatch, api, task), fields(todo_list_id = %todo_list_id, task_id = %task_id))]
pub async fn update_task<D, T>(
    dispatch: &D,
    api: &T,
    task: Task,
    todo_list_id: &TodoListId,
    task_id: &TaskId,
) -> Result<(), ThunkError>
where
    D: Dispatch<TodoListAction>,
    T: TodoListApi,
{
    let model = task.to_update_model();
    dispatch
        .dispatch(actions::replace_task(todo_list_id.clone(), task_id.clone(), task))
        .await?;

    let response = api
        .update_task(todo_list_id.as_str(), task_id.as_str(), &model)
        .await
        .inspect_err(|error| tracing::warn!(%error, "Failed to save task"))?;
    accepted(response)?;
    tracing::info!("Saved task");
    Ok(())
}

/// Check the session and record the outcome
///
/// Dispatches `SET_IS_AUTH(true)` between the fetching flags when the
/// backend answers with result code 0. Any other code leaves the flag alone.
/// Returns whether the session is authenticated.
///
/// # Errors
///
/// Returns [`ThunkError`] if the call fails or the dispatcher refuses an
/// action.
#[tracing::instrument(skip_all)]
pub async fn auth<D, T>(dispatch: &D, api: &T) -> Result<bool, ThunkError>
where
    D: Dispatch<TodoListAction>,
    T: TodoListApi,
{
    while_fetching(dispatch, async {
        let response = api
            .auth_me()
            .await
            .inspect_err(|error| tracing::warn!(%error, "Auth check failed"))?;

        if response.is_success() {
            tracing::info!(login = ?response.data.login, "Session is authenticated");
            dispatch.dispatch(actions::set_is_auth(true)).await?;
            Ok::<_, ThunkError>(true)
        } else {
            tracing::info!(result_code = response.result_code, "Session is not authenticated");
            Ok::<_, ThunkError>(false)
        }
    })
    .await
}
