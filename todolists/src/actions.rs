//! The action vocabulary and its constructors.
//!
//! Actions serialize as `{"type": "ADD_TODOLIST", ...}` with camelCase
//! payload fields. A tag this build does not know deserializes to
//! [`TodoListAction::Unknown`], which every reducer ignores.

use crate::types::{FilterValue, Task, TaskId, TodoList, TodoListId};
use serde::{Deserialize, Serialize};
use todolists_macros::Action;

/// One intended state change
#[derive(Action, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum TodoListAction {
    /// Create a list with a fresh id
    AddTodolist {
        /// Title of the new list
        title: String,
    },

    /// Delete a list; its task bucket stays
    RemoveTodolist {
        /// List to delete
        id: TodoListId,
    },

    /// Change which tasks a list shows
    UpdateTodolistFilter {
        /// List to change
        id: TodoListId,
        /// New filter
        filter: FilterValue,
    },

    /// Rename a list
    ChangeTodolistTitle {
        /// List to rename
        todo_list_id: TodoListId,
        /// New title
        title: String,
    },

    /// Replace every list wholesale
    SetTodolists {
        /// Lists, already validated
        todo_lists: Vec<TodoList>,
    },

    /// Create a task with a fresh id at the top of a list
    AddTask {
        /// Owning list
        todo_list_id: TodoListId,
        /// Title of the new task
        title: String,
    },

    /// Delete a task
    RemoveTask {
        /// Owning list
        todo_list_id: TodoListId,
        /// Task to delete
        task_id: TaskId,
    },

    /// Rename a task
    ChangeTaskTitle {
        /// Owning list
        todo_list_id: TodoListId,
        /// Task to rename
        task_id: TaskId,
        /// New title
        title: String,
    },

    /// Check or uncheck a task
    ChangeTaskChecked {
        /// Owning list
        todo_list_id: TodoListId,
        /// Task to change
        task_id: TaskId,
        /// New completion state
        is_done: bool,
    },

    /// Raise or lower the loading flag
    SetIsFetching {
        /// New flag value
        is_fetching: bool,
    },

    /// Record whether the session is authenticated
    SetIsAuth {
        /// New flag value
        is_auth: bool,
    },

    /// Swap one task for a caller-built record
    ReplaceTask {
        /// Owning list
        todo_list_id: TodoListId,
        /// Task to replace
        task_id: TaskId,
        /// Replacement record
        task: Task,
    },

    /// Any tag not listed above
    #[action(fallback)]
    #[serde(other)]
    Unknown,
}

/// `ADD_TODOLIST`
#[must_use]
pub fn add_todolist(title: impl Into<String>) -> TodoListAction {
    TodoListAction::AddTodolist {
        title: title.into(),
    }
}

/// `REMOVE_TODOLIST`
#[must_use]
pub fn remove_todolist(id: impl Into<TodoListId>) -> TodoListAction {
    TodoListAction::RemoveTodolist { id: id.into() }
}

/// `UPDATE_TODOLIST_FILTER`
///
/// Takes the filter first, the way the list header calls it.
#[must_use]
pub fn update_todolist_filter(filter: FilterValue, id: impl Into<TodoListId>) -> TodoListAction {
    TodoListAction::UpdateTodolistFilter {
        id: id.into(),
        filter,
    }
}

/// `CHANGE_TODOLIST_TITLE`
#[must_use]
pub fn change_todolist_title(
    todo_list_id: impl Into<TodoListId>,
    title: impl Into<String>,
) -> TodoListAction {
    TodoListAction::ChangeTodolistTitle {
        todo_list_id: todo_list_id.into(),
        title: title.into(),
    }
}

/// `SET_TODOLISTS`
#[must_use]
pub const fn set_todolists(todo_lists: Vec<TodoList>) -> TodoListAction {
    TodoListAction::SetTodolists { todo_lists }
}

/// `ADD_TASK`
#[must_use]
pub fn add_task(todo_list_id: impl Into<TodoListId>, title: impl Into<String>) -> TodoListAction {
    TodoListAction::AddTask {
        todo_list_id: todo_list_id.into(),
        title: title.into(),
    }
}

/// `REMOVE_TASK`
#[must_use]
pub fn remove_task(
    todo_list_id: impl Into<TodoListId>,
    task_id: impl Into<TaskId>,
) -> TodoListAction {
    TodoListAction::RemoveTask {
        todo_list_id: todo_list_id.into(),
        task_id: task_id.into(),
    }
}

/// `CHANGE_TASK_TITLE`
#[must_use]
pub fn change_task_title(
    todo_list_id: impl Into<TodoListId>,
    task_id: impl Into<TaskId>,
    title: impl Into<String>,
) -> TodoListAction {
    TodoListAction::ChangeTaskTitle {
        todo_list_id: todo_list_id.into(),
        task_id: task_id.into(),
        title: title.into(),
    }
}

/// `CHANGE_TASK_CHECKED`
#[must_use]
pub fn change_task_checked(
    todo_list_id: impl Into<TodoListId>,
    task_id: impl Into<TaskId>,
    is_done: bool,
) -> TodoListAction {
    TodoListAction::ChangeTaskChecked {
        todo_list_id: todo_list_id.into(),
        task_id: task_id.into(),
        is_done,
    }
}

/// `SET_IS_FETCHING`
#[must_use]
pub const fn set_is_fetching(is_fetching: bool) -> TodoListAction {
    TodoListAction::SetIsFetching { is_fetching }
}

/// `SET_IS_AUTH`
#[must_use]
pub const fn set_is_auth(is_auth: bool) -> TodoListAction {
    TodoListAction::SetIsAuth { is_auth }
}

/// `REPLACE_TASK`
#[must_use]
pub fn replace_task(
    todo_list_id: impl Into<TodoListId>,
    task_id: impl Into<TaskId>,
    task: Task,
) -> TodoListAction {
    TodoListAction::ReplaceTask {
        todo_list_id: todo_list_id.into(),
        task_id: task_id.into(),
        task,
    }
}
