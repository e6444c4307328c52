//! Domain types: lists, tasks and the application state.
//!
//! Containers inside [`TodoListState`] sit behind `Arc` so a transition only
//! copies what it changes. Everything else is shared with the previous
//! state, which lets a view compare subtrees with [`Arc::ptr_eq`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use todolists_api::types::{
    format_timestamp, parse_timestamp, TASK_STATUS_COMPLETED, TASK_STATUS_NEW,
};
use todolists_api::{ApiError, TaskDto, TodoListDto, UpdateTaskModel};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing id
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The id as a string slice
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id! {
    /// Opaque identifier of a to-do list
    TodoListId
}

string_id! {
    /// Opaque identifier of a task, unique within its list
    TaskId
}

/// Which tasks of a list the view shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterValue {
    /// Every task
    #[default]
    All,
    /// Tasks not yet done
    Active,
    /// Tasks already done
    Completed,
}

impl FilterValue {
    /// Returns true if `task` passes this filter
    #[must_use]
    pub const fn admits(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.is_done,
            Self::Completed => task.is_done,
        }
    }
}

/// A named list of tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoList {
    /// List id
    pub id: TodoListId,
    /// Title shown in the list header
    pub title: String,
    /// Active filter
    pub filter: FilterValue,
}

impl TodoList {
    /// A new list showing every task
    #[must_use]
    pub fn new(id: TodoListId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            filter: FilterValue::All,
        }
    }
}

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Task id
    pub id: TaskId,
    /// Title
    pub title: String,
    /// Completion state
    pub is_done: bool,
    /// Relative priority, unbounded in both directions
    pub priority: i64,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// When the task was created
    pub added_date: DateTime<Utc>,
    /// Optional due date
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
}

impl Task {
    /// A new open task with default priority and no description
    #[must_use]
    pub fn new(id: TaskId, title: impl Into<String>, added_date: DateTime<Utc>) -> Self {
        Self {
            id,
            title: title.into(),
            is_done: false,
            priority: 0,
            description: String::new(),
            added_date,
            deadline: None,
        }
    }

    /// Copy with priority one higher
    #[must_use]
    pub fn with_priority_raised(&self) -> Self {
        Self {
            priority: self.priority.saturating_add(1),
            ..self.clone()
        }
    }

    /// Copy with priority one lower
    #[must_use]
    pub fn with_priority_lowered(&self) -> Self {
        Self {
            priority: self.priority.saturating_sub(1),
            ..self.clone()
        }
    }

    /// Copy with a new description
    #[must_use]
    pub fn with_description(&self, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..self.clone()
        }
    }

    /// Copy with a new deadline
    ///
    /// A cleared picker yields `None`, which keeps the current deadline.
    #[must_use]
    pub fn with_deadline(&self, deadline: Option<DateTime<Utc>>) -> Self {
        Self {
            deadline: deadline.or(self.deadline),
            ..self.clone()
        }
    }

    /// The body `PUT /todo-lists/{id}/tasks/{taskId}` expects for this task
    #[must_use]
    pub fn to_update_model(&self) -> UpdateTaskModel {
        UpdateTaskModel {
            title: self.title.clone(),
            description: self.description.clone(),
            status: if self.is_done {
                TASK_STATUS_COMPLETED
            } else {
                TASK_STATUS_NEW
            },
            priority: self.priority,
            start_date: None,
            deadline: self.deadline.map(format_timestamp),
        }
    }
}

/// Task buckets keyed by list id
pub type TaskBuckets = HashMap<TodoListId, Arc<Vec<Task>>>;

/// The canonical application state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoListState {
    /// Lists, newest first
    pub todo_lists: Arc<Vec<TodoList>>,
    /// Tasks per list id, newest first
    pub tasks: Arc<TaskBuckets>,
    /// A load is in flight
    pub is_fetching: bool,
    /// The session is authenticated
    pub is_auth: bool,
}

impl TodoListState {
    /// The list with `id`
    #[must_use]
    pub fn todo_list(&self, id: &TodoListId) -> Option<&TodoList> {
        self.todo_lists.iter().find(|list| &list.id == id)
    }

    /// The tasks of list `id`, empty when it has no bucket
    #[must_use]
    pub fn tasks_for(&self, id: &TodoListId) -> &[Task] {
        self.tasks.get(id).map(|bucket| bucket.as_slice()).unwrap_or(&[])
    }

    /// One task of one list
    #[must_use]
    pub fn task(&self, todo_list_id: &TodoListId, task_id: &TaskId) -> Option<&Task> {
        self.tasks_for(todo_list_id)
            .iter()
            .find(|task| &task.id == task_id)
    }

    /// The tasks of list `id` that pass its filter
    #[must_use]
    pub fn visible_tasks(&self, id: &TodoListId) -> Vec<&Task> {
        let filter = self
            .todo_list(id)
            .map_or(FilterValue::All, |list| list.filter);
        self.tasks_for(id)
            .iter()
            .filter(|task| filter.admits(task))
            .collect()
    }

    /// Number of task buckets, including ones whose list is gone
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.tasks.len()
    }
}

impl TryFrom<TodoListDto> for TodoList {
    type Error = ApiError;

    fn try_from(dto: TodoListDto) -> Result<Self, Self::Error> {
        if dto.id.trim().is_empty() {
            return Err(ApiError::InvalidPayload(format!(
                "todo list {:?} has an empty id",
                dto.title
            )));
        }
        Ok(Self::new(TodoListId::new(dto.id), dto.title))
    }
}

impl TryFrom<TaskDto> for Task {
    type Error = ApiError;

    fn try_from(dto: TaskDto) -> Result<Self, Self::Error> {
        if dto.id.trim().is_empty() {
            return Err(ApiError::InvalidPayload(format!(
                "task {:?} has an empty id",
                dto.title
            )));
        }

        let is_done = dto.is_completed();
        let added_date = dto
            .added_date
            .as_deref()
            .and_then(parse_timestamp)
            .ok_or_else(|| {
                ApiError::InvalidPayload(format!("task {} has no valid addedDate", dto.id))
            })?;
        let deadline = match dto.deadline.as_deref() {
            None => None,
            Some(raw) => Some(parse_timestamp(raw).ok_or_else(|| {
                ApiError::InvalidPayload(format!("task {} has a malformed deadline", dto.id))
            })?),
        };

        Ok(Self {
            id: TaskId::new(dto.id),
            title: dto.title,
            is_done,
            priority: dto.priority,
            description: dto.description.unwrap_or_default(),
            added_date,
            deadline,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use todolists_testing::{test_clock, MockTodoListApi};
    use todolists_core::environment::Clock;

    fn task(id: &str, title: &str, is_done: bool) -> Task {
        Task {
            is_done,
            ..Task::new(TaskId::new(id), title, test_clock().now())
        }
    }

    fn state_with_filter(filter: FilterValue) -> TodoListState {
        let list = TodoListId::new("l1");
        TodoListState {
            todo_lists: Arc::new(vec![TodoList {
                filter,
                ..TodoList::new(list.clone(), "What to learn")
            }]),
            tasks: Arc::new(HashMap::from([(
                list,
                Arc::new(vec![task("1", "HTML", true), task("2", "JS", false)]),
            )])),
            ..TodoListState::default()
        }
    }

    #[test]
    fn test_visible_tasks_follow_filter() {
        let list = TodoListId::new("l1");

        let titles = |state: &TodoListState| -> Vec<String> {
            state
                .visible_tasks(&list)
                .into_iter()
                .map(|t| t.title.clone())
                .collect()
        };

        assert_eq!(titles(&state_with_filter(FilterValue::All)), vec!["HTML", "JS"]);
        assert_eq!(titles(&state_with_filter(FilterValue::Active)), vec!["JS"]);
        assert_eq!(titles(&state_with_filter(FilterValue::Completed)), vec!["HTML"]);
    }

    #[test]
    fn test_missing_bucket_reads_as_empty() {
        let state = TodoListState::default();
        assert!(state.tasks_for(&TodoListId::new("nope")).is_empty());
        assert!(state.task(&TodoListId::new("nope"), &TaskId::new("1")).is_none());
    }

    #[test]
    fn test_priority_is_unbounded() {
        let mut t = task("1", "HTML", false);
        for _ in 0..10 {
            t = t.with_priority_lowered();
        }
        assert_eq!(t.priority, -10);
        assert_eq!(t.with_priority_raised().priority, -9);
    }

    #[test]
    fn test_cleared_deadline_keeps_previous() {
        let due = test_clock().now();
        let t = task("1", "HTML", false).with_deadline(Some(due));
        assert_eq!(t.with_deadline(None).deadline, Some(due));
    }

    #[test]
    fn test_helpers_leave_original_untouched() {
        let original = task("1", "HTML", false);
        let edited = original.with_description("semantic tags");
        assert_eq!(original.description, "");
        assert_eq!(edited.description, "semantic tags");
        assert_eq!(edited.title, original.title);
    }

    #[test]
    fn test_state_serializes_camel_case() {
        let json = serde_json::to_value(state_with_filter(FilterValue::Active)).unwrap();
        assert_eq!(json["todoLists"][0]["filter"], "active");
        assert_eq!(json["tasks"]["l1"][0]["isDone"], true);
        assert_eq!(json["isFetching"], false);
        assert!(json["tasks"]["l1"][0]["addedDate"].is_string());
    }

    #[test]
    fn test_task_from_dto() {
        let mut dto = MockTodoListApi::task("l1", "t1", "HTML");
        dto.status = TASK_STATUS_COMPLETED;
        dto.added_date = Some("2024-01-31T10:00:00.12".to_string());
        dto.priority = 3;

        let task = Task::try_from(dto).unwrap();
        assert!(task.is_done);
        assert_eq!(task.priority, 3);
        assert!(task.deadline.is_none());
    }

    #[test]
    fn test_empty_ids_are_rejected() {
        let dto = TodoListDto {
            id: String::new(),
            title: "What to buy".into(),
            added_date: None,
            order: 0,
        };
        assert!(matches!(
            TodoList::try_from(dto),
            Err(ApiError::InvalidPayload(_))
        ));

        let mut task = MockTodoListApi::task("l1", " ", "HTML");
        task.added_date = Some("2024-01-31T10:00:00".to_string());
        assert!(Task::try_from(task).is_err());
    }

    #[test]
    fn test_update_model_maps_done_to_status() {
        let model = task("1", "HTML", true).to_update_model();
        assert_eq!(model.status, TASK_STATUS_COMPLETED);
        assert_eq!(model.title, "HTML");
    }
}
