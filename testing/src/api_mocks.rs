//! In-memory backend API for testing
//!
//! [`MockTodoListApi`] answers every [`TodoListApi`] call from data set up by
//! the test, records each call, and can be told to fail.

#![allow(clippy::missing_panics_doc)] // Test utilities document panics where critical

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use todolists_api::types::{
    ApiResponse, AuthMeData, EmptyData, ItemData, TaskDto, TasksPage, TodoListDto,
    UpdateTaskModel, RESULT_CODE_SUCCESS, TASK_STATUS_NEW,
};
use todolists_api::{ApiError, TodoListApi};

/// A call the mock received, with its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    /// `get_todo_lists()`
    GetTodoLists,
    /// `add_todo_list(title)`
    AddTodoList {
        /// Requested title
        title: String,
    },
    /// `delete_todo_list(id)`
    DeleteTodoList {
        /// List id
        todo_list_id: String,
    },
    /// `update_todo_list_title(id, title)`
    UpdateTodoListTitle {
        /// List id
        todo_list_id: String,
        /// New title
        title: String,
    },
    /// `get_tasks(id, page_size)`
    GetTasks {
        /// List id
        todo_list_id: String,
        /// Requested page size
        page_size: u32,
    },
    /// `add_task(id, title)`
    AddTask {
        /// List id
        todo_list_id: String,
        /// Requested title
        title: String,
    },
    /// `update_task(list, task, model)`
    UpdateTask {
        /// List id
        todo_list_id: String,
        /// Task id
        task_id: String,
        /// Body sent
        model: UpdateTaskModel,
    },
    /// `auth_me()`
    AuthMe,
}

/// How the mock fails when failure is switched on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    /// Fail before reaching the backend
    Transport,
    /// Answer 401
    Unauthorized,
    /// Answer 429
    RateLimited,
    /// Answer with this status
    Status(u16),
}

impl MockFailure {
    fn to_error(self) -> ApiError {
        match self {
            Self::Transport => ApiError::RequestFailed("connection refused".to_string()),
            Self::Unauthorized => ApiError::Unauthorized,
            Self::RateLimited => ApiError::RateLimited,
            Self::Status(status) => ApiError::ApiError {
                status,
                message: "mock failure".to_string(),
            },
        }
    }
}

/// Scriptable in-memory backend
///
/// Clones share the recorded calls.
///
/// # Example
///
/// ```
/// use todolists_api::TodoListApi;
/// use todolists_testing::{ApiCall, MockTodoListApi};
///
/// # tokio_test::block_on(async {
/// let api = MockTodoListApi::new().with_todo_list("list-1", "What to learn");
///
/// let lists = api.get_todo_lists().await.unwrap();
/// assert_eq!(lists[0].title, "What to learn");
/// assert_eq!(api.calls(), vec![ApiCall::GetTodoLists]);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MockTodoListApi {
    todo_lists: Vec<TodoListDto>,
    tasks: Vec<TaskDto>,
    auth_result_code: i32,
    failure: Option<MockFailure>,
    calls: Arc<Mutex<Vec<ApiCall>>>,
    next_id: Arc<AtomicU64>,
}

impl MockTodoListApi {
    /// Create a mock with no data that accepts every call
    #[must_use]
    pub fn new() -> Self {
        Self {
            todo_lists: Vec::new(),
            tasks: Vec::new(),
            auth_result_code: RESULT_CODE_SUCCESS,
            failure: None,
            calls: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Serve a list from `get_todo_lists`
    #[must_use]
    pub fn with_todo_list(mut self, id: &str, title: &str) -> Self {
        let order = i64::try_from(self.todo_lists.len()).unwrap_or(i64::MAX);
        self.todo_lists.push(TodoListDto {
            id: id.to_string(),
            title: title.to_string(),
            added_date: None,
            order,
        });
        self
    }

    /// Serve a task from `get_tasks` for its list
    #[must_use]
    pub fn with_task(mut self, task: TaskDto) -> Self {
        self.tasks.push(task);
        self
    }

    /// Answer `auth_me` with this result code
    #[must_use]
    pub fn with_auth_result_code(mut self, code: i32) -> Self {
        self.auth_result_code = code;
        self
    }

    /// Fail every call
    #[must_use]
    pub fn failing_with(mut self, failure: MockFailure) -> Self {
        self.failure = Some(failure);
        self
    }

    /// Every call received so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Build a task record the way the backend would
    #[must_use]
    pub fn task(todo_list_id: &str, id: &str, title: &str) -> TaskDto {
        TaskDto {
            id: id.to_string(),
            todo_list_id: todo_list_id.to_string(),
            title: title.to_string(),
            description: None,
            status: TASK_STATUS_NEW,
            priority: 0,
            start_date: None,
            deadline: None,
            order: 0,
            added_date: None,
        }
    }

    fn record(&self, call: ApiCall) -> Result<(), ApiError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
        self.failure.map_or(Ok(()), |failure| Err(failure.to_error()))
    }

    fn fresh_id(&self, prefix: &str) -> String {
        format!("{prefix}-{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    const fn ok<D>(data: D) -> ApiResponse<D> {
        ApiResponse {
            result_code: RESULT_CODE_SUCCESS,
            messages: Vec::new(),
            data,
        }
    }
}

impl Default for MockTodoListApi {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoListApi for MockTodoListApi {
    async fn get_todo_lists(&self) -> Result<Vec<TodoListDto>, ApiError> {
        self.record(ApiCall::GetTodoLists)?;
        Ok(self.todo_lists.clone())
    }

    async fn add_todo_list(&self, title: &str) -> Result<ApiResponse<ItemData<TodoListDto>>, ApiError> {
        self.record(ApiCall::AddTodoList {
            title: title.to_string(),
        })?;
        Ok(Self::ok(ItemData {
            item: TodoListDto {
                id: self.fresh_id("server-list"),
                title: title.to_string(),
                added_date: None,
                order: 0,
            },
        }))
    }

    async fn delete_todo_list(&self, todo_list_id: &str) -> Result<ApiResponse<EmptyData>, ApiError> {
        self.record(ApiCall::DeleteTodoList {
            todo_list_id: todo_list_id.to_string(),
        })?;
        Ok(Self::ok(EmptyData {}))
    }

    async fn update_todo_list_title(
        &self,
        todo_list_id: &str,
        title: &str,
    ) -> Result<ApiResponse<EmptyData>, ApiError> {
        self.record(ApiCall::UpdateTodoListTitle {
            todo_list_id: todo_list_id.to_string(),
            title: title.to_string(),
        })?;
        Ok(Self::ok(EmptyData {}))
    }

    async fn get_tasks(&self, todo_list_id: &str, page_size: u32) -> Result<TasksPage, ApiError> {
        self.record(ApiCall::GetTasks {
            todo_list_id: todo_list_id.to_string(),
            page_size,
        })?;
        let matching: Vec<TaskDto> = self
            .tasks
            .iter()
            .filter(|task| task.todo_list_id == todo_list_id)
            .cloned()
            .collect();
        let total_count = matching.len() as u64;
        Ok(TasksPage {
            items: matching.into_iter().take(page_size as usize).collect(),
            total_count,
            error: None,
        })
    }

    async fn add_task(
        &self,
        todo_list_id: &str,
        title: &str,
    ) -> Result<ApiResponse<ItemData<TaskDto>>, ApiError> {
        self.record(ApiCall::AddTask {
            todo_list_id: todo_list_id.to_string(),
            title: title.to_string(),
        })?;
        let id = self.fresh_id("server-task");
        Ok(Self::ok(ItemData {
            item: Self::task(todo_list_id, &id, title),
        }))
    }

    async fn update_task(
        &self,
        todo_list_id: &str,
        task_id: &str,
        model: &UpdateTaskModel,
    ) -> Result<ApiResponse<ItemData<TaskDto>>, ApiError> {
        self.record(ApiCall::UpdateTask {
            todo_list_id: todo_list_id.to_string(),
            task_id: task_id.to_string(),
            model: model.clone(),
        })?;
        Ok(Self::ok(ItemData {
            item: TaskDto {
                description: Some(model.description.clone()),
                status: model.status,
                priority: model.priority,
                start_date: model.start_date.clone(),
                deadline: model.deadline.clone(),
                ..Self::task(todo_list_id, task_id, &model.title)
            },
        }))
    }

    async fn auth_me(&self) -> Result<ApiResponse<AuthMeData>, ApiError> {
        self.record(ApiCall::AuthMe)?;
        let data = if self.auth_result_code == RESULT_CODE_SUCCESS {
            AuthMeData {
                id: Some(1),
                email: Some("user@example.com".to_string()),
                login: Some("user".to_string()),
            }
        } else {
            AuthMeData::default()
        };
        Ok(ApiResponse {
            result_code: self.auth_result_code,
            messages: Vec::new(),
            data,
        })
    }
}
