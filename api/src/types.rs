//! Wire types for the todo-lists backend API
//!
//! Field names follow the backend's camelCase JSON. Timestamps travel as
//! strings because the backend omits the offset on some of them; use
//! [`parse_timestamp`] to read them.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result code the backend uses for success
pub const RESULT_CODE_SUCCESS: i32 = 0;

/// Task status value the backend uses for a completed task
pub const TASK_STATUS_COMPLETED: i32 = 2;

/// Task status value the backend uses for an open task
pub const TASK_STATUS_NEW: i32 = 0;

/// A to-do list as returned by the backend
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TodoListDto {
    /// List id
    pub id: String,
    /// List title
    pub title: String,
    /// Creation timestamp
    #[serde(default)]
    pub added_date: Option<String>,
    /// Server-side sort order
    #[serde(default)]
    pub order: i64,
}

/// A task as returned by the backend
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskDto {
    /// Task id
    pub id: String,
    /// Owning list id
    pub todo_list_id: String,
    /// Task title
    pub title: String,
    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,
    /// Status code, [`TASK_STATUS_COMPLETED`] when done
    #[serde(default)]
    pub status: i32,
    /// Priority
    #[serde(default)]
    pub priority: i64,
    /// Start date
    #[serde(default)]
    pub start_date: Option<String>,
    /// Deadline
    #[serde(default)]
    pub deadline: Option<String>,
    /// Server-side sort order
    #[serde(default)]
    pub order: i64,
    /// Creation timestamp
    #[serde(default)]
    pub added_date: Option<String>,
}

impl TaskDto {
    /// Returns true if the backend considers this task done
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.status == TASK_STATUS_COMPLETED
    }
}

/// Standard response envelope for mutating calls
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<D> {
    /// 0 on success
    pub result_code: i32,
    /// Human-readable messages, usually empty on success
    #[serde(default)]
    pub messages: Vec<String>,
    /// Call-specific payload
    pub data: D,
}

impl<D> ApiResponse<D> {
    /// Returns true if the backend accepted the call
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.result_code == RESULT_CODE_SUCCESS
    }
}

/// Envelope payload carrying a single created or updated record
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemData<T> {
    /// The record
    pub item: T,
}

/// Envelope payload for calls that return nothing
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmptyData {}

/// Payload of `GET /auth/me`
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthMeData {
    /// User id, absent when not logged in
    #[serde(default)]
    pub id: Option<i64>,
    /// Account email
    #[serde(default)]
    pub email: Option<String>,
    /// Account login
    #[serde(default)]
    pub login: Option<String>,
}

/// One page of tasks from `GET /todo-lists/{id}/tasks`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TasksPage {
    /// Tasks on this page
    pub items: Vec<TaskDto>,
    /// Total number of tasks in the list
    #[serde(default)]
    pub total_count: u64,
    /// Error message, `null` on success
    #[serde(default)]
    pub error: Option<String>,
}

/// Request body for calls that only carry a title
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TitleBody {
    /// The title
    pub title: String,
}

/// Full replacement body for `PUT /todo-lists/{id}/tasks/{taskId}`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskModel {
    /// Title
    pub title: String,
    /// Description
    pub description: String,
    /// Status code
    pub status: i32,
    /// Priority
    pub priority: i64,
    /// Start date
    pub start_date: Option<String>,
    /// Deadline
    pub deadline: Option<String>,
}

/// Parse a backend timestamp
///
/// Accepts RFC 3339 and the offset-less `2024-01-31T10:00:00.123` form,
/// which the backend means as UTC.
///
/// ```
/// use todolists_api::types::parse_timestamp;
///
/// assert!(parse_timestamp("2024-01-31T10:00:00Z").is_some());
/// assert!(parse_timestamp("2024-01-31T10:00:00.5").is_some());
/// assert!(parse_timestamp("yesterday").is_none());
/// ```
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

/// Format a timestamp for the backend
#[must_use]
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339()
}
