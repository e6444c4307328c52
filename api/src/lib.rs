//! # Todo-lists API Client
//!
//! Rust client for the todo-lists backend: lists, tasks and the session
//! check used at startup.
//!
//! ## Example
//!
//! ```no_run
//! use todolists_api::{HttpTodoListApi, TodoListApi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = HttpTodoListApi::default().with_api_key("my-key");
//!
//!     let lists = api.get_todo_lists().await?;
//!     println!("{} lists", lists.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod types;

// Re-export main types for convenience
pub use client::{HttpTodoListApi, TodoListApi, DEFAULT_BASE_URL, DEFAULT_TASK_PAGE_SIZE};
pub use error::ApiError;
pub use types::{
    ApiResponse, AuthMeData, EmptyData, ItemData, TaskDto, TasksPage, TodoListDto,
    UpdateTaskModel,
};
