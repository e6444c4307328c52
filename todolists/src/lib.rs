//! # Todolists
//!
//! Client-side state for to-do lists: the action vocabulary, a pure reducer
//! and the async thunks that keep it in step with the backend.
//!
//! ## Architecture
//!
//! - [`TodoListState`] holds lists, task buckets and two session flags.
//! - [`TodoListAction`] is the closed set of state changes.
//! - [`TodoListReducer`] applies one action under the store's write lock.
//!   Transitions are synchronous.
//! - [`thunks`] await one backend call each and dispatch around it.
//!
//! ## Example
//!
//! ```no_run
//! use todolists::{actions, TodoListEnvironment, TodoListReducer, TodoListState};
//! use todolists_runtime::Store;
//!
//! # async fn example() {
//! let store = Store::new(
//!     TodoListState::default(),
//!     TodoListReducer::new(),
//!     TodoListEnvironment::production(),
//! );
//!
//! let _ = store.send(actions::add_todolist("What to learn")).await;
//! let count = store.state(|s| s.todo_lists.len()).await;
//! assert_eq!(count, 1);
//! # }
//! ```

pub mod actions;
pub mod config;
pub mod environment;
pub mod logging;
pub mod reducer;
pub mod thunks;
pub mod types;

pub use actions::TodoListAction;
pub use config::{Config, ConfigError};
pub use environment::{TodoListEnvironment, UuidIds};
pub use reducer::{transition, TodoListReducer};
pub use thunks::ThunkError;
pub use types::{FilterValue, Task, TaskId, TodoList, TodoListId, TodoListState};

/// The store type the binary and views hold
pub type TodoListStore =
    todolists_runtime::Store<TodoListState, TodoListAction, TodoListEnvironment, TodoListReducer>;
