//! The transition function.
//!
//! Every branch updates state through [`Arc::make_mut`] and only after it has
//! found its target. A branch that turns out to be a no-op therefore leaves
//! every container pointer-equal to the previous state.

use crate::actions::TodoListAction;
use crate::environment::TodoListEnvironment;
use crate::types::{Task, TaskId, TodoList, TodoListId, TodoListState};
use std::sync::Arc;
use todolists_core::reducer::Reducer;

/// Reducer for [`TodoListState`]
///
/// All transitions are synchronous. Async work lives in
/// [`thunks`](crate::thunks).
#[derive(Debug, Clone, Copy, Default)]
pub struct TodoListReducer;

impl TodoListReducer {
    /// Create a new reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for TodoListReducer {
    type State = TodoListState;
    type Action = TodoListAction;
    type Environment = TodoListEnvironment;

    fn reduce(&self, state: &mut Self::State, action: Self::Action, env: &Self::Environment) {
        tracing::debug!(action_type = action.action_type(), "Reducing action");

        match action {
            TodoListAction::AddTodolist { title } => {
                let id = TodoListId::new(env.ids.next_id());
                Arc::make_mut(&mut state.todo_lists).insert(0, TodoList::new(id.clone(), title));
                Arc::make_mut(&mut state.tasks).insert(id, Arc::new(Vec::new()));
            },
            TodoListAction::RemoveTodolist { id } => {
                // The bucket under `id` is left in place
                if let Some(index) = state.todo_lists.iter().position(|list| list.id == id) {
                    Arc::make_mut(&mut state.todo_lists).remove(index);
                }
            },
            TodoListAction::UpdateTodolistFilter { id, filter } => {
                update_list(state, &id, |list| list.filter = filter);
            },
            TodoListAction::ChangeTodolistTitle {
                todo_list_id,
                title,
            } => {
                update_list(state, &todo_list_id, |list| list.title = title);
            },
            TodoListAction::SetTodolists { todo_lists } => {
                state.todo_lists = Arc::new(todo_lists);
            },
            TodoListAction::AddTask {
                todo_list_id,
                title,
            } => {
                let task = Task::new(TaskId::new(env.ids.next_id()), title, env.clock.now());
                let bucket = Arc::make_mut(&mut state.tasks)
                    .entry(todo_list_id)
                    .or_default();
                Arc::make_mut(bucket).insert(0, task);
            },
            TodoListAction::RemoveTask {
                todo_list_id,
                task_id,
            } => {
                if let Some(index) = task_index(state, &todo_list_id, &task_id) {
                    if let Some(bucket) = Arc::make_mut(&mut state.tasks).get_mut(&todo_list_id) {
                        Arc::make_mut(bucket).remove(index);
                    }
                }
            },
            TodoListAction::ChangeTaskTitle {
                todo_list_id,
                task_id,
                title,
            } => {
                update_task(state, &todo_list_id, &task_id, |task| task.title = title);
            },
            TodoListAction::ChangeTaskChecked {
                todo_list_id,
                task_id,
                is_done,
            } => {
                update_task(state, &todo_list_id, &task_id, |task| task.is_done = is_done);
            },
            TodoListAction::SetIsFetching { is_fetching } => {
                state.is_fetching = is_fetching;
            },
            TodoListAction::SetIsAuth { is_auth } => {
                state.is_auth = is_auth;
            },
            TodoListAction::ReplaceTask {
                todo_list_id,
                task_id,
                task,
            } => {
                update_task(state, &todo_list_id, &task_id, |slot| *slot = task);
            },
            TodoListAction::Unknown => {
                tracing::trace!("Ignoring action with unrecognized type");
            },
        }
    }
}

/// Apply `action` to a copy of `state` and return the copy
///
/// `state` itself is never modified. Containers the action does not touch
/// are shared between the two.
///
/// # Example
///
/// ```
/// use todolists::{actions, transition, TodoListEnvironment, TodoListState};
///
/// let env = TodoListEnvironment::production();
/// let before = TodoListState::default();
/// let after = transition(&before, actions::add_todolist("TO BUY"), &env);
///
/// assert!(before.todo_lists.is_empty());
/// assert_eq!(after.todo_lists[0].title, "TO BUY");
/// ```
#[must_use]
pub fn transition(
    state: &TodoListState,
    action: TodoListAction,
    env: &TodoListEnvironment,
) -> TodoListState {
    let mut next = state.clone();
    TodoListReducer.reduce(&mut next, action, env);
    next
}

fn update_list(state: &mut TodoListState, id: &TodoListId, edit: impl FnOnce(&mut TodoList)) {
    if let Some(index) = state.todo_lists.iter().position(|list| &list.id == id) {
        edit(&mut Arc::make_mut(&mut state.todo_lists)[index]);
    }
}

fn task_index(state: &TodoListState, todo_list_id: &TodoListId, task_id: &TaskId) -> Option<usize> {
    state
        .tasks_for(todo_list_id)
        .iter()
        .position(|task| &task.id == task_id)
}

fn update_task(
    state: &mut TodoListState,
    todo_list_id: &TodoListId,
    task_id: &TaskId,
    edit: impl FnOnce(&mut Task),
) {
    let Some(index) = task_index(state, todo_list_id, task_id) else {
        return;
    };
    if let Some(bucket) = Arc::make_mut(&mut state.tasks).get_mut(todo_list_id) {
        edit(&mut Arc::make_mut(bucket)[index]);
    }
}
