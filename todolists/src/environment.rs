//! Injected dependencies of the reducer.

use std::fmt;
use std::sync::Arc;
use todolists_core::environment::{Clock, IdGenerator, SystemClock};

/// Random UUID v4 ids for production
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Environment for [`TodoListReducer`](crate::reducer::TodoListReducer)
///
/// Time and fresh ids come from here so transitions stay deterministic
/// under test.
#[derive(Clone)]
pub struct TodoListEnvironment {
    /// Timestamps for new tasks
    pub clock: Arc<dyn Clock>,
    /// Ids for new lists and tasks
    pub ids: Arc<dyn IdGenerator>,
}

impl TodoListEnvironment {
    /// Create an environment from explicit dependencies
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { clock, ids }
    }

    /// System clock and random UUIDs
    #[must_use]
    pub fn production() -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(UuidIds))
    }
}

impl fmt::Debug for TodoListEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TodoListEnvironment").finish_non_exhaustive()
    }
}
