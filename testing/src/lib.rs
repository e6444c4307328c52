//! # Todolists Testing
//!
//! Testing utilities and helpers for the todolists state store.
//!
//! This crate provides:
//! - Mock implementations of Environment traits (clock, id generation)
//! - A recording dispatcher for exercising async orchestration
//! - A scriptable in-memory backend API
//! - Given-When-Then assertions for reducers
//!
//! ## Example
//!
//! ```ignore
//! use todolists_testing::{test_clock, SequentialIds};
//!
//! #[tokio::test]
//! async fn test_add_list() {
//!     let env = TodoListEnvironment::new(Arc::new(test_clock()), Arc::new(SequentialIds::new("list")));
//!     let store = Store::new(TodoListState::default(), TodoListReducer::new(), env);
//!
//!     store.send(actions::add_todolist("TO BUY")).await?;
//!
//!     let count = store.state(|s| s.todo_lists.len()).await;
//!     assert_eq!(count, 1);
//! }
//! ```

use chrono::{DateTime, Utc};
use todolists_core::environment::{Clock, IdGenerator};

/// Scriptable in-memory backend API
pub mod api_mocks;

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, IdGenerator, Utc};
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::sync::{Arc, Mutex, PoisonError};
    use todolists_runtime::{Dispatch, StoreError};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use todolists_testing::mocks::FixedClock;
    /// use todolists_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Predictable id generator: `{prefix}-1`, `{prefix}-2`, ...
    ///
    /// # Example
    ///
    /// ```
    /// use todolists_testing::mocks::SequentialIds;
    /// use todolists_core::environment::IdGenerator;
    ///
    /// let ids = SequentialIds::new("task");
    /// assert_eq!(ids.next_id(), "task-1");
    /// assert_eq!(ids.next_id(), "task-2");
    /// ```
    #[derive(Debug)]
    pub struct SequentialIds {
        prefix: String,
        next: AtomicU64,
    }

    impl SequentialIds {
        /// Create a generator whose first id is `{prefix}-1`
        #[must_use]
        pub fn new(prefix: impl Into<String>) -> Self {
            Self {
                prefix: prefix.into(),
                next: AtomicU64::new(1),
            }
        }
    }

    impl IdGenerator for SequentialIds {
        fn next_id(&self) -> String {
            let n = self.next.fetch_add(1, Ordering::SeqCst);
            format!("{}-{n}", self.prefix)
        }
    }

    /// Dispatcher that records actions instead of reducing them
    ///
    /// Clones share the same log. After [`close`](Self::close) every
    /// dispatch fails with [`StoreError::ShutdownInProgress`], like a store
    /// that is shutting down.
    #[derive(Debug, Clone)]
    pub struct RecordingDispatcher<A> {
        actions: Arc<Mutex<Vec<A>>>,
        closed: Arc<AtomicBool>,
    }

    impl<A: Clone> RecordingDispatcher<A> {
        /// Create an empty dispatcher
        #[must_use]
        pub fn new() -> Self {
            Self {
                actions: Arc::new(Mutex::new(Vec::new())),
                closed: Arc::new(AtomicBool::new(false)),
            }
        }

        /// Every action dispatched so far, in order
        #[must_use]
        pub fn actions(&self) -> Vec<A> {
            self.actions
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Reject all further dispatches
        pub fn close(&self) {
            self.closed.store(true, Ordering::SeqCst);
        }
    }

    impl<A: Clone> Default for RecordingDispatcher<A> {
        fn default() -> Self {
            Self::new()
        }
    }

    impl<A: Send + 'static> Dispatch<A> for RecordingDispatcher<A> {
        async fn dispatch(&self, action: A) -> Result<(), StoreError> {
            if self.closed.load(Ordering::SeqCst) {
                return Err(StoreError::ShutdownInProgress);
            }
            self.actions
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(action);
            Ok(())
        }
    }
}

// Re-export commonly used items
pub use api_mocks::{ApiCall, MockFailure, MockTodoListApi};
pub use mocks::{test_clock, FixedClock, RecordingDispatcher, SequentialIds};
pub use reducer_test::ReducerTest;
