//! # Todolists Runtime
//!
//! Runtime implementation for the todolists state store.
//!
//! This crate provides the Store runtime that serializes reducer execution
//! and tells views when state moved.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that owns state and applies actions one at a time
//! - **Dispatch**: The sink async callers send actions into
//! - **Change notifications**: A revision counter views can watch to re-render
//!
//! ## Example
//!
//! ```ignore
//! use todolists_runtime::Store;
//!
//! let store = Store::new(
//!     TodoListState::default(),
//!     TodoListReducer::new(),
//!     environment,
//! );
//!
//! // Send an action
//! store.send(actions::add_todolist("TO BUY")).await?;
//!
//! // Read state
//! let count = store.state(|s| s.todo_lists.len()).await;
//! ```

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use todolists_core::reducer::Reducer;
use tokio::sync::{watch, RwLock};

/// Metric names and descriptions recorded by the Store
pub mod metrics;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for admitted actions to be applied
        #[error("Shutdown timed out with {0} actions still in flight")]
        ShutdownTimeout(usize),
    }
}

pub use error::StoreError;

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use todolists_runtime::StoreConfig;
///
/// let config = StoreConfig::default().with_shutdown_timeout(Duration::from_secs(2));
/// assert_eq!(config.default_shutdown_timeout, Duration::from_secs(2));
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Default timeout for graceful shutdown
    pub default_shutdown_timeout: Duration,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    #[must_use]
    pub const fn new(default_shutdown_timeout: Duration) -> Self {
        Self {
            default_shutdown_timeout,
        }
    }

    /// Set the default shutdown timeout
    #[must_use]
    pub const fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.default_shutdown_timeout = timeout;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_shutdown_timeout: Duration::from_secs(30),
        }
    }
}

/// Guard that decrements an atomic counter on drop (for shutdown tracking)
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl AtomicCounterGuard {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Store module - The runtime for reducers
pub mod store {
    use super::metrics::{
        ACTIONS_REJECTED, ACTIONS_TOTAL, REDUCER_DURATION, SHUTDOWN_COMPLETED, SHUTDOWN_INITIATED,
        SHUTDOWN_TIMEOUT,
    };
    use super::{
        Arc, AtomicBool, AtomicCounterGuard, AtomicUsize, Duration, Ordering, Reducer, RwLock,
        StoreConfig, StoreError,
    };
    use tokio::sync::watch;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock`; the reducer runs under the write lock so
    ///    transitions never overlap)
    /// 2. Reducer (state transitions)
    /// 3. Environment (injected dependencies)
    ///
    /// One store is built at application start and handed to the view
    /// bindings. Cloning a store yields another handle to the same state.
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        shutdown: Arc<AtomicBool>,
        /// Sends admitted but not yet applied.
        in_flight: Arc<AtomicUsize>,
        default_shutdown_timeout: Duration,
        /// Bumped after every processed action.
        revision: Arc<watch::Sender<u64>>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// Uses [`StoreConfig::default()`].
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new Store with custom configuration
        #[must_use]
        pub fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            config: StoreConfig,
        ) -> Self {
            let (revision, _) = watch::channel(0);

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                shutdown: Arc::new(AtomicBool::new(false)),
                in_flight: Arc::new(AtomicUsize::new(0)),
                default_shutdown_timeout: config.default_shutdown_timeout,
                revision: Arc::new(revision),
            }
        }

        /// Access the injected environment
        #[must_use]
        pub const fn environment(&self) -> &E {
            &self.environment
        }

        /// Number of sends admitted but not yet applied
        #[must_use]
        pub fn in_flight(&self) -> usize {
            self.in_flight.load(Ordering::Acquire)
        }

        /// Initiate graceful shutdown of the store
        ///
        /// This method:
        /// 1. Sets the shutdown flag (rejecting new actions)
        /// 2. Waits for already admitted sends to be applied (with timeout)
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires while
        /// admitted sends are still waiting for the state lock.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            metrics::counter!(SHUTDOWN_INITIATED).increment(1);

            self.shutdown.store(true, Ordering::Release);

            let start = std::time::Instant::now();
            let poll_interval = Duration::from_millis(10);

            loop {
                let pending = self.in_flight.load(Ordering::Acquire);

                if pending == 0 {
                    tracing::info!("All admitted actions applied, shutdown successful");
                    metrics::counter!(SHUTDOWN_COMPLETED).increment(1);
                    return Ok(());
                }

                if start.elapsed() >= timeout {
                    tracing::error!(
                        in_flight = pending,
                        "Shutdown timeout: {} actions still in flight", pending
                    );
                    metrics::counter!(SHUTDOWN_TIMEOUT).increment(1);
                    return Err(StoreError::ShutdownTimeout(pending));
                }

                tokio::time::sleep(poll_interval).await;
            }
        }

        /// Shut down using the configured default timeout
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if admitted sends outlive the timeout.
        pub async fn shutdown_default(&self) -> Result<(), StoreError> {
            self.shutdown(self.default_shutdown_timeout).await
        }

        /// Send an action to the store
        ///
        /// 1. Acquires write lock on state
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Bumps the revision so subscribers re-read
        ///
        /// `send()` returns once the transition is applied. Concurrent senders
        /// queue on the lock and are applied one after another.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        ///
        /// # Panics
        ///
        /// If the reducer panics, the panic propagates. Reducers are pure
        /// functions and must not panic.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<(), StoreError> {
            // Counted before the flag check so shutdown cannot miss an admitted send
            let _in_flight = AtomicCounterGuard::enter(&self.in_flight);

            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!(ACTIONS_REJECTED).increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            metrics::counter!(ACTIONS_TOTAL).increment(1);

            {
                let mut state = self.state.write().await;

                let start = std::time::Instant::now();
                self.reducer.reduce(&mut *state, action, &self.environment);
                metrics::histogram!(REDUCER_DURATION).record(start.elapsed().as_secs_f64());

                tracing::trace!("Reducer completed");
            }

            self.revision.send_modify(|revision| *revision = revision.wrapping_add(1));

            Ok(())
        }

        /// Subscribe to state changes
        ///
        /// The receiver yields a revision number that increases after every
        /// processed action. A view re-reads the parts of state it renders and
        /// compares them by pointer to skip unchanged subtrees.
        #[must_use]
        pub fn subscribe_changes(&self) -> watch::Receiver<u64> {
            self.revision.subscribe()
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let list_count = store.state(|s| s.todo_lists.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone,
        E: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
                shutdown: Arc::clone(&self.shutdown),
                in_flight: Arc::clone(&self.in_flight),
                default_shutdown_timeout: self.default_shutdown_timeout,
                revision: Arc::clone(&self.revision),
            }
        }
    }
}

/// Dispatch module - The sink thunks send actions into
pub mod dispatch {
    use super::{Reducer, Store, StoreError};
    use std::future::Future;

    /// Something actions can be dispatched to
    ///
    /// Implemented by [`Store`]. Async orchestration code is written against
    /// this trait so it can be exercised with a recording dispatcher in tests.
    pub trait Dispatch<A>: Send + Sync {
        /// Dispatch one action, resolving once its transition is applied
        ///
        /// # Errors
        ///
        /// Returns [`StoreError`] if the sink no longer accepts actions.
        fn dispatch(&self, action: A) -> impl Future<Output = Result<(), StoreError>> + Send;
    }

    impl<S, A, E, R> Dispatch<A> for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        async fn dispatch(&self, action: A) -> Result<(), StoreError> {
            self.send(action).await
        }
    }
}

// Re-export for convenience
pub use dispatch::Dispatch;
pub use store::Store;

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default)]
    struct TallyState {
        total: i64,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum TallyAction {
        Add(i64),
        Reset,
    }

    #[derive(Debug, Clone)]
    struct TallyReducer;

    impl Reducer for TallyReducer {
        type State = TallyState;
        type Action = TallyAction;
        type Environment = ();

        fn reduce(&self, state: &mut TallyState, action: TallyAction, _env: &()) {
            match action {
                TallyAction::Add(n) => state.total += n,
                TallyAction::Reset => state.total = 0,
            }
        }
    }

    fn tally_store() -> Store<TallyState, TallyAction, (), TallyReducer> {
        Store::new(TallyState::default(), TallyReducer, ())
    }

    #[tokio::test]
    async fn send_applies_transition() {
        let store = tally_store();
        store.send(TallyAction::Add(3)).await.unwrap();
        store.send(TallyAction::Add(-5)).await.unwrap();
        assert_eq!(store.state(|s| s.total).await, -2);

        store.send(TallyAction::Reset).await.unwrap();
        assert_eq!(store.state(|s| s.total).await, 0);
    }

    #[tokio::test]
    async fn dispatch_goes_through_send() {
        async fn add_twice<D: Dispatch<TallyAction>>(sink: &D) -> Result<(), StoreError> {
            sink.dispatch(TallyAction::Add(2)).await?;
            sink.dispatch(TallyAction::Add(2)).await
        }

        let store = tally_store();
        add_twice(&store).await.unwrap();
        assert_eq!(store.state(|s| s.total).await, 4);
    }

    #[tokio::test]
    async fn revision_increases_per_action() {
        let store = tally_store();
        let changes = store.subscribe_changes();
        assert_eq!(*changes.borrow(), 0);

        store.send(TallyAction::Add(1)).await.unwrap();
        store.send(TallyAction::Add(1)).await.unwrap();
        assert_eq!(*changes.borrow(), 2);
    }

    #[tokio::test]
    async fn shutdown_rejects_new_actions() {
        let store = tally_store();
        store.shutdown(Duration::from_secs(1)).await.unwrap();

        let result = store.send(TallyAction::Add(1)).await;
        assert!(matches!(result, Err(StoreError::ShutdownInProgress)));
        assert_eq!(store.state(|s| s.total).await, 0);
        assert_eq!(store.in_flight(), 0);
    }

    #[tokio::test]
    async fn rejected_send_leaves_revision_alone() {
        let store = tally_store();
        let changes = store.subscribe_changes();
        store.shutdown_default().await.unwrap();

        let _ = store.send(TallyAction::Add(1)).await;
        assert_eq!(*changes.borrow(), 0);
    }

    #[test]
    fn config_builder_sets_timeout() {
        let config = StoreConfig::new(Duration::from_secs(5))
            .with_shutdown_timeout(Duration::from_millis(250));
        assert_eq!(config.default_shutdown_timeout, Duration::from_millis(250));
        assert_eq!(
            StoreConfig::default().default_shutdown_timeout,
            Duration::from_secs(30)
        );
    }
}
