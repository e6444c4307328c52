//! Metric names recorded by the Store.
//!
//! The store records through the [`metrics`] facade. No exporter is installed
//! by this crate; without a recorder every call is a no-op. An application
//! that wants the numbers installs its own recorder and calls
//! [`register_metrics`] once so descriptions show up next to the values.
//!
//! # Example
//!
//! ```
//! use todolists_runtime::metrics::{register_metrics, ACTIONS_TOTAL};
//!
//! register_metrics();
//! assert_eq!(ACTIONS_TOTAL, "store.actions.total");
//! ```

use metrics::{describe_counter, describe_histogram};

/// Actions accepted by `Store::send`
pub const ACTIONS_TOTAL: &str = "store.actions.total";

/// Actions rejected because the store was shutting down
pub const ACTIONS_REJECTED: &str = "store.actions.rejected";

/// Time spent inside the reducer per action
pub const REDUCER_DURATION: &str = "store.reducer.duration_seconds";

/// Graceful shutdowns started
pub const SHUTDOWN_INITIATED: &str = "store.shutdown.initiated";

/// Graceful shutdowns that drained all admitted actions
pub const SHUTDOWN_COMPLETED: &str = "store.shutdown.completed";

/// Graceful shutdowns that gave up with actions still in flight
pub const SHUTDOWN_TIMEOUT: &str = "store.shutdown.timeout";

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(ACTIONS_TOTAL, "Total number of actions processed by the store");
    describe_counter!(
        ACTIONS_REJECTED,
        "Total number of actions rejected during shutdown"
    );
    describe_histogram!(REDUCER_DURATION, "Time taken to execute the reducer");
    describe_counter!(SHUTDOWN_INITIATED, "Total number of shutdowns initiated");
    describe_counter!(
        SHUTDOWN_COMPLETED,
        "Total number of shutdowns that completed in time"
    );
    describe_counter!(
        SHUTDOWN_TIMEOUT,
        "Total number of shutdowns that timed out"
    );
}
