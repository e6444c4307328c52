//! # Todolists Core
//!
//! Core traits and types for the todolists state store.
//!
//! This crate provides the abstractions the application builds on: a pure
//! reducer and the environment it reads time and fresh ids from.
//!
//! ## Core Concepts
//!
//! - **State**: The canonical application state held by the store
//! - **Action**: An immutable tagged value describing one intended state change
//! - **Reducer**: Pure function `(State, Action, Environment) → State`
//! - **Environment**: Injected dependencies (clock, id generation)
//!
//! Async work never runs inside a reducer. It lives in callers that
//! dispatch actions before and after their own I/O.

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};

/// Reducer module - The core trait for state transitions
///
/// Reducers are pure functions: `(State, Action, Environment) → State`
///
/// They contain all state-transition logic and are deterministic and testable.
pub mod reducer {
    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// # Example
    ///
    /// ```
    /// use todolists_core::reducer::Reducer;
    ///
    /// #[derive(Default)]
    /// struct Flags {
    ///     is_auth: bool,
    /// }
    ///
    /// enum FlagAction {
    ///     SetIsAuth(bool),
    /// }
    ///
    /// struct FlagReducer;
    ///
    /// impl Reducer for FlagReducer {
    ///     type State = Flags;
    ///     type Action = FlagAction;
    ///     type Environment = ();
    ///
    ///     fn reduce(&self, state: &mut Flags, action: FlagAction, _env: &()) {
    ///         match action {
    ///             FlagAction::SetIsAuth(is_auth) => state.is_auth = is_auth,
    ///         }
    ///     }
    /// }
    ///
    /// let mut state = Flags::default();
    /// FlagReducer.reduce(&mut state, FlagAction::SetIsAuth(true), &());
    /// assert!(state.is_auth);
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Apply one action to `state`
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        ///
        /// Must not block, perform I/O or panic. Unknown or inapplicable
        /// actions leave `state` as it was.
        fn reduce(&self, state: &mut Self::State, action: Self::Action, env: &Self::Environment);
    }
}

/// Environment module - Injected dependencies
///
/// Anything nondeterministic a reducer needs is reached through the
/// Environment parameter, so transitions stay deterministic under test.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use todolists_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// let earlier = clock.now();
    /// assert!(clock.now() >= earlier);
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Id generator trait - produces fresh opaque identifiers
    ///
    /// Ids are opaque strings. Implementations must never hand out the same
    /// id twice for the lifetime of the generator.
    pub trait IdGenerator: Send + Sync {
        /// Generate the next unique id
        fn next_id(&self) -> String;
    }
}
