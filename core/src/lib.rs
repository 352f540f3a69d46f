//! # Gathering Core
//!
//! Core traits and types for the Gathering church site store.
//!
//! This crate provides the fundamental abstractions the site's domain store is
//! built on, using the Reducer pattern with a single owned state value.
//!
//! ## Core Concepts
//!
//! - **State**: The aggregate root for the whole site (sermons, series, events, settings)
//! - **Action**: A closed set of mutations, one variant per user intent
//! - **Reducer**: Pure function `(State, Action, Environment) → State`
//! - **Environment**: Injected dependencies via traits (clock, id generation)
//!
//! ## Architecture Principles
//!
//! - Functional Core, Imperative Shell
//! - Unidirectional Data Flow
//! - Whole-state replacement (no in-place edits of shared snapshots)
//! - Dependency Injection via Environment
//!
//! ## Example
//!
//! ```
//! use gathering_core::reducer::Reducer;
//! use std::sync::Arc;
//!
//! #[derive(Clone, Debug, Default)]
//! struct CounterState {
//!     count: i64,
//! }
//!
//! enum CounterAction {
//!     Increment,
//!     Ignored,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &Arc<CounterState>,
//!         action: CounterAction,
//!         _env: &(),
//!     ) -> Arc<CounterState> {
//!         match action {
//!             CounterAction::Increment => Arc::new(CounterState { count: state.count + 1 }),
//!             CounterAction::Ignored => Arc::clone(state),
//!         }
//!     }
//! }
//!
//! let before = Arc::new(CounterState::default());
//! let after = CounterReducer.reduce(&before, CounterAction::Increment, &());
//! assert_eq!(after.count, 1);
//! assert_eq!(before.count, 0);
//!
//! let same = CounterReducer.reduce(&after, CounterAction::Ignored, &());
//! assert!(Arc::ptr_eq(&same, &after));
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};

/// Helpers for id-addressed entity collections
pub mod collection;

/// Action module - Unified input type for reducers
///
/// Actions represent all possible state transitions in the system. Each
/// variant carries a stable tag name used on the wire and in logs.
pub mod action {
    /// Behaviour shared by every action enum
    ///
    /// Usually derived with `#[derive(Action)]` from `gathering-macros`.
    pub trait Action {
        /// The stable tag of this action (e.g. `ADD_SERMON`)
        fn name(&self) -> &'static str;

        /// The state collection this action writes to, if any
        fn touches(&self) -> Option<&'static str> {
            None
        }
    }
}

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → State`
///
/// They contain all state transitions and are deterministic and testable.
pub mod reducer {
    use std::sync::Arc;

    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// # Contract
    ///
    /// - The input snapshot is never mutated; a new snapshot is returned.
    /// - An action with no effect returns the input `Arc` itself, so callers
    ///   can detect "nothing changed" with [`Arc::ptr_eq`].
    /// - Reducing cannot fail. Malformed input is rejected before an action
    ///   is built.
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into the next state snapshot
        ///
        /// # Arguments
        ///
        /// - `state`: The current snapshot (shared, read-only)
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        ///
        /// # Returns
        ///
        /// The next snapshot, or `state` itself when the action is inert
        fn reduce(
            &self,
            state: &Arc<Self::State>,
            action: Self::Action,
            env: &Self::Environment,
        ) -> Arc<Self::State>;
    }
}

/// Environment module - Dependency injection traits
///
/// All ambient inputs (the current time, fresh identifiers) are abstracted
/// behind traits and injected, so every derived value is reproducible in tests.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use gathering_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// let first = clock.now();
    /// assert!(clock.now() >= first);
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

    /// Source of fresh entity identifiers
    ///
    /// Callers supply the id when they build a new entity; the reducer never
    /// invents one.
    pub trait IdGenerator: Send + Sync {
        /// Produce an identifier not handed out before
        fn next_id(&self) -> String;
    }

    /// Production id generator producing random UUID v4 strings
    #[derive(Debug, Clone, Copy, Default)]
    pub struct UuidGenerator;

    impl IdGenerator for UuidGenerator {
        fn next_id(&self) -> String {
            uuid::Uuid::new_v4().to_string()
        }
    }
}
