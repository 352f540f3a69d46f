//! # Gathering Runtime
//!
//! Runtime implementation for the Gathering church site store.
//!
//! This crate provides the Store that owns the current state snapshot and
//! runs the reducer for every dispatched action.
//!
//! ## Core Components
//!
//! - **Store**: Holds the current snapshot, applies actions, notifies observers
//! - **Observers**: Synchronous callbacks run after each state change
//! - **Watch channel**: Latest-snapshot receiver for view layers
//!
//! ## Execution Model
//!
//! Single-threaded and cooperative. `dispatch` runs to completion: the new
//! snapshot is visible through [`Store::state`], every observer and every
//! watch receiver before it returns. The store is deliberately `!Sync`.
//!
//! ## Example
//!
//! ```ignore
//! use gathering_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Dispatch an action
//! store.dispatch(Action::DoSomething)?;
//!
//! // Read state
//! let snapshot = store.state();
//! ```

use gathering_core::{action::Action, reducer::Reducer};
use std::sync::Arc;

/// Metric names and descriptions
pub mod metrics;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    ///
    /// Reducers themselves cannot fail; these errors only describe misuse of
    /// the container.
    #[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
    pub enum StoreError {
        /// An action was dispatched while another dispatch was still running,
        /// typically from inside an observer callback.
        #[error("Dispatch issued while another dispatch is in progress")]
        ReentrantDispatch,

        /// The observer list was modified while observers were being notified.
        #[error("Observers cannot be changed while a dispatch is in progress")]
        ObserversBusy,
    }
}

pub use error::StoreError;

use std::cell::{Cell, RefCell};
use std::time::Instant;

/// Resets the dispatch flag when a dispatch finishes, even by unwinding.
struct DispatchGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> DispatchGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self { flag }
    }
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

/// Store module - The runtime for reducers
pub mod store {
    use super::{
        Action, Arc, Cell, DispatchGuard, Instant, Reducer, RefCell, StoreError, metrics,
    };
    use tokio::sync::watch;

    /// Callback invoked with the applied action and the new snapshot
    pub type Observer<S, A> = Box<dyn Fn(&A, &Arc<S>)>;

    /// Handle returned by [`Store::subscribe`], used to unsubscribe
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SubscriptionId(u64);

    /// The Store - state holder and dispatch entry point for a reducer
    ///
    /// The Store manages:
    /// 1. The current state snapshot (an `Arc`, replaced wholesale)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Observers notified after each change
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    ///
    /// # Example
    ///
    /// ```ignore
    /// let store = Store::new(AppState::default(), SiteReducer::new(), env);
    ///
    /// store.dispatch(AppAction::DeleteSermon("w1".to_string()))?;
    /// assert!(store.state().sermons.iter().all(|s| s.id != "w1"));
    /// ```
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: watch::Sender<Arc<S>>,
        reducer: R,
        environment: E,
        observers: RefCell<Vec<(SubscriptionId, Observer<S, A>)>>,
        next_subscription: Cell<u64>,
        dispatching: Cell<bool>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
        A: Action + Clone,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// # Arguments
        ///
        /// - `initial_state`: The starting state for the store
        /// - `reducer`: The reducer implementation (business logic)
        /// - `environment`: Injected dependencies
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            let (state, _) = watch::channel(Arc::new(initial_state));

            Self {
                state,
                reducer,
                environment,
                observers: RefCell::new(Vec::new()),
                next_subscription: Cell::new(0),
                dispatching: Cell::new(false),
            }
        }

        /// Current state snapshot
        ///
        /// The snapshot is immutable; later dispatches install a new one
        /// instead of editing it.
        #[must_use]
        pub fn state(&self) -> Arc<S> {
            Arc::clone(&*self.state.borrow())
        }

        /// Injected dependencies shared with page handlers
        #[must_use]
        pub const fn environment(&self) -> &E {
            &self.environment
        }

        /// Receiver that always holds the latest snapshot
        ///
        /// The receiver observes a change before `dispatch` returns.
        #[must_use]
        pub fn watch(&self) -> watch::Receiver<Arc<S>> {
            self.state.subscribe()
        }

        /// Dispatch an action to the store
        ///
        /// 1. Runs the reducer against the current snapshot
        /// 2. Installs the returned snapshot
        /// 3. Notifies observers synchronously
        ///
        /// If the reducer returns the current snapshot itself, nothing is
        /// installed and observers are not called.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ReentrantDispatch`] if called while another
        /// dispatch is running (for example from an observer). The state is
        /// left untouched in that case.
        pub fn dispatch(&self, action: A) -> Result<(), StoreError> {
            let name = action.name();

            if self.dispatching.get() {
                tracing::warn!(action = name, "Rejected reentrant dispatch");
                metrics::counter!(metrics::DISPATCH_REJECTED, "action" => name).increment(1);
                return Err(StoreError::ReentrantDispatch);
            }

            let span = tracing::debug_span!("store_dispatch", action = name);
            let _enter = span.enter();
            let _guard = DispatchGuard::enter(&self.dispatching);

            metrics::counter!(metrics::ACTIONS_TOTAL, "action" => name).increment(1);

            let current = self.state();
            let observed = action.clone();

            let start = Instant::now();
            let next = self.reducer.reduce(&current, action, &self.environment);
            metrics::histogram!(metrics::REDUCER_DURATION).record(start.elapsed().as_secs_f64());

            if Arc::ptr_eq(&current, &next) {
                tracing::debug!("Action left state unchanged");
                metrics::counter!(metrics::ACTIONS_UNCHANGED, "action" => name).increment(1);
                return Ok(());
            }

            self.state.send_replace(Arc::clone(&next));

            let observers = self.observers.borrow();
            for (_, observer) in observers.iter() {
                observer(&observed, &next);
            }

            // Note: Precision loss acceptable for metrics (observer counts < 2^52)
            #[allow(clippy::cast_precision_loss)]
            metrics::histogram!(metrics::OBSERVERS_NOTIFIED).record(observers.len() as f64);

            tracing::debug!(
                touches = observed.touches().unwrap_or("-"),
                observers = observers.len(),
                "Action applied"
            );

            Ok(())
        }

        /// Register an observer called after every state change
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ObserversBusy`] when called during a dispatch.
        pub fn subscribe<F>(&self, observer: F) -> Result<SubscriptionId, StoreError>
        where
            F: Fn(&A, &Arc<S>) + 'static,
        {
            if self.dispatching.get() {
                return Err(StoreError::ObserversBusy);
            }
            let mut observers = self
                .observers
                .try_borrow_mut()
                .map_err(|_| StoreError::ObserversBusy)?;

            let id = SubscriptionId(self.next_subscription.get());
            self.next_subscription.set(id.0 + 1);
            observers.push((id, Box::new(observer)));

            tracing::trace!(subscription = id.0, "Observer subscribed");
            Ok(id)
        }

        /// Remove a previously registered observer
        ///
        /// Returns whether the observer was still registered.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ObserversBusy`] when called during a dispatch.
        pub fn unsubscribe(&self, id: SubscriptionId) -> Result<bool, StoreError> {
            if self.dispatching.get() {
                return Err(StoreError::ObserversBusy);
            }
            let mut observers = self
                .observers
                .try_borrow_mut()
                .map_err(|_| StoreError::ObserversBusy)?;

            let before = observers.len();
            observers.retain(|(existing, _)| *existing != id);
            Ok(observers.len() != before)
        }
    }
}

pub use store::{Observer, Store, SubscriptionId};

// Test module
#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[derive(Debug, Clone, Default)]
    struct TestState {
        value: i32,
    }

    #[derive(Debug, Clone)]
    enum TestAction {
        Increment,
        Decrement,
        NoOp,
    }

    impl Action for TestAction {
        fn name(&self) -> &'static str {
            match self {
                Self::Increment => "INCREMENT",
                Self::Decrement => "DECREMENT",
                Self::NoOp => "NO_OP",
            }
        }
    }

    #[derive(Debug, Clone)]
    struct TestReducer;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &Arc<Self::State>,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> Arc<Self::State> {
            match action {
                TestAction::Increment => Arc::new(TestState {
                    value: state.value + 1,
                }),
                TestAction::Decrement => Arc::new(TestState {
                    value: state.value - 1,
                }),
                TestAction::NoOp => Arc::clone(state),
            }
        }
    }

    fn test_store() -> Rc<Store<TestState, TestAction, (), TestReducer>> {
        Rc::new(Store::new(TestState::default(), TestReducer, ()))
    }

    #[test]
    fn test_store_creation() {
        let store = test_store();
        assert_eq!(store.state().value, 0);
    }

    #[test]
    fn test_dispatch_action() {
        let store = test_store();
        store.dispatch(TestAction::Increment).unwrap();
        store.dispatch(TestAction::Increment).unwrap();
        store.dispatch(TestAction::Decrement).unwrap();
        assert_eq!(store.state().value, 0);
    }

    #[test]
    fn test_snapshots_are_not_mutated() {
        let store = test_store();
        let before = store.state();
        store.dispatch(TestAction::Increment).unwrap();
        assert_eq!(before.value, 0);
        assert_eq!(store.state().value, 1);
    }

    #[test]
    fn test_noop_keeps_snapshot_and_skips_observers() {
        let store = test_store();
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        store
            .subscribe(move |_, _| seen.set(seen.get() + 1))
            .unwrap();

        let before = store.state();
        store.dispatch(TestAction::NoOp).unwrap();

        assert!(Arc::ptr_eq(&before, &store.state()));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_observers_see_new_state_before_dispatch_returns() {
        let store = test_store();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        store
            .subscribe(move |action: &TestAction, state: &Arc<TestState>| {
                log.borrow_mut().push((action.name(), state.value));
            })
            .unwrap();

        store.dispatch(TestAction::Increment).unwrap();
        assert_eq!(*seen.borrow(), vec![("INCREMENT", 1)]);
    }

    #[test]
    fn test_watch_receiver_sees_latest_snapshot() {
        let store = test_store();
        let mut receiver = store.watch();
        store.dispatch(TestAction::Increment).unwrap();

        assert!(receiver.has_changed().unwrap());
        assert_eq!(receiver.borrow_and_update().value, 1);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let store = test_store();
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let id = store
            .subscribe(move |_, _| seen.set(seen.get() + 1))
            .unwrap();

        store.dispatch(TestAction::Increment).unwrap();
        assert!(store.unsubscribe(id).unwrap());
        assert!(!store.unsubscribe(id).unwrap());
        store.dispatch(TestAction::Increment).unwrap();

        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_reentrant_dispatch_is_rejected() {
        let store = test_store();
        let inner = Rc::downgrade(&store);
        let outcome = Rc::new(RefCell::new(None));
        let record = Rc::clone(&outcome);

        store
            .subscribe(move |_, _| {
                if let Some(store) = inner.upgrade() {
                    *record.borrow_mut() = Some(store.dispatch(TestAction::Increment));
                }
            })
            .unwrap();

        store.dispatch(TestAction::Increment).unwrap();

        assert_eq!(*outcome.borrow(), Some(Err(StoreError::ReentrantDispatch)));
        assert_eq!(store.state().value, 1);

        // The store accepts dispatches again once the outer one finished.
        store.dispatch(TestAction::Decrement).unwrap();
        assert_eq!(store.state().value, 0);
    }

    #[test]
    fn test_subscribe_during_dispatch_is_rejected() {
        let store = test_store();
        let inner = Rc::downgrade(&store);
        let outcome = Rc::new(RefCell::new(None));
        let record = Rc::clone(&outcome);

        store
            .subscribe(move |_, _| {
                if let Some(store) = inner.upgrade() {
                    *record.borrow_mut() = Some(store.subscribe(|_, _| {}).map(|_| ()));
                }
            })
            .unwrap();

        store.dispatch(TestAction::Increment).unwrap();
        assert_eq!(*outcome.borrow(), Some(Err(StoreError::ObserversBusy)));
    }
}
