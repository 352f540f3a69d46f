//! Metric names and descriptions for the store runtime.
//!
//! Metrics go through the `metrics` facade; without an installed recorder
//! every call is a no-op, so the store can record unconditionally.
//!
//! # Example
//!
//! ```
//! use gathering_runtime::metrics::register_metrics;
//!
//! // Safe to call before or after a recorder is installed.
//! register_metrics();
//! ```

use metrics::{Unit, describe_counter, describe_histogram};

// Re-export metrics macros for use in other modules
pub use metrics::{counter, histogram};

/// Total actions dispatched, labelled by action tag
pub const ACTIONS_TOTAL: &str = "store.actions.total";

/// Actions whose reducer returned the previous snapshot
pub const ACTIONS_UNCHANGED: &str = "store.actions.unchanged";

/// Dispatches refused because another dispatch was in progress
pub const DISPATCH_REJECTED: &str = "store.dispatch.rejected";

/// Time spent inside the reducer per dispatch
pub const REDUCER_DURATION: &str = "store.reducer.duration_seconds";

/// Observers notified per state change
pub const OBSERVERS_NOTIFIED: &str = "store.observers.notified";

/// Register descriptions for every store metric.
pub fn register_metrics() {
    describe_counter!(
        ACTIONS_TOTAL,
        Unit::Count,
        "Total number of actions dispatched to the store"
    );
    describe_counter!(
        ACTIONS_UNCHANGED,
        Unit::Count,
        "Actions that left the state snapshot unchanged"
    );
    describe_counter!(
        DISPATCH_REJECTED,
        Unit::Count,
        "Dispatches rejected because they were issued during another dispatch"
    );
    describe_histogram!(
        REDUCER_DURATION,
        Unit::Seconds,
        "Time spent in the reducer for a single action"
    );
    describe_histogram!(
        OBSERVERS_NOTIFIED,
        Unit::Count,
        "Number of observers notified after a state change"
    );
}
