//! # Gathering Testing
//!
//! Testing utilities and helpers for the Gathering church site store.
//!
//! This crate provides:
//! - Deterministic implementations of Environment traits
//! - A Given-When-Then builder for reducers
//! - Tracing setup for tests
//!
//! ## Example
//!
//! ```ignore
//! use gathering_testing::{test_clock, ReducerTest, SequentialIdGenerator};
//!
//! ReducerTest::new(SiteReducer::new())
//!     .with_env(SiteEnvironment::new(test_clock(), SequentialIdGenerator::new("id")))
//!     .given_state(AppState::default())
//!     .when_action(AppAction::DeleteSermon("w1".into()))
//!     .then_state(|state| assert!(state.sermons.is_empty()))
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use gathering_core::environment::{Clock, IdGenerator};


/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, IdGenerator, Utc};
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use gathering_testing::mocks::FixedClock;
    /// use gathering_core::environment::Clock;
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

    /// Predictable ids: `prefix-1`, `prefix-2`, ...
    ///
    /// # Example
    ///
    /// ```
    /// use gathering_testing::mocks::SequentialIdGenerator;
    /// use gathering_core::environment::IdGenerator;
    ///
    /// let ids = SequentialIdGenerator::new("sermon");
    /// assert_eq!(ids.next_id(), "sermon-1");
    /// assert_eq!(ids.next_id(), "sermon-2");
    /// ```
    #[derive(Debug)]
    pub struct SequentialIdGenerator {
        prefix: String,
        counter: AtomicU64,
    }

    impl SequentialIdGenerator {
        /// Create a generator whose ids start with `prefix`
        #[must_use]
        pub fn new(prefix: impl Into<String>) -> Self {
            Self {
                prefix: prefix.into(),
                counter: AtomicU64::new(0),
            }
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_id(&self) -> String {
            let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
            format!("{}-{n}", self.prefix)
        }
    }
}

/// Test helpers and utilities
pub mod helpers {
    /// Install a tracing subscriber that writes through the test harness
    ///
    /// Safe to call from every test; only the first call installs anything.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "warn".into()),
            )
            .with_test_writer()
            .try_init();
    }
}

// Re-export commonly used items
pub use helpers::init_test_tracing;
pub use mocks::{FixedClock, SequentialIdGenerator, test_clock};
pub use reducer_test::{ReducerTest, assertions};
