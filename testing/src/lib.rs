//! # Seatplan Testing
//!
//! Testing utilities and helpers for the seat plan designer.
//!
//! This crate provides:
//! - Deterministic [`Clock`] implementations
//! - The [`ReducerTest`] Given-When-Then harness
//! - Assertion helpers for effects
//! - A one-line tracing setup for tests that want log output
//!
//! ## Example
//!
//! ```ignore
//! use seatplan_testing::ReducerTest;
//!
//! ReducerTest::new(EditorReducer::new())
//!     .with_env(())
//!     .given_state(EditorState::new(SeatLayout::new(5, 10)))
//!     .when_action(EditorAction::Resize { rows: 3, cols: 3 })
//!     .then_state(|state| assert_eq!(state.layout().dimensions(), (3, 3)))
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use seatplan_core::environment::Clock;


/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use chrono::Duration;
    use std::sync::Mutex;

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use seatplan_testing::mocks::FixedClock;
    /// use seatplan_core::environment::Clock;
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

    /// Clock that advances by a fixed step every time it is read
    ///
    /// Lets a test tell "created at" apart from "reconciled at" without
    /// sleeping.
    #[derive(Debug)]
    pub struct SteppingClock {
        next: Mutex<DateTime<Utc>>,
        step: Duration,
    }

    impl SteppingClock {
        /// Start at `start`, advancing by `step` after each read
        #[must_use]
        pub const fn new(start: DateTime<Utc>, step: Duration) -> Self {
            Self {
                next: Mutex::new(start),
                step,
            }
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            // A poisoned lock still holds a valid timestamp
            let mut next = match self.next.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            let now = *next;
            *next = now + self.step;
            now
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::<Utc>::UNIX_EPOCH + Duration::days(20_089))
    }
}

/// Helper assertions for effects
pub mod assertions {
    use seatplan_core::effect::Effect;

    /// Assert that there are no effects
    ///
    /// # Panics
    ///
    /// Panics if any effect does something.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_no_effects<A: std::fmt::Debug>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().all(Effect::is_none),
            "Expected no effects, but found {}: {:?}",
            effects.len(),
            effects
        );
    }

    /// Assert the number of effects
    ///
    /// # Panics
    ///
    /// Panics if the number of effects doesn't match expected.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_effects_count<A>(effects: &[Effect<A>], expected: usize) {
        assert_eq!(
            effects.len(),
            expected,
            "Expected {} effects, but found {}",
            expected,
            effects.len()
        );
    }

    /// Assert that at least one effect dispatches an action matching `predicate`
    ///
    /// # Panics
    ///
    /// Panics if no dispatched action matches.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_dispatches<A, F>(effects: &[Effect<A>], predicate: F)
    where
        A: Clone + std::fmt::Debug,
        F: Fn(&A) -> bool,
    {
        let dispatched: Vec<A> = effects
            .iter()
            .cloned()
            .flat_map(Effect::into_actions)
            .collect();
        assert!(
            dispatched.iter().any(predicate),
            "Expected a matching dispatched action, found {dispatched:?}"
        );
    }
}

/// Install a `tracing` subscriber that writes through the test harness
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seatplan=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use mocks::{FixedClock, SteppingClock, test_clock};
pub use reducer_test::ReducerTest;
