//! # Seatplan Runtime
//!
//! Runtime implementation for the seat plan designer.
//!
//! This crate provides the Store that coordinates reducer execution and
//! effect handling for one editing session.
//!
//! ## Core Components
//!
//! - **Store**: Owns the state, runs the reducer and drains effects
//! - **Feedback loop**: `action → reducer → effects → dispatched action → reducer`
//!
//! Everything runs on the caller's thread. `send` returns only after every
//! action fed back by [`Effect::Dispatch`] has been reduced, so two sends can
//! never interleave on the same state.
//!
//! ## Example
//!
//! ```ignore
//! use seatplan_runtime::Store;
//!
//! let mut store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething)?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field);
//! ```

use seatplan_core::{effect::Effect, reducer::Reducer};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Dispatched actions kept producing more dispatched actions
        ///
        /// The store stops after the configured number of feedback actions for
        /// a single `send`. Actions reduced up to that point stay applied.
        #[error("Feedback limit of {limit} actions exceeded while processing one send")]
        FeedbackLimitExceeded {
            /// The configured limit
            limit: usize,
        },
    }
}

/// Store module - The runtime for reducers
pub mod store {
    use super::{Effect, Reducer, error::StoreError};
    use std::collections::VecDeque;

    /// Default cap on feedback actions processed per `send`
    pub const DEFAULT_FEEDBACK_LIMIT: usize = 64;

    /// The Store - synchronous runtime for a reducer
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
    /// let mut store = Store::new(
    ///     VenueSessionState::new(screen, layout),
    ///     VenueSessionReducer::new(),
    ///     SessionEnvironment::new(Arc::new(SystemClock)),
    /// );
    ///
    /// store.send(SessionAction::SaveSchedule { requests })?;
    /// ```
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: S,
        reducer: R,
        environment: E,
        feedback_limit: usize,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
        A: std::fmt::Debug,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// The feedback limit defaults to [`DEFAULT_FEEDBACK_LIMIT`].
        #[must_use]
        pub const fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self {
                state: initial_state,
                reducer,
                environment,
                feedback_limit: DEFAULT_FEEDBACK_LIMIT,
            }
        }

        /// Override the number of feedback actions allowed per `send`
        #[must_use]
        pub fn with_feedback_limit(mut self, limit: usize) -> Self {
            self.feedback_limit = limit;
            self
        }

        /// Send an action to the store
        ///
        /// Runs the reducer, then reduces every action the returned effects
        /// dispatch, breadth first, until the queue is empty.
        ///
        /// Returns the number of actions reduced, including `action` itself.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::FeedbackLimitExceeded`] if more than the
        /// configured number of feedback actions were dispatched.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub fn send(&mut self, action: A) -> Result<usize, StoreError> {
            let mut queue = VecDeque::from([action]);
            let mut processed = 0usize;

            while let Some(next) = queue.pop_front() {
                if processed > self.feedback_limit {
                    tracing::warn!(
                        limit = self.feedback_limit,
                        pending = queue.len() + 1,
                        "Feedback limit exceeded, dropping remaining actions"
                    );
                    return Err(StoreError::FeedbackLimitExceeded {
                        limit: self.feedback_limit,
                    });
                }

                tracing::trace!(action = ?next, "Reducing action");
                let effects = self.reducer.reduce(&mut self.state, next, &self.environment);
                processed += 1;

                for effect in effects {
                    Self::enqueue(effect, &mut queue);
                }
            }

            Ok(processed)
        }

        fn enqueue(effect: Effect<A>, queue: &mut VecDeque<A>) {
            match effect {
                Effect::None => {
                    tracing::trace!("Executing Effect::None (no-op)");
                },
                Effect::Parallel(effects) | Effect::Sequential(effects) => {
                    tracing::trace!("Flattening {} nested effects", effects.len());
                    for nested in effects {
                        Self::enqueue(nested, queue);
                    }
                },
                Effect::Dispatch(action) => {
                    tracing::trace!("Effect::Dispatch queued an action");
                    queue.push_back(*action);
                },
            }
        }

        /// Read current state via a closure
        pub fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            f(&self.state)
        }

        /// Borrow the current state
        #[must_use]
        pub const fn state_ref(&self) -> &S {
            &self.state
        }

        /// The injected environment
        #[must_use]
        pub const fn environment(&self) -> &E {
            &self.environment
        }

        /// Consume the store, returning the final state
        #[must_use]
        pub fn into_state(self) -> S {
            self.state
        }
    }
}

pub use error::StoreError;
pub use store::Store;
