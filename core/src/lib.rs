//! # Seatplan Core
//!
//! Core traits and types for the seat plan designer.
//!
//! Every stateful part of the designer (the layout editor, the showtime
//! schedule, the venue session that composes them) is written as a reducer:
//!
//! - **State**: plain owned data for one feature
//! - **Action**: every input the feature accepts
//! - **Reducer**: pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: a description of follow-up work, executed by the runtime
//! - **Environment**: injected dependencies such as the clock
//!
//! All reducers are synchronous. Effects never perform I/O; the only
//! non-trivial effect is [`Effect::Dispatch`], which feeds another action
//! back into the store that ran the reducer.
//!
//! ## Example
//!
//! ```
//! use seatplan_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct BrushState {
//!     strokes: u32,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum BrushAction {
//!     Stroke,
//! }
//!
//! struct BrushReducer;
//!
//! impl Reducer for BrushReducer {
//!     type State = BrushState;
//!     type Action = BrushAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut BrushState,
//!         action: BrushAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<BrushAction>; 4]> {
//!         match action {
//!             BrushAction::Stroke => state.strokes += 1,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let mut state = BrushState::default();
//! BrushReducer.reduce(&mut state, BrushAction::Stroke, &());
//! assert_eq!(state.strokes, 1);
//! ```

pub mod effect;
pub mod environment;
pub mod reducer;

pub use effect::Effect;
pub use environment::{Clock, SystemClock};
pub use reducer::Reducer;

// Reducers return small effect lists; re-exported so domain crates need not
// depend on smallvec directly.
pub use smallvec::{SmallVec, smallvec};
