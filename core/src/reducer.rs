//! The Reducer trait - the single place business logic lives.

use crate::effect::Effect;
use smallvec::SmallVec;

/// The Reducer trait - core abstraction for business logic
///
/// # Type Parameters
///
/// - `State`: The domain state this reducer operates on
/// - `Action`: The action type this reducer processes
/// - `Environment`: The injected dependencies this reducer needs
///
/// # Example
///
/// ```ignore
/// impl Reducer for EditorReducer {
///     type State = EditorState;
///     type Action = EditorAction;
///     type Environment = ();
///
///     fn reduce(
///         &self,
///         state: &mut EditorState,
///         action: EditorAction,
///         env: &(),
///     ) -> SmallVec<[Effect<EditorAction>; 4]> {
///         match action {
///             EditorAction::Undo => {
///                 state.undo();
///                 smallvec![Effect::None]
///             }
///             _ => smallvec![Effect::None],
///         }
///     }
/// }
/// ```
pub trait Reducer {
    /// The state type this reducer operates on
    type State;

    /// The action type this reducer processes
    type Action;

    /// The environment type with injected dependencies
    type Environment;

    /// Reduce an action into state changes and effects
    ///
    /// This is a pure function that:
    /// 1. Validates the action
    /// 2. Updates state in place
    /// 3. Returns effect descriptions to be executed by the store
    ///
    /// Reducers do not fail. Rejected actions leave the state untouched and
    /// record the reason wherever the feature keeps its last error.
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]>;
}
