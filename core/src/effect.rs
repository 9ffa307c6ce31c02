//! Effect descriptions returned by reducers.
//!
//! Effects are values, not execution. The store walks them after the reducer
//! returns: `Parallel` and `Sequential` are flattened in order (there is no
//! concurrency in the designer, so both run one after another), and
//! `Dispatch` queues its action behind the one currently being processed.

/// Effect type - describes follow-up work for the store
///
/// # Type Parameters
///
/// - `Action`: The action type that effects can produce (feedback loop)
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect<Action> {
    /// No-op effect
    None,

    /// Run effects side by side
    Parallel(Vec<Effect<Action>>),

    /// Run effects one after the other
    Sequential(Vec<Effect<Action>>),

    /// Feed an action back into the store
    Dispatch(Box<Action>),
}

impl<Action> Effect<Action> {
    /// Combine effects to run side by side
    #[must_use]
    pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
        Effect::Parallel(effects)
    }

    /// Chain effects to run sequentially
    #[must_use]
    pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
        Effect::Sequential(effects)
    }

    /// Feed `action` back into the store once the current action completes
    #[must_use]
    pub fn dispatch(action: Action) -> Effect<Action> {
        Effect::Dispatch(Box::new(action))
    }

    /// Whether this effect (recursively) does nothing
    #[must_use]
    pub fn is_none(&self) -> bool {
        match self {
            Effect::None => true,
            Effect::Parallel(effects) | Effect::Sequential(effects) => {
                effects.iter().all(Effect::is_none)
            },
            Effect::Dispatch(_) => false,
        }
    }

    /// Collect every dispatched action, depth first, in execution order
    #[must_use]
    pub fn into_actions(self) -> Vec<Action> {
        let mut actions = Vec::new();
        self.collect_actions(&mut actions);
        actions
    }

    fn collect_actions(self, out: &mut Vec<Action>) {
        match self {
            Effect::None => {},
            Effect::Parallel(effects) | Effect::Sequential(effects) => {
                for effect in effects {
                    effect.collect_actions(out);
                }
            },
            Effect::Dispatch(action) => out.push(*action),
        }
    }
}
