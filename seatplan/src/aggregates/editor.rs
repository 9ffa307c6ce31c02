//! Layout editor aggregate.
//!
//! Holds the layout being edited, the active brush and a bounded undo
//! history. Every accepted edit swaps in a new [`SeatLayout`] value and pushes
//! the previous one onto the history; history entries are shared `Arc`s, so
//! nothing is deep-copied to undo.
//!
//! Painting a cell with its own kind leaves the history alone, and so does a
//! stroke until it changes its first cell. Fills, resizes, numbering and
//! category edits always push one entry, even when nothing changed.

use crate::categories::SeatCategory;
use crate::layout::SeatLayout;
use crate::types::{Axis, FillTarget, GridPos, SeatKind};
use seatplan_core::{SmallVec, effect::Effect, reducer::Reducer};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;

/// Maximum number of undo entries kept
pub const HISTORY_LIMIT: usize = 20;

// ============================================================================
// State
// ============================================================================

/// An open pointer-drag gesture
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Stroke {
    /// Whether the stroke already pushed its history entry
    recorded: bool,
}

/// Editor state for one layout
#[derive(Clone, Debug)]
pub struct EditorState {
    layout: Arc<SeatLayout>,
    history: VecDeque<Arc<SeatLayout>>,
    active: SeatKind,
    stroke: Option<Stroke>,
}

impl EditorState {
    /// Starts editing `layout` with the `standard` brush and no history
    #[must_use]
    pub fn new(layout: SeatLayout) -> Self {
        Self {
            layout: Arc::new(layout),
            history: VecDeque::with_capacity(HISTORY_LIMIT),
            active: SeatKind::Standard,
            stroke: None,
        }
    }

    /// The current layout
    #[must_use]
    pub fn layout(&self) -> &SeatLayout {
        &self.layout
    }

    /// The current layout as a shared handle
    #[must_use]
    pub fn shared_layout(&self) -> Arc<SeatLayout> {
        Arc::clone(&self.layout)
    }

    /// The active brush
    #[must_use]
    pub const fn active_category(&self) -> SeatKind {
        self.active
    }

    /// Number of undo entries
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Whether an undo would do anything
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// Whether a stroke is open
    #[must_use]
    pub const fn is_stroking(&self) -> bool {
        self.stroke.is_some()
    }

    /// Swaps in `next`, saving the current layout for undo
    fn commit(&mut self, next: SeatLayout) {
        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        let previous = std::mem::replace(&mut self.layout, Arc::new(next));
        self.history.push_back(previous);
    }

    /// Paints one cell as part of the open stroke
    ///
    /// Only the first change of a stroke is recorded; later cells overwrite
    /// the current layout in place of a new history entry.
    fn stroke_paint(&mut self, pos: GridPos) -> bool {
        let Some(next) = self.layout.with_cell(pos, self.active) else {
            return false;
        };
        match self.stroke.as_mut() {
            Some(stroke) if stroke.recorded => self.layout = Arc::new(next),
            Some(stroke) => {
                stroke.recorded = true;
                self.commit(next);
            },
            None => self.commit(next),
        }
        true
    }

    fn undo(&mut self) -> bool {
        match self.history.pop_back() {
            Some(previous) => {
                self.layout = previous;
                true
            },
            None => false,
        }
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(SeatLayout::default())
    }
}

// ============================================================================
// Actions
// ============================================================================

/// Actions for the layout editor
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditorAction {
    /// Choose the brush used by paint, stroke and fill
    SetActiveCategory {
        /// New brush
        kind: SeatKind,
    },

    /// Paint one cell with the active brush
    PaintCell {
        /// Row index
        row: usize,
        /// Column index
        col: usize,
    },

    /// Start a drag gesture and paint its first cell
    BeginStroke {
        /// Row index
        row: usize,
        /// Column index
        col: usize,
    },

    /// Paint the next cell of a drag gesture
    ContinueStroke {
        /// Row index
        row: usize,
        /// Column index
        col: usize,
    },

    /// Finish a drag gesture
    EndStroke,

    /// Paint a whole row or column with the active brush
    BulkFill {
        /// Row or column to fill
        target: FillTarget,
    },

    /// Change the grid dimensions (clamped to 1..=26 rows, 1..=40 columns)
    Resize {
        /// Requested rows
        rows: usize,
        /// Requested columns
        cols: usize,
    },

    /// Change a numbering offset
    SetNumbering {
        /// Which offset
        axis: Axis,
        /// New value
        value: u32,
    },

    /// Replace category entries
    EditCategories {
        /// Entries to apply; kinds left out keep their entry
        categories: Vec<SeatCategory>,
    },

    /// Restore the layout before the most recent edit
    Undo,
}

impl EditorAction {
    /// Whether this action can change the grid's cells or dimensions
    #[must_use]
    pub const fn touches_grid(&self) -> bool {
        match self {
            Self::PaintCell { .. }
            | Self::BeginStroke { .. }
            | Self::ContinueStroke { .. }
            | Self::BulkFill { .. }
            | Self::Resize { .. }
            | Self::Undo => true,
            Self::SetActiveCategory { .. }
            | Self::EndStroke
            | Self::SetNumbering { .. }
            | Self::EditCategories { .. } => false,
        }
    }
}

// ============================================================================
// Reducer
// ============================================================================

/// Reducer for the layout editor
///
/// The editor needs nothing from the outside world, so its environment is `()`.
#[derive(Clone, Debug)]
pub struct EditorReducer;

impl EditorReducer {
    /// Creates a new `EditorReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Applies `action`, returning whether it pushed a history entry or undid one
    ///
    /// Painting a cell its own kind records nothing. Fills, resizes,
    /// numbering and category edits are recorded even when the layout comes
    /// out identical, so `Undo` always reverts exactly that operation.
    pub fn apply(state: &mut EditorState, action: EditorAction) -> bool {
        if !matches!(action, EditorAction::ContinueStroke { .. }) && state.stroke.take().is_some() {
            tracing::trace!("Stroke closed");
        }

        match action {
            EditorAction::SetActiveCategory { kind } => {
                state.active = kind;
                false
            },

            EditorAction::PaintCell { row, col } => {
                let next = state.layout.with_cell(GridPos::new(row, col), state.active);
                Self::commit_some(state, next)
            },

            EditorAction::BeginStroke { row, col } => {
                state.stroke = Some(Stroke::default());
                state.stroke_paint(GridPos::new(row, col))
            },

            EditorAction::ContinueStroke { row, col } => state.stroke_paint(GridPos::new(row, col)),

            EditorAction::EndStroke => false,

            EditorAction::BulkFill { target } => {
                let next = state.layout.with_fill(target, state.active);
                Self::commit_some(state, next)
            },

            EditorAction::Resize { rows, cols } => {
                let next = state.layout.resized(rows, cols);
                Self::commit_some(state, Some(next))
            },

            EditorAction::SetNumbering { axis, value } => {
                let next = state.layout.with_numbering(axis, value);
                Self::commit_some(state, Some(next))
            },

            EditorAction::EditCategories { categories } => {
                let next = state.layout.with_category_edits(categories);
                Self::commit_some(state, Some(next))
            },

            EditorAction::Undo => state.undo(),
        }
    }

    fn commit_some(state: &mut EditorState, next: Option<SeatLayout>) -> bool {
        match next {
            Some(layout) => {
                state.commit(layout);
                true
            },
            None => false,
        }
    }
}

impl Default for EditorReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for EditorReducer {
    type State = EditorState;
    type Action = EditorAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let label = format!("{action:?}");
        if Self::apply(state, action) {
            tracing::debug!(
                action = %label,
                dimensions = ?state.layout.dimensions(),
                history = state.history.len(),
                "Layout edited"
            );
        } else {
            tracing::trace!(action = %label, "Edit not recorded");
        }
        SmallVec::new()
    }
}
