//! Venue session aggregate.
//!
//! Composes the layout editor with the schedule of the same screen. Editor
//! actions are run against a scratch copy of the editor first; the result is
//! only kept if no showtime would lose a booked or selected seat to it.
//!
//! Accepted edits that change the grid or its dimensions dispatch
//! [`SessionAction::ReconcileShowtimes`], so every seat map is congruent with
//! the layout again before the store hands control back.

use crate::aggregates::editor::{EditorAction, EditorReducer, EditorState};
use crate::error::SeatplanError;
use crate::labels;
use crate::layout::SeatLayout;
use crate::reconcile::{ReconcileReport, ShowtimeRequest};
use crate::schedule::Schedule;
use crate::types::{GridPos, ScreenId, ShowtimeId};
use seatplan_core::{SmallVec, effect::Effect, environment::Clock, reducer::Reducer, smallvec};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ============================================================================
// State
// ============================================================================

/// Editor plus schedule for one screen or tour stop
#[derive(Clone, Debug)]
pub struct VenueSessionState {
    /// Editor for the screen's layout
    pub editor: EditorState,
    /// Showtimes on the screen
    pub schedule: Schedule,
    /// Report from the most recent reconciliation
    pub last_report: Option<ReconcileReport>,
    /// Why the most recent action was refused, if it was
    pub last_error: Option<String>,
}

impl VenueSessionState {
    /// Starts a session for `screen` with `layout` and no showtimes
    #[must_use]
    pub fn new(screen: ScreenId, layout: SeatLayout) -> Self {
        Self::with_schedule(layout, Schedule::new(screen))
    }

    /// Starts a session from a stored layout and schedule
    #[must_use]
    pub fn with_schedule(layout: SeatLayout, schedule: Schedule) -> Self {
        Self {
            editor: EditorState::new(layout),
            schedule,
            last_report: None,
            last_error: None,
        }
    }

    /// The layout being edited
    #[must_use]
    pub fn layout(&self) -> &SeatLayout {
        self.editor.layout()
    }

    /// Screen the session belongs to
    #[must_use]
    pub const fn screen(&self) -> ScreenId {
        self.schedule.screen()
    }
}

// ============================================================================
// Actions
// ============================================================================

/// Actions for a venue session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionAction {
    /// Forward an action to the layout editor
    Editor(EditorAction),

    /// Replace the schedule with these slots
    SaveSchedule {
        /// Requested slots
        requests: Vec<ShowtimeRequest>,
    },

    /// Bring every seat map in line with the current layout
    ReconcileShowtimes,

    /// Mark a seat as being chosen
    SelectSeat {
        /// Showtime
        showtime: ShowtimeId,
        /// Seat label, e.g. `C12`
        label: String,
    },

    /// Return a chosen seat
    ReleaseSeat {
        /// Showtime
        showtime: ShowtimeId,
        /// Seat label
        label: String,
    },

    /// Sell a seat
    BookSeat {
        /// Showtime
        showtime: ShowtimeId,
        /// Seat label
        label: String,
    },
}

// ============================================================================
// Environment
// ============================================================================

/// Dependencies of the session reducer
#[derive(Clone)]
pub struct SessionEnvironment {
    /// Clock for showtime timestamps
    pub clock: Arc<dyn Clock>,
}

impl SessionEnvironment {
    /// Creates a new `SessionEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

// ============================================================================
// Reducer
// ============================================================================

/// Reducer for a venue session
#[derive(Clone, Debug)]
pub struct VenueSessionReducer;

impl VenueSessionReducer {
    /// Creates a new `VenueSessionReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn refuse(state: &mut VenueSessionState, error: String) -> SmallVec<[Effect<SessionAction>; 4]> {
        tracing::warn!(%error, "Session action refused");
        state.last_error = Some(error);
        SmallVec::new()
    }

    fn edit(
        state: &mut VenueSessionState,
        action: EditorAction,
    ) -> SmallVec<[Effect<SessionAction>; 4]> {
        let checks_schedule = action.touches_grid() && !state.schedule.is_empty();
        let mut candidate = state.editor.clone();
        if !EditorReducer::apply(&mut candidate, action) {
            state.editor = candidate;
            state.last_error = None;
            return SmallVec::new();
        }

        if checks_schedule {
            let stranded = state.schedule.stranded_by(candidate.layout());
            if let Some(first) = stranded.first() {
                let error = format!(
                    "Edit would strand {} held seat(s), first at {} in showtime {:?}",
                    stranded.len(),
                    Self::describe(state.layout(), first.pos),
                    first.time
                );
                return Self::refuse(state, error);
            }
        }

        let grid_changed = candidate.layout().grid_differs(state.layout());
        state.editor = candidate;
        state.last_error = None;

        if grid_changed && !state.schedule.is_empty() {
            smallvec![Effect::dispatch(SessionAction::ReconcileShowtimes)]
        } else {
            SmallVec::new()
        }
    }

    /// Seat label if the cell has one, grid position otherwise
    fn describe(layout: &SeatLayout, pos: GridPos) -> String {
        labels::seat_label(layout, pos).map_or_else(|| pos.to_string(), |label| label.to_string())
    }

    fn record_seat_result(
        state: &mut VenueSessionState,
        result: Result<GridPos, SeatplanError>,
    ) -> SmallVec<[Effect<SessionAction>; 4]> {
        match result {
            Ok(_) => {
                state.last_error = None;
                SmallVec::new()
            },
            Err(error) => Self::refuse(state, error.to_string()),
        }
    }
}

impl Default for VenueSessionReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for VenueSessionReducer {
    type State = VenueSessionState;
    type Action = SessionAction;
    type Environment = SessionEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            SessionAction::Editor(action) => Self::edit(state, action),

            SessionAction::SaveSchedule { requests } => {
                let report = state
                    .schedule
                    .save(state.editor.layout(), requests, env.clock.now());
                tracing::debug!(
                    showtimes = state.schedule.len(),
                    created = report.created.len(),
                    dropped = report.dropped.len(),
                    "Schedule saved"
                );
                state.last_report = Some(report);
                state.last_error = None;
                SmallVec::new()
            },

            SessionAction::ReconcileShowtimes => {
                let report = state.schedule.resync(state.editor.layout(), env.clock.now());
                tracing::debug!(
                    preserved = report.preserved.len(),
                    reshaped = report.reshaped.len(),
                    forfeited = report.forfeited.len(),
                    "Showtimes reconciled"
                );
                state.last_report = Some(report);
                SmallVec::new()
            },

            SessionAction::SelectSeat { showtime, label } => {
                let result = state.schedule.select(state.editor.layout(), showtime, &label);
                Self::record_seat_result(state, result)
            },

            SessionAction::ReleaseSeat { showtime, label } => {
                let result = state.schedule.release(state.editor.layout(), showtime, &label);
                Self::record_seat_result(state, result)
            },

            SessionAction::BookSeat { showtime, label } => {
                let result = state.schedule.book(state.editor.layout(), showtime, &label);
                Self::record_seat_result(state, result)
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{FillTarget, SeatKind, SeatSaleStatus};
    use seatplan_testing::{ReducerTest, assertions, test_clock};

    fn create_test_env() -> SessionEnvironment {
        SessionEnvironment::new(Arc::new(test_clock()))
    }

    /// 5x10 session with one "10:00" showtime and seat A1 booked
    fn booked_session() -> (VenueSessionState, ShowtimeId) {
        let mut state = VenueSessionState::new(ScreenId::new(), SeatLayout::new(5, 10));
        let reducer = VenueSessionReducer::new();
        let env = create_test_env();
        reducer.reduce(
            &mut state,
            SessionAction::SaveSchedule { requests: vec![ShowtimeRequest::new("10:00")] },
            &env,
        );
        let id = state.schedule.showtimes()[0].id;
        reducer.reduce(
            &mut state,
            SessionAction::BookSeat { showtime: id, label: "A1".to_string() },
            &env,
        );
        (state, id)
    }

    #[test]
    fn test_save_schedule_creates_showtime() {
        ReducerTest::new(VenueSessionReducer::new())
            .with_env(create_test_env())
            .given_state(VenueSessionState::new(ScreenId::new(), SeatLayout::new(5, 10)))
            .when_action(SessionAction::SaveSchedule {
                requests: vec![ShowtimeRequest::new("10:00")],
            })
            .then_state(|state| {
                assert_eq!(state.schedule.len(), 1);
                let showtime = &state.schedule.showtimes()[0];
                assert_eq!(showtime.created_at, test_clock().now());
                assert_eq!(showtime.seat_status.count(SeatSaleStatus::Available), 50);
                assert_eq!(state.last_report.as_ref().map(|r| r.created.len()), Some(1));
            })
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[test]
    fn test_grid_edit_dispatches_reconcile() {
        let (state, _) = booked_session();
        ReducerTest::new(VenueSessionReducer::new())
            .with_env(create_test_env())
            .given_state(state)
            .when_action(SessionAction::Editor(EditorAction::SetActiveCategory {
                kind: SeatKind::Aisle,
            }))
            .when_action(SessionAction::Editor(EditorAction::BulkFill {
                target: FillTarget::Col(4),
            }))
            .then_state(|state| {
                assert!(state.last_error.is_none());
                assert_eq!(state.editor.history_len(), 1);
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_dispatches(effects, |a| {
                    matches!(a, SessionAction::ReconcileShowtimes)
                });
            })
            .run();
    }

    #[test]
    fn test_numbering_edit_does_not_reconcile() {
        let (state, _) = booked_session();
        ReducerTest::new(VenueSessionReducer::new())
            .with_env(create_test_env())
            .given_state(state)
            .when_action(SessionAction::Editor(EditorAction::SetNumbering {
                axis: crate::types::Axis::Col,
                value: 5,
            }))
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[test]
    fn test_edit_stranding_booked_seat_is_refused() {
        let (state, id) = booked_session();
        let before = state.layout().clone();
        ReducerTest::new(VenueSessionReducer::new())
            .with_env(create_test_env())
            .given_state(state)
            .when_action(SessionAction::Editor(EditorAction::SetActiveCategory {
                kind: SeatKind::Aisle,
            }))
            .when_action(SessionAction::Editor(EditorAction::PaintCell { row: 0, col: 0 }))
            .then_state(move |state| {
                assert_eq!(state.layout(), &before);
                assert_eq!(state.editor.history_len(), 0);
                let error = state.last_error.as_deref().unwrap();
                assert!(error.contains("A1"), "{error}");
                assert_eq!(
                    state.schedule.get(id).unwrap().seat_status.get(GridPos::new(0, 0)),
                    Some(SeatSaleStatus::Booked)
                );
            })
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[test]
    fn test_shrink_past_booked_seat_is_refused() {
        let (mut state, id) = booked_session();
        let reducer = VenueSessionReducer::new();
        let env = create_test_env();
        reducer.reduce(
            &mut state,
            SessionAction::BookSeat { showtime: id, label: "E10".to_string() },
            &env,
        );

        ReducerTest::new(VenueSessionReducer::new())
            .with_env(create_test_env())
            .given_state(state)
            .when_action(SessionAction::Editor(EditorAction::Resize { rows: 4, cols: 10 }))
            .then_state(|state| {
                assert_eq!(state.layout().dimensions(), (5, 10));
                assert!(state.last_error.is_some());
            })
            .run();
    }

    #[test]
    fn test_grow_reconciles_and_keeps_booking() {
        let (mut state, id) = booked_session();
        let reducer = VenueSessionReducer::new();
        let env = create_test_env();

        let effects = reducer.reduce(
            &mut state,
            SessionAction::Editor(EditorAction::Resize { rows: 6, cols: 12 }),
            &env,
        );
        for action in effects.into_iter().flat_map(Effect::into_actions) {
            reducer.reduce(&mut state, action, &env);
        }

        let showtime = state.schedule.get(id).unwrap();
        assert_eq!(showtime.seat_status.dimensions(), (6, 12));
        assert_eq!(showtime.seat_status.get(GridPos::new(0, 0)), Some(SeatSaleStatus::Booked));
        assert_eq!(state.last_report.as_ref().map(|r| r.reshaped.clone()), Some(vec![id]));
    }

    #[test]
    fn test_seat_errors_are_recorded() {
        let (state, id) = booked_session();
        ReducerTest::new(VenueSessionReducer::new())
            .with_env(create_test_env())
            .given_state(state)
            .when_action(SessionAction::SelectSeat { showtime: id, label: "A1".to_string() })
            .then_state(|state| {
                let error = state.last_error.as_deref().unwrap();
                assert!(error.contains("booked"), "{error}");
            })
            .run();

        let (state, _) = booked_session();
        ReducerTest::new(VenueSessionReducer::new())
            .with_env(create_test_env())
            .given_state(state)
            .when_action(SessionAction::BookSeat {
                showtime: ShowtimeId::new(),
                label: "A2".to_string(),
            })
            .then_state(|state| {
                assert!(state.last_error.as_deref().unwrap().contains("Unknown showtime"));
            })
            .run();
    }

    #[test]
    fn test_no_schedule_means_no_reconcile() {
        ReducerTest::new(VenueSessionReducer::new())
            .with_env(create_test_env())
            .given_state(VenueSessionState::new(ScreenId::new(), SeatLayout::new(2, 2)))
            .when_action(SessionAction::Editor(EditorAction::Resize { rows: 3, cols: 3 }))
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }
}
