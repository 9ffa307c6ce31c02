//! Showtime reconciliation.
//!
//! Saving a schedule hands the reconciler the current layout, the requested
//! slots and the showtimes already stored for the screen. It returns the new
//! set of showtimes plus a report of what happened to each one:
//!
//! 1. Requests carrying a stable id first claim the stored records with those
//!    ids. Remaining requests then match a remaining record whose time
//!    string is exactly equal.
//! 2. A matched record keeps its id, creation time and held seats. Its map is
//!    re-derived against the layout (see [`SeatStatusMap::carried_onto`]);
//!    held seats that no longer fit are forfeited and reported.
//! 3. An unmatched request gets a fresh map and a new id.
//! 4. Stored records nobody asked for are dropped and reported.
//!
//! Requests sharing a time string collapse to the last one.

use crate::layout::SeatLayout;
use crate::seat_map::{ForfeitedSeat, SeatStatusMap};
use crate::types::{GridPos, ScreenId, SeatSaleStatus, ShowtimeId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Showtimes
// ============================================================================

/// One scheduled performance and its seat sales
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Showtime {
    /// Stable identifier
    pub id: ShowtimeId,
    /// Screen or tour stop the showtime belongs to
    pub screen: ScreenId,
    /// Display time, e.g. `"10:00"`
    pub time: String,
    /// Sale status of every layout cell
    pub seat_status: SeatStatusMap,
    /// When the showtime was first created
    pub created_at: DateTime<Utc>,
    /// When the seat map was last reconciled against the layout
    pub reconciled_at: DateTime<Utc>,
}

impl Showtime {
    /// Creates a showtime with a fresh seat map for `layout`
    #[must_use]
    pub fn new(
        screen: ScreenId,
        time: impl Into<String>,
        layout: &SeatLayout,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ShowtimeId::new(),
            screen,
            time: time.into(),
            seat_status: SeatStatusMap::derive(layout),
            created_at: now,
            reconciled_at: now,
        }
    }

    /// Slot key `(screen, time)`
    #[must_use]
    pub fn slot_key(&self) -> (ScreenId, &str) {
        (self.screen, &self.time)
    }
}

/// A slot the operator wants in the schedule
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowtimeRequest {
    /// Stable id of the showtime this request continues, if any
    #[serde(default)]
    pub id: Option<ShowtimeId>,
    /// Display time
    pub time: String,
}

impl ShowtimeRequest {
    /// A request matched by time string only
    #[must_use]
    pub fn new(time: impl Into<String>) -> Self {
        Self {
            id: None,
            time: time.into(),
        }
    }

    /// A request that continues showtime `id`, possibly under a new time
    #[must_use]
    pub fn existing(id: ShowtimeId, time: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            time: time.into(),
        }
    }
}

impl From<&Showtime> for ShowtimeRequest {
    fn from(showtime: &Showtime) -> Self {
        Self::existing(showtime.id, showtime.time.clone())
    }
}

// ============================================================================
// Report
// ============================================================================

/// A held seat a showtime lost during reconciliation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowtimeForfeit {
    /// Showtime that lost the seat
    pub showtime: ShowtimeId,
    /// Its display time
    pub time: String,
    /// Position in the old seat map
    pub pos: GridPos,
    /// Status the seat had
    pub status: SeatSaleStatus,
}

/// What reconciliation did
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
    /// Showtimes created with a fresh map
    pub created: Vec<ShowtimeId>,
    /// Matched showtimes whose map kept its shape
    pub preserved: Vec<ShowtimeId>,
    /// Matched showtimes whose map was re-derived to a new shape
    pub reshaped: Vec<ShowtimeId>,
    /// Stored showtimes no request asked for, or replaced by a later request
    pub dropped: Vec<Showtime>,
    /// Held seats that did not survive
    pub forfeited: Vec<ShowtimeForfeit>,
    /// Time strings requested more than once (the last request won)
    pub collisions: Vec<String>,
}

impl ReconcileReport {
    /// Whether any sale data was lost
    #[must_use]
    pub fn lost_sales(&self) -> bool {
        !self.forfeited.is_empty()
            || self
                .dropped
                .iter()
                .any(|showtime| !showtime.seat_status.held().is_empty())
    }
}

/// Reconciled showtimes plus the report
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Showtimes in request order
    pub showtimes: Vec<Showtime>,
    /// What happened
    pub report: ReconcileReport,
}

// ============================================================================
// Reconciliation
// ============================================================================

/// Reconciles stored showtimes of `screen` against `layout` and `requests`
///
/// Records in `existing` that belong to another screen are ignored.
#[tracing::instrument(skip_all, fields(screen = %screen, requests = requests.len()))]
pub fn reconcile(
    layout: &SeatLayout,
    screen: ScreenId,
    requests: Vec<ShowtimeRequest>,
    existing: Vec<Showtime>,
    now: DateTime<Utc>,
) -> ReconcileOutcome {
    let mut report = ReconcileReport::default();
    let requests = collapse_collisions(requests, &mut report.collisions);

    let mut pool: Vec<Option<Showtime>> = existing
        .into_iter()
        .filter(|showtime| showtime.screen == screen)
        .map(Some)
        .collect();

    // Stable ids claim their records before any request falls back to time
    let mut matches: Vec<Option<Showtime>> = requests
        .iter()
        .map(|request| {
            request
                .id
                .and_then(|id| take_matching(&mut pool, |s| s.id == id))
        })
        .collect();
    for (request, matched) in requests.iter().zip(matches.iter_mut()) {
        if matched.is_none() {
            *matched = take_matching(&mut pool, |s| s.time == request.time);
        }
    }

    let mut showtimes = Vec::with_capacity(requests.len());
    for (request, matched) in requests.into_iter().zip(matches) {
        let showtime = match matched {
            Some(record) => carry_record(record, layout, request.time, now, &mut report),
            None => {
                let showtime = Showtime::new(screen, request.time, layout, now);
                tracing::debug!(id = %showtime.id, time = %showtime.time, "Showtime created");
                report.created.push(showtime.id);
                showtime
            },
        };
        showtimes.push(showtime);
    }

    for record in pool.into_iter().flatten() {
        let held = record.seat_status.held().len();
        if held > 0 {
            tracing::warn!(id = %record.id, time = %record.time, held, "Dropping showtime with held seats");
        } else {
            tracing::debug!(id = %record.id, time = %record.time, "Showtime dropped");
        }
        report.dropped.push(record);
    }

    ReconcileOutcome { showtimes, report }
}

/// Keeps one request per time string, the last one, at the first one's place
fn collapse_collisions(
    requests: Vec<ShowtimeRequest>,
    collisions: &mut Vec<String>,
) -> Vec<ShowtimeRequest> {
    let mut kept: Vec<ShowtimeRequest> = Vec::with_capacity(requests.len());
    for request in requests {
        if let Some(slot) = kept.iter_mut().find(|r| r.time == request.time) {
            if !collisions.contains(&request.time) {
                collisions.push(request.time.clone());
            }
            *slot = request;
        } else {
            kept.push(request);
        }
    }
    kept
}

fn take_matching(
    pool: &mut [Option<Showtime>],
    predicate: impl Fn(&Showtime) -> bool,
) -> Option<Showtime> {
    pool.iter_mut()
        .find(|slot| slot.as_ref().is_some_and(&predicate))?
        .take()
}

fn carry_record(
    mut record: Showtime,
    layout: &SeatLayout,
    time: String,
    now: DateTime<Utc>,
    report: &mut ReconcileReport,
) -> Showtime {
    let same_shape = record.seat_status.fits(layout);
    let (seat_status, forfeited) = record.seat_status.carried_onto(layout);

    if same_shape {
        report.preserved.push(record.id);
    } else {
        tracing::debug!(
            id = %record.id,
            from = ?record.seat_status.dimensions(),
            to = ?layout.dimensions(),
            "Seat map reshaped"
        );
        report.reshaped.push(record.id);
    }

    for ForfeitedSeat { pos, status } in forfeited {
        tracing::warn!(id = %record.id, time = %record.time, %pos, %status, "Held seat forfeited");
        report.forfeited.push(ShowtimeForfeit {
            showtime: record.id,
            time: time.clone(),
            pos,
            status,
        });
    }

    record.seat_status = seat_status;
    record.time = time;
    record.reconciled_at = now;
    record
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{FillTarget, SeatKind};
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH + Duration::days(20_089)
    }

    fn save(
        layout: &SeatLayout,
        screen: ScreenId,
        times: &[&str],
        existing: Vec<Showtime>,
    ) -> ReconcileOutcome {
        let requests = times.iter().map(|t| ShowtimeRequest::new(*t)).collect();
        reconcile(layout, screen, requests, existing, now())
    }

    #[test]
    fn test_new_slot_gets_fresh_map() {
        let layout = SeatLayout::new(5, 10);
        let outcome = save(&layout, ScreenId::new(), &["10:00"], Vec::new());
        assert_eq!(outcome.showtimes.len(), 1);
        assert_eq!(outcome.report.created, vec![outcome.showtimes[0].id]);
        let map = &outcome.showtimes[0].seat_status;
        assert_eq!(map.dimensions(), (5, 10));
        assert_eq!(map.count(SeatSaleStatus::Available), 50);
    }

    #[test]
    fn test_resave_preserves_booking() {
        let layout = SeatLayout::new(5, 10);
        let screen = ScreenId::new();
        let mut first = save(&layout, screen, &["10:00"], Vec::new()).showtimes;
        first[0]
            .seat_status
            .transition(GridPos::new(0, 0), SeatSaleStatus::Booked)
            .unwrap();
        let before = first[0].clone();

        let second = save(&layout, screen, &["10:00"], first);
        let after = &second.showtimes[0];
        assert_eq!(after.id, before.id);
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(after.seat_status, before.seat_status);
        assert_eq!(second.report.preserved, vec![before.id]);
        assert!(second.report.forfeited.is_empty());
    }

    #[test]
    fn test_same_shape_rederives_unheld_cells() {
        let layout = SeatLayout::new(2, 3);
        let screen = ScreenId::new();
        let mut stored = save(&layout, screen, &["10:00"], Vec::new()).showtimes;
        stored[0]
            .seat_status
            .transition(GridPos::new(0, 0), SeatSaleStatus::Booked)
            .unwrap();

        let edited = layout.with_fill(FillTarget::Col(2), SeatKind::Aisle).unwrap();
        let outcome = save(&edited, screen, &["10:00"], stored);
        let map = &outcome.showtimes[0].seat_status;
        assert_eq!(map.get(GridPos::new(0, 0)), Some(SeatSaleStatus::Booked));
        assert_eq!(map.get(GridPos::new(1, 2)), Some(SeatSaleStatus::Locked));
        assert_eq!(map.get(GridPos::new(1, 1)), Some(SeatSaleStatus::Available));
    }

    #[test]
    fn test_id_match_wins_over_earlier_time_match() {
        let layout = SeatLayout::new(3, 3);
        let screen = ScreenId::new();
        let mut stored = save(&layout, screen, &["10:00"], Vec::new()).showtimes;
        stored[0]
            .seat_status
            .transition(GridPos::new(0, 0), SeatSaleStatus::Booked)
            .unwrap();
        let id = stored[0].id;

        let outcome = reconcile(
            &layout,
            screen,
            vec![
                ShowtimeRequest::new("10:00"),
                ShowtimeRequest::existing(id, "11:00"),
            ],
            stored,
            now(),
        );

        assert_eq!(outcome.showtimes.len(), 2);
        let (fresh, moved) = (&outcome.showtimes[0], &outcome.showtimes[1]);
        assert_eq!(fresh.time, "10:00");
        assert_ne!(fresh.id, id);
        assert_eq!(fresh.seat_status.get(GridPos::new(0, 0)), Some(SeatSaleStatus::Available));
        assert_eq!(moved.time, "11:00");
        assert_eq!(moved.id, id);
        assert_eq!(moved.seat_status.get(GridPos::new(0, 0)), Some(SeatSaleStatus::Booked));
        assert_eq!(outcome.report.created, vec![fresh.id]);
        assert_eq!(outcome.report.preserved, vec![id]);
    }

    #[test]
    fn test_stable_id_survives_time_rename() {
        let layout = SeatLayout::new(3, 3);
        let screen = ScreenId::new();
        let mut stored = save(&layout, screen, &["10:00"], Vec::new()).showtimes;
        stored[0]
            .seat_status
            .transition(GridPos::new(1, 1), SeatSaleStatus::Booked)
            .unwrap();
        let id = stored[0].id;

        let outcome = reconcile(
            &layout,
            screen,
            vec![ShowtimeRequest::existing(id, "10:00 AM")],
            stored,
            now(),
        );
        assert_eq!(outcome.showtimes[0].id, id);
        assert_eq!(outcome.showtimes[0].time, "10:00 AM");
        assert_eq!(
            outcome.showtimes[0].seat_status.get(GridPos::new(1, 1)),
            Some(SeatSaleStatus::Booked)
        );
        assert!(outcome.report.dropped.is_empty());
    }

    #[test]
    fn test_shrink_reports_forfeits() {
        let layout = SeatLayout::new(4, 4);
        let screen = ScreenId::new();
        let mut stored = save(&layout, screen, &["20:00"], Vec::new()).showtimes;
        stored[0]
            .seat_status
            .transition(GridPos::new(3, 3), SeatSaleStatus::Booked)
            .unwrap();
        stored[0]
            .seat_status
            .transition(GridPos::new(0, 0), SeatSaleStatus::Selected)
            .unwrap();

        let smaller = layout.resized(2, 2);
        let outcome = save(&smaller, screen, &["20:00"], stored);
        let showtime = &outcome.showtimes[0];
        assert_eq!(showtime.seat_status.dimensions(), (2, 2));
        assert_eq!(
            showtime.seat_status.get(GridPos::new(0, 0)),
            Some(SeatSaleStatus::Selected)
        );
        assert_eq!(outcome.report.reshaped, vec![showtime.id]);
        assert_eq!(outcome.report.forfeited.len(), 1);
        assert_eq!(outcome.report.forfeited[0].pos, GridPos::new(3, 3));
        assert!(outcome.report.lost_sales());
    }

    #[test]
    fn test_unrequested_slots_are_dropped() {
        let layout = SeatLayout::new(2, 2);
        let screen = ScreenId::new();
        let stored = save(&layout, screen, &["10:00", "14:00"], Vec::new()).showtimes;
        let outcome = save(&layout, screen, &["14:00"], stored);
        assert_eq!(outcome.showtimes.len(), 1);
        assert_eq!(outcome.report.dropped.len(), 1);
        assert_eq!(outcome.report.dropped[0].time, "10:00");
        assert!(!outcome.report.lost_sales());
    }

    #[test]
    fn test_colliding_requests_last_wins() {
        let layout = SeatLayout::new(2, 2);
        let screen = ScreenId::new();
        let stored = save(&layout, screen, &["10:00"], Vec::new()).showtimes;
        let id = stored[0].id;
        let outcome = save(&layout, screen, &["10:00", "12:00", "10:00"], stored);
        assert_eq!(outcome.showtimes.len(), 2);
        assert_eq!(outcome.showtimes[0].id, id);
        assert_eq!(outcome.report.collisions, vec!["10:00".to_string()]);
    }

    #[test]
    fn test_other_screens_are_ignored() {
        let layout = SeatLayout::new(2, 2);
        let other = save(&layout, ScreenId::new(), &["10:00"], Vec::new()).showtimes;
        let outcome = save(&layout, ScreenId::new(), &["10:00"], other);
        assert_eq!(outcome.report.created.len(), 1);
        assert!(outcome.report.dropped.is_empty());
    }
}
