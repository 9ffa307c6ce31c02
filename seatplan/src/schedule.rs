//! The showtimes of one screen and the booking operations on them.

use crate::error::{Result, SeatplanError};
use crate::labels;
use crate::layout::SeatLayout;
use crate::reconcile::{self, ReconcileOutcome, Showtime, ShowtimeForfeit, ShowtimeRequest};
use crate::types::{GridPos, ScreenId, SeatSaleStatus, ShowtimeId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// All showtimes scheduled on one screen or tour stop
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    screen: ScreenId,
    showtimes: Vec<Showtime>,
}

impl Schedule {
    /// Creates an empty schedule
    #[must_use]
    pub const fn new(screen: ScreenId) -> Self {
        Self {
            screen,
            showtimes: Vec::new(),
        }
    }

    /// Screen the schedule belongs to
    #[must_use]
    pub const fn screen(&self) -> ScreenId {
        self.screen
    }

    /// Showtimes in schedule order
    #[must_use]
    pub fn showtimes(&self) -> &[Showtime] {
        &self.showtimes
    }

    /// Number of showtimes
    #[must_use]
    pub fn len(&self) -> usize {
        self.showtimes.len()
    }

    /// Whether nothing is scheduled
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.showtimes.is_empty()
    }

    /// Showtime by id
    #[must_use]
    pub fn get(&self, id: ShowtimeId) -> Option<&Showtime> {
        self.showtimes.iter().find(|s| s.id == id)
    }

    /// Showtime by exact time string
    #[must_use]
    pub fn find_by_time(&self, time: &str) -> Option<&Showtime> {
        self.showtimes.iter().find(|s| s.time == time)
    }

    fn get_mut(&mut self, id: ShowtimeId) -> Result<&mut Showtime> {
        self.showtimes
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(SeatplanError::UnknownShowtime(id))
    }

    /// Replaces the schedule with the reconciled set for `requests`
    pub fn save(
        &mut self,
        layout: &SeatLayout,
        requests: Vec<ShowtimeRequest>,
        now: DateTime<Utc>,
    ) -> reconcile::ReconcileReport {
        let existing = std::mem::take(&mut self.showtimes);
        let ReconcileOutcome { showtimes, report } =
            reconcile::reconcile(layout, self.screen, requests, existing, now);
        self.showtimes = showtimes;
        report
    }

    /// Re-reconciles every showtime against `layout`, keeping all of them
    pub fn resync(&mut self, layout: &SeatLayout, now: DateTime<Utc>) -> reconcile::ReconcileReport {
        let requests = self.showtimes.iter().map(ShowtimeRequest::from).collect();
        self.save(layout, requests, now)
    }

    /// Held seats that moving to `layout` would forfeit, across all showtimes
    #[must_use]
    pub fn stranded_by(&self, layout: &SeatLayout) -> Vec<ShowtimeForfeit> {
        self.showtimes
            .iter()
            .flat_map(|showtime| {
                showtime
                    .seat_status
                    .stranded_by(layout)
                    .into_iter()
                    .map(|seat| ShowtimeForfeit {
                        showtime: showtime.id,
                        time: showtime.time.clone(),
                        pos: seat.pos,
                        status: seat.status,
                    })
            })
            .collect()
    }

    /// Whether every seat map has the dimensions of `layout`
    #[must_use]
    pub fn fits(&self, layout: &SeatLayout) -> bool {
        self.showtimes.iter().all(|s| s.seat_status.fits(layout))
    }

    // ========================================================================
    // Booking boundary
    // ========================================================================

    /// Status of the seat named `label` in showtime `id`
    ///
    /// # Errors
    ///
    /// Returns an error if the showtime is unknown or the label names no seat.
    pub fn status_of(&self, layout: &SeatLayout, id: ShowtimeId, label: &str) -> Result<SeatSaleStatus> {
        let showtime = self.get(id).ok_or(SeatplanError::UnknownShowtime(id))?;
        let pos = labels::resolve(layout, label)?;
        let (rows, cols) = showtime.seat_status.dimensions();
        showtime
            .seat_status
            .get(pos)
            .ok_or(SeatplanError::OutOfBounds { pos, rows, cols })
    }

    /// Marks a seat as being chosen (`available -> selected`)
    ///
    /// # Errors
    ///
    /// Returns an error if the showtime is unknown, the label names no seat,
    /// or the seat is not available.
    pub fn select(&mut self, layout: &SeatLayout, id: ShowtimeId, label: &str) -> Result<GridPos> {
        self.move_seat(layout, id, label, SeatSaleStatus::Selected)
    }

    /// Gives a chosen seat back (`selected -> available`)
    ///
    /// # Errors
    ///
    /// Returns an error if the showtime is unknown, the label names no seat,
    /// or the seat is not selected.
    pub fn release(&mut self, layout: &SeatLayout, id: ShowtimeId, label: &str) -> Result<GridPos> {
        self.move_seat(layout, id, label, SeatSaleStatus::Available)
    }

    /// Sells a seat (`available | selected -> booked`)
    ///
    /// # Errors
    ///
    /// Returns an error if the showtime is unknown, the label names no seat,
    /// or the seat is already booked.
    pub fn book(&mut self, layout: &SeatLayout, id: ShowtimeId, label: &str) -> Result<GridPos> {
        self.move_seat(layout, id, label, SeatSaleStatus::Booked)
    }

    fn move_seat(
        &mut self,
        layout: &SeatLayout,
        id: ShowtimeId,
        label: &str,
        to: SeatSaleStatus,
    ) -> Result<GridPos> {
        let showtime = self.get_mut(id)?;
        let pos = labels::resolve(layout, label)?;
        let from = showtime.seat_status.transition(pos, to)?;
        tracing::debug!(showtime = %id, seat = label, %from, %to, "Seat status changed");
        Ok(pos)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::SeatKind;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH + Duration::days(20_089)
    }

    fn scheduled(layout: &SeatLayout) -> (Schedule, ShowtimeId) {
        let mut schedule = Schedule::new(ScreenId::new());
        schedule.save(layout, vec![ShowtimeRequest::new("10:00")], now());
        let id = schedule.showtimes()[0].id;
        (schedule, id)
    }

    #[test]
    fn test_select_release_book_by_label() {
        let layout = SeatLayout::new(3, 5);
        let (mut schedule, id) = scheduled(&layout);

        assert_eq!(schedule.select(&layout, id, "B2").unwrap(), GridPos::new(1, 1));
        assert_eq!(schedule.status_of(&layout, id, "B2").unwrap(), SeatSaleStatus::Selected);
        schedule.release(&layout, id, "B2").unwrap();
        schedule.book(&layout, id, "B2").unwrap();
        assert_eq!(schedule.status_of(&layout, id, "B2").unwrap(), SeatSaleStatus::Booked);

        assert!(matches!(
            schedule.release(&layout, id, "B2"),
            Err(SeatplanError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_booking_errors() {
        let layout = SeatLayout::new(1, 3)
            .with_cell(GridPos::new(0, 0), SeatKind::Aisle)
            .unwrap();
        let (mut schedule, id) = scheduled(&layout);

        assert!(matches!(
            schedule.book(&layout, ShowtimeId::new(), "A1"),
            Err(SeatplanError::UnknownShowtime(_))
        ));
        assert!(matches!(
            schedule.book(&layout, id, "A3"),
            Err(SeatplanError::SeatNotFound(_))
        ));
        assert!(matches!(
            schedule.book(&layout, id, "3A"),
            Err(SeatplanError::InvalidLabel(_))
        ));
        // A1 is the first bookable cell, column 1
        assert_eq!(schedule.book(&layout, id, "A1").unwrap(), GridPos::new(0, 1));
    }

    #[test]
    fn test_resync_keeps_every_showtime() {
        let layout = SeatLayout::new(2, 2);
        let mut schedule = Schedule::new(ScreenId::new());
        schedule.save(
            &layout,
            vec![ShowtimeRequest::new("10:00"), ShowtimeRequest::new("14:00")],
            now(),
        );
        let ids: Vec<ShowtimeId> = schedule.showtimes().iter().map(|s| s.id).collect();

        let bigger = layout.resized(3, 3);
        assert!(!schedule.fits(&bigger));
        let report = schedule.resync(&bigger, now());
        assert_eq!(report.reshaped, ids);
        assert!(schedule.fits(&bigger));
    }

    #[test]
    fn test_stranded_by_lists_held_seats_under_structure() {
        let layout = SeatLayout::new(2, 2);
        let (mut schedule, id) = scheduled(&layout);
        schedule.book(&layout, id, "A2").unwrap();

        let aisle = layout.with_cell(GridPos::new(0, 1), SeatKind::Aisle).unwrap();
        let stranded = schedule.stranded_by(&aisle);
        assert_eq!(stranded.len(), 1);
        assert_eq!(stranded[0].pos, GridPos::new(0, 1));
        assert!(schedule.stranded_by(&layout).is_empty());
    }
}
