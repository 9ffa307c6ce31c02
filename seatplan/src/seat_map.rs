//! Per-showtime seat sale status.
//!
//! A [`SeatStatusMap`] has one [`SeatSaleStatus`] per layout cell. It starts
//! out derived from the layout and then changes seat by seat as the booking
//! side selects, releases and books seats, always through the state machine
//! in [`SeatSaleStatus::can_transition_to`].

use crate::error::SeatplanError;
use crate::layout::SeatLayout;
use crate::types::{GridPos, SeatSaleStatus};
use serde::{Deserialize, Serialize};

/// A held seat lost while re-deriving a status map for a new layout
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForfeitedSeat {
    /// Position in the old map
    pub pos: GridPos,
    /// Status the seat had
    pub status: SeatSaleStatus,
}

/// `rows x cols` matrix of sale statuses
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Vec<SeatSaleStatus>>", into = "Vec<Vec<SeatSaleStatus>>")]
pub struct SeatStatusMap {
    cols: usize,
    cells: Vec<Vec<SeatSaleStatus>>,
}

impl SeatStatusMap {
    /// Fresh map for `layout`: structural cells `locked`, bookable cells
    /// `available`
    #[must_use]
    pub fn derive(layout: &SeatLayout) -> Self {
        let cells = layout
            .grid()
            .iter()
            .map(|row| row.iter().map(|kind| SeatSaleStatus::initial_for(*kind)).collect())
            .collect();
        Self {
            cols: layout.cols(),
            cells,
        }
    }

    /// Number of rows
    #[must_use]
    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    /// Number of columns
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows(), self.cols)
    }

    /// Whether the map has the same dimensions as `layout`
    #[must_use]
    pub fn fits(&self, layout: &SeatLayout) -> bool {
        self.dimensions() == layout.dimensions()
    }

    /// Status at `pos`
    #[must_use]
    pub fn get(&self, pos: GridPos) -> Option<SeatSaleStatus> {
        self.cells.get(pos.row)?.get(pos.col).copied()
    }

    /// Rows of statuses
    #[must_use]
    pub fn cells(&self) -> &[Vec<SeatSaleStatus>] {
        &self.cells
    }

    /// Every position with its status, row-major
    pub fn iter(&self) -> impl Iterator<Item = (GridPos, SeatSaleStatus)> + '_ {
        self.cells.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .map(move |(c, status)| (GridPos::new(r, c), *status))
        })
    }

    /// How many cells have `status`
    #[must_use]
    pub fn count(&self, status: SeatSaleStatus) -> usize {
        self.iter().filter(|(_, s)| *s == status).count()
    }

    /// Positions of booked and selected seats
    #[must_use]
    pub fn held(&self) -> Vec<(GridPos, SeatSaleStatus)> {
        self.iter().filter(|(_, s)| s.is_held()).collect()
    }

    /// Moves the seat at `pos` to `to`, returning the previous status
    ///
    /// # Errors
    ///
    /// Returns [`SeatplanError::OutOfBounds`] if `pos` is outside the map and
    /// [`SeatplanError::InvalidTransition`] if the state machine forbids the
    /// change.
    pub fn transition(
        &mut self,
        pos: GridPos,
        to: SeatSaleStatus,
    ) -> Result<SeatSaleStatus, SeatplanError> {
        let (rows, cols) = self.dimensions();
        let cell = self
            .cells
            .get_mut(pos.row)
            .and_then(|row| row.get_mut(pos.col))
            .ok_or(SeatplanError::OutOfBounds { pos, rows, cols })?;

        let from = *cell;
        if !from.can_transition_to(to) {
            return Err(SeatplanError::InvalidTransition { pos, from, to });
        }
        *cell = to;
        Ok(from)
    }

    /// Re-derives this map against `layout`, carrying held seats over
    ///
    /// Every cell takes its fresh status from `layout`, except that a held
    /// seat stays held when its position still exists and is still bookable.
    /// Held seats that land outside `layout` or on a structural cell are
    /// returned as forfeited. Works for maps of any shape.
    #[must_use]
    pub fn carried_onto(&self, layout: &SeatLayout) -> (Self, Vec<ForfeitedSeat>) {
        let mut next = Self::derive(layout);
        let mut forfeited = Vec::new();

        for (pos, status) in self.held() {
            match layout.kind_at(pos) {
                Some(kind) if kind.is_bookable() => next.cells[pos.row][pos.col] = status,
                Some(_) | None => forfeited.push(ForfeitedSeat { pos, status }),
            }
        }

        (next, forfeited)
    }

    /// Held seats `carried_onto(layout)` would forfeit, without building the map
    #[must_use]
    pub fn stranded_by(&self, layout: &SeatLayout) -> Vec<ForfeitedSeat> {
        self.held()
            .into_iter()
            .filter(|(pos, _)| !layout.kind_at(*pos).is_some_and(|kind| kind.is_bookable()))
            .map(|(pos, status)| ForfeitedSeat { pos, status })
            .collect()
    }
}

impl From<Vec<Vec<SeatSaleStatus>>> for SeatStatusMap {
    /// Ragged input is squared off with `locked` cells, which never sell
    fn from(mut cells: Vec<Vec<SeatSaleStatus>>) -> Self {
        let cols = cells.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut cells {
            row.resize(cols, SeatSaleStatus::Locked);
        }
        Self { cols, cells }
    }
}

impl From<SeatStatusMap> for Vec<Vec<SeatSaleStatus>> {
    fn from(map: SeatStatusMap) -> Self {
        map.cells
    }
}
