//! Domain types for the seat plan designer.
//!
//! Identifiers, money, the closed seat-kind vocabulary, seat sale statuses and
//! grid coordinates. Larger structures live in their own modules:
//! [`crate::categories`], [`crate::layout`], [`crate::seat_map`].

use crate::error::SeatplanError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Grid bounds
// ============================================================================

/// Fewest rows a layout may have
pub const MIN_ROWS: usize = 1;

/// Most rows a layout may have (one letter per row, `A` to `Z`)
pub const MAX_ROWS: usize = 26;

/// Fewest columns a layout may have
pub const MIN_COLS: usize = 1;

/// Most columns a layout may have
pub const MAX_COLS: usize = 40;

/// Default offset added to the row index before picking the row letter
pub const DEFAULT_ROW_START_INDEX: usize = 0;

/// Default number given to the first bookable seat of each row
pub const DEFAULT_COL_START_INDEX: u32 = 1;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a screen or tour stop (the owner of one layout)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScreenId(Uuid);

impl ScreenId {
    /// Creates a new random `ScreenId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `ScreenId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ScreenId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable identifier for a showtime
///
/// Survives edits to the showtime's displayed time, so renaming "10:00" to
/// "10:00 AM" keeps the seats already sold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShowtimeId(Uuid);

impl ShowtimeId {
    /// Creates a new random `ShowtimeId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `ShowtimeId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ShowtimeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ShowtimeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Money Value Object (cents-based to avoid floating point errors)
// ============================================================================

/// Represents money in cents to avoid floating-point arithmetic errors
///
/// Unsigned, so a negative seat price cannot be expressed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(u64);

impl Money {
    /// Zero
    pub const ZERO: Self = Self(0);

    /// Creates a `Money` value from cents
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Returns the amount in cents
    #[must_use]
    pub const fn cents(&self) -> u64 {
        self.0
    }

    /// Returns the amount in whole units (rounded down)
    #[must_use]
    pub const fn whole(&self) -> u64 {
        self.0 / 100
    }

    /// Checks if the amount is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.whole(), self.0 % 100)
    }
}

// ============================================================================
// Seat kinds
// ============================================================================

/// The closed vocabulary of grid cell kinds
///
/// Four bookable kinds and five structural ones. Structural cells never get
/// a seat label and are `locked` in every showtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeatKind {
    /// Ordinary seat
    Standard,
    /// Premium seat
    Premium,
    /// Recliner
    Recliner,
    /// Wheelchair space
    Wheelchair,
    /// Walkway between seats
    Aisle,
    /// Gap with nothing in it
    Empty,
    /// Stage marker, left side
    StageLeft,
    /// Stage marker, right side
    StageRight,
    /// Access ramp
    Ramp,
}

impl SeatKind {
    /// Every kind, in registry order
    pub const ALL: [Self; 9] = [
        Self::Standard,
        Self::Premium,
        Self::Recliner,
        Self::Wheelchair,
        Self::Aisle,
        Self::Empty,
        Self::StageLeft,
        Self::StageRight,
        Self::Ramp,
    ];

    /// Whether a ticket can be sold for a cell of this kind
    #[must_use]
    pub const fn is_bookable(self) -> bool {
        match self {
            Self::Standard | Self::Premium | Self::Recliner | Self::Wheelchair => true,
            Self::Aisle | Self::Empty | Self::StageLeft | Self::StageRight | Self::Ramp => false,
        }
    }

    /// Whether this kind is a non-bookable structural marker
    #[must_use]
    pub const fn is_structural(self) -> bool {
        !self.is_bookable()
    }

    /// The wire identifier (`"stage-left"`, `"standard"`, ...)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Premium => "premium",
            Self::Recliner => "recliner",
            Self::Wheelchair => "wheelchair",
            Self::Aisle => "aisle",
            Self::Empty => "empty",
            Self::StageLeft => "stage-left",
            Self::StageRight => "stage-right",
            Self::Ramp => "ramp",
        }
    }
}

impl fmt::Display for SeatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeatKind {
    type Err = SeatplanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| SeatplanError::UnknownSeatKind(s.to_string()))
    }
}

// ============================================================================
// Seat sale status
// ============================================================================

/// Sale status of one grid cell in one showtime
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatSaleStatus {
    /// Free to select
    Available,
    /// Sold (terminal)
    Booked,
    /// Structural cell, never sellable (terminal)
    Locked,
    /// Being chosen by a customer
    Selected,
}

impl SeatSaleStatus {
    /// The status a fresh showtime gives a cell of `kind`
    #[must_use]
    pub const fn initial_for(kind: SeatKind) -> Self {
        if kind.is_bookable() {
            Self::Available
        } else {
            Self::Locked
        }
    }

    /// Whether the seat is sold or being chosen
    ///
    /// Held seats are never reset by reconciliation.
    #[must_use]
    pub const fn is_held(self) -> bool {
        match self {
            Self::Booked | Self::Selected => true,
            Self::Available | Self::Locked => false,
        }
    }

    /// Whether the seat state machine allows moving from `self` to `next`
    ///
    /// `available ⇄ selected`, `available | selected → booked`. `booked` and
    /// `locked` are terminal.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Available, Self::Selected | Self::Booked)
                | (Self::Selected, Self::Available | Self::Booked)
        )
    }

    /// Lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Booked => "booked",
            Self::Locked => "locked",
            Self::Selected => "selected",
        }
    }
}

impl fmt::Display for SeatSaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Grid coordinates
// ============================================================================

/// Zero-based `(row, col)` position in a layout grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridPos {
    /// Row index
    pub row: usize,
    /// Column index
    pub col: usize,
}

impl GridPos {
    /// Creates a new `GridPos`
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One of the two grid dimensions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Rows
    Row,
    /// Columns
    Col,
}

/// A whole row or column of the grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "index", rename_all = "lowercase")]
pub enum FillTarget {
    /// Row by index
    Row(usize),
    /// Column by index
    Col(usize),
}
