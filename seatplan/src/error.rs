//! Error types for the fallible boundaries of the designer.
//!
//! Reducers never return these: editor and schedule actions that cannot be
//! applied are recorded in the state's `last_error` instead. These errors come
//! from the edges where callers hand the designer raw data: seat labels typed
//! by a person, snapshots read back from storage, and the booking subsystem
//! asking for a status change.

use crate::types::{GridPos, SeatSaleStatus, ShowtimeId};
use thiserror::Error;

/// Errors that can occur at the designer's boundaries
#[derive(Error, Debug)]
pub enum SeatplanError {
    /// A seat kind identifier outside the nine known kinds
    #[error("Unknown seat kind: {0:?}")]
    UnknownSeatKind(String),

    /// Text that is not a seat label such as `C12`
    #[error("Invalid seat label: {0:?}")]
    InvalidLabel(String),

    /// A well-formed label that names no seat in the layout
    #[error("Seat {0} does not exist in this layout")]
    SeatNotFound(String),

    /// No showtime with this identifier in the schedule
    #[error("Unknown showtime: {0}")]
    UnknownShowtime(ShowtimeId),

    /// A position outside the seat-status map
    #[error("Position {pos} is outside a {rows}x{cols} seat map")]
    OutOfBounds {
        /// Requested position
        pos: GridPos,
        /// Map rows
        rows: usize,
        /// Map columns
        cols: usize,
    },

    /// A status change the seat state machine does not allow
    #[error("Seat {pos} cannot move from {from} to {to}")]
    InvalidTransition {
        /// Seat position
        pos: GridPos,
        /// Current status
        from: SeatSaleStatus,
        /// Requested status
        to: SeatSaleStatus,
    },

    /// Snapshot (de)serialization failed
    #[error("Snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result alias for designer boundary operations
pub type Result<T> = std::result::Result<T, SeatplanError>;
