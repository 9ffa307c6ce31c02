//! Seat plan designer - venue seating layouts and per-showtime seat availability
//!
//! An operator draws a rectangular seating grid, gives each cell a seat
//! category, and schedules showtimes on it. Every showtime owns a seat status
//! map derived from the layout, which the booking side then sells against.
//!
//! - **Layout model**: immutable [`SeatLayout`] values over a closed set of
//!   nine [`SeatKind`]s, four bookable and five structural
//! - **Editor**: paint, drag strokes, row/column fills, resize, numbering and
//!   category edits, with a 20-step undo history
//! - **Seat labels**: row letter plus seat number (`C12`), skipping
//!   structural cells
//! - **Reconciliation**: re-saving a schedule after the layout changed keeps
//!   booked and selected seats, and reports any it could not keep
//!
//! # Architecture
//!
//! ```text
//!   SessionAction ──▶ Store::send ──▶ VenueSessionReducer
//!                          ▲              │        │
//!                          │         EditorReducer  Schedule ──▶ reconcile()
//!                          │              │
//!                          └── Dispatch(ReconcileShowtimes) when the grid changed
//! ```
//!
//! # Usage
//!
//! See the [aggregates] module for reducer implementations and tests, and
//! `src/bin/demo.rs` for a scripted session.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod aggregates;
pub mod categories;
pub mod chart;
pub mod config;
pub mod error;
pub mod labels;
pub mod layout;
pub mod reconcile;
pub mod schedule;
pub mod seat_map;
pub mod snapshot;
pub mod types;

pub use aggregates::{
    EditorAction, EditorReducer, EditorState, SessionAction, SessionEnvironment,
    VenueSessionReducer, VenueSessionState,
};
pub use categories::{CategoryRegistry, SeatCategory};
pub use chart::SeatChart;
pub use config::Config;
pub use error::SeatplanError;
pub use labels::SeatLabel;
pub use layout::SeatLayout;
pub use reconcile::{ReconcileReport, Showtime, ShowtimeRequest};
pub use schedule::Schedule;
pub use seat_map::SeatStatusMap;
pub use types::*;
