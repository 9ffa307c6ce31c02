//! JSON snapshots of layouts and schedules.
//!
//! Saving writes the plain data. Loading is tolerant: an inconsistent
//! snapshot is repaired into a valid layout and every repair is returned, so
//! the caller can show what changed instead of refusing the file.
//!
//! Repairs made on load:
//! - unknown cell kinds become `empty`
//! - declared dimensions are clamped; the grid is padded with `standard` or
//!   truncated to them
//! - categories with unknown ids are ignored; missing ones take defaults
//! - the row offset is clamped so every row has a letter
//! - seat maps that no longer fit the layout are reconciled against it

use crate::categories::{CategoryRegistry, SeatCategory};
use crate::error::Result;
use crate::layout::{SeatLayout, clamp_cols, clamp_rows, max_row_start_index};
use crate::reconcile::ShowtimeForfeit;
use crate::schedule::Schedule;
use crate::types::{DEFAULT_COL_START_INDEX, DEFAULT_ROW_START_INDEX, GridPos, Money, SeatKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Stored shapes
// ============================================================================

/// Layout as stored, before validation
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    /// Declared rows (defaults to the grid's row count)
    #[serde(default)]
    pub rows: Option<usize>,
    /// Declared columns (defaults to the longest grid row)
    #[serde(default)]
    pub cols: Option<usize>,
    /// Kind identifiers, row-major
    #[serde(default)]
    pub grid: Vec<Vec<String>>,
    /// Category entries
    #[serde(default)]
    pub categories: Vec<CategorySnapshot>,
    /// Row letter offset
    #[serde(default)]
    pub row_start_index: Option<usize>,
    /// First seat number
    #[serde(default)]
    pub col_start_index: Option<u32>,
}

/// Category entry as stored; absent fields take the kind's default
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySnapshot {
    /// Kind identifier
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Price in cents
    #[serde(default)]
    pub price: Option<Money>,
    /// Color
    #[serde(default)]
    pub color: Option<String>,
}

/// Layout plus schedule, the unit saved for one screen
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueSnapshot {
    /// Seat layout
    pub layout: SeatLayout,
    /// Showtimes
    pub schedule: Schedule,
}

#[derive(Deserialize)]
struct StoredVenue {
    layout: LayoutSnapshot,
    schedule: Schedule,
}

// ============================================================================
// Repairs
// ============================================================================

/// One fix applied while loading a snapshot
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "repair", rename_all = "snake_case")]
pub enum Repair {
    /// Declared dimensions were out of range
    DimensionsClamped {
        /// As stored
        declared: (usize, usize),
        /// As loaded
        loaded: (usize, usize),
    },
    /// A cell named an unknown kind and became `empty`
    UnknownKind {
        /// Cell position
        pos: GridPos,
        /// Stored identifier
        value: String,
    },
    /// A short row was padded with `standard`
    RowPadded {
        /// Row index
        row: usize,
        /// Cells added
        added: usize,
    },
    /// A long row was cut to the declared width
    RowTruncated {
        /// Row index
        row: usize,
        /// Cells removed
        removed: usize,
    },
    /// Missing rows were added as all `standard`
    RowsAdded {
        /// Rows added
        count: usize,
    },
    /// Rows past the declared height were removed
    RowsRemoved {
        /// Rows removed
        count: usize,
    },
    /// A category entry with an unknown id was ignored
    UnknownCategory {
        /// Stored identifier
        id: String,
    },
    /// A kind had no category entry and took the default
    CategoryDefaulted {
        /// Kind
        kind: SeatKind,
    },
    /// The row offset left rows without letters
    RowOffsetClamped {
        /// As stored
        declared: usize,
        /// As loaded
        loaded: usize,
    },
    /// A held seat did not fit the loaded layout
    SeatForfeited(ShowtimeForfeit),
}

impl fmt::Display for Repair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DimensionsClamped { declared, loaded } => write!(
                f,
                "dimensions {}x{} clamped to {}x{}",
                declared.0, declared.1, loaded.0, loaded.1
            ),
            Self::UnknownKind { pos, value } => {
                write!(f, "unknown kind {value:?} at {pos} replaced with empty")
            },
            Self::RowPadded { row, added } => write!(f, "row {row} padded with {added} cell(s)"),
            Self::RowTruncated { row, removed } => {
                write!(f, "row {row} truncated by {removed} cell(s)")
            },
            Self::RowsAdded { count } => write!(f, "{count} missing row(s) added"),
            Self::RowsRemoved { count } => write!(f, "{count} extra row(s) removed"),
            Self::UnknownCategory { id } => write!(f, "unknown category {id:?} ignored"),
            Self::CategoryDefaulted { kind } => write!(f, "category {kind} reset to default"),
            Self::RowOffsetClamped { declared, loaded } => {
                write!(f, "row offset {declared} clamped to {loaded}")
            },
            Self::SeatForfeited(seat) => write!(
                f,
                "{} seat at {} in showtime {:?} forfeited",
                seat.status, seat.pos, seat.time
            ),
        }
    }
}

// ============================================================================
// Repair
// ============================================================================

impl LayoutSnapshot {
    /// Builds a valid layout, listing every fix made
    #[must_use]
    pub fn repair(self) -> (SeatLayout, Vec<Repair>) {
        let mut repairs = Vec::new();

        let declared_rows = self.rows.unwrap_or(self.grid.len());
        let declared_cols = self
            .cols
            .unwrap_or_else(|| self.grid.iter().map(Vec::len).max().unwrap_or(0));
        let rows = clamp_rows(declared_rows);
        let cols = clamp_cols(declared_cols);
        if (rows, cols) != (declared_rows, declared_cols) {
            repairs.push(Repair::DimensionsClamped {
                declared: (declared_rows, declared_cols),
                loaded: (rows, cols),
            });
        }

        if self.grid.len() > rows {
            repairs.push(Repair::RowsRemoved {
                count: self.grid.len() - rows,
            });
        }
        if self.grid.len() < rows {
            repairs.push(Repair::RowsAdded {
                count: rows - self.grid.len(),
            });
        }

        let mut grid = Vec::with_capacity(rows);
        for (r, stored) in self.grid.into_iter().take(rows).enumerate() {
            if stored.len() < cols {
                repairs.push(Repair::RowPadded {
                    row: r,
                    added: cols - stored.len(),
                });
            } else if stored.len() > cols {
                repairs.push(Repair::RowTruncated {
                    row: r,
                    removed: stored.len() - cols,
                });
            }

            let row: Vec<SeatKind> = stored
                .into_iter()
                .take(cols)
                .enumerate()
                .map(|(c, value)| {
                    value.parse().unwrap_or_else(|_| {
                        repairs.push(Repair::UnknownKind {
                            pos: GridPos::new(r, c),
                            value,
                        });
                        SeatKind::Empty
                    })
                })
                .collect();
            grid.push(row);
        }

        let mut known = Vec::with_capacity(self.categories.len());
        for entry in self.categories {
            match entry.id.parse::<SeatKind>() {
                Ok(kind) => {
                    let defaults = SeatCategory::default_for(kind);
                    known.push(SeatCategory::new(
                        kind,
                        entry.name.unwrap_or(defaults.name),
                        entry.price.unwrap_or(defaults.price),
                        entry.color.unwrap_or(defaults.color),
                    ));
                },
                Err(_) => repairs.push(Repair::UnknownCategory { id: entry.id }),
            }
        }
        let (categories, missing) = CategoryRegistry::from_partial(known);
        repairs.extend(missing.into_iter().map(|kind| Repair::CategoryDefaulted { kind }));

        // Short and missing rows are squared off with `standard`
        let squared = SeatLayout::from_grid(grid);
        let layout = squared.resized(rows, cols);

        let declared_offset = self.row_start_index.unwrap_or(DEFAULT_ROW_START_INDEX);
        let row_start_index = declared_offset.min(max_row_start_index(rows));
        if row_start_index != declared_offset {
            repairs.push(Repair::RowOffsetClamped {
                declared: declared_offset,
                loaded: row_start_index,
            });
        }

        let layout = layout
            .with_registry(categories)
            .with_offsets(
                row_start_index,
                self.col_start_index.unwrap_or(DEFAULT_COL_START_INDEX),
            );

        (layout, repairs)
    }
}

impl From<LayoutSnapshot> for SeatLayout {
    fn from(snapshot: LayoutSnapshot) -> Self {
        snapshot.repair().0
    }
}

// ============================================================================
// Load / save
// ============================================================================

/// Serializes a layout as pretty JSON
///
/// # Errors
///
/// Returns [`crate::SeatplanError::Serialization`] if encoding fails.
pub fn save_layout(layout: &SeatLayout) -> Result<String> {
    Ok(serde_json::to_string_pretty(layout)?)
}

/// Parses a layout, repairing what it can
///
/// # Errors
///
/// Returns [`crate::SeatplanError::Serialization`] if `json` is not a JSON
/// object of the stored layout shape.
pub fn load_layout(json: &str) -> Result<(SeatLayout, Vec<Repair>)> {
    let snapshot: LayoutSnapshot = serde_json::from_str(json)?;
    let (layout, repairs) = snapshot.repair();
    log_repairs(&repairs);
    Ok((layout, repairs))
}

/// Serializes a layout and its schedule as pretty JSON
///
/// # Errors
///
/// Returns [`crate::SeatplanError::Serialization`] if encoding fails.
pub fn save_venue(layout: &SeatLayout, schedule: &Schedule) -> Result<String> {
    #[derive(Serialize)]
    struct Borrowed<'a> {
        layout: &'a SeatLayout,
        schedule: &'a Schedule,
    }
    Ok(serde_json::to_string_pretty(&Borrowed { layout, schedule })?)
}

/// Parses a layout and its schedule, repairing what it can
///
/// Seat maps that do not fit the repaired layout, or hold seats on
/// structural cells, are reconciled at `now`.
///
/// # Errors
///
/// Returns [`crate::SeatplanError::Serialization`] if `json` is not a stored
/// venue.
pub fn load_venue(json: &str, now: DateTime<Utc>) -> Result<(VenueSnapshot, Vec<Repair>)> {
    let stored: StoredVenue = serde_json::from_str(json)?;
    let (layout, mut repairs) = stored.layout.repair();
    let mut schedule = stored.schedule;

    if !schedule.fits(&layout) || !schedule.stranded_by(&layout).is_empty() {
        let report = schedule.resync(&layout, now);
        repairs.extend(report.forfeited.into_iter().map(Repair::SeatForfeited));
    }

    log_repairs(&repairs);
    Ok((VenueSnapshot { layout, schedule }, repairs))
}

fn log_repairs(repairs: &[Repair]) {
    for repair in repairs {
        tracing::warn!(%repair, "Snapshot repaired");
    }
}
