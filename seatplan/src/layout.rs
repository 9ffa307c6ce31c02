//! The seat layout model.
//!
//! A [`SeatLayout`] is an immutable value: every edit returns a new layout,
//! so the editor's undo history can share old layouts by `Arc` without any
//! risk of a later edit reaching back into them.
//!
//! `with_cell` returns `None` for an identity write so the editor can skip
//! its history entry. `with_fill` returns `None` only for an index outside
//! the grid.

use crate::categories::{CategoryRegistry, SeatCategory};
use crate::types::{
    Axis, DEFAULT_COL_START_INDEX, DEFAULT_ROW_START_INDEX, FillTarget, GridPos, MAX_COLS,
    MAX_ROWS, MIN_COLS, MIN_ROWS, SeatKind,
};
use serde::Serialize;

/// Rectangular seating grid for one screen or tour stop
#[derive(Clone, Debug, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(from = "crate::snapshot::LayoutSnapshot")]
pub struct SeatLayout {
    rows: usize,
    cols: usize,
    grid: Vec<Vec<SeatKind>>,
    categories: CategoryRegistry,
    row_start_index: usize,
    col_start_index: u32,
}

/// Clamps a row count into `[1, 26]`
#[must_use]
pub fn clamp_rows(rows: usize) -> usize {
    rows.clamp(MIN_ROWS, MAX_ROWS)
}

/// Clamps a column count into `[1, 40]`
#[must_use]
pub fn clamp_cols(cols: usize) -> usize {
    cols.clamp(MIN_COLS, MAX_COLS)
}

/// Largest row offset that still gives the last of `rows` rows a letter
#[must_use]
pub const fn max_row_start_index(rows: usize) -> usize {
    MAX_ROWS.saturating_sub(rows)
}

impl SeatLayout {
    /// Creates a layout of all `standard` seats with default numbering
    ///
    /// Dimensions are clamped into `[1, 26] x [1, 40]`.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, SeatKind::Standard)
    }

    /// Creates a layout with every cell set to `kind`
    #[must_use]
    pub fn filled(rows: usize, cols: usize, kind: SeatKind) -> Self {
        let rows = clamp_rows(rows);
        let cols = clamp_cols(cols);
        Self {
            rows,
            cols,
            grid: vec![vec![kind; cols]; rows],
            categories: CategoryRegistry::default(),
            row_start_index: DEFAULT_ROW_START_INDEX,
            col_start_index: DEFAULT_COL_START_INDEX,
        }
    }

    /// Creates a layout from explicit rows of kinds
    ///
    /// The row count is clamped; the column count is the longest row, clamped.
    /// Short rows are padded with `standard`, long rows truncated.
    #[must_use]
    pub fn from_grid(grid: Vec<Vec<SeatKind>>) -> Self {
        let rows = clamp_rows(grid.len());
        let cols = clamp_cols(grid.iter().map(Vec::len).max().unwrap_or(0));
        let mut layout = Self::new(rows, cols);
        for (r, row) in grid.into_iter().take(rows).enumerate() {
            for (c, kind) in row.into_iter().take(cols).enumerate() {
                layout.grid[r][c] = kind;
            }
        }
        layout
    }

    /// Sets both numbering offsets, clamping the row offset
    #[must_use]
    pub fn with_offsets(mut self, row_start_index: usize, col_start_index: u32) -> Self {
        self.row_start_index = row_start_index.min(max_row_start_index(self.rows));
        self.col_start_index = col_start_index;
        self
    }

    /// Replaces the whole category registry
    #[must_use]
    pub fn with_registry(mut self, categories: CategoryRegistry) -> Self {
        self.categories = categories;
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of rows
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`
    #[must_use]
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Offset added to a row index before picking its letter
    #[must_use]
    pub const fn row_start_index(&self) -> usize {
        self.row_start_index
    }

    /// Number shown on the first bookable seat of each row
    #[must_use]
    pub const fn col_start_index(&self) -> u32 {
        self.col_start_index
    }

    /// The category registry
    #[must_use]
    pub const fn categories(&self) -> &CategoryRegistry {
        &self.categories
    }

    /// The grid, row-major
    #[must_use]
    pub fn grid(&self) -> &[Vec<SeatKind>] {
        &self.grid
    }

    /// One row of the grid
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[SeatKind]> {
        self.grid.get(row).map(Vec::as_slice)
    }

    /// Whether `pos` lies inside the grid
    #[must_use]
    pub const fn contains(&self, pos: GridPos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Kind of the cell at `pos`
    #[must_use]
    pub fn kind_at(&self, pos: GridPos) -> Option<SeatKind> {
        self.grid.get(pos.row)?.get(pos.col).copied()
    }

    /// Category of the cell at `pos`
    #[must_use]
    pub fn category_at(&self, pos: GridPos) -> Option<&SeatCategory> {
        self.kind_at(pos).map(|kind| self.categories.get(kind))
    }

    /// Every cell with its position, row-major
    pub fn cells(&self) -> impl Iterator<Item = (GridPos, SeatKind)> + '_ {
        self.grid.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .map(move |(c, kind)| (GridPos::new(r, c), *kind))
        })
    }

    /// Number of bookable cells
    #[must_use]
    pub fn bookable_count(&self) -> usize {
        self.cells().filter(|(_, kind)| kind.is_bookable()).count()
    }

    // ========================================================================
    // Transforms
    // ========================================================================

    /// Returns a layout with the cell at `pos` set to `kind`
    ///
    /// `None` if `pos` is out of bounds or already holds `kind`.
    #[must_use]
    pub fn with_cell(&self, pos: GridPos, kind: SeatKind) -> Option<Self> {
        if self.kind_at(pos)? == kind {
            return None;
        }
        let mut next = self.clone();
        next.grid[pos.row][pos.col] = kind;
        Some(next)
    }

    /// Returns a layout with a whole row or column set to `kind`
    ///
    /// `None` if the index is out of range. A fill that changes no cell still
    /// returns a layout, so the editor records it.
    #[must_use]
    pub fn with_fill(&self, target: FillTarget, kind: SeatKind) -> Option<Self> {
        let positions: Vec<GridPos> = match target {
            FillTarget::Row(row) if row < self.rows => {
                (0..self.cols).map(|col| GridPos::new(row, col)).collect()
            },
            FillTarget::Col(col) if col < self.cols => {
                (0..self.rows).map(|row| GridPos::new(row, col)).collect()
            },
            FillTarget::Row(_) | FillTarget::Col(_) => return None,
        };

        let mut next = self.clone();
        for pos in positions {
            next.grid[pos.row][pos.col] = kind;
        }
        Some(next)
    }

    /// Returns a layout resized to `rows x cols` (clamped)
    ///
    /// Overlapping cells are copied by position and new cells are `standard`.
    /// Numbering offsets are kept as they are.
    #[must_use]
    pub fn resized(&self, rows: usize, cols: usize) -> Self {
        let rows = clamp_rows(rows);
        let cols = clamp_cols(cols);

        let grid = (0..rows)
            .map(|r| {
                (0..cols)
                    .map(|c| {
                        self.kind_at(GridPos::new(r, c))
                            .unwrap_or(SeatKind::Standard)
                    })
                    .collect()
            })
            .collect();

        Self {
            rows,
            cols,
            grid,
            ..self.clone()
        }
    }

    /// Returns a layout with one numbering offset changed
    ///
    /// Row offsets are clamped so the last row still has a letter. Column
    /// offsets below zero cannot be expressed.
    #[must_use]
    pub fn with_numbering(&self, axis: Axis, value: u32) -> Self {
        let mut next = self.clone();
        match axis {
            Axis::Row => {
                let value = usize::try_from(value).unwrap_or(usize::MAX);
                next.row_start_index = value.min(max_row_start_index(self.rows));
            },
            Axis::Col => next.col_start_index = value,
        }
        next
    }

    /// Returns a layout with category `edits` applied to the registry
    #[must_use]
    pub fn with_category_edits(&self, edits: impl IntoIterator<Item = SeatCategory>) -> Self {
        Self {
            categories: self.categories.with_edits(edits),
            ..self.clone()
        }
    }

    /// Whether the grid or dimensions differ from `other`
    ///
    /// Category and numbering edits do not count: they change labels and
    /// prices but never a cell's bookability.
    #[must_use]
    pub fn grid_differs(&self, other: &Self) -> bool {
        self.grid != other.grid
    }
}

impl Default for SeatLayout {
    fn default() -> Self {
        Self::new(MIN_ROWS, MIN_COLS)
    }
}
