//! Plain-text seat charts.
//!
//! Renders a layout the way the operator sees it while numbering seats: a
//! header of column indices, then one line per row with the row letter and a
//! fixed-width cell per column. Bookable cells show their seat number and
//! structural cells a symbol. With a showtime's status map overlaid, booked
//! seats show `*` and selected seats `?`.

use crate::categories::CategoryRegistry;
use crate::labels;
use crate::layout::SeatLayout;
use crate::seat_map::SeatStatusMap;
use crate::types::{GridPos, SeatKind, SeatSaleStatus};
use std::fmt::{self, Write as _};

/// Chart symbol for a structural kind
#[must_use]
pub const fn symbol(kind: SeatKind) -> Option<char> {
    match kind {
        SeatKind::Aisle => Some('|'),
        SeatKind::Empty => Some('.'),
        SeatKind::StageLeft => Some('<'),
        SeatKind::StageRight => Some('>'),
        SeatKind::Ramp => Some('/'),
        SeatKind::Standard | SeatKind::Premium | SeatKind::Recliner | SeatKind::Wheelchair => None,
    }
}

/// Text rendering of a layout, optionally with seat statuses
#[derive(Clone, Copy, Debug)]
pub struct SeatChart<'a> {
    layout: &'a SeatLayout,
    status: Option<&'a SeatStatusMap>,
}

impl<'a> SeatChart<'a> {
    /// Chart of `layout` with seat numbers only
    #[must_use]
    pub const fn new(layout: &'a SeatLayout) -> Self {
        Self {
            layout,
            status: None,
        }
    }

    /// Overlays a showtime's statuses
    #[must_use]
    pub const fn with_status(mut self, status: &'a SeatStatusMap) -> Self {
        self.status = Some(status);
        self
    }

    fn cell(&self, pos: GridPos, kind: SeatKind) -> String {
        if let Some(symbol) = symbol(kind) {
            return symbol.to_string();
        }
        match self.status.and_then(|map| map.get(pos)) {
            Some(SeatSaleStatus::Booked) => "*".to_string(),
            Some(SeatSaleStatus::Selected) => "?".to_string(),
            Some(SeatSaleStatus::Available | SeatSaleStatus::Locked) | None => {
                labels::seat_number(self.layout, pos).map_or_else(String::new, |n| n.to_string())
            },
        }
    }
}

impl fmt::Display for SeatChart<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<Vec<String>> = self
            .layout
            .grid()
            .iter()
            .enumerate()
            .map(|(r, row)| {
                row.iter()
                    .enumerate()
                    .map(|(c, kind)| self.cell(GridPos::new(r, c), *kind))
                    .collect()
            })
            .collect();

        let width = cells
            .iter()
            .flatten()
            .map(String::len)
            .chain(std::iter::once(self.layout.cols().saturating_sub(1).to_string().len()))
            .max()
            .unwrap_or(1)
            .max(2);

        f.write_char(' ')?;
        for col in 0..self.layout.cols() {
            write!(f, " {col:>width$}")?;
        }
        writeln!(f)?;

        for (r, row) in cells.iter().enumerate() {
            f.write_char(labels::row_letter(self.layout, r).unwrap_or('-'))?;
            for cell in row {
                write!(f, " {cell:>width$}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// One line per category: symbol or `#`, id, name, price and color
#[must_use]
pub fn legend(categories: &CategoryRegistry) -> String {
    let mut out = String::new();
    for category in categories.iter() {
        let marker = symbol(category.id).unwrap_or('#');
        let _ = writeln!(
            out,
            "{marker} {:<12} {:<12} {:>7} {}",
            category.id.as_str(),
            category.name,
            category.price.to_string(),
            category.color
        );
    }
    out
}
