//! Seat label derivation.
//!
//! A seat label is a row letter plus a seat number, e.g. `C12`. The row letter
//! is the letter at `row + row_start_index` (`A` for 0). Seat numbers count the
//! bookable cells of a row from left to right, starting at the layout's
//! `col_start_index`; structural cells take no number and get no label.
//!
//! Everything that shows or parses a label goes through this module: the chart
//! renderer, the booking operations and the tests.

use crate::error::SeatplanError;
use crate::layout::SeatLayout;
use crate::types::{GridPos, MAX_ROWS};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Human-facing seat identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SeatLabel {
    row: char,
    number: u32,
}

impl SeatLabel {
    /// Creates a label from a letter and number
    ///
    /// `None` unless `row` is an ASCII letter. Lowercase letters are
    /// uppercased.
    #[must_use]
    pub fn new(row: char, number: u32) -> Option<Self> {
        row.is_ascii_alphabetic().then(|| Self {
            row: row.to_ascii_uppercase(),
            number,
        })
    }

    /// Row letter
    #[must_use]
    pub const fn row(&self) -> char {
        self.row
    }

    /// Seat number
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }
}

impl fmt::Display for SeatLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row, self.number)
    }
}

impl FromStr for SeatLabel {
    type Err = SeatplanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SeatplanError::InvalidLabel(s.to_string());
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let row = chars.next().ok_or_else(invalid)?;
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let number = digits.parse().map_err(|_| invalid())?;
        Self::new(row, number).ok_or_else(invalid)
    }
}

impl TryFrom<String> for SeatLabel {
    type Error = SeatplanError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SeatLabel> for String {
    fn from(label: SeatLabel) -> Self {
        label.to_string()
    }
}

/// Letter for an absolute row index (`0 -> A`, `25 -> Z`)
#[must_use]
pub fn letter_for_index(index: usize) -> Option<char> {
    if index >= MAX_ROWS {
        return None;
    }
    u8::try_from(index).ok().map(|offset| char::from(b'A' + offset))
}

/// Row letter for grid row `row`
///
/// `None` when the row is outside the layout or its offset index is past `Z`.
#[must_use]
pub fn row_letter(layout: &SeatLayout, row: usize) -> Option<char> {
    if row >= layout.rows() {
        return None;
    }
    letter_for_index(row + layout.row_start_index())
}

/// Displayed seat number of the cell at `pos`
///
/// `None` for structural cells and positions outside the layout.
#[must_use]
pub fn seat_number(layout: &SeatLayout, pos: GridPos) -> Option<u32> {
    let row = layout.row(pos.row)?;
    if !row.get(pos.col)?.is_bookable() {
        return None;
    }
    let ordinal = row[..=pos.col]
        .iter()
        .filter(|kind| kind.is_bookable())
        .count();
    let ordinal = u32::try_from(ordinal).ok()?;
    Some(layout.col_start_index().saturating_add(ordinal).saturating_sub(1))
}

/// Full label of the cell at `pos`
#[must_use]
pub fn seat_label(layout: &SeatLayout, pos: GridPos) -> Option<SeatLabel> {
    let row = row_letter(layout, pos.row)?;
    let number = seat_number(layout, pos)?;
    SeatLabel::new(row, number)
}

/// Labels of every bookable cell of `row`, left to right, with their column
#[must_use]
pub fn row_labels(layout: &SeatLayout, row: usize) -> Vec<(usize, SeatLabel)> {
    (0..layout.cols())
        .filter_map(|col| seat_label(layout, GridPos::new(row, col)).map(|label| (col, label)))
        .collect()
}

/// Grid position of the seat named `label`
///
/// The inverse of [`seat_label`]. `None` if the layout has no such seat.
#[must_use]
pub fn locate(layout: &SeatLayout, label: &SeatLabel) -> Option<GridPos> {
    let absolute = usize::from(u8::try_from(label.row()).ok()?.checked_sub(b'A')?);
    let row = absolute.checked_sub(layout.row_start_index())?;
    if row >= layout.rows() {
        return None;
    }
    let ordinal = label
        .number()
        .checked_add(1)?
        .checked_sub(layout.col_start_index())?;
    let ordinal = usize::try_from(ordinal).ok()?;
    if ordinal == 0 {
        return None;
    }

    layout
        .row(row)?
        .iter()
        .enumerate()
        .filter(|(_, kind)| kind.is_bookable())
        .nth(ordinal - 1)
        .map(|(col, _)| GridPos::new(row, col))
}

/// Parses `text` and finds the seat it names
///
/// # Errors
///
/// Returns [`SeatplanError::InvalidLabel`] if `text` is not a label and
/// [`SeatplanError::SeatNotFound`] if the layout has no such seat.
pub fn resolve(layout: &SeatLayout, text: &str) -> Result<GridPos, SeatplanError> {
    let label: SeatLabel = text.parse()?;
    locate(layout, &label).ok_or_else(|| SeatplanError::SeatNotFound(label.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::SeatKind;

    fn bordered_row() -> SeatLayout {
        let mut row = vec![SeatKind::Standard; 10];
        row[0] = SeatKind::Aisle;
        row[9] = SeatKind::Aisle;
        SeatLayout::from_grid(vec![row])
    }

    #[test]
    fn test_letters() {
        assert_eq!(letter_for_index(0), Some('A'));
        assert_eq!(letter_for_index(25), Some('Z'));
        assert_eq!(letter_for_index(26), None);
    }

    #[test]
    fn test_row_offset_shifts_letters() {
        let layout = SeatLayout::new(3, 3).with_offsets(2, 1);
        assert_eq!(row_letter(&layout, 0), Some('C'));
        assert_eq!(row_letter(&layout, 2), Some('E'));
        assert_eq!(row_letter(&layout, 3), None);
    }

    #[test]
    fn test_rows_past_z_are_unlabeled() {
        let layout = SeatLayout::new(3, 1)
            .with_offsets(23, 1)
            .resized(5, 1);
        assert_eq!(row_letter(&layout, 2), Some('Z'));
        assert_eq!(row_letter(&layout, 3), None);
        assert_eq!(seat_label(&layout, GridPos::new(4, 0)), None);
    }

    #[test]
    fn test_aisle_bordered_row() {
        let layout = bordered_row();
        let labels = row_labels(&layout, 0);
        let names: Vec<String> = labels.iter().map(|(_, l)| l.to_string()).collect();
        assert_eq!(names, ["A1", "A2", "A3", "A4", "A5", "A6", "A7", "A8"]);
        let cols: Vec<usize> = labels.iter().map(|(c, _)| *c).collect();
        assert_eq!(cols, (1..=8).collect::<Vec<_>>());
        assert_eq!(seat_label(&layout, GridPos::new(0, 0)), None);
        assert_eq!(seat_label(&layout, GridPos::new(0, 9)), None);
    }

    #[test]
    fn test_col_start_index_offsets_numbers() {
        let layout = bordered_row().with_offsets(0, 101);
        assert_eq!(seat_number(&layout, GridPos::new(0, 1)), Some(101));
        assert_eq!(seat_number(&layout, GridPos::new(0, 8)), Some(108));

        let zero_based = bordered_row().with_offsets(0, 0);
        assert_eq!(seat_number(&zero_based, GridPos::new(0, 1)), Some(0));
    }

    #[test]
    fn test_parse_label() {
        let label: SeatLabel = "C12".parse().unwrap();
        assert_eq!((label.row(), label.number()), ('C', 12));
        assert_eq!(" b3 ".parse::<SeatLabel>().unwrap().to_string(), "B3");

        for bad in ["", "C", "12", "CC1", "C-1", "Ä1"] {
            assert!(bad.parse::<SeatLabel>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn test_locate_inverts_seat_label() {
        let layout = bordered_row().with_offsets(0, 5);
        for (col, label) in row_labels(&layout, 0) {
            assert_eq!(locate(&layout, &label), Some(GridPos::new(0, col)));
        }
        assert_eq!(locate(&layout, &SeatLabel::new('A', 4).unwrap()), None);
        assert_eq!(locate(&layout, &SeatLabel::new('A', 13).unwrap()), None);
        assert_eq!(locate(&layout, &SeatLabel::new('B', 5).unwrap()), None);
    }

    #[test]
    fn test_resolve_errors() {
        let layout = bordered_row();
        assert!(matches!(resolve(&layout, "A1"), Ok(pos) if pos == GridPos::new(0, 1)));
        assert!(matches!(resolve(&layout, "A9"), Err(SeatplanError::SeatNotFound(_))));
        assert!(matches!(resolve(&layout, "nope"), Err(SeatplanError::InvalidLabel(_))));
    }
}
