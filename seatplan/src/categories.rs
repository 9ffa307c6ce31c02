//! Seat category registry.
//!
//! Every grid cell names one of the nine [`SeatKind`]s; the registry gives
//! each kind its display name, color and price. Bookable kinds are fully
//! editable. Structural kinds keep `name = id` and `price = 0` and only take
//! a new color.

use crate::types::{Money, SeatKind};
use serde::{Deserialize, Serialize};

/// Display name, color and price for one seat kind
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatCategory {
    /// Kind this entry describes
    pub id: SeatKind,
    /// Display name
    pub name: String,
    /// Ticket price (always zero for structural kinds)
    pub price: Money,
    /// CSS-style color, e.g. `#4a90d9`
    pub color: String,
}

impl SeatCategory {
    /// Creates a category entry
    #[must_use]
    pub fn new(id: SeatKind, name: impl Into<String>, price: Money, color: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            color: color.into(),
        }
    }

    /// The factory entry for `kind`
    #[must_use]
    pub fn default_for(kind: SeatKind) -> Self {
        let (name, color, cents) = match kind {
            SeatKind::Standard => ("Standard", "#4a90d9", 1000),
            SeatKind::Premium => ("Premium", "#d4a017", 1500),
            SeatKind::Recliner => ("Recliner", "#8e44ad", 2000),
            SeatKind::Wheelchair => ("Wheelchair", "#27ae60", 1000),
            SeatKind::Aisle => (kind.as_str(), "#2b2b2b", 0),
            SeatKind::Empty => (kind.as_str(), "#f5f5f5", 0),
            SeatKind::StageLeft | SeatKind::StageRight => (kind.as_str(), "#c0392b", 0),
            SeatKind::Ramp => (kind.as_str(), "#7f8c8d", 0),
        };
        Self::new(kind, name, Money::from_cents(cents), color)
    }

    /// Whether tickets can be sold for this category
    #[must_use]
    pub const fn is_bookable(&self) -> bool {
        self.id.is_bookable()
    }

    /// Forces the fixed fields of structural kinds
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.id.is_structural() {
            self.id.as_str().clone_into(&mut self.name);
            self.price = Money::ZERO;
        }
        self
    }
}

/// Exactly one [`SeatCategory`] per [`SeatKind`], in [`SeatKind::ALL`] order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<SeatCategory>", into = "Vec<SeatCategory>")]
pub struct CategoryRegistry {
    entries: [SeatCategory; 9],
}

impl CategoryRegistry {
    /// Builds a registry from a possibly partial list
    ///
    /// Later duplicates win. Kinds missing from `entries` take their factory
    /// entry and are returned alongside the registry.
    #[must_use]
    pub fn from_partial(entries: impl IntoIterator<Item = SeatCategory>) -> (Self, Vec<SeatKind>) {
        let mut slots: [Option<SeatCategory>; 9] = Default::default();
        for entry in entries {
            let index = entry.id as usize;
            slots[index] = Some(entry.normalized());
        }

        let mut missing = Vec::new();
        let entries = SeatKind::ALL.map(|kind| {
            slots[kind as usize].take().unwrap_or_else(|| {
                missing.push(kind);
                SeatCategory::default_for(kind)
            })
        });

        (Self { entries }, missing)
    }

    /// The entry for `kind`
    #[must_use]
    pub fn get(&self, kind: SeatKind) -> &SeatCategory {
        &self.entries[kind as usize]
    }

    /// All nine entries in canonical order
    pub fn iter(&self) -> impl Iterator<Item = &SeatCategory> {
        self.entries.iter()
    }

    /// The four bookable entries
    pub fn bookable(&self) -> impl Iterator<Item = &SeatCategory> {
        self.entries.iter().filter(|category| category.is_bookable())
    }

    /// Returns a registry with `edits` applied
    ///
    /// Bookable edits replace name, color and price. Structural edits only
    /// change the color. Kinds not mentioned keep their current entry.
    #[must_use]
    pub fn with_edits(&self, edits: impl IntoIterator<Item = SeatCategory>) -> Self {
        let mut next = self.clone();
        for edit in edits {
            let index = edit.id as usize;
            next.entries[index] = edit.normalized();
        }
        next
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self {
            entries: SeatKind::ALL.map(SeatCategory::default_for),
        }
    }
}

impl From<Vec<SeatCategory>> for CategoryRegistry {
    fn from(entries: Vec<SeatCategory>) -> Self {
        Self::from_partial(entries).0
    }
}

impl From<CategoryRegistry> for Vec<SeatCategory> {
    fn from(registry: CategoryRegistry) -> Self {
        registry.entries.into()
    }
}
