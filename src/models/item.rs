//! Stocked items and the name → slot lookup.

use std::collections::HashMap;

use crate::error::PlanError;
use crate::grid::{AccessBias, GridCoordinate, WarehouseGrid, WarehouseSlot};

/// A required item: what to pick, how many units, and where it is stored.
///
/// An item may be stocked in several places. The primary slot comes first;
/// [`best_slot`](Self::best_slot) picks whichever location is closest to
/// the picker.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    name: String,
    quantity: u32,
    slot: WarehouseSlot,
    alternatives: Vec<WarehouseSlot>,
    access: Option<GridCoordinate>,
}

impl Item {
    /// Creates an item stored at a single slot.
    pub fn new(name: impl Into<String>, quantity: u32, slot: WarehouseSlot) -> Self {
        Self {
            name: name.into(),
            quantity,
            slot,
            alternatives: Vec::new(),
            access: None,
        }
    }

    /// Adds alternative storage slots.
    pub fn with_alternatives(mut self, alternatives: Vec<WarehouseSlot>) -> Self {
        self.alternatives = alternatives;
        self
    }

    /// Item name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of units to pick; counts against robot capacity.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Primary storage slot.
    pub fn slot(&self) -> WarehouseSlot {
        self.slot
    }

    /// Alternative storage slots, excluding the primary.
    pub fn alternatives(&self) -> &[WarehouseSlot] {
        &self.alternatives
    }

    /// Every storage slot, primary first.
    pub fn slots(&self) -> impl Iterator<Item = WarehouseSlot> + '_ {
        std::iter::once(self.slot).chain(self.alternatives.iter().copied())
    }

    /// The storage slot with the smallest obstacle-free estimate from
    /// `from`. Ties keep the primary slot.
    pub fn best_slot(&self, from: &WarehouseSlot) -> WarehouseSlot {
        let mut best = self.slot;
        let mut best_estimate = from.estimate_to(&self.slot);
        for alt in &self.alternatives {
            let estimate = from.estimate_to(alt);
            if estimate < best_estimate {
                best = *alt;
                best_estimate = estimate;
            }
        }
        best
    }

    /// Whether `other` counts as the same line item (same name and quantity).
    pub fn same_as(&self, other: &Item) -> bool {
        self.name == other.name && self.quantity == other.quantity
    }

    /// Caches the walkable cell a picker stands on to reach the primary slot.
    pub fn bind(&mut self, grid: &WarehouseGrid) {
        let cell = grid.locate(&self.slot);
        self.access = Some(grid.resolve_access_point(cell, AccessBias::none()));
    }

    /// The cached access cell, if [`bind`](Self::bind) has been called.
    pub fn access_point(&self) -> Option<GridCoordinate> {
        self.access
    }

    /// The walkable cell a picker stands on to pick from `slot`. The
    /// primary slot uses the cached cell once bound.
    pub fn access_cell(&self, slot: &WarehouseSlot, grid: &WarehouseGrid) -> GridCoordinate {
        match self.access {
            Some(cell) if *slot == self.slot => cell,
            _ => grid.resolve_access_point(grid.locate(slot), AccessBias::none()),
        }
    }
}

/// Where each item name is stocked.
///
/// Inserting a name twice records the second slot as an alternative
/// location for the same item.
///
/// # Examples
///
/// ```
/// use u_picking::grid::WarehouseSlot;
/// use u_picking::models::Inventory;
///
/// let mut inventory = Inventory::new();
/// inventory.insert("bolt", WarehouseSlot::new(1, 1, 2));
/// inventory.insert("bolt", WarehouseSlot::new(2, 1, 0));
///
/// let items = inventory.resolve(&[("bolt", 4)]).unwrap();
/// assert_eq!(items[0].quantity(), 4);
/// assert_eq!(items[0].alternatives(), &[WarehouseSlot::new(2, 1, 0)]);
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inventory {
    locations: HashMap<String, Vec<WarehouseSlot>>,
}

impl Inventory {
    /// Creates an empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `name` is stocked at `slot`.
    pub fn insert(&mut self, name: impl Into<String>, slot: WarehouseSlot) {
        self.locations.entry(name.into()).or_default().push(slot);
    }

    /// Storage slots of `name`, primary first.
    pub fn get(&self, name: &str) -> Option<&[WarehouseSlot]> {
        self.locations.get(name).map(Vec::as_slice)
    }

    /// Number of distinct item names.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Whether nothing is stocked.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Turns `(name, quantity)` requirements into items.
    ///
    /// # Errors
    ///
    /// [`PlanError::UnknownItem`] for the first name that is not stocked.
    pub fn resolve<S: AsRef<str>>(&self, required: &[(S, u32)]) -> Result<Vec<Item>, PlanError> {
        required
            .iter()
            .map(|(name, quantity)| {
                let name = name.as_ref();
                match self.get(name) {
                    Some([primary, rest @ ..]) => {
                        Ok(Item::new(name, *quantity, *primary).with_alternatives(rest.to_vec()))
                    }
                    _ => Err(PlanError::UnknownItem(name.to_string())),
                }
            })
            .collect()
    }
}
