//! Coordinates on the occupancy grid and storage slot addressing.

/// Cost of climbing or descending one shelf tier.
pub const TIER_STEP: f64 = 0.5;

/// A cell on the occupancy grid.
///
/// Coordinates are signed so that positions derived from malformed slots
/// remain representable; such cells are simply reported as not walkable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridCoordinate {
    /// Row index (0 = the main aisle in the default layout).
    pub row: i32,
    /// Column index.
    pub col: i32,
}

impl GridCoordinate {
    /// Creates a coordinate.
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Manhattan distance to `other`, saturating at `u32::MAX`.
    pub fn manhattan(self, other: GridCoordinate) -> u32 {
        self.row
            .abs_diff(other.row)
            .saturating_add(self.col.abs_diff(other.col))
    }

    /// The coordinate shifted by `(dr, dc)`, saturating at the `i32` range.
    pub fn offset(self, dr: i32, dc: i32) -> GridCoordinate {
        GridCoordinate::new(self.row.saturating_add(dr), self.col.saturating_add(dc))
    }
}

/// A storage location: shelf, tier on that shelf, and slot along the shelf.
///
/// The slot derives a 2D grid coordinate:
///
/// - shelf 0 is the main aisle (row 0),
/// - tier 0 of shelf `s` is the aisle in front of it (row `2s`),
/// - tiers 1 and above sit on the shelf row itself (row `2s - 1`),
/// - the slot index is the column.
///
/// Negative shelf or slot indices are clamped to 0 when deriving the
/// coordinate; rows past `i32::MAX` saturate.
///
/// # Examples
///
/// ```
/// use u_picking::grid::{GridCoordinate, WarehouseSlot};
///
/// let slot = WarehouseSlot::new(2, 1, 4);
/// assert_eq!(slot.coordinate(), GridCoordinate::new(3, 4));
/// assert_eq!(WarehouseSlot::new(2, 0, 4).coordinate(), GridCoordinate::new(4, 4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WarehouseSlot {
    shelf: i32,
    tier: i32,
    slot: i32,
}

impl WarehouseSlot {
    /// Creates a slot address.
    pub const fn new(shelf: i32, tier: i32, slot: i32) -> Self {
        Self { shelf, tier, slot }
    }

    /// The slot that stands for a grid cell.
    ///
    /// Row 0 maps to the main aisle, even rows to the aisle (tier 0) of
    /// shelf `row / 2`, odd rows to tier 1 of shelf `(row + 1) / 2`.
    pub fn from_coordinate(coord: GridCoordinate) -> Self {
        let row = coord.row.max(0);
        let (shelf, tier) = if row == 0 {
            (0, 0)
        } else if row % 2 == 0 {
            (row / 2, 0)
        } else {
            (row / 2 + 1, 1)
        };
        Self::new(shelf, tier, coord.col)
    }

    /// Shelf index.
    pub fn shelf(&self) -> i32 {
        self.shelf
    }

    /// Tier index (0 = floor level).
    pub fn tier(&self) -> i32 {
        self.tier
    }

    /// Slot index along the shelf.
    pub fn slot(&self) -> i32 {
        self.slot
    }

    /// Replaces the shelf index.
    pub fn set_shelf(&mut self, shelf: i32) {
        self.shelf = shelf;
    }

    /// Replaces the tier index.
    pub fn set_tier(&mut self, tier: i32) {
        self.tier = tier;
    }

    /// Replaces the slot index.
    pub fn set_slot(&mut self, slot: i32) {
        self.slot = slot;
    }

    /// The grid cell this slot maps to, before clamping to any grid bounds.
    pub fn coordinate(&self) -> GridCoordinate {
        let shelf = self.shelf.max(0);
        let col = self.slot.max(0);
        let row = if shelf == 0 {
            0
        } else if self.tier <= 0 {
            shelf.saturating_mul(2)
        } else {
            shelf.saturating_mul(2) - 1
        };
        GridCoordinate::new(row, col)
    }

    /// Whether both slots share shelf and slot index (a vertical stack).
    pub fn same_stack(&self, other: &WarehouseSlot) -> bool {
        self.shelf == other.shelf && self.slot == other.slot
    }

    /// Vertical travel between two slots.
    ///
    /// Within one stack this is the tier difference. Otherwise the picker
    /// climbs to each tier and back down, counting tier 1 as floor level,
    /// floored at zero.
    pub fn tier_cost(&self, other: &WarehouseSlot) -> f64 {
        if self.same_stack(other) {
            TIER_STEP * self.tier.abs_diff(other.tier) as f64
        } else {
            TIER_STEP * (i64::from(self.tier) + i64::from(other.tier) - 2).max(0) as f64
        }
    }

    /// Coarse Manhattan-plus-tier estimate that ignores obstacles.
    pub fn estimate_to(&self, other: &WarehouseSlot) -> f64 {
        self.coordinate().manhattan(other.coordinate()) as f64 + self.tier_cost(other)
    }
}

impl std::fmt::Display for WarehouseSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.shelf, self.tier, self.slot)
    }
}

/// Optional positions that break ties between candidate access points.
///
/// A candidate scores `0.7 * |c - from| + 0.3 * |c - to|`, counting only the
/// supplied terms; lower is better.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessBias {
    /// Where the picker is coming from.
    pub from: Option<GridCoordinate>,
    /// Where the picker is heading next.
    pub to: Option<GridCoordinate>,
}

impl AccessBias {
    const FROM_WEIGHT: f64 = 0.7;
    const TO_WEIGHT: f64 = 0.3;

    /// No bias: the first candidate in scan order wins.
    pub fn none() -> Self {
        Self::default()
    }

    /// Bias toward the current position.
    pub fn from(coord: GridCoordinate) -> Self {
        Self {
            from: Some(coord),
            to: None,
        }
    }

    /// Bias toward the next target.
    pub fn toward(coord: GridCoordinate) -> Self {
        Self {
            from: None,
            to: Some(coord),
        }
    }

    /// Bias toward both the current position and the next target.
    pub fn between(from: GridCoordinate, to: GridCoordinate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    /// Whether any bias position is set.
    pub fn is_none(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Weighted score of a candidate cell.
    pub fn score(&self, candidate: GridCoordinate) -> f64 {
        let from = self
            .from
            .map_or(0.0, |c| candidate.manhattan(c) as f64 * Self::FROM_WEIGHT);
        let to = self
            .to
            .map_or(0.0, |c| candidate.manhattan(c) as f64 * Self::TO_WEIGHT);
        from + to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_coordinates() {
        assert_eq!(WarehouseSlot::new(0, 0, 0).coordinate(), GridCoordinate::new(0, 0));
        assert_eq!(WarehouseSlot::new(0, 3, 2).coordinate(), GridCoordinate::new(0, 2));
        assert_eq!(WarehouseSlot::new(1, 1, 2).coordinate(), GridCoordinate::new(1, 2));
        assert_eq!(WarehouseSlot::new(1, 2, 2).coordinate(), GridCoordinate::new(1, 2));
        assert_eq!(WarehouseSlot::new(1, 0, 2).coordinate(), GridCoordinate::new(2, 2));
        assert_eq!(WarehouseSlot::new(-3, 1, -1).coordinate(), GridCoordinate::new(0, 0));
    }

    #[test]
    fn test_from_coordinate_inverts_aisles_and_shelves() {
        let aisle = WarehouseSlot::from_coordinate(GridCoordinate::new(4, 3));
        assert_eq!(aisle, WarehouseSlot::new(2, 0, 3));
        assert_eq!(aisle.coordinate(), GridCoordinate::new(4, 3));

        let shelf = WarehouseSlot::from_coordinate(GridCoordinate::new(3, 1));
        assert_eq!(shelf, WarehouseSlot::new(2, 1, 1));
        assert_eq!(shelf.coordinate(), GridCoordinate::new(3, 1));

        assert_eq!(
            WarehouseSlot::from_coordinate(GridCoordinate::new(0, 5)),
            WarehouseSlot::new(0, 0, 5)
        );
    }

    #[test]
    fn test_tier_cost_same_stack() {
        let low = WarehouseSlot::new(2, 1, 3);
        let high = WarehouseSlot::new(2, 4, 3);
        assert!((low.tier_cost(&high) - 1.5).abs() < 1e-12);
        assert!((high.tier_cost(&low) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_tier_cost_is_floored() {
        let floor = WarehouseSlot::new(0, 0, 0);
        let first = WarehouseSlot::new(1, 1, 2);
        assert_eq!(floor.tier_cost(&first), 0.0);

        let a = WarehouseSlot::new(1, 3, 2);
        let b = WarehouseSlot::new(2, 2, 5);
        assert!((a.tier_cost(&b) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_estimate_to() {
        let a = WarehouseSlot::new(1, 2, 1);
        let b = WarehouseSlot::new(2, 1, 4);
        // rows 1 -> 3, cols 1 -> 4, tiers 2 + 1 - 2 = 1
        assert!((a.estimate_to(&b) - 5.5).abs() < 1e-12);
        assert_eq!(a.estimate_to(&a), 0.0);
    }

    #[test]
    fn test_extreme_indices_saturate() {
        let far = WarehouseSlot::new(i32::MAX, 1, 2);
        assert_eq!(far.coordinate(), GridCoordinate::new(i32::MAX - 1, 2));
        assert_eq!(
            WarehouseSlot::new(i32::MAX, 0, 2).coordinate(),
            GridCoordinate::new(i32::MAX, 2)
        );

        let high = WarehouseSlot::new(1, i32::MAX, 0);
        let other = WarehouseSlot::new(2, i32::MAX, 3);
        let expected = TIER_STEP * (2.0 * f64::from(i32::MAX) - 2.0);
        assert!((high.tier_cost(&other) - expected).abs() < 1e-3);

        let corner = GridCoordinate::new(i32::MIN, i32::MIN);
        let opposite = GridCoordinate::new(i32::MAX, i32::MAX);
        assert_eq!(corner.manhattan(opposite), u32::MAX);
        assert_eq!(opposite.offset(1, 1), opposite);
        assert!(far.estimate_to(&WarehouseSlot::new(0, 0, 0)).is_finite());
        assert_eq!(
            WarehouseSlot::from_coordinate(GridCoordinate::new(i32::MAX, 0)),
            WarehouseSlot::new(i32::MAX / 2 + 1, 1, 0)
        );
    }

    #[test]
    fn test_bias_score_weights() {
        let bias = AccessBias::between(GridCoordinate::new(0, 0), GridCoordinate::new(0, 10));
        let near_start = GridCoordinate::new(0, 1);
        let near_target = GridCoordinate::new(0, 9);
        assert!(bias.score(near_start) < bias.score(near_target));
        assert!(AccessBias::none().is_none());
        assert_eq!(AccessBias::none().score(near_start), 0.0);
    }
}
