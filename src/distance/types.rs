//! Distance results.

use crate::grid::GridCoordinate;

/// Extra cost of reaching into a shelf cell from its access point.
pub const SHELF_ACCESS_PENALTY: f64 = 0.5;

/// A travel distance together with how it was obtained.
///
/// `Routed` distances come from an actual grid path. `Estimated` distances
/// are the Manhattan-plus-tier fallback used when no path exists between
/// the resolved access points.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Distance {
    /// Grid pathfinding succeeded.
    Routed(f64),
    /// No grid path; obstacle-free estimate.
    Estimated(f64),
}

impl Distance {
    /// The numeric distance regardless of provenance.
    pub fn value(self) -> f64 {
        match self {
            Distance::Routed(d) | Distance::Estimated(d) => d,
        }
    }

    /// Whether the fallback estimate was used.
    pub fn is_estimated(self) -> bool {
        matches!(self, Distance::Estimated(_))
    }
}

/// One cached directional leg between two slots.
#[derive(Debug, Clone, PartialEq)]
pub struct Leg {
    /// Distance of the leg.
    pub distance: Distance,
    /// Cell-by-cell path between the resolved access points, endpoints
    /// inclusive. Empty when the distance is estimated.
    pub path: Vec<GridCoordinate>,
}
