//! Warehouse occupancy grid and spatial addressing.
//!
//! - [`WarehouseGrid`]: immutable walkable/blocked matrix with access-point
//!   resolution and shortest paths
//! - [`WarehouseSlot`]: `(shelf, tier, slot)` storage address and its grid cell
//! - [`GridCoordinate`]: `(row, col)` cell
//! - [`AccessBias`]: tie-breaking toward the current position and next target

mod map;
mod path;
mod types;

pub use map::WarehouseGrid;
pub use types::{AccessBias, GridCoordinate, WarehouseSlot, TIER_STEP};
