//! Memoized distance and path queries between warehouse slots.
//!
//! [`DistanceOracle`] wraps a [`WarehouseGrid`](crate::grid::WarehouseGrid)
//! with a directional leg cache. Its pure queries ([`DistanceOracle::measure`],
//! [`DistanceOracle::leg`]) never touch movement state and are safe to call
//! from parallel fitness evaluations. The sequential-movement queries
//! ([`DistanceOracle::distance`], [`DistanceOracle::path`]) model a single
//! picker walking from stop to stop and take `&mut self`.

mod oracle;
mod types;

pub use oracle::DistanceOracle;
pub use types::{Distance, Leg, SHELF_ACCESS_PENALTY};
