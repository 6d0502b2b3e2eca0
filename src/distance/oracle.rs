//! Grid-backed distance oracle with a directional leg cache.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::types::{Distance, Leg, SHELF_ACCESS_PENALTY};
use crate::grid::{AccessBias, GridCoordinate, WarehouseGrid, WarehouseSlot};
use crate::models::Item;

type LegKey = (WarehouseSlot, WarehouseSlot);

/// Distance and path queries between warehouse slots, memoized per
/// directional `(from, to)` pair.
///
/// # Distance model
///
/// - identical slots are 0 apart;
/// - a blocked (shelf) endpoint is replaced by its access point and adds
///   [`SHELF_ACCESS_PENALTY`];
/// - the walked distance is the number of steps on the shortest grid path
///   between the resolved endpoints;
/// - the vertical term of [`WarehouseSlot::tier_cost`] is added;
/// - without a grid path the result is [`Distance::Estimated`] with the
///   obstacle-free [`WarehouseSlot::estimate_to`].
///
/// # Movement state
///
/// Once [`set_current_position`](Self::set_current_position) has been
/// called, [`distance`](Self::distance) and [`path`](Self::path) measure from
/// the current position instead of their `from` argument, then move the
/// current position to the destination (its access point if it is a shelf
/// cell). [`measure`](Self::measure) and [`leg`](Self::leg) ignore that state.
///
/// # Examples
///
/// ```
/// use u_picking::distance::DistanceOracle;
/// use u_picking::grid::{WarehouseGrid, WarehouseSlot};
///
/// let grid = WarehouseGrid::from_layout(2, 5).unwrap();
/// let oracle = DistanceOracle::new(grid);
/// let counter = WarehouseSlot::new(0, 0, 0);
/// let shelf = WarehouseSlot::new(1, 1, 2);
///
/// let d = oracle.measure(&counter, &shelf);
/// assert!(!d.is_estimated());
/// assert!((d.value() - 2.5).abs() < 1e-12);
/// ```
#[derive(Debug)]
pub struct DistanceOracle {
    grid: WarehouseGrid,
    cache: RwLock<HashMap<LegKey, Arc<Leg>>>,
    current: Option<WarehouseSlot>,
    precomputed: bool,
}

impl DistanceOracle {
    /// Creates an oracle with an empty cache.
    pub fn new(grid: WarehouseGrid) -> Self {
        Self {
            grid,
            cache: RwLock::new(HashMap::new()),
            current: None,
            precomputed: false,
        }
    }

    /// The underlying grid.
    pub fn grid(&self) -> &WarehouseGrid {
        &self.grid
    }

    /// Number of cached legs.
    pub fn cache_size(&self) -> usize {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether [`precompute_all`](Self::precompute_all) has run since the
    /// last [`clear`](Self::clear).
    pub fn is_precomputed(&self) -> bool {
        self.precomputed
    }

    /// Drops every cached leg and the movement state.
    pub fn clear(&mut self) {
        self.cache
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.current = None;
        self.precomputed = false;
    }

    // ---- pure queries ----

    /// Distance from `from` to `to`, ignoring movement state.
    pub fn measure(&self, from: &WarehouseSlot, to: &WarehouseSlot) -> Distance {
        self.leg(from, to).distance
    }

    /// Cached leg from `from` to `to`, computing it on a miss.
    pub fn leg(&self, from: &WarehouseSlot, to: &WarehouseSlot) -> Arc<Leg> {
        let key = (*from, *to);
        if let Some(leg) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Arc::clone(leg);
        }

        tracing::trace!(%from, %to, "distance cache miss");
        let leg = Arc::new(self.compute_leg(from, to));
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(cache.entry(key).or_insert(leg))
    }

    fn compute_leg(&self, from: &WarehouseSlot, to: &WarehouseSlot) -> Leg {
        let from_cell = self.grid.locate(from);
        if from == to {
            return Leg {
                distance: Distance::Routed(0.0),
                path: vec![from_cell],
            };
        }

        let to_cell = self.grid.locate(to);
        let from_shelf = !self.grid.is_walkable(from_cell);
        let to_shelf = !self.grid.is_walkable(to_cell);

        let start = if from_shelf {
            self.grid
                .resolve_access_point(from_cell, AccessBias::toward(to_cell))
        } else {
            from_cell
        };
        let goal = if to_shelf {
            self.grid.resolve_access_point(to_cell, AccessBias::from(start))
        } else {
            to_cell
        };

        let path = self.grid.shortest_path(start, goal);
        if path.is_empty() {
            tracing::trace!(%from, %to, "no grid path, using estimate");
            return Leg {
                distance: Distance::Estimated(from.estimate_to(to)),
                path,
            };
        }

        let mut value = (path.len() - 1) as f64 + from.tier_cost(to);
        if from_shelf {
            value += SHELF_ACCESS_PENALTY;
        }
        if to_shelf {
            value += SHELF_ACCESS_PENALTY;
        }

        Leg {
            distance: Distance::Routed(value),
            path,
        }
    }

    // ---- sequential movement ----

    /// Places the moving picker at `slot`.
    pub fn set_current_position(&mut self, slot: WarehouseSlot) {
        self.current = Some(slot);
    }

    /// The moving picker's position, if one has been set.
    pub fn current_position(&self) -> Option<WarehouseSlot> {
        self.current
    }

    /// Forgets the moving picker's position.
    pub fn clear_current_position(&mut self) {
        self.current = None;
    }

    /// Distance for one "go to `to`" step of the moving picker.
    ///
    /// With a current position set, `from` is ignored: the distance is
    /// measured from the current position, which then moves to `to` (or to
    /// `to`'s access point when `to` is a shelf cell). Without one this is
    /// [`measure`](Self::measure).
    pub fn distance(&mut self, from: &WarehouseSlot, to: &WarehouseSlot) -> Distance {
        match self.current {
            Some(origin) => {
                let leg = self.leg(&origin, to);
                self.current = Some(self.arrival(to, &leg));
                leg.distance
            }
            None => self.measure(from, to),
        }
    }

    /// Path for one "go to `to`" step of the moving picker.
    ///
    /// Same position override as [`distance`](Self::distance); afterwards
    /// the current position is the last cell of the returned path when it is
    /// walkable, otherwise `to`'s access point.
    pub fn path(&mut self, from: &WarehouseSlot, to: &WarehouseSlot) -> Vec<GridCoordinate> {
        match self.current {
            Some(origin) => {
                let leg = self.leg(&origin, to);
                self.current = Some(self.arrival(to, &leg));
                leg.path.clone()
            }
            None => self.leg(from, to).path.clone(),
        }
    }

    fn arrival(&self, to: &WarehouseSlot, leg: &Leg) -> WarehouseSlot {
        let cell = self.grid.locate(to);
        if self.grid.is_walkable(cell) {
            return *to;
        }
        // Identity legs end on the shelf cell itself and estimated legs have
        // no path; both fall back to the access point.
        let stop = match leg.path.last() {
            Some(&last) if self.grid.is_walkable(last) => last,
            _ => self.grid.resolve_access_point(cell, AccessBias::none()),
        };
        WarehouseSlot::from_coordinate(stop)
    }

    // ---- warm-up ----

    /// Fills the cache with every counter↔item and item↔item leg (both
    /// directions, alternative slots included).
    ///
    /// The movement state is reset to `counter` before and after. A second
    /// call before [`clear`](Self::clear) does nothing. Returns the number of
    /// legs added.
    pub fn precompute_all(&mut self, items: &[Item], counter: &WarehouseSlot) -> usize {
        if self.precomputed {
            return 0;
        }
        self.current = Some(*counter);
        let before = self.cache_size();

        let mut slots: Vec<WarehouseSlot> = items.iter().flat_map(|item| item.slots()).collect();
        slots.sort();
        slots.dedup();

        let mut pairs: Vec<LegKey> = Vec::with_capacity(slots.len() * (slots.len() + 1));
        for &slot in &slots {
            pairs.push((*counter, slot));
            pairs.push((slot, *counter));
        }
        for &a in &slots {
            for &b in &slots {
                if a != b {
                    pairs.push((a, b));
                }
            }
        }

        self.warm(&pairs);

        self.precomputed = true;
        self.current = Some(*counter);
        let added = self.cache_size() - before;
        tracing::debug!(legs = added, slots = slots.len(), "precomputed distance cache");
        added
    }

    #[cfg(feature = "parallel")]
    fn warm(&self, pairs: &[LegKey]) {
        use rayon::prelude::*;
        pairs.par_iter().for_each(|(a, b)| {
            self.leg(a, b);
        });
    }

    #[cfg(not(feature = "parallel"))]
    fn warm(&self, pairs: &[LegKey]) {
        for (a, b) in pairs {
            self.leg(a, b);
        }
    }
}
