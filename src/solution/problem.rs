//! Shared context for every route operator.

use crate::distance::{DistanceOracle, SHELF_ACCESS_PENALTY};
use crate::grid::{WarehouseSlot, TIER_STEP};
use crate::models::{Item, Robot};

/// One planning instance: the distance oracle, the fleet and the items
/// that must be picked.
///
/// Route operators address items and robots by index into these lists.
/// Only pure oracle queries are issued, so a problem can be shared across
/// threads during evaluation.
#[derive(Debug)]
pub struct PickingProblem<'a> {
    oracle: &'a DistanceOracle,
    robots: Vec<Robot>,
    items: Vec<Item>,
    unassigned_penalty: f64,
}

impl<'a> PickingProblem<'a> {
    /// Creates a problem with the default unassigned-item penalty.
    pub fn new(oracle: &'a DistanceOracle, robots: Vec<Robot>, items: Vec<Item>) -> Self {
        let mut problem = Self {
            oracle,
            robots,
            items,
            unassigned_penalty: 0.0,
        };
        problem.unassigned_penalty = problem.default_penalty();
        problem
    }

    /// Overrides the cost added to the objective per unassigned item.
    pub fn with_unassigned_penalty(mut self, penalty: f64) -> Self {
        self.unassigned_penalty = penalty;
        self
    }

    /// A penalty larger than the travel distance of any complete plan, so a
    /// candidate that routes every item always beats one that leaves an
    /// item out.
    ///
    /// All tours together have at most `items + robots` legs. A leg is
    /// bounded by the number of grid cells (routed) or by the span of all
    /// slot coordinates (estimated), plus both shelf penalties and the tier
    /// term.
    pub fn default_penalty(&self) -> f64 {
        let grid = self.oracle.grid();
        let slots = self
            .items
            .iter()
            .flat_map(Item::slots)
            .chain(self.robots.iter().map(Robot::start));

        let (mut max_tier, mut max_row, mut max_col) = (0, 0, 0);
        for slot in slots {
            let coord = slot.coordinate();
            max_tier = max_tier.max(slot.tier().max(0));
            max_row = max_row.max(coord.row);
            max_col = max_col.max(coord.col);
        }

        let span = f64::from(max_row) + f64::from(max_col);
        let cells = ((grid.rows() * grid.cols()) as f64).max(span);
        let leg = cells + 2.0 * SHELF_ACCESS_PENALTY + TIER_STEP * 2.0 * f64::from(max_tier);
        let legs = (self.items.len() + self.robots.len()) as f64;
        legs * leg + 1.0
    }

    /// The distance oracle.
    pub fn oracle(&self) -> &'a DistanceOracle {
        self.oracle
    }

    /// The fleet.
    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }

    /// Robot `index`.
    pub fn robot(&self, index: usize) -> &Robot {
        &self.robots[index]
    }

    /// The required items.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Item `index`.
    pub fn item(&self, index: usize) -> &Item {
        &self.items[index]
    }

    /// Number of robots.
    pub fn robot_count(&self) -> usize {
        self.robots.len()
    }

    /// Number of required items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Capacity of robot `index`.
    pub fn capacity(&self, robot: usize) -> u32 {
        self.robots[robot].capacity()
    }

    /// Quantity of item `index`.
    pub fn quantity(&self, item: usize) -> u32 {
        self.items[item].quantity()
    }

    /// Objective cost per unassigned item.
    pub fn unassigned_penalty(&self) -> f64 {
        self.unassigned_penalty
    }

    /// Sum of all required quantities.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity())).sum()
    }

    /// Sum of all robot capacities.
    pub fn total_capacity(&self) -> u64 {
        self.robots.iter().map(|r| u64::from(r.capacity())).sum()
    }

    /// Units carried by `route`.
    pub fn route_load(&self, route: &[usize]) -> u64 {
        route.iter().map(|&i| u64::from(self.quantity(i))).sum()
    }

    /// Whether `quantity` more units fit on robot `robot` already carrying
    /// `load`.
    pub fn fits(&self, robot: usize, load: u64, quantity: u32) -> bool {
        load + u64::from(quantity) <= u64::from(self.capacity(robot))
    }

    /// Tour length of `route` for robot `robot`: start → each item at its
    /// best slot from the previous stop → start. Empty routes cost nothing.
    pub fn route_distance(&self, robot: usize, route: &[usize]) -> f64 {
        if route.is_empty() {
            return 0.0;
        }
        let start = self.robots[robot].start();
        let mut position = start;
        let mut total = 0.0;
        for &index in route {
            let slot = self.items[index].best_slot(&position);
            total += self.oracle.measure(&position, &slot).value();
            position = slot;
        }
        total + self.oracle.measure(&position, &start).value()
    }

    /// The slots visited by `route` in order, as chosen by
    /// [`route_distance`](Self::route_distance).
    pub fn route_stops(&self, robot: usize, route: &[usize]) -> Vec<WarehouseSlot> {
        let mut position = self.robots[robot].start();
        route
            .iter()
            .map(|&index| {
                position = self.items[index].best_slot(&position);
                position
            })
            .collect()
    }

    /// Nearest-neighbour visit order of `route` from the robot's start.
    /// Ties keep the earlier entry.
    pub fn nearest_neighbor_order(&self, robot: usize, route: &[usize]) -> Vec<usize> {
        let mut remaining = route.to_vec();
        let mut ordered = Vec::with_capacity(route.len());
        let mut position = self.robots[robot].start();

        while !remaining.is_empty() {
            let mut best_pos = 0;
            let mut best_slot = self.items[remaining[0]].best_slot(&position);
            let mut best_dist = self.oracle.measure(&position, &best_slot).value();
            for (pos, &index) in remaining.iter().enumerate().skip(1) {
                let slot = self.items[index].best_slot(&position);
                let dist = self.oracle.measure(&position, &slot).value();
                if dist < best_dist {
                    best_pos = pos;
                    best_slot = slot;
                    best_dist = dist;
                }
            }
            ordered.push(remaining.remove(best_pos));
            position = best_slot;
        }

        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::WarehouseGrid;

    fn oracle() -> DistanceOracle {
        let grid = WarehouseGrid::new(vec![
            vec![0, 0, 0, 0, 0, 0],
            vec![0, 1, 1, 1, 1, 0],
            vec![0, 0, 0, 0, 0, 0],
        ])
        .unwrap();
        DistanceOracle::new(grid)
    }

    fn items() -> Vec<Item> {
        vec![
            Item::new("far", 1, WarehouseSlot::new(0, 0, 5)),
            Item::new("near", 1, WarehouseSlot::new(0, 0, 1)),
            Item::new("mid", 1, WarehouseSlot::new(0, 0, 3)),
        ]
    }

    fn robots() -> Vec<Robot> {
        vec![Robot::new("r0", 10, WarehouseSlot::new(0, 0, 0))]
    }

    #[test]
    fn test_route_distance_round_trip() {
        let oracle = oracle();
        let problem = PickingProblem::new(&oracle, robots(), items());
        assert_eq!(problem.route_distance(0, &[]), 0.0);
        assert_eq!(problem.route_distance(0, &[1, 2, 0]), 10.0);
        assert_eq!(problem.route_distance(0, &[0, 1, 2]), 14.0);
    }

    #[test]
    fn test_nearest_neighbor_order() {
        let oracle = oracle();
        let problem = PickingProblem::new(&oracle, robots(), items());
        assert_eq!(problem.nearest_neighbor_order(0, &[0, 1, 2]), vec![1, 2, 0]);
        assert!(problem.nearest_neighbor_order(0, &[]).is_empty());
    }

    #[test]
    fn test_default_penalty_dominates_complete_tours() {
        let oracle = oracle();
        let problem = PickingProblem::new(&oracle, robots(), items());
        let worst = problem.route_distance(0, &[0, 1, 2]);
        assert!(problem.unassigned_penalty() > worst);
        let custom = PickingProblem::new(&oracle, robots(), items()).with_unassigned_penalty(0.0);
        assert_eq!(custom.unassigned_penalty(), 0.0);
    }

    #[test]
    fn test_totals() {
        let oracle = oracle();
        let problem = PickingProblem::new(&oracle, robots(), items());
        assert_eq!(problem.total_quantity(), 3);
        assert_eq!(problem.total_capacity(), 10);
        assert_eq!(problem.route_load(&[0, 2]), 2);
        assert_eq!(
            problem.route_stops(0, &[2, 1]),
            vec![WarehouseSlot::new(0, 0, 3), WarehouseSlot::new(0, 0, 1)]
        );
    }
}
