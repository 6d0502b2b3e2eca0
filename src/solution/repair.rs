//! Capacity and completeness repair.

use super::assignment::RouteAssignment;
use super::problem::PickingProblem;

/// Which robot gives up its last item when a missing item fits nowhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EvictionPolicy {
    /// The robot with the most items on its route.
    #[default]
    LongestRoute,
    /// The robot carrying the most units.
    HeaviestRoute,
}

impl RouteAssignment {
    /// Drops items from the tail of `robot`'s route until it is within
    /// capacity. Dropped items become unassigned and are returned in
    /// removal order.
    pub fn trim_to_capacity(&mut self, problem: &PickingProblem<'_>, robot: usize) -> Vec<usize> {
        let capacity = u64::from(problem.capacity(robot));
        let mut load = self.load(problem, robot);
        let mut removed = Vec::new();
        while load > capacity {
            let Some(item) = self.routes[robot].pop() else {
                break;
            };
            load -= u64::from(problem.quantity(item));
            removed.push(item);
        }
        self.unassigned.extend_from_slice(&removed);
        removed
    }

    /// Brings `robot` back within capacity by moving tail items to the
    /// first other robot with room. Items no robot can take become
    /// unassigned.
    pub fn repair_capacity(&mut self, problem: &PickingProblem<'_>, robot: usize) {
        let capacity = u64::from(problem.capacity(robot));
        while self.load(problem, robot) > capacity {
            let Some(item) = self.routes[robot].pop() else {
                break;
            };
            let quantity = problem.quantity(item);
            let target = (0..self.routes.len())
                .filter(|&r| r != robot)
                .find(|&r| problem.fits(r, self.load(problem, r), quantity));

            match target {
                Some(r) => self.routes[r].push(item),
                None => {
                    tracing::warn!(
                        item = problem.item(item).name(),
                        quantity,
                        robot = problem.robot(robot).id(),
                        "item fits on no robot, leaving it unassigned"
                    );
                    self.unassigned.push(item);
                }
            }
        }
    }

    /// Makes the candidate as complete as capacity allows.
    ///
    /// 1. Repeated and out-of-range item indices are removed; the first
    ///    occurrence stays.
    /// 2. Overloaded routes are trimmed from the tail.
    /// 3. Each missing item goes to the first robot with room. If there is
    ///    none, a robot chosen by `policy` whose tail item makes enough room
    ///    gives that item up; the evicted item then goes to the first robot
    ///    with room or stays unassigned.
    ///
    /// Capacity holds on every route afterwards.
    pub fn ensure_all_assigned(&mut self, problem: &PickingProblem<'_>, policy: EvictionPolicy) {
        let item_count = problem.item_count();
        let mut routed = vec![false; item_count];
        for route in &mut self.routes {
            route.retain(|&item| item < item_count && !std::mem::replace(&mut routed[item], true));
        }

        for robot in 0..self.routes.len() {
            self.trim_to_capacity(problem, robot);
        }
        self.refresh_unassigned(item_count);

        let missing = std::mem::take(&mut self.unassigned);
        let mut loads: Vec<u64> = (0..self.routes.len())
            .map(|r| self.load(problem, r))
            .collect();
        let mut unplaced = Vec::new();

        for item in missing {
            let quantity = problem.quantity(item);
            if let Some(r) = first_fit(problem, &loads, quantity) {
                self.routes[r].push(item);
                loads[r] += u64::from(quantity);
                continue;
            }

            let Some(victim) = self.eviction_victim(problem, &loads, quantity, policy) else {
                unplaced.push(item);
                continue;
            };
            let Some(evicted) = self.routes[victim].pop() else {
                unplaced.push(item);
                continue;
            };
            let evicted_quantity = problem.quantity(evicted);
            loads[victim] = loads[victim] - u64::from(evicted_quantity) + u64::from(quantity);
            self.routes[victim].push(item);

            match first_fit(problem, &loads, evicted_quantity) {
                Some(r) => {
                    self.routes[r].push(evicted);
                    loads[r] += u64::from(evicted_quantity);
                }
                None => unplaced.push(evicted),
            }
        }

        if !unplaced.is_empty() {
            tracing::trace!(count = unplaced.len(), "items left unassigned after repair");
        }
        unplaced.sort_unstable();
        self.unassigned = unplaced;
    }

    fn eviction_victim(
        &self,
        problem: &PickingProblem<'_>,
        loads: &[u64],
        quantity: u32,
        policy: EvictionPolicy,
    ) -> Option<usize> {
        let candidates = self.routes.iter().enumerate().filter(|&(r, route)| {
            route.last().is_some_and(|&tail| {
                let freed = loads[r] - u64::from(problem.quantity(tail));
                problem.fits(r, freed, quantity)
            })
        });

        // Ties keep the lower robot index.
        let chosen = match policy {
            EvictionPolicy::LongestRoute => {
                candidates.min_by_key(|&(_, route)| std::cmp::Reverse(route.len()))
            }
            EvictionPolicy::HeaviestRoute => {
                candidates.min_by_key(|&(r, _)| std::cmp::Reverse(loads[r]))
            }
        };
        chosen.map(|(r, _)| r)
    }
}

fn first_fit(problem: &PickingProblem<'_>, loads: &[u64], quantity: u32) -> Option<usize> {
    loads
        .iter()
        .enumerate()
        .find(|&(r, &load)| problem.fits(r, load, quantity))
        .map(|(r, _)| r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceOracle;
    use crate::grid::{WarehouseGrid, WarehouseSlot};
    use crate::models::{Item, Robot};
    use proptest::prelude::*;
    use u_numflow::random::create_rng;

    fn oracle() -> DistanceOracle {
        DistanceOracle::new(WarehouseGrid::from_layout(2, 6).unwrap())
    }

    fn items(quantities: &[u32]) -> Vec<Item> {
        quantities
            .iter()
            .enumerate()
            .map(|(i, &q)| Item::new(format!("i{i}"), q, WarehouseSlot::new(1, 1, (i % 6) as i32)))
            .collect()
    }

    fn fleet(capacities: &[u32]) -> Vec<Robot> {
        capacities
            .iter()
            .enumerate()
            .map(|(i, &c)| Robot::new(format!("r{i}"), c, WarehouseSlot::new(0, 0, 0)))
            .collect()
    }

    #[test]
    fn test_trim_to_capacity_pops_tail() {
        let oracle = oracle();
        let problem = PickingProblem::new(&oracle, fleet(&[5]), items(&[2, 2, 2]));
        let mut solution = RouteAssignment::from_routes(vec![vec![0, 1, 2]]);
        let removed = solution.trim_to_capacity(&problem, 0);
        assert_eq!(removed, vec![2]);
        assert_eq!(solution.route(0), &[0, 1]);
        assert_eq!(solution.unassigned(), &[2]);
    }

    #[test]
    fn test_repair_capacity_moves_to_other_robot() {
        let oracle = oracle();
        let problem = PickingProblem::new(&oracle, fleet(&[4, 4]), items(&[2, 2, 2]));
        let mut solution = RouteAssignment::from_routes(vec![vec![0, 1, 2], vec![]]);
        solution.repair_capacity(&problem, 0);
        assert_eq!(solution.route(0), &[0, 1]);
        assert_eq!(solution.route(1), &[2]);
        assert!(solution.unassigned().is_empty());
    }

    #[test]
    fn test_ensure_all_assigned_removes_duplicates() {
        let oracle = oracle();
        let problem = PickingProblem::new(&oracle, fleet(&[10, 10]), items(&[1, 1, 1]));
        let mut solution = RouteAssignment::from_routes(vec![vec![0, 1, 0], vec![1, 9]]);
        solution.ensure_all_assigned(&problem, EvictionPolicy::default());
        assert_eq!(solution.route(0), &[0, 1, 2]);
        assert!(solution.route(1).is_empty());
        assert!(solution.unassigned().is_empty());
    }

    #[test]
    fn test_ensure_all_assigned_places_missing_first_fit() {
        let oracle = oracle();
        let problem = PickingProblem::new(&oracle, fleet(&[3, 5]), items(&[3, 2, 3]));
        let mut solution = RouteAssignment::from_routes(vec![vec![0], vec![]]);
        solution.ensure_all_assigned(&problem, EvictionPolicy::LongestRoute);
        assert_eq!(solution.route(0), &[0]);
        assert_eq!(solution.route(1), &[1, 2]);
        assert!(solution.unassigned().is_empty());
    }

    #[test]
    fn test_eviction_longest_route() {
        let oracle = oracle();
        // Item 3 (qty 4) fits nowhere; robot 0 has the longest route and
        // dropping its tail (qty 4) makes room. The evicted item fits nowhere.
        let problem = PickingProblem::new(&oracle, fleet(&[6, 6]), items(&[1, 1, 4, 4, 5]));
        let mut solution = RouteAssignment::from_routes(vec![vec![0, 1, 2], vec![4]]);
        solution.ensure_all_assigned(&problem, EvictionPolicy::LongestRoute);
        assert_eq!(solution.route(0), &[0, 1, 3]);
        assert_eq!(solution.route(1), &[4]);
        assert_eq!(solution.unassigned(), &[2]);
        assert!(solution.is_capacity_feasible(&problem));
    }

    #[test]
    fn test_eviction_heaviest_route() {
        let oracle = oracle();
        // Robot 1 is heavier; its tail (qty 5) makes room for item 2 (qty 5),
        // then the evicted item fits nowhere.
        let problem = PickingProblem::new(&oracle, fleet(&[6, 6]), items(&[1, 1, 5, 5]));
        let mut solution = RouteAssignment::from_routes(vec![vec![0, 1], vec![3]]);
        solution.ensure_all_assigned(&problem, EvictionPolicy::HeaviestRoute);
        assert_eq!(solution.route(0), &[0, 1]);
        assert_eq!(solution.route(1), &[2]);
        assert_eq!(solution.unassigned(), &[3]);
    }

    #[test]
    fn test_oversized_item_stays_unassigned() {
        let oracle = oracle();
        let problem = PickingProblem::new(&oracle, fleet(&[3, 3]), items(&[1, 9]));
        let mut solution = RouteAssignment::new(2);
        solution.ensure_all_assigned(&problem, EvictionPolicy::LongestRoute);
        assert_eq!(solution.route(0), &[0]);
        assert_eq!(solution.unassigned(), &[1]);
    }

    proptest! {
        #[test]
        fn prop_capacity_and_partition_hold(
            quantities in proptest::collection::vec(1u32..6, 1..12),
            capacities in proptest::collection::vec(1u32..12, 1..4),
            seed in 0u64..1000,
            heaviest in any::<bool>(),
        ) {
            let oracle = oracle();
            let problem = PickingProblem::new(&oracle, fleet(&capacities), items(&quantities));
            let mut rng = create_rng(seed);
            let mut solution = RouteAssignment::initialize_random(&problem, &mut rng);
            prop_assert!(solution.is_capacity_feasible(&problem));

            // Duplicate a routed item onto another route, then repair.
            if let Some(&item) = solution.routes().iter().flatten().next() {
                let last = solution.robot_count() - 1;
                solution.routes[last].insert(0, item);
            }
            let policy = if heaviest { EvictionPolicy::HeaviestRoute } else { EvictionPolicy::LongestRoute };
            solution.ensure_all_assigned(&problem, policy);
            prop_assert!(solution.is_capacity_feasible(&problem));

            let mut seen: Vec<usize> = solution.routes().iter().flatten().copied().collect();
            seen.extend_from_slice(solution.unassigned());
            seen.sort_unstable();
            let expected: Vec<usize> = (0..quantities.len()).collect();
            prop_assert_eq!(seen, expected);

            let total: u64 = quantities.iter().map(|&q| u64::from(q)).sum();
            let fleet_capacity: u64 = capacities.iter().map(|&c| u64::from(c)).sum();
            if capacities.len() == 1 && total <= fleet_capacity {
                prop_assert!(solution.unassigned().is_empty());
            }
        }
    }
}
