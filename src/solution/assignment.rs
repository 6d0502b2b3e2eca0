//! Candidate assignments of items to robot routes.

use rand::Rng;

use super::problem::PickingProblem;
use crate::models::Item;

/// One candidate plan: an ordered route of item indices per robot and the
/// items that are on no route.
///
/// `fitness` is the objective minimized by the optimizers:
/// `distance + unassigned_penalty × unassigned`. `distance` is the pure
/// travel distance. Both are only meaningful after
/// [`evaluate`](Self::evaluate) and are never updated incrementally.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteAssignment {
    pub(crate) routes: Vec<Vec<usize>>,
    pub(crate) unassigned: Vec<usize>,
    fitness: f64,
    distance: f64,
}

impl RouteAssignment {
    /// One empty route per robot.
    pub fn new(robot_count: usize) -> Self {
        Self::from_routes(vec![Vec::new(); robot_count])
    }

    /// Wraps existing routes. Call [`evaluate`](Self::evaluate) before
    /// reading the objective.
    pub fn from_routes(routes: Vec<Vec<usize>>) -> Self {
        Self {
            routes,
            unassigned: Vec::new(),
            fitness: f64::INFINITY,
            distance: f64::INFINITY,
        }
    }

    /// Random capacity-aware construction.
    ///
    /// Items are shuffled; each goes to the first robot (in a fresh random
    /// robot order) that can carry it, or to the least-loaded robot when
    /// none can. Every robot is then [capacity-repaired](Self::repair_capacity).
    pub fn initialize_random<R: Rng>(problem: &PickingProblem<'_>, rng: &mut R) -> Self {
        let robot_count = problem.robot_count();
        let mut solution = Self::new(robot_count);
        if robot_count == 0 {
            solution.unassigned = (0..problem.item_count()).collect();
            return solution;
        }

        let mut order: Vec<usize> = (0..problem.item_count()).collect();
        u_numflow::random::shuffle(&mut order, rng);

        let mut loads = vec![0u64; robot_count];
        let mut robots: Vec<usize> = (0..robot_count).collect();
        for item in order {
            let quantity = problem.quantity(item);
            u_numflow::random::shuffle(&mut robots, rng);
            let target = robots
                .iter()
                .copied()
                .find(|&r| problem.fits(r, loads[r], quantity))
                .unwrap_or_else(|| least_loaded(&loads));
            solution.routes[target].push(item);
            loads[target] += u64::from(quantity);
        }

        for robot in 0..robot_count {
            solution.repair_capacity(problem, robot);
        }
        solution.refresh_unassigned(problem.item_count());
        solution
    }

    /// All routes, indexed by robot.
    pub fn routes(&self) -> &[Vec<usize>] {
        &self.routes
    }

    /// Route of robot `robot`.
    pub fn route(&self, robot: usize) -> &[usize] {
        &self.routes[robot]
    }

    /// Items on no route, ascending.
    pub fn unassigned(&self) -> &[usize] {
        &self.unassigned
    }

    /// Objective value from the last evaluation.
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Travel distance from the last evaluation.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Number of routes.
    pub fn robot_count(&self) -> usize {
        self.routes.len()
    }

    /// Number of routed items.
    pub fn assigned_count(&self) -> usize {
        self.routes.iter().map(Vec::len).sum()
    }

    /// Units carried by robot `robot`.
    pub fn load(&self, problem: &PickingProblem<'_>, robot: usize) -> u64 {
        problem.route_load(&self.routes[robot])
    }

    /// Whether robot `robot` already carries an item equal to `item` by
    /// name and quantity.
    pub fn contains_like(&self, problem: &PickingProblem<'_>, robot: usize, item: &Item) -> bool {
        self.routes[robot]
            .iter()
            .any(|&i| problem.item(i).same_as(item))
    }

    /// Whether every robot is within capacity.
    pub fn is_capacity_feasible(&self, problem: &PickingProblem<'_>) -> bool {
        (0..self.routes.len()).all(|r| self.load(problem, r) <= u64::from(problem.capacity(r)))
    }

    /// Reorders robot `robot`'s route nearest-neighbour first from its start.
    /// Membership is unchanged.
    pub fn optimize_route_order(&mut self, problem: &PickingProblem<'_>, robot: usize) {
        self.routes[robot] = problem.nearest_neighbor_order(robot, &self.routes[robot]);
    }

    /// Reorders every route nearest-neighbour first.
    pub fn optimize_all_routes(&mut self, problem: &PickingProblem<'_>) {
        for robot in 0..self.routes.len() {
            self.optimize_route_order(problem, robot);
        }
    }

    /// Recomputes the unassigned list, the distance and the objective.
    /// Returns the objective.
    pub fn evaluate(&mut self, problem: &PickingProblem<'_>) -> f64 {
        self.refresh_unassigned(problem.item_count());
        self.distance = self
            .routes
            .iter()
            .enumerate()
            .map(|(robot, route)| problem.route_distance(robot, route))
            .sum();
        self.fitness = self.distance + problem.unassigned_penalty() * self.unassigned.len() as f64;
        self.fitness
    }

    pub(crate) fn refresh_unassigned(&mut self, item_count: usize) {
        let mut routed = vec![false; item_count];
        for &item in self.routes.iter().flatten() {
            if item < item_count {
                routed[item] = true;
            }
        }
        self.unassigned = (0..item_count).filter(|&i| !routed[i]).collect();
    }
}

/// Index of the smallest load; ties keep the lower index.
pub(crate) fn least_loaded(loads: &[u64]) -> usize {
    loads
        .iter()
        .enumerate()
        .min_by_key(|&(_, &load)| load)
        .map_or(0, |(r, _)| r)
}
