//! Neighborhoods and local search over robot route assignments.

use rand::Rng;

use super::config::VnsConfig;
use super::types::VnsProblem;
use crate::solution::{least_loaded, PickingProblem, RouteAssignment};

const EPS: f64 = 1e-9;

/// [`VnsProblem`] over [`RouteAssignment`]s of one [`PickingProblem`].
///
/// Shaking neighborhoods, in increasing strength:
///
/// 0. swap a random item between two random robots, capacity-repairing both;
/// 1. reverse a random stretch of one robot's route;
/// 2. pool every item (unassigned ones included), shuffle, hand each to the
///    least-loaded robot, capacity-repair every robot.
///
/// Local search runs up to `max_local_passes` first-improvement passes of
/// nearest-neighbour reordering, then 2-opt, then relocation of one item to
/// another robot; each accepted move starts a new pass.
///
/// Every returned solution is evaluated and within capacity.
#[derive(Debug)]
pub struct PickingVns<'p, 'a> {
    problem: &'p PickingProblem<'a>,
    max_local_passes: usize,
}

impl<'p, 'a> PickingVns<'p, 'a> {
    /// Wraps `problem` with the local search limit from `config`.
    pub fn new(problem: &'p PickingProblem<'a>, config: &VnsConfig) -> Self {
        Self {
            problem,
            max_local_passes: config.max_local_passes,
        }
    }

    fn swap_between_robots<R: Rng>(&self, solution: &mut RouteAssignment, rng: &mut R) {
        let robots = solution.robot_count();
        if robots < 2 {
            return;
        }
        let a = rng.random_range(0..robots);
        let mut b = rng.random_range(0..robots - 1);
        if b >= a {
            b += 1;
        }

        match (solution.routes[a].is_empty(), solution.routes[b].is_empty()) {
            (true, true) => return,
            (false, true) => {
                let i = rng.random_range(0..solution.routes[a].len());
                let item = solution.routes[a].remove(i);
                solution.routes[b].push(item);
            }
            (true, false) => {
                let j = rng.random_range(0..solution.routes[b].len());
                let item = solution.routes[b].remove(j);
                solution.routes[a].push(item);
            }
            (false, false) => {
                let i = rng.random_range(0..solution.routes[a].len());
                let j = rng.random_range(0..solution.routes[b].len());
                let tmp = solution.routes[a][i];
                solution.routes[a][i] = solution.routes[b][j];
                solution.routes[b][j] = tmp;
            }
        }

        solution.repair_capacity(self.problem, a);
        solution.repair_capacity(self.problem, b);
    }

    fn reverse_segment<R: Rng>(&self, solution: &mut RouteAssignment, rng: &mut R) {
        let candidates: Vec<usize> = (0..solution.robot_count())
            .filter(|&r| solution.routes[r].len() >= 2)
            .collect();
        if candidates.is_empty() {
            return;
        }
        let robot = candidates[rng.random_range(0..candidates.len())];
        let len = solution.routes[robot].len();
        let i = rng.random_range(0..len - 1);
        let j = rng.random_range(i + 1..len);
        solution.routes[robot][i..=j].reverse();
    }

    fn redistribute<R: Rng>(&self, solution: &mut RouteAssignment, rng: &mut R) {
        let robots = solution.robot_count();
        if robots == 0 {
            return;
        }
        let mut pool: Vec<usize> = solution.routes.iter_mut().flat_map(std::mem::take).collect();
        pool.append(&mut solution.unassigned);
        u_numflow::random::shuffle(&mut pool, rng);

        let mut loads = vec![0u64; robots];
        for item in pool {
            let r = least_loaded(&loads);
            solution.routes[r].push(item);
            loads[r] += u64::from(self.problem.quantity(item));
        }
        for robot in 0..robots {
            solution.repair_capacity(self.problem, robot);
        }
    }

    /// Applies the first improving move. Returns whether one was found.
    fn improve_once(&self, solution: &mut RouteAssignment, costs: &mut [f64]) -> bool {
        self.reorder_nearest(solution, costs)
            || self.two_opt(solution, costs)
            || self.relocate(solution, costs)
    }

    fn reorder_nearest(&self, solution: &mut RouteAssignment, costs: &mut [f64]) -> bool {
        for robot in 0..solution.robot_count() {
            let reordered = self.problem.nearest_neighbor_order(robot, &solution.routes[robot]);
            let cost = self.problem.route_distance(robot, &reordered);
            if cost < costs[robot] - EPS {
                solution.routes[robot] = reordered;
                costs[robot] = cost;
                return true;
            }
        }
        false
    }

    fn two_opt(&self, solution: &mut RouteAssignment, costs: &mut [f64]) -> bool {
        for robot in 0..solution.robot_count() {
            let route = &mut solution.routes[robot];
            let n = route.len();
            for i in 0..n.saturating_sub(1) {
                for j in (i + 1)..n {
                    route[i..=j].reverse();
                    let cost = self.problem.route_distance(robot, route);
                    if cost < costs[robot] - EPS {
                        costs[robot] = cost;
                        return true;
                    }
                    route[i..=j].reverse();
                }
            }
        }
        false
    }

    fn relocate(&self, solution: &mut RouteAssignment, costs: &mut [f64]) -> bool {
        let robots = solution.robot_count();
        for from in 0..robots {
            for pos in 0..solution.routes[from].len() {
                let item = solution.routes[from][pos];
                let quantity = self.problem.quantity(item);

                let mut shortened = solution.routes[from].clone();
                shortened.remove(pos);
                let from_cost = self.problem.route_distance(from, &shortened);

                for to in (0..robots).filter(|&r| r != from) {
                    if !self.problem.fits(to, solution.load(self.problem, to), quantity) {
                        continue;
                    }
                    let before = costs[from] + costs[to];
                    for insert_at in 0..=solution.routes[to].len() {
                        let mut extended = solution.routes[to].clone();
                        extended.insert(insert_at, item);
                        let to_cost = self.problem.route_distance(to, &extended);
                        if from_cost + to_cost < before - EPS {
                            solution.routes[from] = shortened;
                            solution.routes[to] = extended;
                            costs[from] = from_cost;
                            costs[to] = to_cost;
                            return true;
                        }
                    }
                }
            }
        }
        false
    }
}

impl VnsProblem for PickingVns<'_, '_> {
    type Solution = RouteAssignment;

    fn cost(&self, solution: &RouteAssignment) -> f64 {
        solution.fitness()
    }

    fn neighborhood_count(&self) -> usize {
        3
    }

    fn shake<R: Rng>(&self, solution: &RouteAssignment, k: usize, rng: &mut R) -> RouteAssignment {
        let mut next = solution.clone();
        match k % 3 {
            0 => self.swap_between_robots(&mut next, rng),
            1 => self.reverse_segment(&mut next, rng),
            _ => self.redistribute(&mut next, rng),
        }
        next.evaluate(self.problem);
        next
    }

    fn local_search(&self, solution: &RouteAssignment) -> RouteAssignment {
        let mut current = solution.clone();
        let mut costs: Vec<f64> = (0..current.robot_count())
            .map(|r| self.problem.route_distance(r, &current.routes[r]))
            .collect();

        for _ in 0..self.max_local_passes {
            if !self.improve_once(&mut current, &mut costs) {
                break;
            }
        }

        current.evaluate(self.problem);
        current
    }
}
