//! Round-robin baseline assignment.

use crate::solution::{PickingProblem, RouteAssignment};

/// Assigns items without optimization.
///
/// Item `i` goes to robot `i mod n` when it fits, otherwise to the first
/// other robot that can carry it. Items no robot can carry are left
/// unassigned and logged. Routes keep input order. The result is evaluated
/// with the same objective as the optimizer.
pub fn round_robin(problem: &PickingProblem<'_>) -> RouteAssignment {
    let mut robots = problem.robots().to_vec();
    robots.iter_mut().for_each(|r| r.clear());
    let fleet = robots.len();

    for (index, item) in problem.items().iter().enumerate() {
        if fleet == 0 {
            break;
        }
        let quantity = item.quantity();
        let preferred = index % fleet;

        let placed = robots[preferred].assign(index, quantity)
            || (0..fleet)
                .filter(|&r| r != preferred)
                .any(|r| robots[r].assign(index, quantity));

        if !placed {
            tracing::warn!(
                item = item.name(),
                quantity,
                "no robot can carry item, leaving it unassigned"
            );
        }
    }

    let mut solution =
        RouteAssignment::from_routes(robots.iter().map(|r| r.route().to_vec()).collect());
    solution.evaluate(problem);
    solution
}
