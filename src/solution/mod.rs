//! Candidate solutions and the operators that keep them feasible.
//!
//! A [`RouteAssignment`] holds item indices into a [`PickingProblem`].
//! Construction and repair never let a route exceed its robot's capacity;
//! items that cannot be placed are tracked as unassigned and priced into
//! the objective.

mod assignment;
mod problem;
mod repair;

pub use assignment::RouteAssignment;
pub use problem::PickingProblem;
pub use repair::EvictionPolicy;

pub(crate) use assignment::least_loaded;
