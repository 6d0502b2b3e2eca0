//! Variable Neighborhood Search (VNS).
//!
//! A single-solution metaheuristic that changes neighborhood structures
//! during the search. Each round applies a random perturbation (shaking)
//! in the current neighborhood followed by local search. An improvement
//! resets the search to the first (smallest) neighborhood; otherwise the
//! next (larger) one is tried.
//!
//! [`VnsRunner`] is generic over [`VnsProblem`]; [`PickingVns`] supplies the
//! route-assignment neighborhoods used by the swarm optimizer.
//!
//! # References
//!
//! - Mladenović, N. & Hansen, P. (1997). "Variable neighborhood search",
//!   *Computers & Operations Research* 24(11), 1097-1100.
//! - Hansen, P. & Mladenović, N. (2001). "Variable neighborhood search:
//!   Principles and applications", *European Journal of Operational Research* 130(3), 449-467.

mod config;
mod picking;
mod runner;
mod types;

pub use config::VnsConfig;
pub use picking::PickingVns;
pub use runner::{VnsResult, VnsRunner};
pub use types::VnsProblem;
