//! Discrete Particle Swarm Optimization (PSO) over route assignments.
//!
//! Particles are complete [`RouteAssignment`](crate::solution::RouteAssignment)s.
//! The velocity update of continuous PSO becomes probabilistic splicing of
//! items from the personal and global best routes. The global best is
//! periodically refined with [`PickingVns`](crate::vns::PickingVns).
//!
//! # References
//!
//! - Kennedy, J. & Eberhart, R. (1995). "Particle swarm optimization",
//!   *Proceedings of ICNN'95* 4, 1942-1948.

mod config;
mod runner;
mod types;

pub use config::SwarmConfig;
pub use runner::{SwarmResult, SwarmRunner};
pub use types::Particle;
