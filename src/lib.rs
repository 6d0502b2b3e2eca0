//! Warehouse order-picking optimizer.
//!
//! Assigns required items to a fleet of capacity-limited picking robots and
//! orders each robot's visits to minimize total travel on a grid warehouse
//! with tiered shelves.
//!
//! - **Grid**: occupancy map, slot → cell mapping, shelf access points and
//!   A* shortest paths.
//! - **Distance**: a cached oracle that turns slot pairs into travel
//!   distances, falling back to an obstacle-free estimate when no path
//!   exists.
//! - **Solution**: route assignments with capacity-aware construction and
//!   repair.
//! - **PSO**: a discrete particle swarm over route assignments.
//! - **VNS**: Variable Neighborhood Search, generic runner plus the
//!   route-assignment neighborhoods used to refine the swarm's best.
//! - **Greedy**: a round-robin baseline.
//! - **Planner**: the entry points tying the above together.
//!
//! # Example
//!
//! ```
//! use u_picking::grid::{WarehouseGrid, WarehouseSlot};
//! use u_picking::models::Inventory;
//! use u_picking::planner::{Planner, PlannerConfig};
//! use u_picking::pso::SwarmConfig;
//!
//! let grid = WarehouseGrid::from_layout(2, 5).unwrap();
//! let counter = WarehouseSlot::new(0, 0, 0);
//! let config = PlannerConfig::default()
//!     .with_swarm(SwarmConfig::default().with_max_iterations(20).with_seed(1));
//! let mut planner = Planner::from_fleet(grid, 2, 10, counter).with_config(config);
//!
//! let mut inventory = Inventory::new();
//! inventory.insert("A", WarehouseSlot::new(1, 1, 2));
//! inventory.insert("B", WarehouseSlot::new(1, 2, 4));
//! inventory.insert("C", WarehouseSlot::new(2, 1, 1));
//!
//! let plan = planner.solve(&inventory, &[("A", 3), ("B", 4), ("C", 2)]).unwrap();
//! assert!(plan.is_complete());
//! assert!(plan.total_distance > 0.0);
//! ```
//!
//! # Logging
//!
//! Progress is reported through [`tracing`]; install a subscriber to see it.

pub mod distance;
pub mod error;
pub mod greedy;
pub mod grid;
pub mod models;
pub mod planner;
pub mod pso;
pub mod solution;
pub mod vns;

pub use error::PlanError;
