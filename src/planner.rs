//! Planning entry points.
//!
//! A [`Planner`] owns the warehouse grid (inside its distance oracle), the
//! robot roster and the counter slot where every tour starts and ends.
//! [`Planner::solve`] runs the swarm optimizer; [`Planner::greedy`] runs the
//! round-robin baseline. Both return a [`PickPlan`].

use crate::distance::DistanceOracle;
use crate::error::PlanError;
use crate::greedy;
use crate::grid::{GridCoordinate, WarehouseGrid, WarehouseSlot};
use crate::models::{Inventory, Item, Robot};
use crate::pso::{SwarmConfig, SwarmRunner};
use crate::solution::{PickingProblem, RouteAssignment};
use crate::vns::VnsConfig;

/// Planner configuration.
///
/// # Examples
///
/// ```
/// use u_picking::planner::PlannerConfig;
/// use u_picking::pso::SwarmConfig;
///
/// let config = PlannerConfig::default()
///     .with_swarm(SwarmConfig::default().with_max_iterations(50))
///     .with_unassigned_penalty(1_000.0);
/// assert!(config.precompute);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannerConfig {
    /// Swarm optimizer settings.
    pub swarm: SwarmConfig,
    /// Neighborhood search settings.
    pub vns: VnsConfig,
    /// Objective cost per unassigned item. `None` derives a penalty that
    /// outweighs any complete plan's distance.
    pub unassigned_penalty: Option<f64>,
    /// Warm the distance cache with every counter and item leg before
    /// optimizing. A call with the same item slots as the last warm-up
    /// reuses the cache; a different set starts from a cleared cache.
    pub precompute: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            swarm: SwarmConfig::default(),
            vns: VnsConfig::default(),
            unassigned_penalty: None,
            precompute: true,
        }
    }
}

impl PlannerConfig {
    /// Sets the swarm settings.
    pub fn with_swarm(mut self, swarm: SwarmConfig) -> Self {
        self.swarm = swarm;
        self
    }

    /// Sets the neighborhood search settings.
    pub fn with_vns(mut self, vns: VnsConfig) -> Self {
        self.vns = vns;
        self
    }

    /// Sets a fixed unassigned-item penalty.
    pub fn with_unassigned_penalty(mut self, penalty: f64) -> Self {
        self.unassigned_penalty = Some(penalty);
        self
    }

    /// Enables or disables cache warm-up.
    pub fn with_precompute(mut self, precompute: bool) -> Self {
        self.precompute = precompute;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        self.swarm.validate()?;
        self.vns.validate()?;
        if let Some(p) = self.unassigned_penalty {
            if !(p >= 0.0 && p.is_finite()) {
                return Err("unassigned_penalty must be a non-negative number".into());
            }
        }
        Ok(())
    }
}

/// One robot's share of a plan.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RobotPlan {
    /// Robot identifier.
    pub robot: String,
    /// Items in visit order.
    pub items: Vec<Item>,
    /// Cell the robot stands on to pick each item, in visit order.
    pub stops: Vec<GridCoordinate>,
    /// Tour length from the counter through every item and back.
    pub distance: f64,
}

/// The outcome of a planning call.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PickPlan {
    /// Per-robot routes, in roster order.
    pub robots: Vec<RobotPlan>,
    /// Sum of all tour lengths.
    pub total_distance: f64,
    /// Items no robot could carry.
    pub unassigned: Vec<Item>,
    /// Distance cache entries after planning.
    pub cache_size: usize,
}

impl PickPlan {
    /// Whether every required item is on some route.
    pub fn is_complete(&self) -> bool {
        self.unassigned.is_empty()
    }

    /// Total units routed.
    pub fn assigned_quantity(&self) -> u32 {
        self.robots
            .iter()
            .flat_map(|r| r.items.iter())
            .map(Item::quantity)
            .sum()
    }
}

/// Plans picking tours for a fixed warehouse and fleet.
///
/// # Examples
///
/// ```
/// use u_picking::grid::{WarehouseGrid, WarehouseSlot};
/// use u_picking::models::Inventory;
/// use u_picking::planner::Planner;
///
/// let grid = WarehouseGrid::from_layout(2, 5).unwrap();
/// let mut planner = Planner::from_fleet(grid, 1, 10, WarehouseSlot::new(0, 0, 0));
///
/// let mut inventory = Inventory::new();
/// inventory.insert("A", WarehouseSlot::new(1, 1, 2));
/// inventory.insert("B", WarehouseSlot::new(1, 1, 4));
///
/// let plan = planner.greedy(&inventory, &[("A", 3), ("B", 4)]).unwrap();
/// assert!(plan.is_complete());
/// assert_eq!(plan.robots[0].items.len(), 2);
/// ```
#[derive(Debug)]
pub struct Planner {
    oracle: DistanceOracle,
    robots: Vec<Robot>,
    counter: WarehouseSlot,
    config: PlannerConfig,
    warmed: Vec<WarehouseSlot>,
}

impl Planner {
    /// Creates a planner for `robots`, whose tours start and end at their
    /// own start slots. `counter` is where cache warm-up measures from.
    ///
    /// # Errors
    ///
    /// [`PlanError::EmptyRoster`] when `robots` is empty.
    pub fn new(
        grid: WarehouseGrid,
        robots: Vec<Robot>,
        counter: WarehouseSlot,
    ) -> Result<Self, PlanError> {
        if robots.is_empty() {
            return Err(PlanError::EmptyRoster);
        }
        Ok(Self {
            oracle: DistanceOracle::new(grid),
            robots,
            counter,
            config: PlannerConfig::default(),
            warmed: Vec::new(),
        })
    }

    /// Creates `robot_count` identical robots starting at `counter`.
    /// A count of zero is raised to one.
    pub fn from_fleet(
        grid: WarehouseGrid,
        robot_count: usize,
        capacity: u32,
        counter: WarehouseSlot,
    ) -> Self {
        if robot_count == 0 {
            tracing::warn!("robot count of zero raised to one");
        }
        let robots = (0..robot_count.max(1))
            .map(|i| Robot::new(format!("robot-{}", i + 1), capacity, counter))
            .collect();
        Self {
            oracle: DistanceOracle::new(grid),
            robots,
            counter,
            config: PlannerConfig::default(),
            warmed: Vec::new(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: PlannerConfig) -> Self {
        self.config = config;
        self
    }

    /// The configuration.
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// The roster.
    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }

    /// The counter slot.
    pub fn counter(&self) -> WarehouseSlot {
        self.counter
    }

    /// The distance oracle and its cache.
    pub fn oracle(&self) -> &DistanceOracle {
        &self.oracle
    }

    /// Empties the distance cache so the next call starts cold.
    pub fn reset_cache(&mut self) {
        self.oracle.clear();
        self.warmed.clear();
    }

    /// Optimizes assignment and visit order for `required` `(name, quantity)`
    /// pairs looked up in `inventory`.
    ///
    /// # Errors
    ///
    /// [`PlanError::UnknownItem`] for a name missing from `inventory` and
    /// [`PlanError::InvalidConfig`] for an invalid configuration.
    #[tracing::instrument(skip_all, fields(items = required.len(), robots = self.robots.len()))]
    pub fn solve<S: AsRef<str>>(
        &mut self,
        inventory: &Inventory,
        required: &[(S, u32)],
    ) -> Result<PickPlan, PlanError> {
        self.config.validate().map_err(PlanError::InvalidConfig)?;
        let items = self.prepare(inventory, required)?;

        let problem = self.problem(items);
        let result = SwarmRunner::run(&problem, &self.config.swarm, &self.config.vns);
        let plan = self.plan_from(&problem, &result.best);

        if !plan.is_complete() {
            tracing::warn!(
                unassigned = plan.unassigned.len(),
                "best plan leaves items unassigned"
            );
        }
        Ok(plan)
    }

    /// Round-robin baseline for the same inputs as [`solve`](Self::solve).
    ///
    /// # Errors
    ///
    /// As for [`solve`](Self::solve).
    pub fn greedy<S: AsRef<str>>(
        &mut self,
        inventory: &Inventory,
        required: &[(S, u32)],
    ) -> Result<PickPlan, PlanError> {
        self.config.validate().map_err(PlanError::InvalidConfig)?;
        let items = self.prepare(inventory, required)?;

        let problem = self.problem(items);
        let solution = greedy::round_robin(&problem);
        Ok(self.plan_from(&problem, &solution))
    }

    /// Cell-by-cell walk of robot `robot` in `plan`: start, each item's
    /// access point in order, back to start. Empty for an unknown robot or
    /// an empty route.
    pub fn path_for(&mut self, plan: &PickPlan, robot: usize) -> Vec<GridCoordinate> {
        let (Some(route), Some(start)) = (
            plan.robots.get(robot),
            self.robots.get(robot).map(Robot::start),
        ) else {
            return Vec::new();
        };
        if route.items.is_empty() {
            return Vec::new();
        }

        self.oracle.set_current_position(start);
        let mut previous = start;
        let mut walk: Vec<GridCoordinate> = Vec::new();
        let stops = route
            .items
            .iter()
            .map(|item| {
                previous = item.best_slot(&previous);
                previous
            })
            .collect::<Vec<_>>()
            .into_iter()
            .chain(std::iter::once(start));

        let mut from = start;
        for stop in stops {
            let leg = self.oracle.path(&from, &stop);
            let skip = usize::from(walk.last().is_some() && walk.last() == leg.first());
            walk.extend(leg.into_iter().skip(skip));
            from = stop;
        }

        self.oracle.clear_current_position();
        walk
    }

    fn prepare<S: AsRef<str>>(
        &mut self,
        inventory: &Inventory,
        required: &[(S, u32)],
    ) -> Result<Vec<Item>, PlanError> {
        let mut items = inventory.resolve(required)?;
        for item in &mut items {
            item.bind(self.oracle.grid());
        }
        if self.config.precompute {
            let mut slots: Vec<WarehouseSlot> = items.iter().flat_map(Item::slots).collect();
            slots.sort();
            slots.dedup();
            if slots != self.warmed {
                self.oracle.clear();
                self.warmed = slots;
            }
            self.oracle.precompute_all(&items, &self.counter);
            self.oracle.clear_current_position();
        }
        Ok(items)
    }

    fn problem(&self, items: Vec<Item>) -> PickingProblem<'_> {
        let problem = PickingProblem::new(&self.oracle, self.robots.clone(), items);
        match self.config.unassigned_penalty {
            Some(penalty) => problem.with_unassigned_penalty(penalty),
            None => problem,
        }
    }

    fn plan_from(&self, problem: &PickingProblem<'_>, solution: &RouteAssignment) -> PickPlan {
        let grid = self.oracle.grid();
        let robots = solution
            .routes()
            .iter()
            .enumerate()
            .map(|(r, route)| RobotPlan {
                robot: problem.robot(r).id().to_string(),
                items: route.iter().map(|&i| problem.item(i).clone()).collect(),
                stops: problem
                    .route_stops(r, route)
                    .iter()
                    .zip(route)
                    .map(|(slot, &i)| problem.item(i).access_cell(slot, grid))
                    .collect(),
                distance: problem.route_distance(r, route),
            })
            .collect();

        PickPlan {
            robots,
            total_distance: solution.distance(),
            unassigned: solution
                .unassigned()
                .iter()
                .map(|&i| problem.item(i).clone())
                .collect(),
            cache_size: self.oracle.cache_size(),
        }
    }
}
