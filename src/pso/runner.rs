//! Discrete particle swarm execution engine.
//!
//! # Algorithm
//!
//! 1. Build `swarm_size` random capacity-feasible assignments, reorder each
//!    route nearest-neighbour first and evaluate; the best is the global best
//! 2. Each iteration:
//!    a. **Move**: splice items from the personal and global best routes
//!    into every particle, trim to capacity, restore completeness
//!    b. **Evaluate** every particle (optionally in parallel)
//!    c. **Update** personal bests, then the global best, in particle order
//!    d. Every `vns_interval`-th iteration refine the global best with
//!    neighborhood search
//! 3. Reorder the global best's routes once more and return it
//!
//! Particle moves draw from one seeded RNG in a fixed order, so a run is
//! reproducible with or without parallel evaluation.

use rand::Rng;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::config::SwarmConfig;
use super::types::Particle;
use crate::solution::{PickingProblem, RouteAssignment};
use crate::vns::{PickingVns, VnsConfig, VnsRunner};

/// Result of a swarm run.
#[derive(Debug, Clone)]
pub struct SwarmResult {
    /// Best assignment found.
    pub best: RouteAssignment,
    /// Objective of `best`.
    pub best_fitness: f64,
    /// Iterations executed.
    pub iterations: usize,
    /// Global best objective after initialization and after each iteration.
    pub fitness_history: Vec<f64>,
    /// Neighborhood search calls that improved the global best.
    pub vns_improvements: usize,
}

/// Particle swarm runner.
pub struct SwarmRunner;

impl SwarmRunner {
    /// Optimizes the assignment of `problem`.
    ///
    /// `config` is assumed valid; see [`SwarmConfig::validate`].
    pub fn run(
        problem: &PickingProblem<'_>,
        config: &SwarmConfig,
        vns_config: &VnsConfig,
    ) -> SwarmResult {
        let mut rng = match config.seed {
            Some(s) => u_numflow::random::create_rng(s),
            None => u_numflow::random::create_rng(42),
        };

        tracing::info!(
            particles = config.swarm_size,
            iterations = config.max_iterations,
            items = problem.item_count(),
            robots = problem.robot_count(),
            "swarm search started"
        );

        // 1. Initial swarm
        let mut particles: Vec<Particle> = (0..config.swarm_size.max(1))
            .map(|_| Particle::new(RouteAssignment::initialize_random(problem, &mut rng)))
            .collect();
        polish_swarm(problem, &mut particles, config.parallel);

        let mut global_best = particles
            .iter()
            .map(|p| &p.best)
            .fold(None::<&RouteAssignment>, |best, candidate| match best {
                Some(b) if b.fitness() <= candidate.fitness() => Some(b),
                _ => Some(candidate),
            })
            .cloned()
            .unwrap_or_else(|| RouteAssignment::new(problem.robot_count()));

        let mut fitness_history = Vec::with_capacity(config.max_iterations + 1);
        fitness_history.push(global_best.fitness());

        let vns = PickingVns::new(problem, vns_config);
        let mut vns_improvements = 0;

        // 2. Swarm loop
        for iteration in 0..config.max_iterations {
            for particle in particles.iter_mut() {
                move_particle(
                    &mut particle.position,
                    &particle.best,
                    &global_best,
                    problem,
                    config,
                    &mut rng,
                );
            }

            evaluate_swarm(problem, &mut particles, config.parallel);

            for particle in particles.iter_mut() {
                if particle.update_best() && particle.best_fitness() < global_best.fitness() {
                    global_best = particle.best.clone();
                }
            }

            if config.vns_interval > 0 && iteration % config.vns_interval == 0 {
                let result = VnsRunner::improve(&vns, global_best.clone(), vns_config, &mut rng);
                if result.best_cost < global_best.fitness() - 1e-12 {
                    tracing::debug!(
                        iteration,
                        from = global_best.fitness(),
                        to = result.best_cost,
                        "neighborhood search improved global best"
                    );
                    global_best = result.best;
                    vns_improvements += 1;
                }
            }

            fitness_history.push(global_best.fitness());

            if (iteration + 1) % 10 == 0 {
                tracing::debug!(
                    iteration = iteration + 1,
                    best = global_best.fitness(),
                    unassigned = global_best.unassigned().len(),
                    "swarm progress"
                );
            }
        }

        // 3. Final route-order pass
        let mut polished = global_best.clone();
        polished.optimize_all_routes(problem);
        if polished.evaluate(problem) <= global_best.fitness() {
            global_best = polished;
        }

        tracing::info!(
            fitness = global_best.fitness(),
            distance = global_best.distance(),
            unassigned = global_best.unassigned().len(),
            vns_improvements,
            "swarm search finished"
        );

        SwarmResult {
            best_fitness: global_best.fitness(),
            best: global_best,
            iterations: config.max_iterations,
            fitness_history,
            vns_improvements,
        }
    }
}

/// Splices items from the best routes into `position`, then restores
/// capacity and completeness.
fn move_particle<R: Rng>(
    position: &mut RouteAssignment,
    personal: &RouteAssignment,
    global: &RouteAssignment,
    problem: &PickingProblem<'_>,
    config: &SwarmConfig,
    rng: &mut R,
) {
    for robot in 0..position.robot_count() {
        let entries = position.route(robot).len();
        for _ in 0..entries {
            if rng.random::<f64>() >= 1.0 - config.inertia_weight {
                continue;
            }
            if rng.random::<f64>() < config.cognitive {
                splice(position, robot, personal.route(robot), problem, rng);
            }
            if rng.random::<f64>() < config.social {
                splice(position, robot, global.route(robot), problem, rng);
            }
        }
    }

    for robot in 0..position.robot_count() {
        position.trim_to_capacity(problem, robot);
    }
    position.ensure_all_assigned(problem, config.eviction);
}

/// Inserts a random item of `source` at a random position of `robot`'s
/// route unless an equal item is already there.
fn splice<R: Rng>(
    position: &mut RouteAssignment,
    robot: usize,
    source: &[usize],
    problem: &PickingProblem<'_>,
    rng: &mut R,
) {
    if source.is_empty() {
        return;
    }
    let item = source[rng.random_range(0..source.len())];
    if position.contains_like(problem, robot, problem.item(item)) {
        return;
    }
    let at = rng.random_range(0..=position.routes[robot].len());
    position.routes[robot].insert(at, item);
}

fn polish_swarm(problem: &PickingProblem<'_>, particles: &mut [Particle], parallel: bool) {
    let polish = |p: &mut Particle| {
        p.position.optimize_all_routes(problem);
        p.position.evaluate(problem);
        p.best = p.position.clone();
    };

    #[cfg(feature = "parallel")]
    {
        if parallel {
            particles.par_iter_mut().for_each(polish);
            return;
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    particles.iter_mut().for_each(polish);
}

fn evaluate_swarm(problem: &PickingProblem<'_>, particles: &mut [Particle], parallel: bool) {
    let evaluate = |p: &mut Particle| {
        p.position.evaluate(problem);
    };

    #[cfg(feature = "parallel")]
    {
        if parallel {
            particles.par_iter_mut().for_each(evaluate);
            return;
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    particles.iter_mut().for_each(evaluate);
}
