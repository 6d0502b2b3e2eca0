//! Swarm members.

use crate::solution::RouteAssignment;

/// A swarm member: its current assignment and the best one it has seen.
#[derive(Debug, Clone)]
pub struct Particle {
    /// Current position.
    pub position: RouteAssignment,
    /// Personal best position.
    pub best: RouteAssignment,
}

impl Particle {
    /// A particle whose personal best is its starting position.
    pub fn new(position: RouteAssignment) -> Self {
        Self {
            best: position.clone(),
            position,
        }
    }

    /// Objective of the personal best.
    pub fn best_fitness(&self) -> f64 {
        self.best.fitness()
    }

    /// Adopts the current position as personal best when strictly better.
    /// Returns whether it did.
    pub fn update_best(&mut self) -> bool {
        if self.position.fitness() < self.best.fitness() {
            self.best = self.position.clone();
            true
        } else {
            false
        }
    }
}
