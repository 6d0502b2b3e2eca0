//! Picking robots.

use crate::grid::WarehouseSlot;

/// A capacity-limited picker that starts and ends its tour at one slot.
///
/// The route holds indices into the item list of the planning run. The
/// robot tracks its load so that no call through this API can push it
/// past its capacity.
///
/// # Examples
///
/// ```
/// use u_picking::grid::WarehouseSlot;
/// use u_picking::models::Robot;
///
/// let mut robot = Robot::new("r1", 5, WarehouseSlot::new(0, 0, 0));
/// assert!(robot.assign(0, 3));
/// assert!(!robot.assign(1, 3));
/// assert_eq!(robot.load(), 3);
/// assert_eq!(robot.route(), &[0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Robot {
    id: String,
    capacity: u32,
    start: WarehouseSlot,
    position: WarehouseSlot,
    route: Vec<usize>,
    load: u32,
}

impl Robot {
    /// Creates an idle robot standing at `start`.
    pub fn new(id: impl Into<String>, capacity: u32, start: WarehouseSlot) -> Self {
        Self {
            id: id.into(),
            capacity,
            start,
            position: start,
            route: Vec::new(),
            load: 0,
        }
    }

    /// Robot identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Maximum units carried at once.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Where the tour starts and ends.
    pub fn start(&self) -> WarehouseSlot {
        self.start
    }

    /// Where the robot currently stands.
    pub fn position(&self) -> WarehouseSlot {
        self.position
    }

    /// Assigned item indices in visit order.
    pub fn route(&self) -> &[usize] {
        &self.route
    }

    /// Units currently assigned.
    pub fn load(&self) -> u32 {
        self.load
    }

    /// Capacity left.
    pub fn remaining(&self) -> u32 {
        self.capacity.saturating_sub(self.load)
    }

    /// Whether `quantity` more units fit.
    pub fn can_carry(&self, quantity: u32) -> bool {
        quantity <= self.remaining()
    }

    /// Appends an item to the route if it fits. Returns `false` and leaves
    /// the robot unchanged otherwise.
    pub fn assign(&mut self, item: usize, quantity: u32) -> bool {
        if !self.can_carry(quantity) {
            return false;
        }
        self.route.push(item);
        self.load += quantity;
        true
    }

    /// Empties the route and sends the robot back to its start.
    pub fn clear(&mut self) {
        self.route.clear();
        self.load = 0;
        self.position = self.start;
    }

    /// Updates the current position.
    pub fn move_to(&mut self, slot: WarehouseSlot) {
        self.position = slot;
    }
}
