//! Items, storage lookup and robots.

mod item;
mod robot;

pub use item::{Inventory, Item};
pub use robot::Robot;
