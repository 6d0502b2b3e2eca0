//! Error types for the planning boundary.
//!
//! Errors only surface where external input enters the crate (grid
//! construction, roster and inventory resolution, configuration). Inside
//! the optimizer nothing is fatal: unreachable cells degrade to an
//! estimated distance and items that fit nowhere are tracked as
//! unassigned.

use std::fmt;

/// Failure raised while assembling or validating planner input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// The occupancy matrix has no rows or no columns.
    EmptyGrid,
    /// A row of the occupancy matrix has a different width than row 0.
    RaggedGrid {
        /// Index of the offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// No robot roster was supplied.
    EmptyRoster,
    /// A required item name is not present in the inventory.
    UnknownItem(String),
    /// A configuration value failed validation.
    InvalidConfig(String),
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::EmptyGrid => write!(f, "warehouse grid must have at least one cell"),
            PlanError::RaggedGrid {
                row,
                expected,
                found,
            } => write!(
                f,
                "warehouse grid row {row} has {found} columns, expected {expected}"
            ),
            PlanError::EmptyRoster => write!(f, "robot roster must not be empty"),
            PlanError::UnknownItem(name) => write!(f, "item '{name}' is not stocked in the inventory"),
            PlanError::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for PlanError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            PlanError::UnknownItem("bolt".into()).to_string(),
            "item 'bolt' is not stocked in the inventory"
        );
        assert_eq!(
            PlanError::RaggedGrid {
                row: 2,
                expected: 5,
                found: 4
            }
            .to_string(),
            "warehouse grid row 2 has 4 columns, expected 5"
        );
    }
}
