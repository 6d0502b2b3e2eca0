//! The warehouse occupancy grid.

use super::types::{AccessBias, GridCoordinate, WarehouseSlot};
use crate::error::PlanError;

/// Immutable occupancy grid of walkable aisle cells and blocked shelf cells.
///
/// Input matrices use `0` for walkable cells; any other value is blocked.
///
/// # Examples
///
/// ```
/// use u_picking::grid::{GridCoordinate, WarehouseGrid};
///
/// let grid = WarehouseGrid::from_layout(2, 4).unwrap();
/// assert_eq!((grid.rows(), grid.cols()), (5, 4));
/// assert!(grid.is_walkable(GridCoordinate::new(0, 0)));
/// assert!(!grid.is_walkable(GridCoordinate::new(1, 0)));
/// assert!(!grid.is_walkable(GridCoordinate::new(-1, 0)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WarehouseGrid {
    walkable: Vec<bool>,
    rows: usize,
    cols: usize,
}

impl WarehouseGrid {
    /// Builds a grid from a row-major occupancy matrix.
    ///
    /// # Errors
    ///
    /// [`PlanError::EmptyGrid`] when there are no cells and
    /// [`PlanError::RaggedGrid`] when rows differ in width.
    pub fn new(matrix: Vec<Vec<u8>>) -> Result<Self, PlanError> {
        let rows = matrix.len();
        let cols = matrix.first().map_or(0, Vec::len);
        if rows == 0 || cols == 0 {
            return Err(PlanError::EmptyGrid);
        }

        let mut walkable = Vec::with_capacity(rows * cols);
        for (row, cells) in matrix.iter().enumerate() {
            if cells.len() != cols {
                return Err(PlanError::RaggedGrid {
                    row,
                    expected: cols,
                    found: cells.len(),
                });
            }
            walkable.extend(cells.iter().map(|&c| c == 0));
        }

        Ok(Self {
            walkable,
            rows,
            cols,
        })
    }

    /// Builds the default layout for `shelves` shelves of `slots` slots:
    /// `2 * shelves + 1` rows where odd rows are shelves and even rows aisles.
    pub fn from_layout(shelves: usize, slots: usize) -> Result<Self, PlanError> {
        let rows = shelves * 2 + 1;
        let matrix = (0..rows)
            .map(|r| vec![(r % 2) as u8; slots])
            .collect::<Vec<_>>();
        Self::new(matrix)
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of walkable cells.
    pub fn walkable_count(&self) -> usize {
        self.walkable.iter().filter(|&&w| w).count()
    }

    /// Whether `coord` lies inside the grid.
    pub fn contains(&self, coord: GridCoordinate) -> bool {
        coord.row >= 0
            && coord.col >= 0
            && (coord.row as usize) < self.rows
            && (coord.col as usize) < self.cols
    }

    /// Whether `coord` is inside the grid and not blocked.
    pub fn is_walkable(&self, coord: GridCoordinate) -> bool {
        self.index(coord).is_some_and(|i| self.walkable[i])
    }

    /// Occupancy value of `coord`: `Some(0)` walkable, `Some(1)` blocked,
    /// `None` outside the grid.
    pub fn cell(&self, coord: GridCoordinate) -> Option<u8> {
        self.index(coord).map(|i| u8::from(!self.walkable[i]))
    }

    /// The grid cell of a slot, clamped into the grid bounds.
    pub fn locate(&self, slot: &WarehouseSlot) -> GridCoordinate {
        let raw = slot.coordinate();
        GridCoordinate::new(
            raw.row.clamp(0, self.rows as i32 - 1),
            raw.col.clamp(0, self.cols as i32 - 1),
        )
    }

    /// The walkable cell a picker stands on to reach `coord`.
    ///
    /// Walkable cells resolve to themselves. Otherwise the four adjacent
    /// cells are tried (up, down, left, right), then rings of growing
    /// Manhattan radius. Within the nearest ring that has a walkable cell,
    /// the candidate with the lowest [`AccessBias::score`] wins; ties keep
    /// scan order. A grid with no reachable walkable cell returns `coord`
    /// unchanged.
    pub fn resolve_access_point(&self, coord: GridCoordinate, bias: AccessBias) -> GridCoordinate {
        if self.is_walkable(coord) {
            return coord;
        }

        let max_radius = (self.rows + self.cols) as i32;
        for radius in 1..=max_radius {
            let candidates: Vec<GridCoordinate> = ring(coord, radius)
                .into_iter()
                .filter(|&c| self.is_walkable(c))
                .collect();

            if let Some(best) = pick_biased(&candidates, bias) {
                return best;
            }
        }

        coord
    }

    pub(super) fn index(&self, coord: GridCoordinate) -> Option<usize> {
        if self.contains(coord) {
            Some(coord.row as usize * self.cols + coord.col as usize)
        } else {
            None
        }
    }

    pub(super) fn coordinate_of(&self, index: usize) -> GridCoordinate {
        GridCoordinate::new((index / self.cols) as i32, (index % self.cols) as i32)
    }
}

/// Cells at exactly Manhattan distance `radius`: the four axis cells first
/// (up, down, left, right), then the remaining ring cells row by row.
fn ring(center: GridCoordinate, radius: i32) -> Vec<GridCoordinate> {
    let mut cells = vec![
        center.offset(-radius, 0),
        center.offset(radius, 0),
        center.offset(0, -radius),
        center.offset(0, radius),
    ];
    for dr in (-radius + 1)..radius {
        if dr == 0 {
            continue;
        }
        let dc = radius - dr.abs();
        cells.push(center.offset(dr, -dc));
        cells.push(center.offset(dr, dc));
    }
    cells
}

fn pick_biased(candidates: &[GridCoordinate], bias: AccessBias) -> Option<GridCoordinate> {
    let first = *candidates.first()?;
    if bias.is_none() || candidates.len() == 1 {
        return Some(first);
    }

    let mut best = first;
    let mut best_score = bias.score(first);
    for &candidate in &candidates[1..] {
        let score = bias.score(candidate);
        if score < best_score {
            best = candidate;
            best_score = score;
        }
    }
    Some(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aisle_grid() -> WarehouseGrid {
        // 5x5, shelves on odd rows
        WarehouseGrid::from_layout(2, 5).unwrap()
    }

    #[test]
    fn test_new_rejects_empty() {
        assert_eq!(WarehouseGrid::new(vec![]), Err(PlanError::EmptyGrid));
        assert_eq!(WarehouseGrid::new(vec![vec![]]), Err(PlanError::EmptyGrid));
    }

    #[test]
    fn test_new_rejects_ragged() {
        let err = WarehouseGrid::new(vec![vec![0, 0], vec![0]]).unwrap_err();
        assert_eq!(
            err,
            PlanError::RaggedGrid {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_walkability() {
        let grid = aisle_grid();
        assert_eq!(grid.walkable_count(), 15);
        assert!(grid.is_walkable(GridCoordinate::new(2, 3)));
        assert!(!grid.is_walkable(GridCoordinate::new(3, 3)));
        assert!(!grid.is_walkable(GridCoordinate::new(0, 5)));
        assert!(!grid.is_walkable(GridCoordinate::new(5, 0)));
        assert_eq!(grid.cell(GridCoordinate::new(2, 3)), Some(0));
        assert_eq!(grid.cell(GridCoordinate::new(1, 3)), Some(1));
        assert_eq!(grid.cell(GridCoordinate::new(-1, 0)), None);
    }

    #[test]
    fn test_locate_clamps() {
        let grid = aisle_grid();
        assert_eq!(grid.locate(&WarehouseSlot::new(3, 1, 2)), GridCoordinate::new(4, 2));
        assert_eq!(grid.locate(&WarehouseSlot::new(1, 1, 9)), GridCoordinate::new(1, 4));
    }

    #[test]
    fn test_access_point_of_walkable_cell_is_itself() {
        let grid = aisle_grid();
        let c = GridCoordinate::new(2, 2);
        assert_eq!(grid.resolve_access_point(c, AccessBias::none()), c);
    }

    #[test]
    fn test_access_point_prefers_upper_aisle_without_bias() {
        let grid = aisle_grid();
        let shelf = GridCoordinate::new(3, 2);
        assert_eq!(
            grid.resolve_access_point(shelf, AccessBias::none()),
            GridCoordinate::new(2, 2)
        );
    }

    #[test]
    fn test_access_point_follows_bias() {
        let grid = aisle_grid();
        let shelf = GridCoordinate::new(3, 2);
        let below = GridCoordinate::new(4, 0);
        assert_eq!(
            grid.resolve_access_point(shelf, AccessBias::from(below)),
            GridCoordinate::new(4, 2)
        );
        assert_eq!(
            grid.resolve_access_point(shelf, AccessBias::toward(below)),
            GridCoordinate::new(4, 2)
        );
    }

    #[test]
    fn test_access_point_expanding_ring() {
        // Only the far corner is walkable.
        let grid = WarehouseGrid::new(vec![
            vec![1, 1, 1],
            vec![1, 1, 1],
            vec![1, 1, 0],
        ])
        .unwrap();
        assert_eq!(
            grid.resolve_access_point(GridCoordinate::new(0, 0), AccessBias::none()),
            GridCoordinate::new(2, 2)
        );
    }

    #[test]
    fn test_access_point_without_walkable_cells() {
        let grid = WarehouseGrid::new(vec![vec![1, 1], vec![1, 1]]).unwrap();
        let c = GridCoordinate::new(1, 1);
        assert_eq!(grid.resolve_access_point(c, AccessBias::none()), c);
    }

    #[test]
    fn test_ring_sizes() {
        let c = GridCoordinate::new(0, 0);
        assert_eq!(ring(c, 1).len(), 4);
        assert_eq!(ring(c, 2).len(), 8);
        assert_eq!(ring(c, 3).len(), 12);
        assert!(ring(c, 3).iter().all(|p| p.manhattan(c) == 3));
    }
}
