//! Shortest paths on the occupancy grid.
//!
//! # Algorithm
//!
//! 1. Identical endpoints yield the single-cell path.
//! 2. Endpoints on one row or column with nothing blocked between them
//!    are joined by a straight line without searching.
//! 3. Otherwise A* over 4-neighbour unit moves with the Manhattan
//!    heuristic. Open cells are ordered by `f = g + h`, then by the
//!    smaller remaining distance `h`, which drives the search down warehouse
//!    aisles quickly. The heuristic is consistent, so the first time the
//!    goal is popped its path is shortest.
//!
//! # Reference
//!
//! Hart, P.E., Nilsson, N.J. & Raphael, B. (1968). "A Formal Basis for the
//! Heuristic Determination of Minimum Cost Paths", *IEEE Transactions on
//! Systems Science and Cybernetics* 4(2), 100-107.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::map::WarehouseGrid;
use super::types::GridCoordinate;

const MOVES: [(i32, i32); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];

impl WarehouseGrid {
    /// Shortest 4-connected path from `start` to `goal`, both inclusive.
    ///
    /// Both endpoints must already be walkable (resolve access points
    /// first). Returns an empty path when an endpoint is not walkable or no
    /// path exists; callers fall back to an estimate in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_picking::grid::{GridCoordinate, WarehouseGrid};
    ///
    /// let grid = WarehouseGrid::from_layout(1, 3).unwrap();
    /// let path = grid.shortest_path(GridCoordinate::new(0, 0), GridCoordinate::new(2, 0));
    /// assert!(path.is_empty()); // the shelf row is unbroken
    ///
    /// let path = grid.shortest_path(GridCoordinate::new(0, 0), GridCoordinate::new(0, 2));
    /// assert_eq!(path.len(), 3);
    /// ```
    pub fn shortest_path(&self, start: GridCoordinate, goal: GridCoordinate) -> Vec<GridCoordinate> {
        let (Some(start_idx), Some(goal_idx)) = (self.index(start), self.index(goal)) else {
            return Vec::new();
        };
        if !self.is_walkable(start) || !self.is_walkable(goal) {
            return Vec::new();
        }
        if start == goal {
            return vec![start];
        }
        if let Some(line) = self.straight_line(start, goal) {
            return line;
        }

        let n = self.rows() * self.cols();
        let mut g_score = vec![u32::MAX; n];
        let mut parent = vec![usize::MAX; n];
        let mut closed = vec![false; n];
        let mut open = BinaryHeap::new();

        g_score[start_idx] = 0;
        let h = start.manhattan(goal);
        open.push(Reverse((h, h, start_idx)));

        while let Some(Reverse((_, _, idx))) = open.pop() {
            if closed[idx] {
                continue;
            }
            if idx == goal_idx {
                break;
            }
            closed[idx] = true;

            let here = self.coordinate_of(idx);
            for (dr, dc) in MOVES {
                let next = here.offset(dr, dc);
                let Some(next_idx) = self.index(next) else {
                    continue;
                };
                if closed[next_idx] || !self.is_walkable(next) {
                    continue;
                }
                let tentative = g_score[idx] + 1;
                if tentative < g_score[next_idx] {
                    g_score[next_idx] = tentative;
                    parent[next_idx] = idx;
                    let h = next.manhattan(goal);
                    open.push(Reverse((tentative + h, h, next_idx)));
                }
            }
        }

        if g_score[goal_idx] == u32::MAX {
            return Vec::new();
        }

        let mut path = Vec::with_capacity(g_score[goal_idx] as usize + 1);
        let mut idx = goal_idx;
        path.push(goal);
        while idx != start_idx {
            idx = parent[idx];
            path.push(self.coordinate_of(idx));
        }
        path.reverse();
        path
    }

    /// Direct row or column walk when nothing blocks it.
    fn straight_line(&self, start: GridCoordinate, goal: GridCoordinate) -> Option<Vec<GridCoordinate>> {
        let (dr, dc) = if start.row == goal.row {
            (0, (goal.col - start.col).signum())
        } else if start.col == goal.col {
            ((goal.row - start.row).signum(), 0)
        } else {
            return None;
        };

        let steps = start.manhattan(goal) as i32;
        let line: Vec<GridCoordinate> = (0..=steps)
            .map(|i| start.offset(dr * i, dc * i))
            .collect();

        if line.iter().all(|&c| self.is_walkable(c)) {
            Some(line)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn aisle_grid() -> WarehouseGrid {
        WarehouseGrid::from_layout(2, 5).unwrap()
    }

    /// Shelves with a cross aisle in column 0.
    fn cross_aisle_grid() -> WarehouseGrid {
        WarehouseGrid::new(vec![
            vec![0, 0, 0, 0, 0],
            vec![0, 1, 1, 1, 1],
            vec![0, 0, 0, 0, 0],
            vec![0, 1, 1, 1, 1],
            vec![0, 0, 0, 0, 0],
        ])
        .unwrap()
    }

    fn assert_connected(path: &[GridCoordinate], grid: &WarehouseGrid) {
        for w in path.windows(2) {
            assert_eq!(w[0].manhattan(w[1]), 1, "non-adjacent step {:?} -> {:?}", w[0], w[1]);
        }
        assert!(path.iter().all(|&c| grid.is_walkable(c)));
    }

    #[test]
    fn test_same_cell() {
        let grid = aisle_grid();
        let c = GridCoordinate::new(2, 2);
        assert_eq!(grid.shortest_path(c, c), vec![c]);
    }

    #[test]
    fn test_straight_line_both_directions() {
        let grid = aisle_grid();
        let a = GridCoordinate::new(2, 0);
        let b = GridCoordinate::new(2, 4);
        let forward = grid.shortest_path(a, b);
        assert_eq!(forward.len(), 5);
        assert_eq!(forward[0], a);
        assert_eq!(forward[4], b);

        let backward = grid.shortest_path(b, a);
        assert_eq!(backward.first(), Some(&b));
        assert_eq!(backward.last(), Some(&a));
    }

    #[test]
    fn test_blocked_endpoint_gives_empty_path() {
        let grid = aisle_grid();
        assert!(grid
            .shortest_path(GridCoordinate::new(1, 0), GridCoordinate::new(0, 0))
            .is_empty());
        assert!(grid
            .shortest_path(GridCoordinate::new(0, 0), GridCoordinate::new(9, 9))
            .is_empty());
    }

    #[test]
    fn test_disconnected_aisles() {
        let grid = aisle_grid();
        assert!(grid
            .shortest_path(GridCoordinate::new(0, 0), GridCoordinate::new(4, 4))
            .is_empty());
    }

    #[test]
    fn test_detour_through_cross_aisle() {
        let grid = cross_aisle_grid();
        let a = GridCoordinate::new(0, 3);
        let b = GridCoordinate::new(4, 3);
        let path = grid.shortest_path(a, b);
        // 3 left, 4 down, 3 right
        assert_eq!(path.len(), 11);
        assert_eq!(path[0], a);
        assert_eq!(path[10], b);
        assert_connected(&path, &grid);
    }

    #[test]
    fn test_open_cross_aisle_is_walked_directly() {
        let grid = cross_aisle_grid();
        let path = grid.shortest_path(GridCoordinate::new(0, 0), GridCoordinate::new(4, 0));
        assert_eq!(path.len(), 5);
        assert_connected(&path, &grid);
    }

    proptest! {
        #[test]
        fn prop_path_endpoints_and_length(
            r1 in 0i32..5, c1 in 0i32..5, r2 in 0i32..5, c2 in 0i32..5,
        ) {
            let grid = cross_aisle_grid();
            let a = GridCoordinate::new(r1 * 2 % 6, c1);
            let b = GridCoordinate::new(r2 * 2 % 6, c2);
            prop_assume!(grid.is_walkable(a) && grid.is_walkable(b));

            let path = grid.shortest_path(a, b);
            prop_assert!(!path.is_empty());
            prop_assert_eq!(path[0], a);
            prop_assert_eq!(*path.last().unwrap(), b);
            prop_assert!(path.len() as u32 >= a.manhattan(b) + 1);
            for w in path.windows(2) {
                prop_assert_eq!(w[0].manhattan(w[1]), 1);
            }
        }
    }
}
