//! Path Pruning
//!
//! Removes redundant waypoints from a raw grid path.
//!
//! # Strategies
//!
//! - **Line of sight**: drop a waypoint when the Bresenham line between its
//!   neighbours crosses only free cells
//! - **Collinearity**: drop a waypoint when it is collinear with its
//!   neighbours, judged by the determinant of their homogeneous coordinates
//!
//! Both keep the first and last cell and never make a path longer.
//!
//! # Example
//!
//! ```rust
//! use skyroute_library::algorithms::pruning::prune_path_by_collinearity;
//!
//! let path = vec![(0, 0), (1, 1), (2, 2), (2, 3), (2, 4)];
//! assert_eq!(prune_path_by_collinearity(&path), vec![(0, 0), (2, 2), (2, 4)]);
//! ```

use super::occupancy_grid::{Cell, OccupancyGrid};
use nalgebra::Matrix3;

pub use skyroute_core::params::DEFAULT_COLLINEARITY_EPSILON;
pub use skyroute_core::PruneStrategy;

/// Check whether three points lie on one line
///
/// Forms the 3x3 matrix with rows `[x, y, 1]` and compares the magnitude of
/// its determinant against `epsilon`.
pub fn collinearity_check(p1: Cell, p2: Cell, p3: Cell, epsilon: f64) -> bool {
    #[rustfmt::skip]
    let mat = Matrix3::new(
        p1.0 as f64, p1.1 as f64, 1.0,
        p2.0 as f64, p2.1 as f64, 1.0,
        p3.0 as f64, p3.1 as f64, 1.0,
    );
    mat.determinant().abs() < epsilon
}

/// Collapse collinear runs using the default tolerance
pub fn prune_path_by_collinearity(path: &[Cell]) -> Vec<Cell> {
    prune_path_by_collinearity_with_epsilon(path, DEFAULT_COLLINEARITY_EPSILON)
}

/// Collapse collinear runs using `epsilon` as determinant tolerance
pub fn prune_path_by_collinearity_with_epsilon(path: &[Cell], epsilon: f64) -> Vec<Cell> {
    let mut pruned = path.to_vec();
    let mut i = 0;

    while i + 2 < pruned.len() {
        if collinearity_check(pruned[i], pruned[i + 1], pruned[i + 2], epsilon) {
            pruned.remove(i + 1);
        } else {
            i += 1;
        }
    }

    pruned
}

/// Drop waypoints whose neighbours have a clear line of sight
///
/// After a removal the previous anchor is rechecked, since its second
/// neighbour has changed. Every consecutive pair in the result is connected by
/// free cells.
///
/// This differs from a plain forward pass, which only retests `p[i]` against
/// the new `p[i+2]` after dropping `p[i+1]`. Stepping back to `p[i-1]` can
/// remove more waypoints than the forward pass would, and a second call on
/// the result finds nothing left to drop.
pub fn prune_path_by_line_of_sight(grid: &OccupancyGrid, path: &[Cell]) -> Vec<Cell> {
    let mut pruned = path.to_vec();
    let mut i = 0;

    while i + 2 < pruned.len() {
        if grid.line_of_sight(pruned[i], pruned[i + 2]) {
            pruned.remove(i + 1);
            i = i.saturating_sub(1);
        } else {
            i += 1;
        }
    }

    pruned
}

/// Run the pass selected by `strategy`
pub fn prune_path(
    grid: &OccupancyGrid,
    path: &[Cell],
    strategy: PruneStrategy,
    epsilon: f64,
) -> Vec<Cell> {
    let pruned = match strategy {
        PruneStrategy::None => path.to_vec(),
        PruneStrategy::LineOfSight => prune_path_by_line_of_sight(grid, path),
        PruneStrategy::Collinearity => prune_path_by_collinearity_with_epsilon(path, epsilon),
    };

    tracing::debug!(
        "Pruned path with {}: {} -> {} waypoints",
        strategy,
        path.len(),
        pruned.len()
    );

    pruned
}
