//! # SkyRoute Planning Library
//!
//! Obstacle maps to collision-free flight routes on a 2D grid.
//!
//! ## Structure
//!
//! ```text
//! skyroute_library/
//! ── algorithms/     # Grid construction, A*, path pruning
//! ── io/             # Collider file loading
//! ── planner/        # World-frame planning facade
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use skyroute_library::prelude::*;
//!
//! let obstacles = vec![
//!     // Ground-level markers that only stretch the map
//!     ObstacleRecord::new(0.0, 0.0, -10.0, 0.0, 0.0, 0.0),
//!     ObstacleRecord::new(20.0, 20.0, -10.0, 0.0, 0.0, 0.0),
//!     // A tower in the middle
//!     ObstacleRecord::new(10.0, 10.0, 20.0, 2.0, 2.0, 20.0),
//! ];
//! let params = PlannerParams::default().with_safety_distance(1.0);
//! let planner = FlightPlanner::new(&obstacles, params).unwrap();
//!
//! let outcome = planner.plan((2.0, 2.0), (18.0, 18.0)).unwrap();
//! assert!(outcome.found);
//! assert_eq!(outcome.waypoints.first().map(|w| (w.north, w.east)), Some((2.0, 2.0)));
//! ```

pub mod algorithms;
pub mod io;
pub mod planner;

pub use skyroute_core::{PlannerParams, PruneStrategy, SkyrouteError, SkyrouteResult};

pub use algorithms::astar::{a_star, heuristic, valid_actions, Action, AStarPlanner, SearchOutcome};
pub use algorithms::occupancy_grid::{create_grid, Cell, GridOffset, MAX_GRID_CELLS, ObstacleRecord, OccupancyGrid};
pub use algorithms::pruning::{prune_path, prune_path_by_collinearity, prune_path_by_line_of_sight};
pub use io::colliders::{load_colliders, parse_colliders, ColliderMap, HomePosition};
pub use planner::{FlightPlanner, PlanOutcome, Waypoint};

/// Everything needed for a typical planning run
pub mod prelude {
    pub use crate::algorithms::astar::{a_star, heuristic};
    pub use crate::algorithms::occupancy_grid::{Cell, ObstacleRecord, OccupancyGrid};
    pub use crate::io::colliders::load_colliders;
    pub use crate::planner::{FlightPlanner, PlanOutcome, Waypoint};
    pub use skyroute_core::{PlannerParams, PruneStrategy, SkyrouteError, SkyrouteResult};
}
