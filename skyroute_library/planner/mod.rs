//! World-frame planning
//!
//! [`FlightPlanner`] owns one occupancy grid and its offset, and turns
//! local NED start/goal positions into pruned waypoint lists.

use crate::algorithms::astar::{heuristic, AStarPlanner};
use crate::algorithms::occupancy_grid::{create_grid, Cell, GridOffset, ObstacleRecord, OccupancyGrid};
use crate::algorithms::pruning::prune_path;
use crate::io::colliders::ColliderMap;
use serde::{Deserialize, Serialize};
use skyroute_core::{PlannerParams, SkyrouteError, SkyrouteResult};

/// A world-frame target for the vehicle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub north: f64,
    pub east: f64,
    pub altitude: f64,
    pub heading: f64,
}

impl Waypoint {
    /// `[north, east, altitude, heading]`
    pub fn to_array(&self) -> [f64; 4] {
        [self.north, self.east, self.altitude, self.heading]
    }
}

/// Everything produced by one planning run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanOutcome {
    pub start: Cell,
    pub goal: Cell,
    /// Grid path straight from the search
    pub raw_path: Vec<Cell>,
    /// Grid path after pruning
    pub path: Vec<Cell>,
    /// Cost of `raw_path`
    pub cost: f64,
    pub expansions: usize,
    pub found: bool,
    pub waypoints: Vec<Waypoint>,
}

impl PlanOutcome {
    /// Turn an empty outcome into [`SkyrouteError::PathNotFound`]
    pub fn into_result(self) -> SkyrouteResult<Self> {
        if self.found {
            Ok(self)
        } else {
            Err(SkyrouteError::PathNotFound {
                start: self.start,
                goal: self.goal,
            })
        }
    }
}

/// Grid, offset and parameters for repeated planning over one map
#[derive(Debug, Clone)]
pub struct FlightPlanner {
    params: PlannerParams,
    grid: OccupancyGrid,
    offset: GridOffset,
}

impl FlightPlanner {
    /// Build the grid for `obstacles` at the configured altitude
    ///
    /// # Errors
    ///
    /// [`SkyrouteError::Config`] for invalid parameters and
    /// [`SkyrouteError::InvalidInput`] for an empty or malformed obstacle list.
    pub fn new(obstacles: &[ObstacleRecord], params: PlannerParams) -> SkyrouteResult<Self> {
        params.validate()?;
        let (grid, offset) = create_grid(obstacles, params.flight_altitude, params.safety_distance)?;

        Ok(Self {
            params,
            grid,
            offset,
        })
    }

    pub fn from_colliders(map: &ColliderMap, params: PlannerParams) -> SkyrouteResult<Self> {
        Self::new(&map.obstacles, params)
    }

    pub fn params(&self) -> &PlannerParams {
        &self.params
    }

    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    pub fn offset(&self) -> GridOffset {
        self.offset
    }

    pub fn world_to_cell(&self, position: (f64, f64)) -> Cell {
        self.offset.world_to_cell(position.0, position.1)
    }

    pub fn cell_to_world(&self, cell: Cell) -> (f64, f64) {
        self.offset.cell_to_world(cell)
    }

    /// Plan between two local (north, east) positions
    ///
    /// A goal that cannot be reached is not an error: the outcome comes back
    /// with `found == false` and no waypoints.
    ///
    /// # Errors
    ///
    /// [`SkyrouteError::InvalidInput`] when either position falls outside the
    /// grid or on an occupied cell.
    pub fn plan(&self, start: (f64, f64), goal: (f64, f64)) -> SkyrouteResult<PlanOutcome> {
        let start_cell = self.position_to_cell("start", start)?;
        let goal_cell = self.position_to_cell("goal", goal)?;
        self.plan_cells(start_cell, goal_cell)
    }

    fn position_to_cell(&self, name: &str, position: (f64, f64)) -> SkyrouteResult<Cell> {
        self.offset
            .try_world_to_cell(position.0, position.1)
            .ok_or_else(|| {
                SkyrouteError::invalid_input(format!(
                    "{} position {:?} is outside the grid",
                    name, position
                ))
            })
    }

    /// Plan between two grid cells
    pub fn plan_cells(&self, start: Cell, goal: Cell) -> SkyrouteResult<PlanOutcome> {
        self.check_endpoint("start", start)?;
        self.check_endpoint("goal", goal)?;

        tracing::debug!("Planning from {:?} to {:?}", start, goal);

        let search = AStarPlanner::new(&self.grid, heuristic)
            .with_max_expansions(self.params.max_expansions)
            .search(start, goal);

        if !search.found {
            return Ok(PlanOutcome {
                start,
                goal,
                raw_path: Vec::new(),
                path: Vec::new(),
                cost: 0.0,
                expansions: search.expansions,
                found: false,
                waypoints: Vec::new(),
            });
        }

        let path = prune_path(
            &self.grid,
            &search.path,
            self.params.prune_strategy,
            self.params.collinearity_epsilon,
        );
        let waypoints = path.iter().map(|&cell| self.waypoint(cell)).collect();

        tracing::info!(
            "Planned {} waypoints ({} grid cells, cost {:.2})",
            path.len(),
            search.path.len(),
            search.cost
        );

        Ok(PlanOutcome {
            start,
            goal,
            raw_path: search.path,
            path,
            cost: search.cost,
            expansions: search.expansions,
            found: true,
            waypoints,
        })
    }

    fn waypoint(&self, cell: Cell) -> Waypoint {
        let (north, east) = self.cell_to_world(cell);
        Waypoint {
            north,
            east,
            altitude: self.params.flight_altitude,
            heading: 0.0,
        }
    }

    fn check_endpoint(&self, name: &str, cell: Cell) -> SkyrouteResult<()> {
        if !self.grid.contains(cell) {
            let (rows, cols) = self.grid.dimensions();
            return Err(SkyrouteError::invalid_input(format!(
                "{} cell {:?} is outside the {}x{} grid",
                name, cell, rows, cols
            )));
        }
        if self.grid.is_occupied(cell) {
            return Err(SkyrouteError::invalid_input(format!(
                "{} cell {:?} is occupied",
                name, cell
            )));
        }
        Ok(())
    }
}
