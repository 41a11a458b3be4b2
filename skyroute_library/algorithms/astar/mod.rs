//! A* Grid Pathfinding
//!
//! Informed search over an 8-connected occupancy grid.
//!
//! # Features
//!
//! - Eight unit moves: axis-aligned (cost 1) and diagonal (cost sqrt 2)
//! - Pluggable heuristic, Euclidean by default
//! - Visit-once frontier: a cell keeps the cost of its first discovery
//! - Deterministic tie-break on equal priority (smaller `(row, col)` first)
//! - Optional expansion limit
//!
//! # Example
//!
//! ```rust
//! use skyroute_library::algorithms::astar::{a_star, heuristic};
//! use skyroute_library::algorithms::occupancy_grid::OccupancyGrid;
//!
//! let grid = OccupancyGrid::new(10, 10);
//! let (path, cost) = a_star(&grid, heuristic, (0, 0), (9, 9));
//!
//! assert_eq!(path.first(), Some(&(0, 0)));
//! assert_eq!(path.last(), Some(&(9, 9)));
//! assert!((cost - 9.0 * std::f64::consts::SQRT_2).abs() < 1e-9);
//! ```

use super::occupancy_grid::{Cell, OccupancyGrid};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::f64::consts::SQRT_2;


/// A unit move on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Action {
    /// Every action, axis-aligned moves first
    pub const ALL: [Action; 8] = [
        Action::West,
        Action::East,
        Action::North,
        Action::South,
        Action::SouthEast,
        Action::NorthEast,
        Action::SouthWest,
        Action::NorthWest,
    ];

    /// (delta_row, delta_col); north decreases the row index
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Action::North => (-1, 0),
            Action::South => (1, 0),
            Action::East => (0, 1),
            Action::West => (0, -1),
            Action::NorthEast => (-1, 1),
            Action::NorthWest => (-1, -1),
            Action::SouthEast => (1, 1),
            Action::SouthWest => (1, -1),
        }
    }

    /// Traversal cost of the move
    pub fn cost(self) -> f64 {
        if self.is_diagonal() {
            SQRT_2
        } else {
            1.0
        }
    }

    pub const fn is_diagonal(self) -> bool {
        matches!(
            self,
            Action::NorthEast | Action::NorthWest | Action::SouthEast | Action::SouthWest
        )
    }

    /// Cell reached by applying this action to `cell`
    ///
    /// Panics on overflow in debug builds; see [`Action::checked_apply`].
    pub fn apply(self, cell: Cell) -> Cell {
        let (dr, dc) = self.delta();
        (cell.0 + dr, cell.1 + dc)
    }

    /// Like [`Action::apply`], but `None` when the target leaves the `i32` range
    pub fn checked_apply(self, cell: Cell) -> Option<Cell> {
        let (dr, dc) = self.delta();
        Some((cell.0.checked_add(dr)?, cell.1.checked_add(dc)?))
    }

    /// The action moving from `from` to the adjacent cell `to`, if any
    pub fn between(from: Cell, to: Cell) -> Option<Action> {
        let delta = (to.0 - from.0, to.1 - from.1);
        Action::ALL.into_iter().find(|a| a.delta() == delta)
    }
}

/// Actions from `cell` whose target is inside the grid and free
///
/// Each diagonal is judged only by its own target cell, so moves may cut
/// past occupied corners.
pub fn valid_actions(grid: &OccupancyGrid, cell: Cell) -> Vec<Action> {
    Action::ALL
        .into_iter()
        .filter(|action| action.checked_apply(cell).is_some_and(|next| grid.is_free(next)))
        .collect()
}

/// Euclidean distance between two cells
pub fn heuristic(a: Cell, b: Cell) -> f64 {
    let dr = f64::from(a.0) - f64::from(b.0);
    let dc = f64::from(a.1) - f64::from(b.1);
    (dr * dr + dc * dc).sqrt()
}

/// Sum of step costs along a path of adjacent cells
///
/// Returns `None` if two consecutive cells are not one action apart.
pub fn path_cost(path: &[Cell]) -> Option<f64> {
    path.windows(2)
        .map(|w| Action::between(w[0], w[1]).map(Action::cost))
        .sum()
}

/// Best-known way to reach a visited cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchRecord {
    pub cost: f64,
    pub predecessor: Cell,
    pub action: Action,
}

/// Result of a search, including diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Start to goal inclusive, empty when no path was found
    pub path: Vec<Cell>,
    /// Cost of `path`, 0 when no path was found
    pub cost: f64,
    /// Cells whose neighbours were generated
    pub expansions: usize,
    pub found: bool,
}

impl SearchOutcome {
    fn not_found(expansions: usize) -> Self {
        Self {
            path: Vec::new(),
            cost: 0.0,
            expansions,
            found: false,
        }
    }
}

/// Frontier entry ordered so that `BinaryHeap` pops the smallest f first
#[derive(Debug, Clone, Copy)]
struct FrontierEntry {
    f: f64,
    cell: Cell,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap, ties go to the smaller cell
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.cell.cmp(&self.cell))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* planner over a borrowed grid
pub struct AStarPlanner<'a, H> {
    grid: &'a OccupancyGrid,
    heuristic: H,
    max_expansions: usize,
}

impl<'a, H> AStarPlanner<'a, H>
where
    H: Fn(Cell, Cell) -> f64,
{
    /// Create a planner for `grid` guided by `heuristic`
    pub fn new(grid: &'a OccupancyGrid, heuristic: H) -> Self {
        Self {
            grid,
            heuristic,
            max_expansions: 0,
        }
    }

    /// Stop after this many expansions (0 = unlimited)
    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = max_expansions;
        self
    }

    /// Search for a path from `start` to `goal`
    ///
    /// A cell is recorded the first time it is reached and is never relaxed
    /// afterwards, even if a cheaper route to it turns up later. `start` and
    /// `goal` are taken as given; see [`a_star`] for the endpoint contract.
    pub fn search(&self, start: Cell, goal: Cell) -> SearchOutcome {
        let mut frontier = BinaryHeap::new();
        let mut visited: HashSet<Cell> = HashSet::new();
        let mut branch: HashMap<Cell, SearchRecord> = HashMap::new();
        let mut expansions = 0;
        let mut found = false;

        frontier.push(FrontierEntry { f: 0.0, cell: start });
        visited.insert(start);

        while let Some(FrontierEntry { cell: current, .. }) = frontier.pop() {
            if current == goal {
                found = true;
                break;
            }

            if self.max_expansions > 0 && expansions >= self.max_expansions {
                tracing::warn!(
                    "A* stopped after {} expansions without reaching {:?}",
                    expansions,
                    goal
                );
                break;
            }
            expansions += 1;

            let current_cost = if current == start {
                0.0
            } else {
                branch.get(&current).map_or(0.0, |record| record.cost)
            };

            for action in valid_actions(self.grid, current) {
                let next = action.apply(current);
                if !visited.insert(next) {
                    continue;
                }

                let branch_cost = current_cost + action.cost();
                branch.insert(
                    next,
                    SearchRecord {
                        cost: branch_cost,
                        predecessor: current,
                        action,
                    },
                );
                frontier.push(FrontierEntry {
                    f: branch_cost + (self.heuristic)(next, goal),
                    cell: next,
                });
            }
        }

        if !found {
            tracing::warn!("Failed to find a path from {:?} to {:?}", start, goal);
            return SearchOutcome::not_found(expansions);
        }

        let (path, cost) = reconstruct_path(&branch, start, goal);
        tracing::debug!(
            "Found a path: {} cells, cost {:.3}, {} expansions",
            path.len(),
            cost,
            expansions
        );

        SearchOutcome {
            path,
            cost,
            expansions,
            found: true,
        }
    }
}

/// Walk predecessor links from goal back to start
fn reconstruct_path(
    branch: &HashMap<Cell, SearchRecord>,
    start: Cell,
    goal: Cell,
) -> (Vec<Cell>, f64) {
    if start == goal {
        return (vec![start], 0.0);
    }

    let cost = branch.get(&goal).map_or(0.0, |record| record.cost);
    let mut path = vec![goal];
    let mut current = goal;

    while let Some(record) = branch.get(&current) {
        path.push(record.predecessor);
        if record.predecessor == start {
            break;
        }
        current = record.predecessor;
    }

    path.reverse();
    (path, cost)
}

/// Plan a path with A*
///
/// Returns the start-to-goal path and its cost. When the goal cannot be
/// reached the path is empty and the cost is 0.
///
/// Endpoints are not validated: callers must pass cells inside the grid. A
/// start outside it, or on an occupied cell, is searched from as given.
/// [`FlightPlanner::plan`](crate::planner::FlightPlanner::plan) performs
/// those checks.
pub fn a_star<H>(grid: &OccupancyGrid, h: H, start: Cell, goal: Cell) -> (Vec<Cell>, f64)
where
    H: Fn(Cell, Cell) -> f64,
{
    let outcome = AStarPlanner::new(grid, h).search(start, goal);
    (outcome.path, outcome.cost)
}
