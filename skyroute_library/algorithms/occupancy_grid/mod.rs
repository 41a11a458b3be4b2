//! 2D Occupancy Grid Construction
//!
//! Binary configuration-space grid built from axis-aligned obstacle boxes.
//!
//! # Features
//!
//! - Binary occupancy (0 = free, 1 = occupied)
//! - Obstacle inflation by a safety distance
//! - Altitude filtering against a flight plane
//! - World-grid coordinate conversion through a [`GridOffset`]
//! - Bresenham line rasterization for line-of-sight queries
//!
//! # Example
//!
//! ```rust
//! use skyroute_library::algorithms::occupancy_grid::{create_grid, ObstacleRecord};
//!
//! let obstacles = vec![
//!     ObstacleRecord::new(5.0, 5.0, 5.0, 1.0, 1.0, 5.0),
//!     ObstacleRecord::new(20.0, 20.0, 10.0, 2.0, 2.0, 10.0),
//! ];
//!
//! let (grid, offset) = create_grid(&obstacles, 5.0, 1.0).unwrap();
//! let cell = offset.world_to_cell(5.0, 5.0);
//! assert!(grid.is_occupied(cell));
//! ```

use serde::{Deserialize, Serialize};
use skyroute_core::{SkyrouteError, SkyrouteResult};

/// Largest grid `create_grid` will allocate
pub const MAX_GRID_CELLS: usize = 100_000_000;

/// Grid position as (row, col), row along north and col along east
pub type Cell = (i32, i32);

/// Axis-aligned obstacle box centered at (north, east, alt)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleRecord {
    pub north: f64,
    pub east: f64,
    pub alt: f64,
    pub half_extent_north: f64,
    pub half_extent_east: f64,
    pub half_extent_alt: f64,
}

impl ObstacleRecord {
    pub fn new(
        north: f64,
        east: f64,
        alt: f64,
        half_extent_north: f64,
        half_extent_east: f64,
        half_extent_alt: f64,
    ) -> Self {
        Self {
            north,
            east,
            alt,
            half_extent_north,
            half_extent_east,
            half_extent_alt,
        }
    }

    /// Build from a `[north, east, alt, d_north, d_east, d_alt]` row
    pub fn from_row(row: [f64; 6]) -> Self {
        Self::new(row[0], row[1], row[2], row[3], row[4], row[5])
    }

    /// Top of the box once inflated by `safety_distance`
    pub fn inflated_top(&self, safety_distance: f64) -> f64 {
        self.alt + self.half_extent_alt + safety_distance
    }

    fn validate(&self, index: usize) -> SkyrouteResult<()> {
        let values = [
            self.north,
            self.east,
            self.alt,
            self.half_extent_north,
            self.half_extent_east,
            self.half_extent_alt,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(SkyrouteError::invalid_input(format!(
                "obstacle {} has a non-finite value",
                index
            )));
        }
        if self.half_extent_north < 0.0 || self.half_extent_east < 0.0 || self.half_extent_alt < 0.0
        {
            return Err(SkyrouteError::invalid_input(format!(
                "obstacle {} has a negative half extent",
                index
            )));
        }
        Ok(())
    }
}

/// Translation from world (north, east) to grid indices
///
/// Produced together with the grid it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridOffset {
    pub north_min: i32,
    pub east_min: i32,
}

impl GridOffset {
    pub fn new(north_min: i32, east_min: i32) -> Self {
        Self {
            north_min,
            east_min,
        }
    }

    /// Convert world coordinates to the cell containing them
    ///
    /// Positions whose cell index does not fit in `i32` saturate to the
    /// nearest representable index, which lies outside any grid.
    pub fn world_to_cell(&self, north: f64, east: f64) -> Cell {
        (
            saturating_index(north, self.north_min),
            saturating_index(east, self.east_min),
        )
    }

    /// Like [`GridOffset::world_to_cell`], but `None` for non-finite
    /// positions or cell indices outside the `i32` range
    pub fn try_world_to_cell(&self, north: f64, east: f64) -> Option<Cell> {
        Some((
            checked_index(north, self.north_min)?,
            checked_index(east, self.east_min)?,
        ))
    }

    /// Convert a cell back to world coordinates of its lower corner
    pub fn cell_to_world(&self, cell: Cell) -> (f64, f64) {
        (
            (cell.0 + self.north_min) as f64,
            (cell.1 + self.east_min) as f64,
        )
    }
}

/// `floor(value) - min` as an exact integer, when it fits in `i32`
fn checked_index(value: f64, min: i32) -> Option<i32> {
    let index = value.floor() - f64::from(min);
    if index.is_finite() && index >= f64::from(i32::MIN) && index <= f64::from(i32::MAX) {
        Some(index as i32)
    } else {
        None
    }
}

fn saturating_index(value: f64, min: i32) -> i32 {
    // NaN maps to 0 under `as`; keep it off-grid instead
    if value.is_nan() {
        return i32::MIN;
    }
    (value.floor() - f64::from(min)) as i32
}

/// Binary occupancy grid, `north_size` rows by `east_size` columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    north_size: usize,
    east_size: usize,
    cells: Vec<Vec<u8>>, // 0 = free, 1 = occupied
}

impl OccupancyGrid {
    /// Create an all-free grid
    pub fn new(north_size: usize, east_size: usize) -> Self {
        Self {
            north_size,
            east_size,
            cells: vec![vec![0; east_size]; north_size],
        }
    }

    /// Build a grid from explicit rows of 0/1 values
    pub fn from_rows(rows: Vec<Vec<u8>>) -> SkyrouteResult<Self> {
        let north_size = rows.len();
        let east_size = rows.first().map_or(0, Vec::len);

        if north_size == 0 || east_size == 0 {
            return Err(SkyrouteError::invalid_input("grid must have at least one cell"));
        }
        if let Some(row) = rows.iter().position(|r| r.len() != east_size) {
            return Err(SkyrouteError::invalid_input(format!(
                "grid row {} has {} cells, expected {}",
                row,
                rows[row].len(),
                east_size
            )));
        }
        if rows.iter().flatten().any(|&v| v > 1) {
            return Err(SkyrouteError::invalid_input(
                "grid cells must be 0 (free) or 1 (occupied)",
            ));
        }

        Ok(Self {
            north_size,
            east_size,
            cells: rows,
        })
    }

    /// Mark a single cell occupied
    pub fn set_occupied(&mut self, row: usize, col: usize) {
        if row < self.north_size && col < self.east_size {
            self.cells[row][col] = 1;
        }
    }

    /// Mark the inclusive rectangle [row_lo, row_hi] x [col_lo, col_hi] occupied
    pub fn fill_rect(&mut self, row_lo: usize, row_hi: usize, col_lo: usize, col_hi: usize) {
        let row_hi = row_hi.min(self.north_size.saturating_sub(1));
        let col_hi = col_hi.min(self.east_size.saturating_sub(1));
        for row in row_lo..=row_hi {
            for col in col_lo..=col_hi {
                self.cells[row][col] = 1;
            }
        }
    }

    /// Raw cell value, `None` outside the grid
    pub fn value(&self, cell: Cell) -> Option<u8> {
        if self.contains(cell) {
            Some(self.cells[cell.0 as usize][cell.1 as usize])
        } else {
            None
        }
    }

    /// Check if the cell lies inside the grid
    pub fn contains(&self, cell: Cell) -> bool {
        cell.0 >= 0
            && cell.1 >= 0
            && (cell.0 as usize) < self.north_size
            && (cell.1 as usize) < self.east_size
    }

    /// Check if cell is inside the grid and free
    pub fn is_free(&self, cell: Cell) -> bool {
        self.value(cell) == Some(0)
    }

    /// Check if cell is occupied (out of bounds = occupied)
    pub fn is_occupied(&self, cell: Cell) -> bool {
        !self.is_free(cell)
    }

    /// True if every Bresenham cell between `from` and `to` is free
    pub fn line_of_sight(&self, from: Cell, to: Cell) -> bool {
        bresenham_line(from, to)
            .into_iter()
            .all(|cell| self.is_free(cell))
    }

    /// Get grid dimensions as (north_size, east_size)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.north_size, self.east_size)
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.cells
            .iter()
            .map(|row| row.iter().filter(|&&v| v == 1).count())
            .sum()
    }

    /// Rows of raw cell values
    pub fn rows(&self) -> &[Vec<u8>] {
        &self.cells
    }
}

/// Build the occupancy grid for a flight plane
///
/// Returns the grid together with the offset mapping world coordinates to
/// grid indices. Obstacles are rendered only when their safety-inflated top
/// rises above `flight_altitude`.
///
/// # Errors
///
/// [`SkyrouteError::InvalidInput`] when the obstacle list is empty or holds
/// non-finite or negative extents, or when the altitude or safety distance is
/// unusable.
pub fn create_grid(
    obstacles: &[ObstacleRecord],
    flight_altitude: f64,
    safety_distance: f64,
) -> SkyrouteResult<(OccupancyGrid, GridOffset)> {
    if obstacles.is_empty() {
        return Err(SkyrouteError::invalid_input(
            "cannot build a grid from an empty obstacle list",
        ));
    }
    if !flight_altitude.is_finite() {
        return Err(SkyrouteError::invalid_input("flight altitude must be finite"));
    }
    if !safety_distance.is_finite() || safety_distance < 0.0 {
        return Err(SkyrouteError::invalid_input(
            "safety distance must be finite and non-negative",
        ));
    }
    for (index, obstacle) in obstacles.iter().enumerate() {
        obstacle.validate(index)?;
    }

    let north_min = min_of(obstacles, |o| o.north - o.half_extent_north).floor();
    let north_max = max_of(obstacles, |o| o.north + o.half_extent_north).ceil();
    let east_min = min_of(obstacles, |o| o.east - o.half_extent_east).floor();
    let east_max = max_of(obstacles, |o| o.east + o.half_extent_east).ceil();

    let index_range = f64::from(i32::MIN)..=f64::from(i32::MAX);
    if ![north_min, north_max, east_min, east_max]
        .iter()
        .all(|v| index_range.contains(v))
    {
        return Err(SkyrouteError::invalid_input(
            "obstacle bounds exceed the representable grid coordinates",
        ));
    }

    let north_extent = (north_max - north_min).ceil().max(1.0);
    let east_extent = (east_max - east_min).ceil().max(1.0);
    if north_extent * east_extent > MAX_GRID_CELLS as f64 {
        return Err(SkyrouteError::invalid_input(format!(
            "a {}x{} grid exceeds the limit of {} cells",
            north_extent, east_extent, MAX_GRID_CELLS
        )));
    }

    let north_size = north_extent as usize;
    let east_size = east_extent as usize;

    let mut grid = OccupancyGrid::new(north_size, east_size);
    let mut rendered = 0;

    for obstacle in obstacles {
        if obstacle.inflated_top(safety_distance) <= flight_altitude {
            continue;
        }

        let row_lo = clamp_index(
            obstacle.north - obstacle.half_extent_north - safety_distance - north_min,
            north_size,
        );
        let row_hi = clamp_index(
            obstacle.north + obstacle.half_extent_north + safety_distance - north_min,
            north_size,
        );
        let col_lo = clamp_index(
            obstacle.east - obstacle.half_extent_east - safety_distance - east_min,
            east_size,
        );
        let col_hi = clamp_index(
            obstacle.east + obstacle.half_extent_east + safety_distance - east_min,
            east_size,
        );

        grid.fill_rect(row_lo, row_hi, col_lo, col_hi);
        rendered += 1;
    }

    let offset = GridOffset::new(north_min as i32, east_min as i32);

    tracing::debug!(
        "Built {}x{} grid at offset ({}, {}): {} of {} obstacles above {:.1} m",
        north_size,
        east_size,
        offset.north_min,
        offset.east_min,
        rendered,
        obstacles.len(),
        flight_altitude
    );

    Ok((grid, offset))
}

fn min_of(obstacles: &[ObstacleRecord], f: impl Fn(&ObstacleRecord) -> f64) -> f64 {
    obstacles.iter().map(f).fold(f64::INFINITY, f64::min)
}

fn max_of(obstacles: &[ObstacleRecord], f: impl Fn(&ObstacleRecord) -> f64) -> f64 {
    obstacles.iter().map(f).fold(f64::NEG_INFINITY, f64::max)
}

/// Clamp into [0, size - 1], then truncate to an index
fn clamp_index(value: f64, size: usize) -> usize {
    value.clamp(0.0, (size - 1) as f64) as usize
}

/// Bresenham's line algorithm
///
/// Enumerates every integer cell on the segment, both endpoints included.
pub fn bresenham_line(from: Cell, to: Cell) -> Vec<Cell> {
    let (x0, y0) = from;
    let (x1, y1) = to;
    let mut cells = Vec::new();

    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        cells.push((x, y));

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 > -dy {
            err -= dy;
            x += sx;
        }

        if e2 < dx {
            err += dx;
            y += sy;
        }
    }

    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Low boxes pinning the grid bounds to [0, 10] on both axes
    fn corner_markers() -> Vec<ObstacleRecord> {
        vec![
            ObstacleRecord::new(0.5, 0.5, -10.0, 0.5, 0.5, 0.5),
            ObstacleRecord::new(9.5, 9.5, -10.0, 0.5, 0.5, 0.5),
        ]
    }

    #[test]
    fn test_empty_obstacles_rejected() {
        let result = create_grid(&[], 5.0, 5.0);
        assert!(matches!(result, Err(SkyrouteError::InvalidInput(_))));
    }

    #[test]
    fn test_non_finite_obstacle_rejected() {
        let obstacles = vec![ObstacleRecord::new(f64::NAN, 0.0, 0.0, 1.0, 1.0, 1.0)];
        assert!(create_grid(&obstacles, 5.0, 5.0).is_err());
    }

    #[test]
    fn test_negative_extent_rejected() {
        let obstacles = vec![ObstacleRecord::new(0.0, 0.0, 0.0, -1.0, 1.0, 1.0)];
        assert!(create_grid(&obstacles, 5.0, 5.0).is_err());
    }

    #[test]
    fn test_negative_safety_distance_rejected() {
        let obstacles = vec![ObstacleRecord::new(0.0, 0.0, 0.0, 1.0, 1.0, 1.0)];
        assert!(create_grid(&obstacles, 5.0, -0.5).is_err());
    }

    #[test]
    fn test_oversized_map_rejected() {
        let obstacles = vec![
            ObstacleRecord::new(0.0, 0.0, 10.0, 1.0, 1.0, 10.0),
            ObstacleRecord::new(1.0e7, 1.0e7, 10.0, 1.0, 1.0, 10.0),
        ];
        assert!(matches!(
            create_grid(&obstacles, 5.0, 1.0),
            Err(SkyrouteError::InvalidInput(_))
        ));

        // Tiny footprint, but its coordinates do not fit a grid offset
        let obstacles = vec![ObstacleRecord::new(1.0e12, 0.0, 10.0, 1.0, 1.0, 10.0)];
        assert!(matches!(
            create_grid(&obstacles, 5.0, 1.0),
            Err(SkyrouteError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_bounds_and_offset() {
        let obstacles = vec![
            ObstacleRecord::new(-10.2, 3.0, 0.0, 1.0, 2.0, 1.0),
            ObstacleRecord::new(4.6, 30.0, 0.0, 1.0, 2.0, 1.0),
        ];

        let (grid, offset) = create_grid(&obstacles, 100.0, 0.0).unwrap();

        // north: floor(-11.2) = -12 .. ceil(5.6) = 6; east: floor(1.0) = 1 .. ceil(32.0) = 32
        assert_eq!(offset, GridOffset::new(-12, 1));
        assert_eq!(grid.dimensions(), (18, 31));
        // Both obstacles sit below the flight plane
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn test_inflated_obstacle_cells() {
        let mut obstacles = corner_markers();
        obstacles.push(ObstacleRecord::new(5.0, 5.0, 0.0, 1.0, 1.0, 1.0));

        let (grid, offset) = create_grid(&obstacles, 0.0, 1.0).unwrap();
        assert_eq!(offset, GridOffset::new(0, 0));
        assert_eq!(grid.dimensions(), (10, 10));

        // World (4..6, 4..6) lies inside the inflated footprint
        for north in 4..=6 {
            for east in 4..=6 {
                let cell = offset.world_to_cell(north as f64, east as f64);
                assert!(grid.is_occupied(cell), "cell {:?} should be occupied", cell);
            }
        }

        // Inflated by 1 on each side: rows/cols 3..=7
        assert!(grid.is_occupied((3, 3)));
        assert!(grid.is_occupied((7, 7)));
        assert!(grid.is_free((2, 5)));
        assert!(grid.is_free((8, 5)));
        assert!(grid.is_free((5, 2)));
        assert!(grid.is_free((5, 8)));
        assert_eq!(grid.occupied_count(), 25);
    }

    #[test]
    fn test_obstacle_below_flight_plane_skipped() {
        let mut obstacles = corner_markers();
        // Top at 1 + 1 + 1 = 3, flying at 3: not strictly above
        obstacles.push(ObstacleRecord::new(5.0, 5.0, 1.0, 1.0, 1.0, 1.0));

        let (grid, _) = create_grid(&obstacles, 3.0, 1.0).unwrap();
        assert_eq!(grid.occupied_count(), 0);

        let (grid, _) = create_grid(&obstacles, 2.9, 1.0).unwrap();
        assert!(grid.occupied_count() > 0);
    }

    #[test]
    fn test_footprint_clamped_to_grid() {
        let obstacles = vec![ObstacleRecord::new(0.0, 0.0, 0.0, 2.0, 2.0, 5.0)];

        let (grid, offset) = create_grid(&obstacles, 1.0, 10.0).unwrap();
        assert_eq!(offset, GridOffset::new(-2, -2));
        assert_eq!(grid.dimensions(), (4, 4));
        // Inflation reaches past every edge, so the whole grid is blocked
        assert_eq!(grid.occupied_count(), 16);
    }

    #[test]
    fn test_degenerate_extent_gives_single_cell() {
        let obstacles = vec![ObstacleRecord::new(3.0, 3.0, 0.0, 0.0, 0.0, 0.0)];

        let (grid, offset) = create_grid(&obstacles, 10.0, 0.0).unwrap();
        assert_eq!(grid.dimensions(), (1, 1));
        assert_eq!(offset, GridOffset::new(3, 3));
    }

    #[test]
    fn test_values_are_binary() {
        let mut obstacles = corner_markers();
        obstacles.push(ObstacleRecord::new(3.0, 3.0, 5.0, 1.0, 1.0, 5.0));
        obstacles.push(ObstacleRecord::new(4.0, 4.0, 5.0, 1.0, 1.0, 5.0));

        let (grid, _) = create_grid(&obstacles, 2.0, 0.5).unwrap();
        assert!(grid.rows().iter().flatten().all(|&v| v == 0 || v == 1));
    }

    #[test]
    fn test_world_cell_conversion() {
        let offset = GridOffset::new(-316, -445);

        let cell = offset.world_to_cell(0.0, 0.0);
        assert_eq!(cell, (316, 445));
        assert_eq!(offset.cell_to_world(cell), (0.0, 0.0));

        // Fractions floor toward the lower cell
        assert_eq!(offset.world_to_cell(10.7, -0.3), (326, 444));
    }

    #[test]
    fn test_far_positions_do_not_overflow() {
        let offset = GridOffset::new(-316, -445);

        assert_eq!(offset.try_world_to_cell(10.7, -0.3), Some((326, 444)));
        assert_eq!(offset.try_world_to_cell(3.0e9, 0.0), None);
        assert_eq!(offset.try_world_to_cell(0.0, -3.0e9), None);
        assert_eq!(offset.try_world_to_cell(f64::NAN, 0.0), None);
        // i32::MAX - 316 + 316 still fits
        assert_eq!(
            offset.try_world_to_cell(f64::from(i32::MAX) - 316.0, 0.0),
            Some((i32::MAX, 445))
        );

        let (row, _) = offset.world_to_cell(3.0e9, 0.0);
        assert_eq!(row, i32::MAX);
        let (row, _) = offset.world_to_cell(f64::NAN, 0.0);
        assert_eq!(row, i32::MIN);
    }

    #[test]
    fn test_from_rows_validation() {
        assert!(OccupancyGrid::from_rows(vec![]).is_err());
        assert!(OccupancyGrid::from_rows(vec![vec![0, 0], vec![0]]).is_err());
        assert!(OccupancyGrid::from_rows(vec![vec![0, 2]]).is_err());

        let grid = OccupancyGrid::from_rows(vec![vec![0, 1], vec![0, 0]]).unwrap();
        assert_eq!(grid.dimensions(), (2, 2));
        assert!(grid.is_occupied((0, 1)));
    }

    #[test]
    fn test_out_of_bounds() {
        let grid = OccupancyGrid::new(10, 10);

        // Out of bounds should be considered occupied
        assert!(!grid.contains((15, 15)));
        assert!(!grid.contains((-1, 0)));
        assert!(grid.is_occupied((15, 15)));
        assert_eq!(grid.value((10, 0)), None);
    }

    #[test]
    fn test_bresenham_endpoints_included() {
        let cells = bresenham_line((0, 0), (3, 1));
        assert_eq!(cells.first(), Some(&(0, 0)));
        assert_eq!(cells.last(), Some(&(3, 1)));
        assert_eq!(cells.len(), 4);

        assert_eq!(bresenham_line((2, 2), (2, 2)), vec![(2, 2)]);
        assert_eq!(
            bresenham_line((0, 0), (3, 3)),
            vec![(0, 0), (1, 1), (2, 2), (3, 3)]
        );
        assert_eq!(
            bresenham_line((0, 4), (0, 1)),
            vec![(0, 4), (0, 3), (0, 2), (0, 1)]
        );
    }

    #[test]
    fn test_line_of_sight() {
        let mut grid = OccupancyGrid::new(10, 10);
        grid.set_occupied(5, 5);

        assert!(grid.line_of_sight((0, 0), (9, 0)));
        assert!(!grid.line_of_sight((0, 0), (9, 9)));
        assert!(!grid.line_of_sight((0, 0), (12, 0)));
    }
}
