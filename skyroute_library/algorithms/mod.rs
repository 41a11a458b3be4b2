//! Grid planning algorithms
//!
//! Pure computation with no I/O. Each stage takes its inputs explicitly and
//! returns new values, so one grid can be shared by any number of searches.
//!
//! # Stages
//!
//! - **occupancy_grid**: obstacle records to a binary grid plus world offset,
//!   and Bresenham line rasterization
//! - **astar**: 8-connected A* with a pluggable heuristic
//! - **pruning**: line-of-sight and collinearity waypoint reduction

pub mod astar;
pub mod occupancy_grid;
pub mod pruning;
