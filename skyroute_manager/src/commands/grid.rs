//! `skyroute grid`

use super::{resolve_params, ParamOverrides};
use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;
use skyroute_library::algorithms::occupancy_grid::create_grid;
use skyroute_library::io::colliders::load_colliders;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct GridArgs {
    pub colliders: PathBuf,
    pub config: Option<PathBuf>,
    pub overrides: ParamOverrides,
}

/// Summary of the grid built for one flight altitude
#[derive(Debug, Clone, Serialize)]
pub struct GridReport {
    pub north_size: usize,
    pub east_size: usize,
    pub north_min: i32,
    pub east_min: i32,
    pub obstacles: usize,
    pub flight_altitude: f64,
    pub safety_distance: f64,
    pub occupied: usize,
    pub occupied_ratio: f64,
}

pub fn run_grid(args: &GridArgs) -> Result<GridReport> {
    let params = resolve_params(args.config.as_deref(), &args.overrides)?;
    let map = load_colliders(&args.colliders)
        .with_context(|| format!("Failed to load colliders from {}", args.colliders.display()))?;

    let (grid, offset) = create_grid(&map.obstacles, params.flight_altitude, params.safety_distance)
        .context("Failed to build the occupancy grid")?;

    let (north_size, east_size) = grid.dimensions();
    let occupied = grid.occupied_count();

    Ok(GridReport {
        north_size,
        east_size,
        north_min: offset.north_min,
        east_min: offset.east_min,
        obstacles: map.len(),
        flight_altitude: params.flight_altitude,
        safety_distance: params.safety_distance,
        occupied,
        occupied_ratio: occupied as f64 / (north_size * east_size) as f64,
    })
}

pub fn print_grid(report: &GridReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("{}", "Occupancy grid".cyan().bold());
    println!(
        "  {:<12} {} x {}",
        "Size:".dimmed(),
        report.north_size,
        report.east_size
    );
    println!(
        "  {:<12} north {}, east {}",
        "Offset:".dimmed(),
        report.north_min,
        report.east_min
    );
    println!(
        "  {:<12} {} at {:.1} m (safety {:.1} m)",
        "Obstacles:".dimmed(),
        report.obstacles,
        report.flight_altitude,
        report.safety_distance
    );
    println!(
        "  {:<12} {} cells ({:.1}%)",
        "Occupied:".dimmed(),
        report.occupied,
        report.occupied_ratio * 100.0
    );

    Ok(())
}
