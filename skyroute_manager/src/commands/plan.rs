//! `skyroute plan`

use super::{resolve_params, ParamOverrides};
use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;
use skyroute_library::io::colliders::{load_colliders, HomePosition};
use skyroute_library::planner::{FlightPlanner, Waypoint};
use skyroute_library::PruneStrategy;
use std::path::PathBuf;

/// Inputs of one `plan` invocation
#[derive(Debug, Clone)]
pub struct PlanArgs {
    pub colliders: PathBuf,
    pub start: (f64, f64),
    pub goal: (f64, f64),
    pub config: Option<PathBuf>,
    pub overrides: ParamOverrides,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    pub home: Option<HomePosition>,
    pub start_cell: (i32, i32),
    pub goal_cell: (i32, i32),
    pub prune_strategy: PruneStrategy,
    pub found: bool,
    pub cost: f64,
    pub expansions: usize,
    pub raw_length: usize,
    pub waypoints: Vec<Waypoint>,
}

/// Load the map, plan, and collect the result
pub fn run_plan(args: &PlanArgs) -> Result<PlanReport> {
    let params = resolve_params(args.config.as_deref(), &args.overrides)?;
    let map = load_colliders(&args.colliders)
        .with_context(|| format!("Failed to load colliders from {}", args.colliders.display()))?;

    let planner = FlightPlanner::from_colliders(&map, params)
        .context("Failed to build the occupancy grid")?;
    let outcome = planner
        .plan(args.start, args.goal)
        .context("Cannot plan between the given positions")?;

    if !outcome.found {
        tracing::warn!(
            "No path from {:?} to {:?} after {} expansions",
            outcome.start,
            outcome.goal,
            outcome.expansions
        );
    }

    Ok(PlanReport {
        home: map.home,
        start_cell: outcome.start,
        goal_cell: outcome.goal,
        prune_strategy: planner.params().prune_strategy,
        found: outcome.found,
        cost: outcome.cost,
        expansions: outcome.expansions,
        raw_length: outcome.raw_path.len(),
        waypoints: outcome.waypoints,
    })
}

pub fn print_plan(report: &PlanReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    if !report.found {
        println!(
            "{} No path from cell {:?} to cell {:?} ({} expansions)",
            "✗".red(),
            report.start_cell,
            report.goal_cell,
            report.expansions
        );
        return Ok(());
    }

    println!(
        "{} Path found: cost {:.2}, {} grid cells, {} waypoints ({})",
        "✓".green(),
        report.cost,
        report.raw_length,
        report.waypoints.len(),
        report.prune_strategy
    );
    if let Some(home) = report.home {
        println!("  {} lat0 {}, lon0 {}", "Home:".dimmed(), home.lat0, home.lon0);
    }
    for (i, wp) in report.waypoints.iter().enumerate() {
        println!(
            "  {:>3}  N {:>9.1}  E {:>9.1}  alt {:>6.1}",
            i.to_string().cyan(),
            wp.north,
            wp.east,
            wp.altitude
        );
    }

    Ok(())
}
