//! Subcommand implementations
//!
//! Each command returns a report value; printing is kept separate so the
//! reports can be checked in tests and emitted as JSON.

pub mod grid;
pub mod params;
pub mod plan;

use anyhow::{bail, Context, Result};
use skyroute_core::{PlannerParams, PruneStrategy};
use std::path::Path;

/// Command line values that take precedence over the parameter file
#[derive(Debug, Clone, Default)]
pub struct ParamOverrides {
    pub altitude: Option<f64>,
    pub safety: Option<f64>,
    pub prune: Option<PruneStrategy>,
    pub max_expansions: Option<usize>,
}

/// Load `config` (or defaults) and apply the overrides
pub fn resolve_params(config: Option<&Path>, overrides: &ParamOverrides) -> Result<PlannerParams> {
    let mut params = match config {
        Some(path) => PlannerParams::load(path)
            .with_context(|| format!("Failed to load parameters from {}", path.display()))?,
        None => PlannerParams::default(),
    };

    if let Some(altitude) = overrides.altitude {
        params.flight_altitude = altitude;
    }
    if let Some(safety) = overrides.safety {
        params.safety_distance = safety;
    }
    if let Some(prune) = overrides.prune {
        params.prune_strategy = prune;
    }
    if let Some(max_expansions) = overrides.max_expansions {
        params.max_expansions = max_expansions;
    }

    params.validate().context("Invalid planner parameters")?;
    Ok(params)
}

/// Parse `"north,east"` into a position
pub fn parse_position(text: &str) -> Result<(f64, f64)> {
    let Some((north, east)) = text.split_once(',') else {
        bail!("expected NORTH,EAST but got '{}'", text);
    };

    let north: f64 = north
        .trim()
        .parse()
        .with_context(|| format!("invalid north value '{}'", north.trim()))?;
    let east: f64 = east
        .trim()
        .parse()
        .with_context(|| format!("invalid east value '{}'", east.trim()))?;

    if !north.is_finite() || !east.is_finite() {
        bail!("position '{}' is not finite", text);
    }

    Ok((north, east))
}
