//! `skyroute params`: print a parameter file to start from

use anyhow::{bail, Result};
use skyroute_core::PlannerParams;

pub const PRESETS: [&str; 3] = ["default", "conservative", "close_quarters"];

pub fn preset(name: &str) -> Result<PlannerParams> {
    match name.replace('-', "_").as_str() {
        "default" => Ok(PlannerParams::default()),
        "conservative" => Ok(PlannerParams::conservative()),
        "close_quarters" => Ok(PlannerParams::close_quarters()),
        other => bail!(
            "unknown preset '{}' (available: {})",
            other,
            PRESETS.join(", ")
        ),
    }
}

pub fn render_params(name: &str) -> Result<String> {
    Ok(preset(name)?.to_toml_string()?)
}
