//! Planner parameters
//!
//! Tunable values for grid construction, search and path pruning. Parameters
//! can be built in code or loaded from a TOML file:
//!
//! ```toml
//! flight_altitude = 5.0
//! safety_distance = 5.0
//! prune_strategy = "collinearity"
//! collinearity_epsilon = 0.01
//! max_expansions = 0
//! ```

use crate::error::{SkyrouteError, SkyrouteResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Default flight altitude in meters
pub const DEFAULT_FLIGHT_ALTITUDE: f64 = 5.0;

/// Default safety margin around obstacles in meters
pub const DEFAULT_SAFETY_DISTANCE: f64 = 5.0;

/// Default determinant tolerance for the collinearity test
pub const DEFAULT_COLLINEARITY_EPSILON: f64 = 1e-2;

/// Which pruning pass to run on a raw grid path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PruneStrategy {
    /// Keep every grid cell of the raw path
    None,
    /// Drop waypoints whose neighbours see each other across free cells
    LineOfSight,
    /// Drop waypoints that are collinear with their neighbours
    #[default]
    Collinearity,
}

impl PruneStrategy {
    /// Name used in TOML files and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            PruneStrategy::None => "none",
            PruneStrategy::LineOfSight => "line_of_sight",
            PruneStrategy::Collinearity => "collinearity",
        }
    }
}

impl fmt::Display for PruneStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PruneStrategy {
    type Err = SkyrouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "none" => Ok(PruneStrategy::None),
            "line_of_sight" | "los" | "bresenham" => Ok(PruneStrategy::LineOfSight),
            "collinearity" | "collinear" => Ok(PruneStrategy::Collinearity),
            other => Err(SkyrouteError::config(format!(
                "unknown prune strategy '{}' (expected none, line_of_sight or collinearity)",
                other
            ))),
        }
    }
}

/// Parameters for a planning run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerParams {
    /// Altitude of the flight plane
    ///
    /// Obstacles whose safety-inflated top is at or below this plane are not
    /// rendered into the grid.
    ///
    /// Default: 5.0
    pub flight_altitude: f64,

    /// Margin added around every obstacle footprint (north/east) and to its top
    ///
    /// Default: 5.0
    pub safety_distance: f64,

    /// Pruning pass applied to the raw A* path
    ///
    /// Default: collinearity
    pub prune_strategy: PruneStrategy,

    /// Determinant tolerance for the collinearity test
    ///
    /// Default: 0.01
    pub collinearity_epsilon: f64,

    /// Upper bound on frontier expansions per search (0 = unlimited)
    ///
    /// Default: 0
    pub max_expansions: usize,
}

impl Default for PlannerParams {
    fn default() -> Self {
        Self {
            flight_altitude: DEFAULT_FLIGHT_ALTITUDE,
            safety_distance: DEFAULT_SAFETY_DISTANCE,
            prune_strategy: PruneStrategy::default(),
            collinearity_epsilon: DEFAULT_COLLINEARITY_EPSILON,
            max_expansions: 0,
        }
    }
}

impl PlannerParams {
    /// Wide margins for flights near people or structures
    pub fn conservative() -> Self {
        Self {
            safety_distance: 10.0,
            prune_strategy: PruneStrategy::LineOfSight,
            ..Self::default()
        }
    }

    /// Thin margins for dense maps where the default inflation closes gaps
    pub fn close_quarters() -> Self {
        Self {
            safety_distance: 1.0,
            ..Self::default()
        }
    }

    /// Load parameters from a TOML file
    pub fn load(path: impl AsRef<Path>) -> SkyrouteResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let params = Self::from_toml_str(&text)?;
        tracing::debug!("Loaded planner parameters from {}", path.display());
        Ok(params)
    }

    /// Parse and validate parameters from TOML text
    pub fn from_toml_str(text: &str) -> SkyrouteResult<Self> {
        let params: Self = toml::from_str(text)
            .map_err(|e| SkyrouteError::config(format!("invalid parameter file: {}", e)))?;
        params.validate()?;
        Ok(params)
    }

    /// Serialize to TOML text
    pub fn to_toml_string(&self) -> SkyrouteResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| SkyrouteError::config(format!("cannot serialize parameters: {}", e)))
    }

    /// Check that every value is usable
    pub fn validate(&self) -> SkyrouteResult<()> {
        if !self.flight_altitude.is_finite() {
            return Err(SkyrouteError::config("flight_altitude must be finite"));
        }
        if !self.safety_distance.is_finite() || self.safety_distance < 0.0 {
            return Err(SkyrouteError::config(
                "safety_distance must be a finite, non-negative number",
            ));
        }
        if !self.collinearity_epsilon.is_finite() || self.collinearity_epsilon <= 0.0 {
            return Err(SkyrouteError::config(
                "collinearity_epsilon must be a finite, positive number",
            ));
        }
        Ok(())
    }

    pub fn with_flight_altitude(mut self, altitude: f64) -> Self {
        self.flight_altitude = altitude;
        self
    }

    pub fn with_safety_distance(mut self, distance: f64) -> Self {
        self.safety_distance = distance;
        self
    }

    pub fn with_prune_strategy(mut self, strategy: PruneStrategy) -> Self {
        self.prune_strategy = strategy;
        self
    }

    pub fn with_collinearity_epsilon(mut self, epsilon: f64) -> Self {
        self.collinearity_epsilon = epsilon;
        self
    }

    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = max_expansions;
        self
    }
}
