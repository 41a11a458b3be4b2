//! # SkyRoute Core
//!
//! Shared building blocks for the SkyRoute planning workspace:
//!
//! - **Errors**: the [`SkyrouteError`] taxonomy and [`SkyrouteResult`] alias
//!   used by every crate in the workspace
//! - **Parameters**: [`PlannerParams`], the tunable planning parameters,
//!   loadable from TOML
//!
//! ## Quick Start
//!
//! ```rust
//! use skyroute_core::{PlannerParams, PruneStrategy};
//!
//! let params = PlannerParams::default()
//!     .with_flight_altitude(10.0)
//!     .with_prune_strategy(PruneStrategy::LineOfSight);
//!
//! assert!(params.validate().is_ok());
//! ```

pub mod error;
pub mod params;

pub use error::{SkyrouteError, SkyrouteResult};
pub use params::{PlannerParams, PruneStrategy};
