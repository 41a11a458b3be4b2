use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::*;
use skyroute_core::PruneStrategy;
use skyroute_manager::commands::{self, grid::GridArgs, plan::PlanArgs, ParamOverrides};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "skyroute")]
#[command(about = "SkyRoute - grid path planning over obstacle maps")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct ParamArgs {
    /// Planner parameter file (TOML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Flight altitude in meters
    #[arg(short = 'a', long = "altitude")]
    altitude: Option<f64>,

    /// Safety margin around obstacles in meters
    #[arg(short = 's', long = "safety")]
    safety: Option<f64>,

    /// Pruning pass: none, line_of_sight or collinearity
    #[arg(short = 'p', long = "prune")]
    prune: Option<PruneStrategy>,

    /// Stop the search after this many expansions (0 = unlimited)
    #[arg(long = "max-expansions")]
    max_expansions: Option<usize>,
}

impl ParamArgs {
    fn overrides(&self) -> ParamOverrides {
        ParamOverrides {
            altitude: self.altitude,
            safety: self.safety,
            prune: self.prune,
            max_expansions: self.max_expansions,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a route between two local positions
    Plan {
        /// Collider file (CSV)
        colliders: PathBuf,

        /// Start position as NORTH,EAST
        #[arg(long, value_parser = parse_position, allow_hyphen_values = true)]
        start: (f64, f64),

        /// Goal position as NORTH,EAST
        #[arg(long, value_parser = parse_position, allow_hyphen_values = true)]
        goal: (f64, f64),

        #[command(flatten)]
        params: ParamArgs,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build the occupancy grid and print a summary
    Grid {
        /// Collider file (CSV)
        colliders: PathBuf,

        #[command(flatten)]
        params: ParamArgs,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a parameter file for a preset
    Params {
        /// default, conservative or close_quarters
        #[arg(default_value = "default")]
        preset: String,
    },
}

fn parse_position(text: &str) -> Result<(f64, f64), String> {
    commands::parse_position(text).map_err(|e| e.to_string())
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "skyroute=debug,skyroute_manager=debug,skyroute_library=debug,skyroute_core=debug,info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run_command(cli.command) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::Plan {
            colliders,
            start,
            goal,
            params,
            json,
        } => {
            let args = PlanArgs {
                colliders,
                start,
                goal,
                config: params.config.clone(),
                overrides: params.overrides(),
            };
            let report = commands::plan::run_plan(&args)?;
            commands::plan::print_plan(&report, json)
        }

        Commands::Grid {
            colliders,
            params,
            json,
        } => {
            let args = GridArgs {
                colliders,
                config: params.config.clone(),
                overrides: params.overrides(),
            };
            let report = commands::grid::run_grid(&args)?;
            commands::grid::print_grid(&report, json)
        }

        Commands::Params { preset } => {
            print!("{}", commands::params::render_params(&preset)?);
            Ok(())
        }
    }
}
