// Command implementations against collider files on disk
use skyroute_core::PruneStrategy;
use skyroute_manager::commands::grid::{run_grid, GridArgs};
use skyroute_manager::commands::plan::{run_plan, PlanArgs};
use skyroute_manager::commands::ParamOverrides;
use std::io::Write;
use tempfile::NamedTempFile;

/// 20 x 20 m map with a tower over north/east 8..12
fn colliders_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        "lat0 37.792480, lon0 -122.397450\n\
         posX,posY,posZ,halfSizeX,halfSizeY,halfSizeZ\n\
         0,0,-10,0,0,0\n\
         20,20,-10,0,0,0\n\
         10,10,20,2,2,20\n"
    )
    .unwrap();
    file
}

fn plan_args(file: &NamedTempFile, overrides: ParamOverrides) -> PlanArgs {
    PlanArgs {
        colliders: file.path().to_path_buf(),
        start: (2.0, 2.0),
        goal: (18.0, 18.0),
        config: None,
        overrides,
    }
}

#[test]
fn test_plan_command() {
    let file = colliders_file();
    let overrides = ParamOverrides {
        safety: Some(1.0),
        ..Default::default()
    };

    let report = run_plan(&plan_args(&file, overrides)).unwrap();
    assert!(report.found);
    assert_eq!(report.start_cell, (2, 2));
    assert_eq!(report.goal_cell, (18, 18));
    assert_eq!(report.prune_strategy, PruneStrategy::Collinearity);
    assert!(report.waypoints.len() >= 2);
    assert!(report.waypoints.len() <= report.raw_length);
    assert_eq!(report.home.map(|h| h.lat0), Some(37.79248));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["found"], true);
    assert_eq!(json["prune_strategy"], "collinearity");
    assert_eq!(json["waypoints"][0]["north"], 2.0);
}

#[test]
fn test_plan_command_with_config_file() {
    let file = colliders_file();
    let mut config = NamedTempFile::new().unwrap();
    writeln!(
        config,
        "flight_altitude = 50.0\nsafety_distance = 1.0\nprune_strategy = \"line_of_sight\""
    )
    .unwrap();

    let mut args = plan_args(&file, ParamOverrides::default());
    args.config = Some(config.path().to_path_buf());

    // The tower top is below 50 m, so the route is a single straight leg
    let report = run_plan(&args).unwrap();
    assert_eq!(report.prune_strategy, PruneStrategy::LineOfSight);
    assert_eq!(report.waypoints.len(), 2);
    assert_eq!(report.waypoints[1].altitude, 50.0);
}

#[test]
fn test_plan_command_rejects_blocked_start() {
    let file = colliders_file();
    let mut args = plan_args(&file, ParamOverrides::default());
    args.start = (10.0, 10.0);

    let err = run_plan(&args).unwrap_err();
    assert!(format!("{:#}", err).contains("occupied"));
}

#[test]
fn test_plan_command_rejects_far_start() {
    let file = colliders_file();
    let mut args = plan_args(&file, ParamOverrides::default());
    args.start = (3.0e9, 0.0);

    let err = run_plan(&args).unwrap_err();
    assert!(format!("{:#}", err).contains("outside the grid"));
}

#[test]
fn test_plan_command_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let args = PlanArgs {
        colliders: dir.path().join("colliders.csv"),
        start: (0.0, 0.0),
        goal: (1.0, 1.0),
        config: None,
        overrides: ParamOverrides::default(),
    };

    let err = run_plan(&args).unwrap_err();
    assert!(err.to_string().contains("Failed to load colliders"));
}

#[test]
fn test_grid_command() {
    let file = colliders_file();
    let args = GridArgs {
        colliders: file.path().to_path_buf(),
        config: None,
        overrides: ParamOverrides {
            safety: Some(1.0),
            ..Default::default()
        },
    };

    let report = run_grid(&args).unwrap();
    assert_eq!((report.north_size, report.east_size), (20, 20));
    assert_eq!((report.north_min, report.east_min), (0, 0));
    assert_eq!(report.obstacles, 3);
    // Tower inflated to rows and columns 7..=13
    assert_eq!(report.occupied, 49);
    assert!((report.occupied_ratio - 49.0 / 400.0).abs() < 1e-12);
}
