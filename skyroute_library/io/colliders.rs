//! Collider file loading
//!
//! Collider files describe a map as axis-aligned boxes in local NED
//! coordinates:
//!
//! ```text
//! lat0 37.792480, lon0 -122.397450
//! posX,posY,posZ,halfSizeX,halfSizeY,halfSizeZ
//! -310.2389,-439.2315,85.5,5,5,85.5
//! -300.2389,-439.2315,85.5,5,5,85.5
//! ```
//!
//! The home line and the column header are both optional. Every other
//! non-blank line holds six numbers: center north/east/altitude followed by the
//! three half extents.

use crate::algorithms::occupancy_grid::ObstacleRecord;
use serde::{Deserialize, Serialize};
use skyroute_core::{SkyrouteError, SkyrouteResult};
use std::io::{BufReader, Read, Write};
use std::path::Path;

const COLUMN_HEADER: &str = "posX,posY,posZ,halfSizeX,halfSizeY,halfSizeZ";

/// Geodetic origin of the local frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HomePosition {
    pub lat0: f64,
    pub lon0: f64,
}

/// Contents of a collider file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ColliderMap {
    pub home: Option<HomePosition>,
    pub obstacles: Vec<ObstacleRecord>,
}

impl ColliderMap {
    pub fn new(home: Option<HomePosition>, obstacles: Vec<ObstacleRecord>) -> Self {
        Self { home, obstacles }
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}

/// Parse collider data from any reader
///
/// # Errors
///
/// [`SkyrouteError::Parse`] with the 1-based line number when a row is not
/// six numbers or the home line is malformed.
pub fn parse_colliders<R: Read>(reader: R) -> SkyrouteResult<ColliderMap> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut map = ColliderMap::default();

    for result in csv_reader.records() {
        let record = result.map_err(csv_error)?;
        let line = record.position().map_or(0, |p| p.line() as usize);

        if record.iter().all(str::is_empty) {
            continue;
        }

        let first = record.get(0).unwrap_or_default();
        if map.obstacles.is_empty() {
            if map.home.is_none() && first.starts_with("lat0") {
                map.home = Some(parse_home(&record, line)?);
                continue;
            }
            if is_column_header(first) {
                continue;
            }
        }

        map.obstacles.push(parse_obstacle(&record, line)?);
    }

    Ok(map)
}

/// Load a collider file from disk
pub fn load_colliders(path: impl AsRef<Path>) -> SkyrouteResult<ColliderMap> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let map = parse_colliders(BufReader::new(file))?;

    tracing::debug!(
        "Loaded {} obstacles from {} (home: {:?})",
        map.len(),
        path.display(),
        map.home
    );

    Ok(map)
}

/// Write a collider map in the same layout [`parse_colliders`] reads
pub fn write_colliders<W: Write>(mut writer: W, map: &ColliderMap) -> SkyrouteResult<()> {
    if let Some(home) = map.home {
        writeln!(writer, "lat0 {}, lon0 {}", home.lat0, home.lon0)?;
    }
    writeln!(writer, "{}", COLUMN_HEADER)?;

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    for o in &map.obstacles {
        wtr.write_record(&[
            o.north.to_string(),
            o.east.to_string(),
            o.alt.to_string(),
            o.half_extent_north.to_string(),
            o.half_extent_east.to_string(),
            o.half_extent_alt.to_string(),
        ])
        .map_err(csv_error)?;
    }

    wtr.flush()?;
    Ok(())
}

fn is_column_header(first_field: &str) -> bool {
    first_field
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && first_field.parse::<f64>().is_err()
}

/// `lat0 <f>, lon0 <f>`
fn parse_home(record: &csv::StringRecord, line: usize) -> SkyrouteResult<HomePosition> {
    let mut lat0 = None;
    let mut lon0 = None;

    for field in record.iter() {
        let mut parts = field.split_whitespace();
        let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(SkyrouteError::parse(
                line,
                format!("malformed home entry '{}'", field),
            ));
        };
        let value: f64 = value.parse().map_err(|_| {
            SkyrouteError::parse(line, format!("home {} '{}' is not a number", key, value))
        })?;

        match key {
            "lat0" => lat0 = Some(value),
            "lon0" => lon0 = Some(value),
            other => {
                return Err(SkyrouteError::parse(
                    line,
                    format!("unknown home key '{}'", other),
                ))
            }
        }
    }

    match (lat0, lon0) {
        (Some(lat0), Some(lon0)) => Ok(HomePosition { lat0, lon0 }),
        _ => Err(SkyrouteError::parse(line, "home line needs both lat0 and lon0")),
    }
}

fn parse_obstacle(record: &csv::StringRecord, line: usize) -> SkyrouteResult<ObstacleRecord> {
    if record.len() != 6 {
        return Err(SkyrouteError::parse(
            line,
            format!("expected 6 fields, found {}", record.len()),
        ));
    }

    let mut row = [0.0; 6];
    for (i, field) in record.iter().enumerate() {
        row[i] = field.parse().map_err(|_| {
            SkyrouteError::parse(line, format!("field {} ('{}') is not a number", i + 1, field))
        })?;
    }

    Ok(ObstacleRecord::from_row(row))
}

fn csv_error(err: csv::Error) -> SkyrouteError {
    let line = err.position().map_or(0, |p| p.line() as usize);
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(io) => SkyrouteError::Io(io),
        _ => SkyrouteError::parse(line, message),
    }
}
