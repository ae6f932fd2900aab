// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Dataset loading and cleanup.
//!
//! Reads the airport CSV once at startup and turns each usable row into an
//! [`AirportRecord`]. Two layouts are understood:
//!
//! - The "airport codes" layout with a combined `coordinates` column holding
//!   `"<longitude>, <latitude>"` (longitude first)
//! - The OurAirports layout with separate `latitude_deg` / `longitude_deg`
//!
//! Identifier, region and municipality columns are ignored. Closed airports
//! and rows without usable coordinates are dropped, and a missing continent
//! is treated as North America (see [`Continent`]).

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::{debug, info, warn};
use serde::Deserialize;
use thiserror::Error;

use crate::geo::Coordinate;
use crate::record::{AirportRecord, Continent};

/// Errors that can occur while loading the dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataset is missing required column: {0}")]
    MissingColumn(&'static str),
}

/// Raw CSV row. Every coordinate-ish field is read as text so a bad value
/// drops the row instead of failing the whole file.
#[derive(Debug, Deserialize)]
struct RawAirport {
    #[serde(default)]
    ident: String,

    #[serde(rename = "type")]
    airport_type: String,

    name: String,

    #[serde(default)]
    elevation_ft: Option<String>,

    #[serde(default)]
    continent: Option<String>,

    #[serde(default)]
    iso_country: String,

    #[serde(default)]
    coordinates: Option<String>,

    #[serde(default)]
    latitude_deg: Option<String>,

    #[serde(default)]
    longitude_deg: Option<String>,
}

/// What happened to the rows of the source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub rows_read: usize,
    pub kept: usize,
    pub closed: usize,
    pub invalid_coordinates: usize,
    /// Rows with no continent that were counted as North America
    pub continents_imputed: usize,
}

/// The cleaned, read-only airport table.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<AirportRecord>,
    pub report: LoadReport,
}

impl Dataset {
    /// Load and clean the dataset from a CSV file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        info!("Loading airports from {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load and clean the dataset from any CSV source with a header row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(reader);
        check_headers(csv_reader.headers()?)?;

        let mut dataset = Self::default();
        for result in csv_reader.deserialize() {
            let raw: RawAirport = result?;
            dataset.report.rows_read += 1;

            if raw.airport_type.trim() == crate::record::CLOSED_TYPE {
                dataset.report.closed += 1;
                continue;
            }

            let Some(coordinate) = raw_coordinate(&raw) else {
                debug!("Dropping {} ({}): unusable coordinates", raw.ident, raw.name);
                dataset.report.invalid_coordinates += 1;
                continue;
            };

            let (continent, continent_imputed) = match raw.continent.as_deref().map(str::trim) {
                Some(code) if !code.is_empty() => (Continent::from_code(code), false),
                _ => {
                    dataset.report.continents_imputed += 1;
                    (Continent::NorthAmerica, true)
                }
            };

            dataset.records.push(AirportRecord {
                ident: raw.ident,
                name: raw.name,
                airport_type: raw.airport_type.trim().to_string(),
                latitude: coordinate.latitude,
                longitude: coordinate.longitude,
                elevation_ft: raw.elevation_ft.as_deref().and_then(parse_elevation),
                continent,
                continent_imputed,
                iso_country: raw.iso_country,
            });
        }

        dataset.report.kept = dataset.records.len();
        if dataset.report.continents_imputed > 0 {
            warn!(
                "{} airport(s) had no continent and were counted as North America",
                dataset.report.continents_imputed
            );
        }
        info!(
            "Loaded {} airports ({} closed, {} without usable coordinates)",
            dataset.report.kept, dataset.report.closed, dataset.report.invalid_coordinates
        );

        Ok(dataset)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct airport types in the order they first appear.
    #[must_use]
    pub fn airport_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = Vec::new();
        for record in &self.records {
            if !types.contains(&record.airport_type.as_str()) {
                types.push(&record.airport_type);
            }
        }
        types
    }
}

fn check_headers(headers: &csv::StringRecord) -> Result<(), DatasetError> {
    let has = |name: &str| headers.iter().any(|h| h == name);

    for required in ["type", "name"] {
        if !has(required) {
            return Err(DatasetError::MissingColumn(required));
        }
    }
    if !has("coordinates") && !(has("latitude_deg") && has("longitude_deg")) {
        return Err(DatasetError::MissingColumn("coordinates"));
    }
    Ok(())
}

fn raw_coordinate(raw: &RawAirport) -> Option<Coordinate> {
    let coordinate = match raw.coordinates.as_deref() {
        Some(combined) if !combined.trim().is_empty() => parse_coordinates(combined)?,
        _ => Coordinate::new(
            raw.latitude_deg.as_deref()?.trim().parse().ok()?,
            raw.longitude_deg.as_deref()?.trim().parse().ok()?,
        ),
    };
    coordinate.is_valid().then_some(coordinate)
}

/// Parse a combined `"<longitude>, <latitude>"` field.
#[must_use]
pub fn parse_coordinates(field: &str) -> Option<Coordinate> {
    let (lon, lat) = field.split_once(',')?;
    let longitude: f64 = lon.trim().parse().ok()?;
    let latitude: f64 = lat.trim().parse().ok()?;
    Some(Coordinate::new(latitude, longitude))
}

fn parse_elevation(field: &str) -> Option<i32> {
    let field = field.trim();
    if field.is_empty() {
        return None;
    }
    field
        .parse::<i32>()
        .ok()
        .or_else(|| field.parse::<f64>().ok().filter(|v| v.is_finite()).map(|v| v.round() as i32))
}

#[cfg(test)]
mod tests {
    use super::*;

    const AIRPORT_CODES: &str = "\
ident,type,name,elevation_ft,continent,iso_country,iso_region,municipality,gps_code,iata_code,local_code,coordinates
KBOS,large_airport,General Edward Lawrence Logan International Airport,20,NA,US,US-MA,Boston,KBOS,BOS,BOS,\"-71.00520325, 42.36429977\"
EGLL,large_airport,London Heathrow Airport,83,EU,GB,GB-ENG,London,EGLL,LHR,,\"-0.461941, 51.4706\"
00A,heliport,Total Rf Heliport,11,,US,US-PA,Bensalem,00A,,00A,\"-74.93360138, 40.07080078\"
00AK,closed,Lowell Field,450,NA,US,US-AK,Anchor Point,00AK,,00AK,\"-151.695999146, 59.94919968\"
BAD1,small_airport,Nowhere Strip,,NA,US,US-XX,,,,,\"not, numbers\"
BAD2,small_airport,Off The Map,,NA,US,US-XX,,,,,\"-200.0, 10.0\"
ZBAA,large_airport,Beijing Capital International Airport,116.5,AS,CN,CN-11,Beijing,ZBAA,PEK,,\"116.58499908447266, 40.08010101\"
";

    #[test]
    fn test_parse_coordinates_is_longitude_first() {
        let c = parse_coordinates("-71.0052, 42.3643").unwrap();
        assert!((c.latitude - 42.3643).abs() < 1e-9);
        assert!((c.longitude - -71.0052).abs() < 1e-9);
        assert!(parse_coordinates("42.0").is_none());
        assert!(parse_coordinates("a,b").is_none());
    }

    #[test]
    fn test_load_airport_codes_layout() {
        let dataset = Dataset::from_reader(AIRPORT_CODES.as_bytes()).unwrap();

        assert_eq!(
            dataset.report,
            LoadReport {
                rows_read: 7,
                kept: 4,
                closed: 1,
                invalid_coordinates: 2,
                continents_imputed: 1,
            }
        );
        assert!(dataset.records.iter().all(|r| !r.is_closed()));

        let logan = &dataset.records[0];
        assert_eq!(logan.ident, "KBOS");
        assert!((logan.latitude - 42.364_299_77).abs() < 1e-6);
        assert_eq!(logan.elevation_ft, Some(20));
        assert_eq!(logan.continent, Continent::NorthAmerica);
        assert!(!logan.continent_imputed);

        let heliport = &dataset.records[2];
        assert_eq!(heliport.continent, Continent::NorthAmerica);
        assert!(heliport.continent_imputed);

        assert_eq!(dataset.records[3].elevation_ft, Some(117));
    }

    #[test]
    fn test_airport_types_in_first_seen_order() {
        let dataset = Dataset::from_reader(AIRPORT_CODES.as_bytes()).unwrap();
        assert_eq!(dataset.airport_types(), ["large_airport", "heliport"]);
    }

    #[test]
    fn test_load_ourairports_layout() {
        let csv = "\
id,ident,type,name,latitude_deg,longitude_deg,elevation_ft,continent,iso_country
3422,KLAX,large_airport,Los Angeles International Airport,33.942501,-118.407997,125,NA,US
4,XXXX,small_airport,Missing Latitude,,-118.0,,NA,US
";
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.report.invalid_coordinates, 1);
        assert!((dataset.records[0].longitude - -118.407_997).abs() < 1e-9);
    }

    #[test]
    fn test_padded_headers_are_matched() {
        let csv = "ident, type, name, continent, coordinates\nKBOS,large_airport,Logan,NA,\"-71.0, 42.3\"\n";
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();

        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.report.invalid_coordinates, 0);
        assert!((dataset.records[0].latitude - 42.3).abs() < 1e-9);
        assert!(!dataset.records[0].continent_imputed);
    }

    #[test]
    fn test_missing_coordinate_columns() {
        let csv = "ident,type,name\nKBOS,large_airport,Logan\n";
        let err = Dataset::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn("coordinates")));
    }

    #[test]
    fn test_missing_type_column() {
        let csv = "ident,name,coordinates\nKBOS,Logan,\"-71.0, 42.3\"\n";
        let err = Dataset::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn("type")));
    }

    #[test]
    fn test_ragged_row_is_csv_error() {
        let csv = "type,name,coordinates\nlarge_airport,Logan,\"-71.0, 42.3\",extra\n";
        let err = Dataset::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DatasetError::Csv(_)));
    }

    #[test]
    fn test_header_only_is_empty_dataset() {
        let dataset = Dataset::from_reader("type,name,coordinates\n".as_bytes()).unwrap();
        assert!(dataset.is_empty());
        assert!(dataset.airport_types().is_empty());
    }
}
