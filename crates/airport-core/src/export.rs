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

//! CSV export of search results.

use std::io::Write;

use serde::Serialize;

use crate::distance::RankedAirport;

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    ident: &'a str,
    name: &'a str,
    #[serde(rename = "type")]
    airport_type: &'a str,
    latitude: f64,
    longitude: f64,
    elevation_ft: Option<i32>,
    continent: &'a str,
    iso_country: &'a str,
    distance_miles: f64,
}

/// Write ranked airports as CSV with a header row, nearest first.
pub fn write_ranked_csv<W: Write>(writer: W, ranked: &[RankedAirport<'_>]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for entry in ranked {
        let airport = entry.airport;
        csv_writer.serialize(ExportRow {
            ident: &airport.ident,
            name: &airport.name,
            airport_type: &airport.airport_type,
            latitude: airport.latitude,
            longitude: airport.longitude,
            elevation_ft: airport.elevation_ft,
            continent: airport.continent.code(),
            iso_country: &airport.iso_country,
            distance_miles: entry.distance_miles,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}
