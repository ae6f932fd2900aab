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

//! Headless subcommands that print results instead of opening a window.

use std::error::Error;
use std::io::Write;

use airport_core::{
    continent_breakdown, rank_nearby, top_by_elevation, type_breakdown, type_label,
    write_ranked_csv, Coordinate, Dataset, DistanceQuery,
};
use clap::Subcommand;

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List airports of one type near a point, nearest first
    Nearby {
        /// Latitude of the reference point in degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude of the reference point in degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Airport type, e.g. large_airport or heliport
        #[arg(long = "type", default_value = "large_airport")]
        airport_type: String,

        /// Only airports closer than this many miles are listed
        #[arg(long, default_value_t = 50.0)]
        max_distance: f64,

        /// Print CSV instead of a table
        #[arg(long)]
        csv: bool,
    },
    /// Print airport counts by type and continent and the highest airports
    Summary {
        /// How many of the highest airports to list
        #[arg(long, default_value_t = airport_core::DEFAULT_TOP_N)]
        top: usize,
    },
}

pub fn run<W: Write>(command: &Command, dataset: &Dataset, out: &mut W) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Nearby {
            lat,
            lon,
            airport_type,
            max_distance,
            csv,
        } => {
            let query = DistanceQuery::new(Coordinate::new(*lat, *lon), airport_type.as_str(), *max_distance);
            nearby(dataset, &query, *csv, out)
        }
        Command::Summary { top } => summary(dataset, *top, out),
    }
}

fn nearby<W: Write>(dataset: &Dataset, query: &DistanceQuery, csv: bool, out: &mut W) -> Result<(), Box<dyn Error>> {
    let ranked = rank_nearby(&dataset.records, query)?;

    if csv {
        write_ranked_csv(out, &ranked)?;
        return Ok(());
    }

    writeln!(
        out,
        "{} {} within {} miles of {}",
        ranked.len(),
        type_label(&query.airport_type),
        query.max_distance_miles,
        query.reference_point
    )?;
    for hit in &ranked {
        writeln!(
            out,
            "{:>9.2} mi  {:<8} {} ({})",
            hit.distance_miles, hit.airport.ident, hit.airport.name, hit.airport.iso_country
        )?;
    }
    Ok(())
}

fn summary<W: Write>(dataset: &Dataset, top: usize, out: &mut W) -> Result<(), Box<dyn Error>> {
    writeln!(out, "Airports by type")?;
    for entry in type_breakdown(&dataset.records) {
        writeln!(
            out,
            "  {:<16} {:>7}  {:>5.1}%",
            type_label(&entry.airport_type),
            entry.count,
            entry.share * 100.0
        )?;
    }

    writeln!(out, "Airports by continent")?;
    for entry in continent_breakdown(&dataset.records) {
        writeln!(out, "  {:<16} {:>7}", entry.continent.display_name(), entry.count)?;
    }

    writeln!(out, "Highest airports")?;
    for (rank, airport) in top_by_elevation(&dataset.records, top).iter().enumerate() {
        let elevation = airport
            .elevation_ft
            .map_or_else(|| "unknown".to_string(), |e| format!("{e} ft"));
        writeln!(
            out,
            "  {:>2}. {} ({}, {}): {}",
            rank + 1,
            airport.name,
            airport.iso_country,
            airport.continent.display_name(),
            elevation
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
ident,type,name,elevation_ft,continent,iso_country,coordinates
KBOS,large_airport,Logan International,20,NA,US,\"-71.0052, 42.3643\"
KJFK,large_airport,John F Kennedy International,13,NA,US,\"-73.7789, 40.6398\"
KOWD,small_airport,Norwood Memorial,49,NA,US,\"-71.1734, 42.1908\"
EGLL,large_airport,London Heathrow,83,EU,GB,\"-0.461941, 51.4706\"
";

    fn dataset() -> Dataset {
        Dataset::from_reader(CSV.as_bytes()).unwrap()
    }

    fn render(command: &Command) -> String {
        let mut out = Vec::new();
        run(command, &dataset(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_nearby_table() {
        let text = render(&Command::Nearby {
            lat: 42.0,
            lon: -71.0,
            airport_type: "large_airport".to_string(),
            max_distance: 400.0,
            csv: false,
        });

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("2 large airport within 400 miles of 42.0000, -71.0000"));
        assert!(lines[1].contains("KBOS"));
        assert!(lines[2].contains("KJFK"));
    }

    #[test]
    fn test_nearby_csv() {
        let text = render(&Command::Nearby {
            lat: 42.0,
            lon: -71.0,
            airport_type: "small_airport".to_string(),
            max_distance: 50.0,
            csv: true,
        });

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("ident,name,type"));
        assert!(lines[1].starts_with("KOWD,"));
    }

    #[test]
    fn test_nearby_rejects_bad_latitude() {
        let command = Command::Nearby {
            lat: 120.0,
            lon: 0.0,
            airport_type: "large_airport".to_string(),
            max_distance: 50.0,
            csv: false,
        };
        let mut out = Vec::new();
        let err = run(&command, &dataset(), &mut out).unwrap_err();
        assert!(err.to_string().contains("latitude"));
    }

    #[test]
    fn test_summary_sections() {
        let text = render(&Command::Summary { top: 2 });

        assert!(text.contains("large airport"));
        assert!(text.contains("North America"));
        assert!(text.contains(" 1. London Heathrow (GB, Europe): 83 ft"));
        assert!(text.contains(" 2. Norwood Memorial (US, North America): 49 ft"));
        assert!(!text.contains(" 3. "));
    }
}
