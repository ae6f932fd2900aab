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

//! Airport dataset library: loading, nearby-airport search and summaries.
//!
//! This crate holds everything the explorer needs that does not touch the
//! screen, so it can be used and tested without a window:
//!
//! - **Dataset layer**: CSV ingestion and cleanup ([`Dataset`])
//! - **Search layer**: great-circle distance filtering and ranking ([`rank_nearby`])
//! - **Summary layer**: per-type and per-continent counts, highest airports
//!
//! # Quick Start
//!
//! ```
//! use airport_core::{rank_nearby, Coordinate, Dataset, DistanceQuery};
//!
//! let csv = "\
//! ident,type,name,elevation_ft,continent,iso_country,coordinates
//! KBOS,large_airport,Logan International,20,NA,US,\"-71.0052, 42.3643\"
//! KJFK,large_airport,John F Kennedy International,13,NA,US,\"-73.7789, 40.6398\"
//! ";
//! let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
//!
//! let query = DistanceQuery::new(Coordinate::new(42.0, -71.0), "large_airport", 50.0);
//! let nearby = rank_nearby(&dataset.records, &query).unwrap();
//!
//! assert_eq!(nearby.len(), 1);
//! assert_eq!(nearby[0].airport.ident, "KBOS");
//! ```

pub mod dataset;
pub mod distance;
pub mod export;
pub mod geo;
pub mod record;
pub mod summary;

pub use dataset::{parse_coordinates, Dataset, DatasetError, LoadReport};
pub use distance::{rank_nearby, DistanceQuery, QueryError, RankedAirport};
pub use export::write_ranked_csv;
pub use geo::{haversine_miles, Coordinate, EARTH_RADIUS_MILES};
pub use record::{type_label, AirportRecord, Continent};
pub use summary::{
    continent_breakdown, top_by_elevation, type_breakdown, ContinentCount, TypeCount,
    DEFAULT_TOP_N,
};
