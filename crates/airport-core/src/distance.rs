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

//! Nearby-airport search.
//!
//! Given a reference point, an airport type and a distance threshold, this
//! module computes the great-circle distance to every airport of that type,
//! keeps the ones strictly closer than the threshold and orders them from
//! nearest to farthest. The search is a pure function over a borrowed slice
//! of records and never reorders or mutates it.

use log::debug;
use thiserror::Error;

use crate::geo::Coordinate;
use crate::record::AirportRecord;

/// Errors for malformed search parameters.
#[derive(Debug, Error, PartialEq)]
pub enum QueryError {
    #[error("invalid {parameter}: {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },
}

/// Parameters for a nearby-airport search.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceQuery {
    /// Point to measure distances from.
    pub reference_point: Coordinate,
    /// Only airports with exactly this type are considered.
    pub airport_type: String,
    /// Exclusive upper bound on distance in statute miles.
    pub max_distance_miles: f64,
}

impl DistanceQuery {
    #[must_use]
    pub fn new(
        reference_point: Coordinate,
        airport_type: impl Into<String>,
        max_distance_miles: f64,
    ) -> Self {
        Self {
            reference_point,
            airport_type: airport_type.into(),
            max_distance_miles,
        }
    }

    /// Check the reference point and threshold.
    ///
    /// Positive infinity is an accepted threshold; NaN and negative values
    /// are not.
    pub fn validate(&self) -> Result<(), QueryError> {
        self.reference_point.validate()?;
        if self.max_distance_miles.is_nan() || self.max_distance_miles < 0.0 {
            return Err(QueryError::InvalidParameter {
                parameter: "max_distance_miles",
                reason: format!("{} is not a non-negative number", self.max_distance_miles),
            });
        }
        Ok(())
    }
}

/// An airport paired with its distance from the query's reference point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedAirport<'a> {
    pub airport: &'a AirportRecord,
    pub distance_miles: f64,
}

/// Find airports of the requested type closer than the threshold, nearest first.
///
/// Records exactly at `max_distance_miles` are excluded. Equal distances
/// keep their order from `records`. An unknown type or an empty slice gives
/// an empty result.
pub fn rank_nearby<'a>(
    records: &'a [AirportRecord],
    query: &DistanceQuery,
) -> Result<Vec<RankedAirport<'a>>, QueryError> {
    query.validate()?;

    let reference = query.reference_point;
    let mut ranked: Vec<RankedAirport<'a>> = records
        .iter()
        .filter(|record| record.airport_type == query.airport_type)
        .map(|record| RankedAirport {
            airport: record,
            distance_miles: reference.distance_miles(&record.coordinate()),
        })
        .filter(|candidate| candidate.distance_miles < query.max_distance_miles)
        .collect();

    // sort_by is stable, so ties stay in dataset order
    ranked.sort_by(|a, b| a.distance_miles.total_cmp(&b.distance_miles));

    debug!(
        "{} {} airport(s) within {} mi of {}",
        ranked.len(),
        query.airport_type,
        query.max_distance_miles,
        reference
    );

    Ok(ranked)
}
