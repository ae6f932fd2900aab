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

//! Aggregate statistics over the whole dataset, used by the chart pages.

use std::collections::HashMap;

use crate::record::{AirportRecord, Continent};

/// Number of airports shown on the elevation chart.
pub const DEFAULT_TOP_N: usize = 10;

/// Count of airports sharing one type value.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeCount {
    pub airport_type: String,
    pub count: usize,
    /// Fraction of all records, in `0.0..=1.0`
    pub share: f64,
}

/// Count of airports on one continent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinentCount {
    pub continent: Continent,
    pub count: usize,
}

/// Count airports per type, most common first (ties by type name).
#[must_use]
pub fn type_breakdown(records: &[AirportRecord]) -> Vec<TypeCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.airport_type.as_str()).or_default() += 1;
    }

    let total = records.len() as f64;
    let mut breakdown: Vec<TypeCount> = counts
        .into_iter()
        .map(|(airport_type, count)| TypeCount {
            airport_type: airport_type.to_string(),
            count,
            share: count as f64 / total,
        })
        .collect();

    breakdown.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.airport_type.cmp(&b.airport_type))
    });
    breakdown
}

/// Count airports per continent, smallest first (ties by continent code).
///
/// Records whose continent was imputed count toward North America.
#[must_use]
pub fn continent_breakdown(records: &[AirportRecord]) -> Vec<ContinentCount> {
    let mut counts: HashMap<&Continent, usize> = HashMap::new();
    for record in records {
        *counts.entry(&record.continent).or_default() += 1;
    }

    let mut breakdown: Vec<ContinentCount> = counts
        .into_iter()
        .map(|(continent, count)| ContinentCount {
            continent: continent.clone(),
            count,
        })
        .collect();

    breakdown.sort_by(|a, b| {
        a.count
            .cmp(&b.count)
            .then_with(|| a.continent.code().cmp(b.continent.code()))
    });
    breakdown
}

/// The `n` highest airports, highest first.
///
/// Equal elevations keep dataset order. Records without an elevation come
/// after every record that has one, so they only appear when fewer than `n`
/// airports have a known elevation.
#[must_use]
pub fn top_by_elevation(records: &[AirportRecord], n: usize) -> Vec<&AirportRecord> {
    let mut sorted: Vec<&AirportRecord> = records.iter().collect();
    // Stable sort; None < Some(_) so reversing the comparison puts unknowns last
    sorted.sort_by(|a, b| b.elevation_ft.cmp(&a.elevation_ft));
    sorted.truncate(n);
    sorted
}
