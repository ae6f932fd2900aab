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

//! Airport records and continent codes.

use std::fmt;

use crate::geo::Coordinate;

/// Type value used for airports that are no longer operational.
pub const CLOSED_TYPE: &str = "closed";

/// Continent grouping used by the dataset.
///
/// The raw file uses `NA` both as the North America code and, for some
/// readers, as a null marker. Preparation maps a missing value to
/// [`Continent::NorthAmerica`] and flags the record as imputed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Continent {
    Africa,
    Antarctica,
    Asia,
    Europe,
    NorthAmerica,
    Oceania,
    SouthAmerica,
    /// Any code outside the seven known ones, kept verbatim
    Other(String),
}

impl Continent {
    /// Parse a two-letter continent code.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "AF" => Self::Africa,
            "AN" => Self::Antarctica,
            "AS" => Self::Asia,
            "EU" => Self::Europe,
            "NA" => Self::NorthAmerica,
            "OC" => Self::Oceania,
            "SA" => Self::SouthAmerica,
            _ => Self::Other(code.trim().to_string()),
        }
    }

    /// The two-letter code as it appears in the dataset.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Africa => "AF",
            Self::Antarctica => "AN",
            Self::Asia => "AS",
            Self::Europe => "EU",
            Self::NorthAmerica => "NA",
            Self::Oceania => "OC",
            Self::SouthAmerica => "SA",
            Self::Other(code) => code,
        }
    }

    /// Human-readable name for charts and tables.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::Africa => "Africa",
            Self::Antarctica => "Antarctica",
            Self::Asia => "Asia",
            Self::Europe => "Europe",
            Self::NorthAmerica => "North America",
            Self::Oceania => "Oceania",
            Self::SouthAmerica => "South America",
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One cleaned row of the airport dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct AirportRecord {
    pub ident: String,
    pub name: String,
    pub airport_type: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation_ft: Option<i32>,
    pub continent: Continent,
    /// True when the source row had no continent and North America was assumed
    pub continent_imputed: bool,
    pub iso_country: String,
}

impl AirportRecord {
    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.airport_type == CLOSED_TYPE
    }

    /// Type label with underscores replaced, e.g. "large airport".
    #[must_use]
    pub fn type_label(&self) -> String {
        type_label(&self.airport_type)
    }
}

/// Format an airport type value for display.
#[must_use]
pub fn type_label(airport_type: &str) -> String {
    airport_type.replace('_', " ")
}

#[cfg(test)]
pub(crate) fn test_record(
    name: &str,
    airport_type: &str,
    latitude: f64,
    longitude: f64,
) -> AirportRecord {
    AirportRecord {
        ident: name.to_ascii_uppercase(),
        name: name.to_string(),
        airport_type: airport_type.to_string(),
        latitude,
        longitude,
        elevation_ft: None,
        continent: Continent::NorthAmerica,
        continent_imputed: false,
        iso_country: "US".to_string(),
    }
}
