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

//! Application configuration management.
//!
//! This module handles persistent configuration storage using TOML format.
//! It holds the dataset location, the welcome page image and the defaults
//! the Flight Calculator starts from. Command-line flags override it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const APP_NAME: &str = "airport-explorer";
const CONFIG_NAME: &str = "config";

/// Default download location for the airport codes dataset
pub const DEFAULT_DATASET_URL: &str = "https://datahub.io/core/airport-codes/r/airport-codes.csv";

/// Application configuration stored in TOML format
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Configuration schema version for migrations
    #[serde(default = "default_config_version")]
    pub config_version: u32,

    /// Path to the airport CSV (defaults to the user data directory)
    #[serde(default)]
    pub dataset_path: Option<PathBuf>,

    /// Where to fetch the dataset from when it is missing
    #[serde(default = "default_dataset_url")]
    pub dataset_url: String,

    /// Banner image shown on the home page
    #[serde(default)]
    pub welcome_image_path: Option<PathBuf>,

    /// Starting latitude for the Flight Calculator (Boston)
    #[serde(default = "default_latitude")]
    pub default_latitude: f64,

    /// Starting longitude for the Flight Calculator (Boston)
    #[serde(default = "default_longitude")]
    pub default_longitude: f64,

    /// Starting search radius in miles
    #[serde(default = "default_max_distance_miles")]
    pub default_max_distance_miles: f64,

    /// Upper end of the search radius slider in miles
    #[serde(default = "default_slider_max_miles")]
    pub slider_max_miles: f64,

    /// Airport type selected when the calculator opens (first observed type if unset)
    #[serde(default)]
    pub default_airport_type: Option<String>,

    /// Initial map zoom level (2.0 - 16.0)
    #[serde(default = "default_zoom")]
    pub default_zoom: f32,

    /// Number of airports on the elevation chart
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

// Default value functions for serde
fn default_config_version() -> u32 {
    1
}

fn default_dataset_url() -> String {
    DEFAULT_DATASET_URL.to_string()
}

fn default_latitude() -> f64 {
    42.0
}

fn default_longitude() -> f64 {
    -71.0
}

fn default_max_distance_miles() -> f64 {
    50.0
}

fn default_slider_max_miles() -> f64 {
    400.0
}

fn default_zoom() -> f32 {
    7.0
}

fn default_top_n() -> usize {
    airport_core::DEFAULT_TOP_N
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_version: default_config_version(),
            dataset_path: None,
            dataset_url: default_dataset_url(),
            welcome_image_path: None,
            default_latitude: default_latitude(),
            default_longitude: default_longitude(),
            default_max_distance_miles: default_max_distance_miles(),
            slider_max_miles: default_slider_max_miles(),
            default_airport_type: None,
            default_zoom: default_zoom(),
            top_n: default_top_n(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the per-user config file, creating it if absent
    pub fn load() -> Result<Self, confy::ConfyError> {
        confy::load(APP_NAME, CONFIG_NAME)
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self, confy::ConfyError> {
        confy::load_path(path)
    }

    /// Get the config file path for display to user
    pub fn get_config_path() -> Result<PathBuf, confy::ConfyError> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)
    }

    /// Resolve where the dataset lives on disk
    #[must_use]
    pub fn resolved_dataset_path(&self) -> PathBuf {
        self.dataset_path.clone().unwrap_or_else(|| {
            let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
            path.push(APP_NAME);
            path.push("airport-codes.csv");
            path
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_point_at_boston() {
        let config = AppConfig::default();
        assert!((config.default_latitude - 42.0).abs() < f64::EPSILON);
        assert!((config.default_longitude - -71.0).abs() < f64::EPSILON);
        assert!((config.default_max_distance_miles - 50.0).abs() < f64::EPSILON);
        assert!((config.slider_max_miles - 400.0).abs() < f64::EPSILON);
        assert_eq!(config.top_n, 10);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_max_distance_miles = 120.0").unwrap();
        writeln!(file, "dataset_path = \"/tmp/airports.csv\"").unwrap();
        file.flush().unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert!((config.default_max_distance_miles - 120.0).abs() < f64::EPSILON);
        assert_eq!(config.dataset_path, Some(PathBuf::from("/tmp/airports.csv")));
        assert_eq!(config.dataset_url, DEFAULT_DATASET_URL);
        assert!((config.default_zoom - 7.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_store_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = AppConfig {
            default_airport_type: Some("heliport".to_string()),
            top_n: 5,
            ..AppConfig::default()
        };
        confy::store_path(&path, &config).unwrap();

        assert_eq!(AppConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_explicit_dataset_path_wins() {
        let config = AppConfig {
            dataset_path: Some(PathBuf::from("data/airports.csv")),
            ..AppConfig::default()
        };
        assert_eq!(config.resolved_dataset_path(), PathBuf::from("data/airports.csv"));
        assert!(AppConfig::default()
            .resolved_dataset_path()
            .ends_with("airport-explorer/airport-codes.csv"));
    }
}
