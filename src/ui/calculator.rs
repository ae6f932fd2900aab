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

//! Flight Calculator page.
//!
//! Pick an airport type, a destination and a search radius; the page lists
//! every matching airport nearest first and plots them on the map.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use airport_core::{
    rank_nearby, type_label, write_ranked_csv, AirportRecord, Coordinate, Dataset, DistanceQuery,
    QueryError, RankedAirport,
};
use eframe::egui;
use egui_extras::{Column, TableBuilder};
use log::{info, warn};

use crate::config::AppConfig;
use crate::map::{MapMarker, MapView};

const MIN_MAP_HEIGHT: f32 = 320.0;
// Room left under the map for the closing heading
const FOOTER_HEIGHT: f32 = 40.0;
const TABLE_HEIGHT: f32 = 220.0;

/// A search hit owned by the page so it survives between frames.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyAirport {
    pub airport: AirportRecord,
    pub distance_miles: f64,
}

#[derive(Debug)]
pub struct CalculatorPage {
    airport_type: String,
    latitude: f64,
    longitude: f64,
    max_distance_miles: f64,
    slider_max_miles: f64,
    last_query: Option<DistanceQuery>,
    results: Result<Vec<NearbyAirport>, QueryError>,
    hovered: Option<usize>,
    export_status: Option<String>,
    map: MapView,
}

impl CalculatorPage {
    pub fn new(config: &AppConfig, dataset: &Dataset) -> Self {
        let airport_type = config
            .default_airport_type
            .clone()
            .or_else(|| dataset.airport_types().first().map(|t| (*t).to_string()))
            .unwrap_or_default();
        let reference = Coordinate::new(config.default_latitude, config.default_longitude);

        Self {
            airport_type,
            latitude: reference.latitude,
            longitude: reference.longitude,
            max_distance_miles: config.default_max_distance_miles,
            slider_max_miles: config.slider_max_miles.max(config.default_max_distance_miles),
            last_query: None,
            results: Ok(Vec::new()),
            hovered: None,
            export_status: None,
            map: MapView::new(reference, config.default_zoom),
        }
    }

    fn query(&self) -> DistanceQuery {
        DistanceQuery::new(
            Coordinate::new(self.latitude, self.longitude),
            self.airport_type.clone(),
            self.max_distance_miles,
        )
    }

    /// Re-run the search if any input changed since the last frame.
    fn refresh(&mut self, dataset: &Dataset) {
        let query = self.query();
        if self.last_query.as_ref() == Some(&query) {
            return;
        }

        let moved = self
            .last_query
            .as_ref()
            .is_none_or(|last| last.reference_point != query.reference_point);
        if moved && query.reference_point.is_valid() {
            self.map.recenter(query.reference_point);
        }

        self.results = search(&dataset.records, &query);
        self.hovered = None;
        self.last_query = Some(query);
    }

    pub fn show(&mut self, ui: &mut egui::Ui, dataset: &Dataset) {
        ui.heading(
            egui::RichText::new(
                "Flight Calculator: Choose how to fly, where you're flying to, and how close you will be to the airport",
            )
            .color(egui::Color32::from_rgb(40, 110, 220)),
        );
        ui.label("The Boston area is set as default, but feel free to enter whatever coordinates you want!");
        ui.add_space(8.0);

        self.show_inputs(ui, dataset);
        self.refresh(dataset);

        ui.add_space(8.0);
        match &self.results {
            Err(e) => {
                ui.colored_label(egui::Color32::from_rgb(220, 50, 50), format!("⚠ {e}"));
            }
            Ok(results) => {
                ui.horizontal(|ui| {
                    ui.label(format!(
                        "{} {} within {} miles",
                        results.len(),
                        type_label(&self.airport_type),
                        self.max_distance_miles
                    ));
                    if ui
                        .add_enabled(!results.is_empty(), egui::Button::new("Export CSV"))
                        .clicked()
                    {
                        self.export_status = Some(export_dialog(results));
                    }
                    if let Some(status) = &self.export_status {
                        ui.label(egui::RichText::new(status).weak());
                    }
                });
                if let Some(row) = results_table(ui, results, self.hovered) {
                    let picked = &results[row].airport;
                    self.map.recenter(picked.coordinate());
                }
            }
        }

        ui.add_space(12.0);
        ui.vertical_centered(|ui| {
            ui.heading(
                egui::RichText::new("Here are airports near your chosen coordinates:")
                    .color(egui::Color32::from_rgb(220, 40, 40))
                    .underline(),
            );
        });

        let markers: Vec<MapMarker> = self
            .results
            .as_ref()
            .map(|results| {
                results
                    .iter()
                    .map(|hit| MapMarker {
                        latitude: hit.airport.latitude,
                        longitude: hit.airport.longitude,
                        label: format!("{} ({:.1} mi)", hit.airport.name, hit.distance_miles),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let reference = Coordinate::new(self.latitude, self.longitude);
        let height = map_height(ui.available_height());
        self.hovered = self.map.show(ui, height, reference, self.max_distance_miles, &markers);

        ui.add_space(8.0);
        ui.heading("Get Ready for Takeoff!");
    }

    fn show_inputs(&mut self, ui: &mut egui::Ui, dataset: &Dataset) {
        ui.label("Choose your airport type");
        ui.horizontal_wrapped(|ui| {
            for airport_type in dataset.airport_types() {
                ui.radio_value(&mut self.airport_type, airport_type.to_string(), type_label(airport_type));
            }
        });

        egui::Grid::new("calculator_inputs").num_columns(2).show(ui, |ui| {
            ui.label("Latitude of your destination");
            ui.add(egui::DragValue::new(&mut self.latitude).speed(0.01).max_decimals(6));
            ui.end_row();

            ui.label("Longitude of your destination");
            ui.add(egui::DragValue::new(&mut self.longitude).speed(0.01).max_decimals(6));
            ui.end_row();

            ui.label("Maximum distance from location");
            ui.add(
                egui::Slider::new(&mut self.max_distance_miles, 0.0..=self.slider_max_miles)
                    .suffix(" mi")
                    .integer(),
            );
            ui.end_row();
        });
    }
}

/// Map height that fills the rest of the page without pushing the footer off.
fn map_height(available: f32) -> f32 {
    (available - FOOTER_HEIGHT).max(MIN_MAP_HEIGHT)
}

/// Run the search and copy the hits out of the dataset.
fn search(records: &[AirportRecord], query: &DistanceQuery) -> Result<Vec<NearbyAirport>, QueryError> {
    let ranked = rank_nearby(records, query)?;
    Ok(ranked
        .into_iter()
        .map(|hit| NearbyAirport {
            airport: hit.airport.clone(),
            distance_miles: hit.distance_miles,
        })
        .collect())
}

/// Draw the results table; returns the row that was clicked.
fn results_table(ui: &mut egui::Ui, results: &[NearbyAirport], highlighted: Option<usize>) -> Option<usize> {
    let mut clicked = None;

    ui.push_id("nearby_results", |ui| {
        TableBuilder::new(ui)
            .striped(true)
            .max_scroll_height(TABLE_HEIGHT)
            .sense(egui::Sense::click())
            .column(Column::auto())
            .column(Column::initial(320.0).at_least(120.0).clip(true))
            .column(Column::auto())
            .column(Column::auto())
            .column(Column::auto())
            .column(Column::auto())
            .column(Column::auto())
            .column(Column::remainder())
            .header(20.0, |mut header| {
                for title in ["Ident", "Name", "Latitude", "Longitude", "Elevation (ft)", "Continent", "Country", "Distance (mi)"] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, results.len(), |mut row| {
                    let index = row.index();
                    let hit = &results[index];
                    row.set_selected(highlighted == Some(index));

                    row.col(|ui| {
                        ui.label(&hit.airport.ident);
                    });
                    row.col(|ui| {
                        ui.label(&hit.airport.name);
                    });
                    row.col(|ui| {
                        ui.label(format!("{:.4}", hit.airport.latitude));
                    });
                    row.col(|ui| {
                        ui.label(format!("{:.4}", hit.airport.longitude));
                    });
                    row.col(|ui| {
                        ui.label(hit.airport.elevation_ft.map_or_else(String::new, |e| e.to_string()));
                    });
                    row.col(|ui| {
                        ui.label(hit.airport.continent.code());
                    });
                    row.col(|ui| {
                        ui.label(&hit.airport.iso_country);
                    });
                    row.col(|ui| {
                        ui.label(format!("{:.2}", hit.distance_miles));
                    });

                    if row.response().clicked() {
                        clicked = Some(index);
                    }
                });
            });
    });

    clicked
}

/// Ask for a destination file and write the results there.
fn export_dialog(results: &[NearbyAirport]) -> String {
    let Some(path) = rfd::FileDialog::new()
        .set_file_name("nearby_airports.csv")
        .add_filter("CSV", &["csv"])
        .save_file()
    else {
        return "Export cancelled".to_string();
    };

    match export_results(&path, results) {
        Ok(()) => {
            info!("Exported {} airports to {}", results.len(), path.display());
            format!("Saved {}", path.display())
        }
        Err(e) => {
            warn!("Export to {} failed: {}", path.display(), e);
            format!("Export failed: {e}")
        }
    }
}

fn export_results(path: &Path, results: &[NearbyAirport]) -> Result<(), Box<dyn std::error::Error>> {
    let ranked: Vec<RankedAirport<'_>> = results
        .iter()
        .map(|hit| RankedAirport {
            airport: &hit.airport,
            distance_miles: hit.distance_miles,
        })
        .collect();
    write_ranked_csv(BufWriter::new(File::create(path)?), &ranked)?;
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
";

    #[test]
    fn test_search_copies_ranked_hits() {
        let dataset = Dataset::from_reader(CSV.as_bytes()).unwrap();
        let query = DistanceQuery::new(Coordinate::new(42.0, -71.0), "large_airport", 400.0);

        let hits = search(&dataset.records, &query).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].airport.ident, "KBOS");
        assert!(hits[0].distance_miles < hits[1].distance_miles);
    }

    #[test]
    fn test_search_surfaces_invalid_input() {
        let query = DistanceQuery::new(Coordinate::new(-95.0, 0.0), "large_airport", 50.0);
        assert!(search(&[], &query).is_err());
    }

    #[test]
    fn test_map_height_fills_remaining_space() {
        assert!((map_height(600.0) - 560.0).abs() < f32::EPSILON);
        assert!((map_height(100.0) - MIN_MAP_HEIGHT).abs() < f32::EPSILON);
    }

    #[test]
    fn test_export_results_writes_csv() {
        let dataset = Dataset::from_reader(CSV.as_bytes()).unwrap();
        let query = DistanceQuery::new(Coordinate::new(42.0, -71.0), "small_airport", 50.0);
        let hits = search(&dataset.records, &query).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        export_results(&path, &hits).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), 2);
        assert!(written.lines().nth(1).unwrap().starts_with("KOWD,Norwood Memorial,small_airport,"));
    }
}
