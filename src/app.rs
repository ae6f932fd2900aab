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

//! The dashboard window: a page selector in the side panel and the chosen
//! page in the central panel.

use airport_core::{
    continent_breakdown, top_by_elevation, type_breakdown, AirportRecord, ContinentCount, Dataset,
    TypeCount,
};
use eframe::egui;
use log::debug;

use crate::config::AppConfig;
use crate::ui::{charts, welcome, CalculatorPage, TypeChartState};

/// The five pages of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Home,
    FlightCalculator,
    ByType,
    ByContinent,
    HighestAirports,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Home,
        Page::FlightCalculator,
        Page::ByType,
        Page::ByContinent,
        Page::HighestAirports,
    ];

    /// Selector label; `top_n` is the size of the elevation chart.
    #[must_use]
    pub fn title(self, top_n: usize) -> String {
        match self {
            Page::Home => "Home Page".to_string(),
            Page::FlightCalculator => "Flight Calculator".to_string(),
            Page::ByType => "Airports by Type".to_string(),
            Page::ByContinent => "Airports by Continent".to_string(),
            Page::HighestAirports => format!("Top {top_n} Highest Airports by Elevation"),
        }
    }

    /// Whether the page is drawn inside a vertical scroll area.
    #[must_use]
    pub fn scrolls(self) -> bool {
        self != Page::FlightCalculator
    }
}

#[derive(Debug)]
pub struct ExplorerApp {
    dataset: Dataset,
    config: AppConfig,
    page: Page,
    calculator: CalculatorPage,
    type_chart: TypeChartState,
    // The aggregates never change after load
    type_counts: Vec<TypeCount>,
    continent_counts: Vec<ContinentCount>,
    highest: Vec<AirportRecord>,
}

impl ExplorerApp {
    pub fn new(dataset: Dataset, config: AppConfig) -> Self {
        let type_counts = type_breakdown(&dataset.records);
        let continent_counts = continent_breakdown(&dataset.records);
        let highest = top_by_elevation(&dataset.records, config.top_n)
            .into_iter()
            .cloned()
            .collect();
        let calculator = CalculatorPage::new(&config, &dataset);
        debug!(
            "Dashboard ready: {} types, {} continents",
            type_counts.len(),
            continent_counts.len()
        );

        Self {
            dataset,
            config,
            page: Page::default(),
            calculator,
            type_chart: TypeChartState::default(),
            type_counts,
            continent_counts,
            highest,
        }
    }

    fn draw_sidebar(&mut self, ui: &mut egui::Ui) {
        ui.add_space(8.0);
        ui.heading("Airports Around the World");
        ui.add_space(12.0);

        ui.label("Check Out Our Pages:");
        egui::ComboBox::from_id_salt("page_selector")
            .width(ui.available_width())
            .selected_text(self.page.title(self.config.top_n))
            .show_ui(ui, |ui| {
                for page in Page::ALL {
                    ui.selectable_value(&mut self.page, page, page.title(self.config.top_n));
                }
            });

        ui.add_space(12.0);
        ui.separator();
        ui.label(
            egui::RichText::new(format!("{} airports loaded", self.dataset.len()))
                .small()
                .weak(),
        );
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::SidePanel::left("page_panel")
            .resizable(false)
            .default_width(240.0)
            .show(ctx, |ui| self.draw_sidebar(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            // The map handles the mouse wheel itself, so this page lays out
            // to the panel height instead of scrolling
            if !self.page.scrolls() {
                self.calculator.show(ui, &self.dataset);
                return;
            }
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| match self.page {
                    Page::Home => welcome::show(
                        ui,
                        self.config.welcome_image_path.as_deref(),
                        &self.dataset.report,
                    ),
                    Page::FlightCalculator => self.calculator.show(ui, &self.dataset),
                    Page::ByType => charts::airports_by_type(ui, &self.type_counts, &mut self.type_chart),
                    Page::ByContinent => charts::airports_by_continent(ui, &self.continent_counts),
                    Page::HighestAirports => charts::highest_airports(ui, &self.highest),
                });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_have_distinct_titles() {
        let mut titles: Vec<String> = Page::ALL.iter().map(|p| p.title(10)).collect();
        titles.sort_unstable();
        titles.dedup();
        assert_eq!(titles.len(), Page::ALL.len());
        assert_eq!(Page::default(), Page::Home);
    }

    #[test]
    fn test_elevation_title_follows_top_n() {
        assert_eq!(Page::HighestAirports.title(10), "Top 10 Highest Airports by Elevation");
        assert_eq!(Page::HighestAirports.title(25), "Top 25 Highest Airports by Elevation");
    }

    #[test]
    fn test_only_calculator_skips_scroll_area() {
        let fixed: Vec<Page> = Page::ALL.into_iter().filter(|p| !p.scrolls()).collect();
        assert_eq!(fixed, [Page::FlightCalculator]);
    }

    #[test]
    fn test_new_precomputes_aggregates() {
        let csv = "\
ident,type,name,elevation_ft,continent,iso_country,coordinates
KBOS,large_airport,Logan International,20,NA,US,\"-71.0052, 42.3643\"
EGLL,large_airport,London Heathrow,83,EU,GB,\"-0.461941, 51.4706\"
00A,heliport,Total Rf Heliport,11,,US,\"-74.9336, 40.0708\"
";
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        let config = AppConfig {
            top_n: 2,
            ..AppConfig::default()
        };
        let app = ExplorerApp::new(dataset, config);

        assert_eq!(app.type_counts[0].airport_type, "large_airport");
        assert_eq!(app.type_counts[0].count, 2);
        assert_eq!(app.continent_counts.last().map(|c| c.count), Some(2));
        let names: Vec<&str> = app.highest.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["London Heathrow", "Logan International"]);
    }
}
