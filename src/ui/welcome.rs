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

//! Home page.

use std::path::Path;

use airport_core::LoadReport;
use eframe::egui;

pub fn show(ui: &mut egui::Ui, image_path: Option<&Path>, report: &LoadReport) {
    ui.vertical_centered(|ui| {
        ui.add_space(12.0);
        ui.heading(
            egui::RichText::new(
                "Ready to explore the world? Let's check out all of airports to find where we can go!",
            )
            .size(26.0)
            .strong(),
        );
        ui.add_space(8.0);
        ui.label(egui::RichText::new("Check out our other pages to learn more").size(18.0));
        ui.add_space(12.0);

        if let Some(path) = image_path {
            if path.exists() {
                ui.add(
                    egui::Image::new(format!("file://{}", path.display()))
                        .max_width(ui.available_width().min(900.0))
                        .corner_radius(6.0),
                );
            } else {
                ui.label(
                    egui::RichText::new(format!("Image not found: {}", path.display())).weak(),
                );
            }
            ui.add_space(12.0);
        }
    });

    ui.separator();
    ui.label(report_summary(report));
}

/// One-line description of what was loaded.
fn report_summary(report: &LoadReport) -> String {
    let mut summary = format!(
        "{} airports loaded from {} rows ({} closed, {} without usable coordinates skipped).",
        report.kept, report.rows_read, report.closed, report.invalid_coordinates
    );
    if report.continents_imputed > 0 {
        summary.push_str(&format!(
            " {} airports had no continent and are counted as North America.",
            report.continents_imputed
        ));
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_summary() {
        let report = LoadReport {
            rows_read: 10,
            kept: 7,
            closed: 2,
            invalid_coordinates: 1,
            continents_imputed: 0,
        };
        assert_eq!(
            report_summary(&report),
            "7 airports loaded from 10 rows (2 closed, 1 without usable coordinates skipped)."
        );
    }

    #[test]
    fn test_report_summary_mentions_imputed_continents() {
        let report = LoadReport {
            continents_imputed: 3,
            ..LoadReport::default()
        };
        assert!(report_summary(&report).ends_with("3 airports had no continent and are counted as North America."));
    }
}
