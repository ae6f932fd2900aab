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

//! Chart pages: airports by type, by continent and by elevation.

use std::collections::HashSet;

use airport_core::{type_label, AirportRecord, Continent, ContinentCount, TypeCount};
use eframe::egui;
use egui_plot::{Bar, BarChart, Legend, Plot};

const PIE_SEGMENTS_PER_TURN: f32 = 180.0;

/// Colour used for a continent on every chart.
pub fn continent_color(continent: &Continent) -> egui::Color32 {
    match continent {
        Continent::Africa => egui::Color32::from_rgb(239, 85, 59),
        Continent::Antarctica => egui::Color32::from_rgb(171, 99, 250),
        Continent::Asia => egui::Color32::from_rgb(0, 204, 150),
        Continent::Europe => egui::Color32::from_rgb(99, 110, 250),
        Continent::NorthAmerica => egui::Color32::from_rgb(255, 161, 90),
        Continent::Oceania => egui::Color32::from_rgb(25, 211, 243),
        Continent::SouthAmerica => egui::Color32::from_rgb(255, 102, 146),
        Continent::Other(_) => egui::Color32::from_rgb(150, 150, 150),
    }
}

fn palette(index: usize) -> egui::Color32 {
    const COLORS: [(u8, u8, u8); 8] = [
        (99, 110, 250),
        (239, 85, 59),
        (0, 204, 150),
        (171, 99, 250),
        (255, 161, 90),
        (25, 211, 243),
        (255, 102, 146),
        (182, 232, 128),
    ];
    let (r, g, b) = COLORS[index % COLORS.len()];
    egui::Color32::from_rgb(r, g, b)
}

/// Which airport types are switched off on the type chart.
#[derive(Debug, Default)]
pub struct TypeChartState {
    hidden: HashSet<String>,
}

/// Shares of the visible types, renormalised so they sum to one.
///
/// Returns `(index into counts, share)` pairs in chart order.
fn visible_shares(counts: &[TypeCount], hidden: &HashSet<String>) -> Vec<(usize, f64)> {
    let visible_total: usize = counts
        .iter()
        .filter(|c| !hidden.contains(&c.airport_type))
        .map(|c| c.count)
        .sum();
    if visible_total == 0 {
        return Vec::new();
    }
    counts
        .iter()
        .enumerate()
        .filter(|(_, c)| !hidden.contains(&c.airport_type))
        .map(|(index, c)| (index, c.count as f64 / visible_total as f64))
        .collect()
}

/// Pie chart of airport types with a legend that toggles slices.
pub fn airports_by_type(ui: &mut egui::Ui, counts: &[TypeCount], state: &mut TypeChartState) {
    ui.heading("Airport Type Breakdown");
    ui.label("Untick a type to compare only the remaining ones.");
    if counts.is_empty() {
        ui.label("No airports loaded.");
        return;
    }

    let slices = visible_shares(counts, &state.hidden);

    ui.horizontal(|ui| {
        let side = ui.available_width().min(380.0);
        let (response, painter) = ui.allocate_painter(egui::vec2(side, side), egui::Sense::hover());
        let center = response.rect.center();
        let radius = side / 2.0 - 10.0;

        let mut mesh = egui::epaint::Mesh::default();
        let mut start = 0.0_f32;
        let mut hovered: Option<(usize, f64)> = None;
        let pointer = response.hover_pos().map(|p| p - center);

        for &(index, share) in &slices {
            let sweep = share as f32 * std::f32::consts::TAU;
            add_wedge(&mut mesh, center, radius, start, sweep, palette(index));

            if let Some(offset) = pointer {
                // Angles run clockwise from 12 o'clock
                let angle = offset.x.atan2(-offset.y).rem_euclid(std::f32::consts::TAU);
                if offset.length() <= radius && angle >= start && angle < start + sweep {
                    hovered = Some((index, share));
                }
            }
            start += sweep;
        }
        painter.add(egui::Shape::mesh(mesh));

        if let Some((index, share)) = hovered {
            let slice = &counts[index];
            response.on_hover_text(format!(
                "{}: {} ({:.1}%)",
                type_label(&slice.airport_type),
                slice.count,
                share * 100.0
            ));
        }

        ui.vertical(|ui| {
            for (index, slice) in counts.iter().enumerate() {
                ui.horizontal(|ui| {
                    let mut shown = !state.hidden.contains(&slice.airport_type);
                    if ui.checkbox(&mut shown, "").changed() {
                        if shown {
                            state.hidden.remove(&slice.airport_type);
                        } else {
                            state.hidden.insert(slice.airport_type.clone());
                        }
                    }
                    let (swatch, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                    ui.painter().rect_filled(swatch, 2.0, palette(index));
                    ui.label(format!("{}  {}", type_label(&slice.airport_type), slice.count));
                });
            }
        });
    });
}

/// Append a filled pie wedge as a triangle fan.
fn add_wedge(
    mesh: &mut egui::epaint::Mesh,
    center: egui::Pos2,
    radius: f32,
    start: f32,
    sweep: f32,
    color: egui::Color32,
) {
    if sweep <= 0.0 {
        return;
    }
    let segments = ((sweep / std::f32::consts::TAU) * PIE_SEGMENTS_PER_TURN).ceil().max(1.0) as u32;
    let base = mesh.vertices.len() as u32;

    mesh.vertices.push(egui::epaint::Vertex {
        pos: center,
        uv: egui::epaint::WHITE_UV,
        color,
    });
    for step in 0..=segments {
        let angle = start + sweep * step as f32 / segments as f32;
        mesh.vertices.push(egui::epaint::Vertex {
            pos: center + radius * egui::vec2(angle.sin(), -angle.cos()),
            uv: egui::epaint::WHITE_UV,
            color,
        });
    }
    for step in 0..segments {
        mesh.indices.extend_from_slice(&[base, base + 1 + step, base + 2 + step]);
    }
}

/// Bar chart of airports per continent, smallest first.
pub fn airports_by_continent(ui: &mut egui::Ui, counts: &[ContinentCount]) {
    ui.heading("Airports by Continent");
    if counts.is_empty() {
        ui.label("No airports loaded.");
        return;
    }

    // One chart per continent so each gets its own colour and legend entry
    let charts: Vec<BarChart> = counts
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let name = entry.continent.display_name().to_string();
            let bar = Bar::new(index as f64, entry.count as f64)
                .name(&name)
                .width(0.7);
            BarChart::new(name, vec![bar]).color(continent_color(&entry.continent))
        })
        .collect();

    Plot::new("airports_by_continent")
        .legend(Legend::default())
        .height(380.0)
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .show_x(false)
        .y_axis_label("Number of Airports")
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });

    egui::Grid::new("continent_counts").striped(true).show(ui, |ui| {
        ui.strong("Continent");
        ui.strong("Airports");
        ui.end_row();
        for entry in counts {
            ui.label(entry.continent.display_name());
            ui.label(entry.count.to_string());
            ui.end_row();
        }
    });

    if let Some(summary) = continent_summary(counts) {
        ui.add_space(8.0);
        ui.label(summary);
    }
}

/// Reading of the continent chart: the leader and how it compares to the rest.
fn continent_summary(counts: &[ContinentCount]) -> Option<String> {
    // Counts arrive smallest first
    let (leader, rest) = counts.split_last()?;
    let total: usize = counts.iter().map(|c| c.count).sum();
    let others: usize = rest.iter().map(|c| c.count).sum();
    let comparison = if leader.count > others {
        "more than all other continents combined"
    } else {
        "the most of any continent"
    };

    Some(format!(
        "{} has {} airports, {:.0}% of the total and {}.",
        leader.continent.display_name(),
        leader.count,
        leader.count as f64 * 100.0 / total as f64,
        comparison
    ))
}

/// Bar chart of the highest airports, coloured by continent.
pub fn highest_airports(ui: &mut egui::Ui, top: &[AirportRecord]) {
    ui.heading(format!("Top {} Highest Airports in the World", top.len()));
    if top.is_empty() {
        ui.label("No airports loaded.");
        return;
    }

    // Group bars by continent so the legend doubles as the colour key
    let mut groups: Vec<(&Continent, Vec<Bar>)> = Vec::new();
    for (index, airport) in top.iter().enumerate() {
        let bar = Bar::new((index + 1) as f64, f64::from(airport.elevation_ft.unwrap_or(0)))
            .name(&airport.name)
            .width(0.7);
        match groups.iter_mut().find(|(continent, _)| **continent == airport.continent) {
            Some((_, bars)) => bars.push(bar),
            None => groups.push((&airport.continent, vec![bar])),
        }
    }

    Plot::new("highest_airports")
        .legend(Legend::default())
        .height(380.0)
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .x_axis_label("Airport (rank)")
        .y_axis_label("Elevation (feet)")
        .show(ui, |plot_ui| {
            for (continent, bars) in groups {
                plot_ui.bar_chart(
                    BarChart::new(continent.display_name().to_string(), bars)
                        .color(continent_color(continent)),
                );
            }
        });

    egui::Grid::new("highest_airports_table").striped(true).show(ui, |ui| {
        ui.strong("#");
        ui.strong("Airport");
        ui.strong("Elevation (ft)");
        ui.strong("Continent");
        ui.end_row();
        for (index, airport) in top.iter().enumerate() {
            ui.label((index + 1).to_string());
            ui.label(&airport.name);
            ui.label(airport.elevation_ft.map_or_else(|| "-".to_string(), |e| e.to_string()));
            ui.colored_label(continent_color(&airport.continent), airport.continent.display_name());
            ui.end_row();
        }
    });

    if let Some(summary) = elevation_summary(top) {
        ui.add_space(8.0);
        ui.label(summary);
    }
}

/// One-paragraph reading of the elevation chart.
fn elevation_summary(top: &[AirportRecord]) -> Option<String> {
    let highest = top.first()?;
    let elevation = highest.elevation_ft?;

    let mut per_continent: Vec<(&Continent, usize)> = Vec::new();
    for airport in top {
        match per_continent.iter_mut().find(|(c, _)| **c == airport.continent) {
            Some((_, n)) => *n += 1,
            None => per_continent.push((&airport.continent, 1)),
        }
    }
    // Stable sort keeps first-appearance order among equal counts
    per_continent.sort_by(|a, b| b.1.cmp(&a.1));
    let (leader, leader_count) = per_continent[0];

    Some(format!(
        "{} has the highest airport, {} at {} ft. {} accounts for {} of the top {}.",
        highest.continent.display_name(),
        highest.name,
        elevation,
        leader.display_name(),
        leader_count,
        top.len()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(airport_type: &str, count: usize) -> TypeCount {
        TypeCount {
            airport_type: airport_type.to_string(),
            count,
            share: 0.0,
        }
    }

    fn airport(name: &str, elevation_ft: i32, continent: &str) -> AirportRecord {
        AirportRecord {
            ident: name.to_string(),
            name: name.to_string(),
            airport_type: "small_airport".to_string(),
            latitude: 0.0,
            longitude: 0.0,
            elevation_ft: Some(elevation_ft),
            continent: Continent::from_code(continent),
            continent_imputed: false,
            iso_country: String::new(),
        }
    }

    #[test]
    fn test_visible_shares_renormalise() {
        let counts = vec![count("small_airport", 6), count("heliport", 3), count("large_airport", 1)];

        let all = visible_shares(&counts, &HashSet::new());
        assert_eq!(all.len(), 3);
        assert!((all[0].1 - 0.6).abs() < 1e-12);

        let hidden: HashSet<String> = ["small_airport".to_string()].into_iter().collect();
        let rest = visible_shares(&counts, &hidden);
        assert_eq!(rest.iter().map(|(i, _)| *i).collect::<Vec<_>>(), [1, 2]);
        assert!((rest[0].1 - 0.75).abs() < 1e-12);
        assert!((rest[1].1 - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_visible_shares_all_hidden() {
        let counts = vec![count("heliport", 3)];
        let hidden: HashSet<String> = ["heliport".to_string()].into_iter().collect();
        assert!(visible_shares(&counts, &hidden).is_empty());
    }

    #[test]
    fn test_elevation_summary() {
        let top = vec![
            airport("Daocheng Yading", 14_472, "AS"),
            airport("El Alto", 13_325, "SA"),
            airport("Qamdo Bamda", 14_219, "AS"),
        ];
        let summary = elevation_summary(&top).unwrap();
        assert_eq!(
            summary,
            "Asia has the highest airport, Daocheng Yading at 14472 ft. Asia accounts for 2 of the top 3."
        );
        assert!(elevation_summary(&[]).is_none());
    }

    #[test]
    fn test_continent_summary() {
        let counts = vec![
            ContinentCount { continent: Continent::Europe, count: 2 },
            ContinentCount { continent: Continent::NorthAmerica, count: 6 },
        ];
        assert_eq!(
            continent_summary(&counts).as_deref(),
            Some("North America has 6 airports, 75% of the total and more than all other continents combined.")
        );

        let close = vec![
            ContinentCount { continent: Continent::Asia, count: 3 },
            ContinentCount { continent: Continent::Europe, count: 4 },
            ContinentCount { continent: Continent::NorthAmerica, count: 5 },
        ];
        assert!(continent_summary(&close).unwrap().ends_with("the most of any continent."));
        assert!(continent_summary(&[]).is_none());
    }

    #[test]
    fn test_continent_colors_are_distinct() {
        let known = [
            Continent::Africa,
            Continent::Antarctica,
            Continent::Asia,
            Continent::Europe,
            Continent::NorthAmerica,
            Continent::Oceania,
            Continent::SouthAmerica,
        ];
        let colors: HashSet<egui::Color32> = known.iter().map(continent_color).collect();
        assert_eq!(colors.len(), known.len());
    }
}
