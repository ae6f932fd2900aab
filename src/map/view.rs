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

//! Interactive slippy map drawn with the egui painter.
//!
//! Shows the search reference point, the search radius and one marker per
//! result. Drag to pan, scroll or pinch to zoom, double-click to jump back
//! to the reference point.

use airport_core::Coordinate;
use eframe::egui;

use super::tiles::{TileManager, TILE_SIZE};
use super::WebMercator;

const MIN_ZOOM: f32 = 2.0;
const MAX_ZOOM: f32 = 16.0;
const MARKER_RADIUS: f32 = 5.0;
const HOVER_RADIUS: f32 = 9.0;
const SCROLL_ZOOM_SPEED: f32 = 1.0 / 200.0;
const LINE_SCROLL_POINTS: f32 = 40.0;
const PAGE_SCROLL_POINTS: f32 = 400.0;
// Cap on the radius ring size in pixels
const MAX_RING_RADIUS_PX: f64 = 20_000.0;

/// A point of interest to draw on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub latitude: f64,
    pub longitude: f64,
    pub label: String,
}

#[derive(Debug)]
pub struct MapView {
    center_lat: f64,
    center_lon: f64,
    zoom: f32,
    tile_manager: TileManager,
    tile_status: Option<String>,
}

impl MapView {
    pub fn new(center: Coordinate, zoom: f32) -> Self {
        Self {
            center_lat: center.latitude,
            center_lon: center.longitude,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            tile_manager: TileManager::new(),
            tile_status: None,
        }
    }

    /// Move the viewport so `center` is in the middle.
    pub fn recenter(&mut self, center: Coordinate) {
        self.center_lat = center.latitude.clamp(-85.0, 85.0);
        self.center_lon = center.longitude;
    }

    /// Draw the map and return the index of the hovered marker, if any.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        height: f32,
        reference: Coordinate,
        radius_miles: f64,
        markers: &[MapMarker],
    ) -> Option<usize> {
        let (response, painter) = ui.allocate_painter(
            egui::vec2(ui.available_width(), height),
            egui::Sense::click_and_drag(),
        );
        let rect = response.rect;
        let center = rect.center();

        painter.rect_filled(rect, 0.0, egui::Color32::from_rgb(200, 220, 240));

        if response.hovered() {
            let (zoom_delta, scroll) = ui.ctx().input(|i| (i.zoom_delta(), wheel_scroll(&i.events)));
            if (zoom_delta - 1.0).abs() > 0.001 {
                self.zoom += zoom_delta.log2();
            }
            self.zoom += scroll * SCROLL_ZOOM_SPEED;
            self.zoom = self.zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }

        // Tiles are fetched at the nearest integer zoom and scaled for the fraction
        let tile_zoom = self.zoom.round() as u8;
        let scale = 2_f32.powf(self.zoom - f32::from(tile_zoom));
        let tile_pixels = TILE_SIZE as f32 * scale;

        if response.dragged() {
            let delta = response.drag_delta();
            let x = WebMercator::lon_to_x(self.center_lon, tile_zoom) - f64::from(delta.x / tile_pixels);
            let y = WebMercator::lat_to_y(self.center_lat, tile_zoom) - f64::from(delta.y / tile_pixels);
            self.center_lon = (WebMercator::tile_to_lon(x, tile_zoom) + 540.0).rem_euclid(360.0) - 180.0;
            self.center_lat = WebMercator::tile_to_lat(y, tile_zoom).clamp(-85.0, 85.0);
        }

        if response.double_clicked() {
            self.recenter(reference);
        }

        let visible = TileManager::get_visible_tiles(
            self.center_lat,
            self.center_lon,
            tile_zoom,
            rect.width() / scale,
            rect.height() / scale,
        );
        let mut tiles_rendered = 0;
        for tile in visible {
            if let Some(texture) = self.tile_manager.get_tile(tile.coord, ui.ctx()) {
                let tile_rect = egui::Rect::from_min_size(
                    center + egui::vec2(tile.offset_x * scale, tile.offset_y * scale),
                    egui::vec2(tile_pixels, tile_pixels),
                );
                painter.image(
                    texture.id(),
                    tile_rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
                tiles_rendered += 1;
            }
        }
        self.update_tile_status(tiles_rendered);

        let center_lon = self.center_lon;
        let center_y = WebMercator::lat_to_y(self.center_lat, tile_zoom);
        let to_screen = |lat: f64, lon: f64| -> egui::Pos2 {
            let dx = WebMercator::wrapped_dx(lon, center_lon, tile_zoom) * f64::from(tile_pixels);
            let dy = (WebMercator::lat_to_y(lat, tile_zoom) - center_y) * f64::from(tile_pixels);
            egui::pos2(center.x + dx as f32, center.y + dy as f32)
        };

        let reference_pos = to_screen(reference.latitude, reference.longitude);
        let ring_px = radius_miles / WebMercator::miles_per_pixel(reference.latitude, self.zoom);
        if ring_px.is_finite() && ring_px > 0.0 {
            painter.circle_stroke(
                reference_pos,
                ring_px.min(MAX_RING_RADIUS_PX) as f32,
                egui::Stroke::new(1.5, egui::Color32::from_rgba_unmultiplied(30, 90, 200, 160)),
            );
        }

        let pointer = response.hover_pos();
        let mut hovered: Option<(usize, f32)> = None;
        for (index, marker) in markers.iter().enumerate() {
            let pos = to_screen(marker.latitude, marker.longitude);
            if !rect.expand(MARKER_RADIUS).contains(pos) {
                continue;
            }
            painter.circle_filled(pos, MARKER_RADIUS, egui::Color32::from_rgb(220, 40, 40));
            painter.circle_stroke(pos, MARKER_RADIUS, egui::Stroke::new(1.0, egui::Color32::WHITE));

            if let Some(pointer) = pointer {
                let distance = pointer.distance(pos);
                if distance <= HOVER_RADIUS && hovered.is_none_or(|(_, best)| distance < best) {
                    hovered = Some((index, distance));
                }
            }
        }

        draw_reference(&painter, rect, reference_pos);

        if let Some((index, _)) = hovered {
            let marker = &markers[index];
            draw_label(&painter, to_screen(marker.latitude, marker.longitude), &marker.label);
        }

        painter.text(
            rect.left_top() + egui::vec2(10.0, 10.0),
            egui::Align2::LEFT_TOP,
            "Drag to pan | Scroll to zoom | Double-click to recenter",
            egui::FontId::proportional(12.0),
            egui::Color32::BLACK,
        );

        // Attribution (required by Carto)
        painter.text(
            rect.right_bottom() + egui::vec2(-10.0, -10.0),
            egui::Align2::RIGHT_BOTTOM,
            "© OpenStreetMap contributors © CARTO",
            egui::FontId::proportional(10.0),
            egui::Color32::from_black_alpha(180),
        );

        if let Some(status) = &self.tile_status {
            painter.text(
                rect.center_top() + egui::vec2(0.0, 20.0),
                egui::Align2::CENTER_CENTER,
                status,
                egui::FontId::proportional(12.0),
                egui::Color32::from_rgb(180, 40, 40),
            );
        }

        hovered.map(|(index, _)| index)
    }

    fn update_tile_status(&mut self, tiles_rendered: usize) {
        let errors = self.tile_manager.get_error_count();
        if errors > 0 {
            self.tile_status = Some(format!("Failed to load {errors} tiles"));
        } else if self.tile_manager.has_loading_tiles() {
            self.tile_status = Some("Loading map tiles...".to_string());
        } else if tiles_rendered > 0 {
            self.tile_status = None;
        }
    }
}

/// Vertical mouse wheel movement this frame, in points.
fn wheel_scroll(events: &[egui::Event]) -> f32 {
    events
        .iter()
        .map(|event| match event {
            egui::Event::MouseWheel { unit, delta, .. } => match unit {
                egui::MouseWheelUnit::Point => delta.y,
                egui::MouseWheelUnit::Line => delta.y * LINE_SCROLL_POINTS,
                egui::MouseWheelUnit::Page => delta.y * PAGE_SCROLL_POINTS,
            },
            _ => 0.0,
        })
        .sum()
}

fn draw_reference(painter: &egui::Painter, rect: egui::Rect, pos: egui::Pos2) {
    if !rect.contains(pos) {
        return;
    }
    let green = egui::Color32::from_rgb(0, 160, 0);
    painter.circle_filled(pos, 7.0, egui::Color32::from_rgb(50, 255, 50));
    painter.circle_stroke(pos, 7.0, egui::Stroke::new(2.0, green));

    let arm = 11.0;
    painter.line_segment([pos + egui::vec2(-arm, 0.0), pos + egui::vec2(arm, 0.0)], egui::Stroke::new(2.0, green));
    painter.line_segment([pos + egui::vec2(0.0, -arm), pos + egui::vec2(0.0, arm)], egui::Stroke::new(2.0, green));

    painter.text(
        pos + egui::vec2(0.0, -18.0),
        egui::Align2::CENTER_BOTTOM,
        "Destination",
        egui::FontId::proportional(11.0),
        green,
    );
}

fn draw_label(painter: &egui::Painter, pos: egui::Pos2, text: &str) {
    let font = egui::FontId::proportional(11.0);
    let text_pos = pos + egui::vec2(10.0, -10.0);
    let galley = painter.layout_no_wrap(text.to_string(), font.clone(), egui::Color32::WHITE);

    let padding = egui::vec2(3.0, 2.0);
    let box_rect = egui::Rect::from_min_size(
        text_pos - egui::vec2(padding.x, galley.size().y / 2.0 + padding.y),
        galley.size() + padding * 2.0,
    );
    painter.rect_filled(box_rect, 2.0, egui::Color32::from_rgba_unmultiplied(0, 0, 0, 200));
    painter.text(text_pos, egui::Align2::LEFT_CENTER, text, font, egui::Color32::WHITE);
}
