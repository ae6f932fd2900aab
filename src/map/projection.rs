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

use airport_core::EARTH_RADIUS_MILES;

use super::tiles::TILE_SIZE;

/// Web Mercator projection utilities
#[derive(Debug)]
pub struct WebMercator;

impl WebMercator {
    /// Convert latitude to a fractional tile Y coordinate at `zoom`
    pub fn lat_to_y(lat: f64, zoom: u8) -> f64 {
        let lat_rad = lat.to_radians();
        let n = 2_f64.powi(i32::from(zoom));
        let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / std::f64::consts::PI) / 2.0;
        y * n
    }

    /// Convert longitude to a fractional tile X coordinate at `zoom`
    pub fn lon_to_x(lon: f64, zoom: u8) -> f64 {
        let n = 2_f64.powi(i32::from(zoom));
        ((lon + 180.0) / 360.0) * n
    }

    /// Convert a fractional tile Y coordinate back to latitude
    pub fn tile_to_lat(y: f64, zoom: u8) -> f64 {
        let n = 2_f64.powi(i32::from(zoom));
        let lat_rad = ((std::f64::consts::PI * (1.0 - 2.0 * y / n)).sinh()).atan();
        lat_rad.to_degrees()
    }

    /// Convert a fractional tile X coordinate back to longitude
    pub fn tile_to_lon(x: f64, zoom: u8) -> f64 {
        let n = 2_f64.powi(i32::from(zoom));
        x / n * 360.0 - 180.0
    }

    /// Horizontal tile offset from `center_lon` to `lon`, taking the shorter
    /// way around the antimeridian.
    pub fn wrapped_dx(lon: f64, center_lon: f64, zoom: u8) -> f64 {
        let world = 2_f64.powi(i32::from(zoom));
        let dx = Self::lon_to_x(lon, zoom) - Self::lon_to_x(center_lon, zoom);
        dx - world * (dx / world).round()
    }

    /// Ground distance covered by one screen pixel at `lat`.
    ///
    /// `zoom` may be fractional; the map scales tiles between integer levels.
    pub fn miles_per_pixel(lat: f64, zoom: f32) -> f64 {
        let circumference = 2.0 * std::f64::consts::PI * EARTH_RADIUS_MILES;
        let world_pixels = f64::from(TILE_SIZE) * 2_f64.powf(f64::from(zoom));
        circumference * lat.to_radians().cos() / world_pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_is_map_centre() {
        assert!((WebMercator::lon_to_x(0.0, 1) - 1.0).abs() < 1e-12);
        assert!((WebMercator::lat_to_y(0.0, 1) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_north_is_up() {
        assert!(WebMercator::lat_to_y(60.0, 5) < WebMercator::lat_to_y(10.0, 5));
        assert!(WebMercator::lon_to_x(-71.0, 5) < WebMercator::lon_to_x(0.0, 5));
    }

    #[test]
    fn test_tile_round_trip() {
        let x = WebMercator::lon_to_x(-71.0096, 9);
        let y = WebMercator::lat_to_y(42.3656, 9);
        assert!((WebMercator::tile_to_lon(x, 9) - -71.0096).abs() < 1e-9);
        assert!((WebMercator::tile_to_lat(y, 9) - 42.3656).abs() < 1e-9);
    }

    #[test]
    fn test_wrapped_dx_crosses_antimeridian() {
        // 179.8E to 179.8W is 0.4 degrees of longitude, not 359.6
        let dx = WebMercator::wrapped_dx(-179.8, 179.8, 7);
        let expected = 0.4 / 360.0 * 128.0;
        assert!((dx - expected).abs() < 1e-9);
        assert!((dx * f64::from(TILE_SIZE)).abs() < 100.0);

        let back = WebMercator::wrapped_dx(179.8, -179.8, 7);
        assert!((back + expected).abs() < 1e-9);
    }

    #[test]
    fn test_wrapped_dx_matches_plain_offset_nearby() {
        let plain = WebMercator::lon_to_x(-71.0, 7) - WebMercator::lon_to_x(-72.5, 7);
        assert!((WebMercator::wrapped_dx(-71.0, -72.5, 7) - plain).abs() < 1e-12);
    }

    #[test]
    fn test_miles_per_pixel_shrinks_with_zoom_and_latitude() {
        let equator_z0 = WebMercator::miles_per_pixel(0.0, 0.0);
        let expected = 2.0 * std::f64::consts::PI * EARTH_RADIUS_MILES / 256.0;
        assert!((equator_z0 - expected).abs() < 1e-9);

        let equator_z1 = WebMercator::miles_per_pixel(0.0, 1.0);
        assert!((equator_z0 / equator_z1 - 2.0).abs() < 1e-9);

        assert!(WebMercator::miles_per_pixel(60.0, 7.0) < WebMercator::miles_per_pixel(0.0, 7.0));
    }
}
