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

//! Map tile fetching and caching.
//!
//! Tiles come from the Carto CDN, are decoded into egui textures on a
//! background thread and kept on disk under the user cache directory for
//! a week.

use egui::{ColorImage, TextureHandle};
use log::{debug, warn};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant, SystemTime};

use super::WebMercator;

pub const TILE_SIZE: u32 = 256;
const CACHE_DURATION_DAYS: u64 = 7;
// A failed tile is requested again once this much time has passed
const FAILED_RETRY_DELAY: Duration = Duration::from_secs(30);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
    pub zoom: u8,
}

impl TileCoord {
    pub fn new(x: u32, y: u32, zoom: u8) -> Self {
        Self { x, y, zoom }
    }

    /// Get the tile URL from Carto CDN
    pub fn url(&self) -> String {
        // Subdomain load balancing (a, b, c, d) based on tile coordinates
        let subdomain = ['a', 'b', 'c', 'd'][((self.x + self.y) % 4) as usize];
        format!(
            "https://{}.basemaps.cartocdn.com/rastertiles/voyager/{}/{}/{}.png",
            subdomain, self.zoom, self.x, self.y
        )
    }

    /// Get cache filename based on hash of URL
    fn cache_filename(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.url().as_bytes());
        format!("{:x}.png", hasher.finalize())
    }
}

/// A tile placed relative to the viewport centre, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedTile {
    pub coord: TileCoord,
    pub offset_x: f32,
    pub offset_y: f32,
}

enum TileState {
    Loading,
    Loaded(TextureHandle),
    Failed(Instant),
}

impl TileState {
    fn retry_due(&self, now: Instant) -> bool {
        matches!(self, TileState::Failed(at) if now.duration_since(*at) >= FAILED_RETRY_DELAY)
    }
}

type TileTable = Arc<Mutex<HashMap<TileCoord, TileState>>>;

pub struct TileManager {
    cache_dir: PathBuf,
    tiles: TileTable,
}

impl std::fmt::Debug for TileManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileManager")
            .field("cache_dir", &self.cache_dir)
            .finish_non_exhaustive()
    }
}

impl Default for TileManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TileManager {
    pub fn new() -> Self {
        let cache_dir = Self::get_cache_dir();

        if let Err(e) = fs::create_dir_all(&cache_dir) {
            warn!("Failed to create tile cache directory {}: {}", cache_dir.display(), e);
        }

        Self::cleanup_old_tiles(&cache_dir);

        Self {
            cache_dir,
            tiles: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn get_cache_dir() -> PathBuf {
        let mut path = dirs::cache_dir().unwrap_or_else(|| PathBuf::from(".cache"));
        path.push("airport-explorer");
        path.push("tiles");
        path
    }

    fn cleanup_old_tiles(cache_dir: &Path) {
        let now = SystemTime::now();
        let max_age = Duration::from_secs(CACHE_DURATION_DAYS * 24 * 60 * 60);

        let Ok(entries) = fs::read_dir(cache_dir) else {
            return;
        };
        for entry in entries.flatten() {
            let expired = entry
                .metadata()
                .and_then(|metadata| metadata.modified())
                .ok()
                .and_then(|modified| now.duration_since(modified).ok())
                .is_some_and(|age| age > max_age);
            if expired {
                let _ = fs::remove_file(entry.path());
                debug!("Removed old tile cache: {}", entry.path().display());
            }
        }
    }

    fn lock(tiles: &TileTable) -> MutexGuard<'_, HashMap<TileCoord, TileState>> {
        tiles.lock().expect("Tile table mutex poisoned")
    }

    /// Get tile from cache or queue for download
    pub fn get_tile(&self, coord: TileCoord, ctx: &egui::Context) -> Option<TextureHandle> {
        let mut tiles = Self::lock(&self.tiles);

        match tiles.get(&coord) {
            Some(TileState::Loaded(texture)) => return Some(texture.clone()),
            Some(state) if !state.retry_due(Instant::now()) => return None,
            _ => {}
        }

        let cache_path = self.cache_dir.join(coord.cache_filename());
        if cache_path.exists() {
            match fs::read(&cache_path)
                .map_err(|e| e.to_string())
                .and_then(|bytes| decode_tile(&bytes, ctx, coord))
            {
                Ok(texture) => {
                    tiles.insert(coord, TileState::Loaded(texture.clone()));
                    return Some(texture);
                }
                Err(e) => warn!("Failed to load cached tile: {}", e),
            }
        }

        tiles.insert(coord, TileState::Loading);
        drop(tiles);
        self.spawn_download(coord, ctx.clone());
        None
    }

    fn spawn_download(&self, coord: TileCoord, ctx: egui::Context) {
        let tiles = Arc::clone(&self.tiles);
        let cache_dir = self.cache_dir.clone();

        std::thread::spawn(move || {
            let state = match Self::download_tile(coord, &cache_dir, &ctx) {
                Ok(texture) => TileState::Loaded(texture),
                Err(e) => {
                    warn!("Failed to fetch tile {}: {}", coord.url(), e);
                    TileState::Failed(Instant::now())
                }
            };
            Self::lock(&tiles).insert(coord, state);
            ctx.request_repaint();
        });
    }

    fn download_tile(
        coord: TileCoord,
        cache_dir: &Path,
        ctx: &egui::Context,
    ) -> Result<TextureHandle, String> {
        let url = coord.url();
        debug!("Downloading tile: {}", url);

        let response = reqwest::blocking::get(&url).map_err(|e| e.to_string())?;
        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status()));
        }
        let bytes = response.bytes().map_err(|e| e.to_string())?;

        if let Err(e) = fs::write(cache_dir.join(coord.cache_filename()), &bytes) {
            warn!("Failed to save tile to cache: {}", e);
        }

        decode_tile(&bytes, ctx, coord)
    }

    /// Get all tiles needed for a viewport
    pub fn get_visible_tiles(
        center_lat: f64,
        center_lon: f64,
        zoom: u8,
        viewport_width: f32,
        viewport_height: f32,
    ) -> Vec<PlacedTile> {
        let mut tiles = Vec::new();

        let center_tile_x = WebMercator::lon_to_x(center_lon, zoom);
        let center_tile_y = WebMercator::lat_to_y(center_lat, zoom);

        // Calculate how many tiles we need in each direction
        let tiles_wide = (viewport_width / TILE_SIZE as f32).ceil() as i32 + 2;
        let tiles_high = (viewport_height / TILE_SIZE as f32).ceil() as i32 + 2;

        let start_x = center_tile_x.floor() as i32 - tiles_wide / 2;
        let start_y = center_tile_y.floor() as i32 - tiles_high / 2;

        let max_tile = 2_i32.pow(u32::from(zoom));

        for dy in 0..tiles_high {
            for dx in 0..tiles_wide {
                let tile_x = start_x + dx;
                let tile_y = start_y + dy;

                // Longitude wraps, latitude doesn't
                let wrapped_x = tile_x.rem_euclid(max_tile);
                if tile_y < 0 || tile_y >= max_tile {
                    continue;
                }

                tiles.push(PlacedTile {
                    coord: TileCoord::new(wrapped_x as u32, tile_y as u32, zoom),
                    offset_x: ((f64::from(tile_x) - center_tile_x) * f64::from(TILE_SIZE)) as f32,
                    offset_y: ((f64::from(tile_y) - center_tile_y) * f64::from(TILE_SIZE)) as f32,
                });
            }
        }

        tiles
    }

    pub fn has_loading_tiles(&self) -> bool {
        Self::lock(&self.tiles)
            .values()
            .any(|state| matches!(state, TileState::Loading))
    }

    /// Number of recent tile failures. Failures older than the retry
    /// delay are forgotten so they are fetched again when next visible.
    pub fn get_error_count(&self) -> usize {
        let now = Instant::now();
        let mut tiles = Self::lock(&self.tiles);
        tiles.retain(|_, state| !state.retry_due(now));
        tiles
            .values()
            .filter(|state| matches!(state, TileState::Failed(_)))
            .count()
    }
}

fn decode_tile(bytes: &[u8], ctx: &egui::Context, coord: TileCoord) -> Result<TextureHandle, String> {
    let img = image::load_from_memory(bytes).map_err(|e| e.to_string())?;
    let rgba = img.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];

    let color_image = ColorImage::from_rgba_unmultiplied(size, &rgba.into_raw());

    Ok(ctx.load_texture(
        format!("tile_{}_{}/{}", coord.zoom, coord.x, coord.y),
        color_image,
        egui::TextureOptions::default(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_url_uses_subdomain_rotation() {
        assert!(TileCoord::new(0, 0, 3).url().starts_with("https://a."));
        assert!(TileCoord::new(1, 0, 3).url().starts_with("https://b."));
        assert!(TileCoord::new(2, 1, 3).url().ends_with("/3/2/1.png"));
    }

    #[test]
    fn test_cache_filename_is_stable() {
        let coord = TileCoord::new(10, 20, 7);
        assert_eq!(coord.cache_filename(), coord.cache_filename());
        assert_ne!(coord.cache_filename(), TileCoord::new(10, 21, 7).cache_filename());
        assert!(coord.cache_filename().ends_with(".png"));
    }

    #[test]
    fn test_old_failures_are_forgotten() {
        let manager = TileManager {
            cache_dir: PathBuf::new(),
            tiles: Arc::new(Mutex::new(HashMap::new())),
        };
        let now = Instant::now();
        let long_ago = now.checked_sub(FAILED_RETRY_DELAY * 2).unwrap();
        {
            let mut tiles = TileManager::lock(&manager.tiles);
            tiles.insert(TileCoord::new(1, 1, 5), TileState::Failed(long_ago));
            tiles.insert(TileCoord::new(2, 1, 5), TileState::Failed(now));
        }

        assert_eq!(manager.get_error_count(), 1);
        let tiles = TileManager::lock(&manager.tiles);
        assert!(!tiles.contains_key(&TileCoord::new(1, 1, 5)));
        assert!(tiles.contains_key(&TileCoord::new(2, 1, 5)));
    }

    #[test]
    fn test_retry_due_only_for_old_failures() {
        let now = Instant::now();
        let long_ago = now.checked_sub(FAILED_RETRY_DELAY).unwrap();
        assert!(TileState::Failed(long_ago).retry_due(now));
        assert!(!TileState::Failed(now).retry_due(now));
        assert!(!TileState::Loading.retry_due(now));
    }

    #[test]
    fn test_visible_tiles_cover_viewport() {
        let tiles = TileManager::get_visible_tiles(42.0, -71.0, 7, 800.0, 600.0);
        // ceil(800/256)+2 = 6 wide, ceil(600/256)+2 = 5 high
        assert_eq!(tiles.len(), 30);
        assert!(tiles.iter().all(|t| t.coord.zoom == 7 && t.coord.x < 128 && t.coord.y < 128));
    }

    #[test]
    fn test_visible_tiles_wrap_longitude() {
        let tiles = TileManager::get_visible_tiles(0.0, 179.9, 2, 1024.0, 256.0);
        assert!(tiles.iter().any(|t| t.coord.x == 0));
        assert!(tiles.iter().any(|t| t.coord.x == 3));
    }
}
