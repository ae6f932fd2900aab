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

//! Dataset download.
//!
//! Fetches the airport CSV on first run so the explorer works without any
//! manual setup. An existing file is never overwritten.

use std::fs;
use std::path::Path;

use log::info;

/// Download the dataset to `path` unless it already exists.
///
/// Returns `true` when a download happened.
pub fn ensure_dataset(path: &Path, url: &str) -> Result<bool, Box<dyn std::error::Error>> {
    if path.exists() {
        info!("{} already exists, skipping download", path.display());
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    info!("Downloading airport dataset from {}...", url);
    let response = reqwest::blocking::get(url)?.error_for_status()?;
    let bytes = response.bytes()?;

    // Written next to the target, then renamed into place
    let partial = path.with_extension("csv.part");
    fs::write(&partial, &bytes)?;
    fs::rename(&partial, path)?;

    info!("Downloaded {} ({} bytes)", path.display(), bytes.len());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_existing_file_is_not_downloaded() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let downloaded = ensure_dataset(file.path(), "http://127.0.0.1:9/unreachable.csv").unwrap();
        assert!(!downloaded);
    }
}
