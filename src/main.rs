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

mod app;
mod cli;
mod config;
mod download;
mod map;
mod ui;

use std::error::Error;
use std::path::PathBuf;

use airport_core::Dataset;
use clap::Parser;
use eframe::egui;
use log::{error, info, warn};

use app::ExplorerApp;
use config::AppConfig;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Airport CSV to load instead of the configured dataset
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Configuration file to use instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fetch the dataset from the configured URL if it is not on disk
    #[arg(long)]
    download: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<cli::Command>,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(cli) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = load_config(cli.config.as_deref());

    let dataset_path = cli.data.clone().unwrap_or_else(|| config.resolved_dataset_path());
    if cli.download || (cli.data.is_none() && !dataset_path.exists()) {
        download::ensure_dataset(&dataset_path, &config.dataset_url)?;
    }
    let dataset = Dataset::from_path(&dataset_path)?;

    if let Some(command) = &cli.command {
        let stdout = std::io::stdout();
        return cli::run(command, &dataset, &mut stdout.lock());
    }

    info!("Starting Airport Explorer with {} airports", dataset.len());
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_title("Airport Explorer"),
        ..Default::default()
    };

    eframe::run_native(
        "Airport Explorer",
        options,
        Box::new(move |cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(ExplorerApp::new(dataset, config)))
        }),
    )?;
    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> AppConfig {
    let (loaded, shown) = match path {
        Some(path) => (AppConfig::load_from(path), Some(path.to_path_buf())),
        None => (AppConfig::load(), AppConfig::get_config_path().ok()),
    };
    match loaded {
        Ok(config) => {
            if let Some(shown) = shown {
                info!("Configuration: {}", shown.display());
            }
            config
        }
        Err(e) => {
            warn!("Failed to load configuration, using defaults: {e}");
            AppConfig::default()
        }
    }
}
