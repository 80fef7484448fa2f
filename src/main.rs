mod app;
mod color;
mod config;
mod data;
mod export;
mod state;
mod ui;

use std::path::{Path, PathBuf};

use app::CampaignAnalyzerApp;
use config::{AppConfig, CONFIG_FILE};
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::load_or_default(Path::new(CONFIG_FILE));
    // An explicit path on the command line wins over the configured one.
    let startup_path: Option<PathBuf> = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| Some(config.dataset_path.clone()).filter(|p| p.exists()));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Campaign Analyzer – Target Audience",
        options,
        Box::new(move |_cc| Ok(Box::new(CampaignAnalyzerApp::new(config, startup_path)))),
    )
}
