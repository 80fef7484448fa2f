use std::path::PathBuf;

use eframe::egui;

use crate::config::AppConfig;
use crate::state::AppState;
use crate::ui::{panels, plot, tables};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CampaignAnalyzerApp {
    pub state: AppState,
}

impl CampaignAnalyzerApp {
    pub fn new(config: AppConfig, startup_path: Option<PathBuf>) -> Self {
        let mut state = AppState::new(config);
        if let Some(path) = startup_path {
            state.load_path(&path);
        }
        Self { state }
    }
}

impl eframe::App for CampaignAnalyzerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filter form ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: summary, chart, tables ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    plot::results_section(ui, &self.state);
                    ui.separator();
                    tables::downloads_section(ui, &mut self.state);
                });
        });
    }
}
