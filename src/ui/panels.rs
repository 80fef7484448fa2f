use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::WILDCARD_LABEL;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter form
// ---------------------------------------------------------------------------

/// Render the filter form. Nothing is recomputed until "Apply" is clicked.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    // Clone what we need so we can mutate state inside the loop.
    let unique = dataset.unique_values.clone();
    let columns = state.config.filter_columns.clone();
    let (lo, hi) = state.age_bounds;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Age range ----
            ui.strong("Age range");
            ui.add(
                egui::Slider::new(&mut state.draft.age_min, lo..=hi)
                    .integer()
                    .text("min"),
            );
            ui.add(
                egui::Slider::new(&mut state.draft.age_max, lo..=hi)
                    .integer()
                    .text("max"),
            );
            if state.draft.age_min > state.draft.age_max {
                std::mem::swap(&mut state.draft.age_min, &mut state.draft.age_max);
            }
            ui.separator();

            // ---- Per-column multiselects (collapsible) ----
            for col in &columns {
                let selection = state.draft.selections.entry(col.clone()).or_default();
                let summary = if selection.all {
                    WILDCARD_LABEL.to_string()
                } else {
                    format!("{} selected", selection.values.len())
                };
                let header_text = format!("{col}  ({summary})");

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(col)
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        let Some(all_values) = unique.get(col) else {
                            ui.label(
                                RichText::new("column not in dataset").color(Color32::RED),
                            );
                            return;
                        };

                        let mut all = state
                            .draft
                            .selections
                            .get(col)
                            .map_or(true, |s| s.all);
                        if ui.checkbox(&mut all, WILDCARD_LABEL).changed() {
                            state.set_all(col, all);
                        }

                        for val in all_values {
                            let mut checked = state
                                .draft
                                .selections
                                .get(col)
                                .is_some_and(|s| s.values.contains(val));
                            if ui.checkbox(&mut checked, val.to_string()).changed() {
                                state.toggle_value(col, val);
                            }
                        }
                    });
            }

            ui.add_space(8.0);
            if ui
                .add_sized([ui.available_width(), 28.0], egui::Button::new("Apply"))
                .clicked()
            {
                state.apply();
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.strong("🎯 Target-audience analyzer for campaigns");
        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} rows loaded, {} after filters",
                ds.len(),
                state.visible_rows()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open campaign data")
        .add_filter("Supported files", &["csv", "txt", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv", "txt"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
