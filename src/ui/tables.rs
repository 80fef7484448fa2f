use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::Dataset;
use crate::state::{AppState, ExportKind};

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Data tables with spreadsheet downloads
// ---------------------------------------------------------------------------

/// Render the raw / proportion tables side by side, then the filtered rows
/// and the conversion summary, each with a download button.
pub fn downloads_section(ui: &mut Ui, state: &mut AppState) {
    if state.dataset.is_none() {
        return;
    }

    // Buttons only record the request; the save dialog needs `&mut state`.
    let mut requested: Option<ExportKind> = None;
    let view: &AppState = state;

    ui.columns(2, |cols: &mut [Ui]| {
        table_with_download(
            &mut cols[0],
            view,
            "Original data",
            ExportKind::Raw,
            &mut requested,
        );
        table_with_download(
            &mut cols[1],
            view,
            "Outcome proportion (filtered)",
            ExportKind::Proportions,
            &mut requested,
        );
    });
    ui.separator();
    ui.columns(2, |cols: &mut [Ui]| {
        table_with_download(
            &mut cols[0],
            view,
            "Filtered rows",
            ExportKind::Filtered,
            &mut requested,
        );
        table_with_download(
            &mut cols[1],
            view,
            "Conversion by age bucket",
            ExportKind::Conversion,
            &mut requested,
        );
    });

    if let Some(kind) = requested {
        save_file_dialog(state, kind);
    }
}

fn table_with_download(
    ui: &mut Ui,
    state: &AppState,
    title: &str,
    kind: ExportKind,
    requested: &mut Option<ExportKind>,
) {
    ui.heading(title);
    let Some(table) = state.table(kind) else {
        ui.label("Nothing to show.");
        return;
    };
    ui.label(format!("{} rows", table.len()));
    if ui.button("📥 Download").clicked() {
        *requested = Some(kind);
    }
    ui.push_id(title, |ui: &mut Ui| data_table(ui, table));
}

/// Virtualized table: only visible rows are laid out.
fn data_table(ui: &mut Ui, dataset: &Dataset) {
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(260.0)
        .columns(Column::auto().at_least(60.0), dataset.column_names.len())
        .header(20.0, |mut header| {
            for name in &dataset.column_names {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, dataset.len(), |mut row| {
                let record = &dataset.rows[row.index()];
                for value in record {
                    row.col(|ui| {
                        ui.label(value.to_string());
                    });
                }
            });
        });
}

fn save_file_dialog(state: &mut AppState, kind: ExportKind) {
    let file = rfd::FileDialog::new()
        .set_title("Save spreadsheet")
        .set_file_name(kind.default_file_name())
        .add_filter("Excel workbook", &["xlsx"])
        .save_file();

    if let Some(path) = file {
        state.export(kind, &path);
    }
}
