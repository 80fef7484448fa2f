use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Plot};

use crate::color::rate_color;
use crate::data::aggregate::BUCKET_WIDTH;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Results summary and conversion chart (central panel)
// ---------------------------------------------------------------------------

/// Render the headline numbers and the conversion-by-age chart.
pub fn results_section(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a campaign dataset to start  (File → Open…)");
        });
        return;
    }
    let Some(results) = &state.results else {
        ui.label("No results to show.");
        return;
    };

    let range = results.age_range;
    ui.heading(format!(
        "📊 Results for ages between {} and {}",
        range.min, range.max
    ));
    if state.applied.is_none() {
        ui.label(RichText::new("Showing the full dataset; press Apply to filter.").italics());
    }

    let acceptance = &results.acceptance;
    ui.label(format!("• Customers in selection: {}", acceptance.total));
    ui.label(format!("• Accepted the offer: {}", acceptance.accepted));
    ui.label(format!("• Conversion rate: {:.2}%", acceptance.rate_percent));
    ui.add_space(8.0);

    if results.filtered.is_empty() {
        ui.label(
            RichText::new("⚠ No customers match the current filters.")
                .color(Color32::from_rgb(230, 160, 0)),
        );
        return;
    }
    if results.conversion.is_empty() {
        ui.label("No customer falls within the charted age buckets.");
        return;
    }

    let bars: Vec<Bar> = results
        .conversion
        .buckets
        .iter()
        .map(|b| {
            Bar::new(b.bucket.center(), b.rate_percent)
                .width(BUCKET_WIDTH as f64 * 0.9)
                .name(format!("{} ({} rows)", b.bucket, b.total))
                .fill(rate_color(b.rate_percent))
                .stroke((1.0, Color32::BLACK))
        })
        .collect();

    ui.strong("Conversion by age bucket (filtered)");
    Plot::new("conversion_plot")
        .height(320.0)
        .x_axis_label("Age")
        .y_axis_label("Conversion rate (%)")
        .include_y(0.0)
        .include_y(100.0)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("conversion"));
        });
}
