use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Conversion-rate colour scale
// ---------------------------------------------------------------------------

/// Hue at 0% conversion (red) and at 100% (green).
const HUE_LOW: f32 = 0.0;
const HUE_HIGH: f32 = 130.0;

/// Colour for a bar showing `rate_percent`, from red (0%) to green (100%).
/// Out-of-range inputs are clamped.
pub fn rate_color(rate_percent: f64) -> Color32 {
    let t = (rate_percent / 100.0).clamp(0.0, 1.0) as f32;
    let hue = HUE_LOW + t * (HUE_HIGH - HUE_LOW);
    let hsl = Hsl::new(hue, 0.65, 0.5);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extremes_are_red_and_green() {
        let low = rate_color(0.0);
        assert!(low.r() > low.g());
        let high = rate_color(100.0);
        assert!(high.g() > high.r());
    }

    #[test]
    fn test_clamped() {
        assert_eq!(rate_color(-5.0), rate_color(0.0));
        assert_eq!(rate_color(250.0), rate_color(100.0));
    }
}
