use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            to_color32(Hsl::new(hue, 0.75, 0.55).into_color())
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

/// Parse `#rrggbb` (leading `#` optional).
pub fn parse_hex(hex: &str) -> Option<Color32> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?))
}

/// Catalog colour, or grey when the hex is malformed.
pub fn hex_or_gray(hex: &str) -> Color32 {
    parse_hex(hex).unwrap_or(Color32::GRAY)
}

/// Same colour with the given opacity, for area fills.
pub fn with_alpha(color: Color32, alpha: f32) -> Color32 {
    let [r, g, b, _] = color.to_array();
    Color32::from_rgba_unmultiplied(r, g, b, (alpha.clamp(0.0, 1.0) * 255.0) as u8)
}

// ---------------------------------------------------------------------------
// WCAG contrast
// ---------------------------------------------------------------------------

/// Relative luminance of an sRGB colour (WCAG 2.x).
pub fn relative_luminance(color: Color32) -> f32 {
    let linear: LinSrgb = Srgb::new(color.r(), color.g(), color.b())
        .into_format::<f32>()
        .into_linear();
    0.2126 * linear.red + 0.7152 * linear.green + 0.0722 * linear.blue
}

pub fn contrast_ratio(a: Color32, b: Color32) -> f32 {
    let (la, lb) = (relative_luminance(a), relative_luminance(b));
    let (hi, lo) = if la >= lb { (la, lb) } else { (lb, la) };
    (hi + 0.05) / (lo + 0.05)
}

/// Minimum contrast for normal text at level AA.
pub const WCAG_AA: f32 = 4.5;

/// Return `color`, or the nearest lightness step of it that reaches AA
/// contrast against `background`. Darkens on light backgrounds and lightens
/// on dark ones; gives up after ten 5% steps.
pub fn accessible_variant(color: Color32, background: Color32) -> Color32 {
    if contrast_ratio(color, background) >= WCAG_AA {
        return color;
    }
    let rgb: Srgb = Srgb::new(color.r(), color.g(), color.b()).into_format();
    let mut hsl: Hsl = rgb.into_color();
    let step = if relative_luminance(background) > 0.5 {
        -0.05
    } else {
        0.05
    };

    let mut candidate = color;
    for _ in 0..10 {
        hsl.lightness = (hsl.lightness + step).clamp(0.0, 1.0);
        candidate = to_color32(hsl.into_color());
        if contrast_ratio(candidate, background) >= WCAG_AA {
            break;
        }
    }
    candidate
}

// ---------------------------------------------------------------------------
// Color mapping: category label → Color32
// ---------------------------------------------------------------------------

/// Maps the category labels of one metric to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    pub metric: String,
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map for the given metric from its labels.
    pub fn new(metric: &str, labels: &BTreeSet<String>) -> Self {
        let palette = generate_palette(labels.len());
        let mapping: BTreeMap<String, Color32> = labels.iter().cloned().zip(palette).collect();

        ColorMap {
            metric: metric.to_string(),
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a label.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Return the legend entries (label → colour) for the UI.
    pub fn legend_entries(&self) -> Vec<(String, Color32)> {
        self.mapping
            .iter()
            .map(|(label, c)| (label.clone(), *c))
            .collect()
    }
}
