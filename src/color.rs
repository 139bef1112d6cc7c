use eframe::egui::Color32;
use indexmap::IndexMap;
use palette::{Hsl, IntoColor, Srgb};

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
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category label → Color32
// ---------------------------------------------------------------------------

/// Maps the categories of one chart dimension (booster category, launch site)
/// to distinct colours. Legend order is the order categories were given in.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: IndexMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from the categories of one dimension.
    pub fn new<'a>(categories: impl IntoIterator<Item = &'a str>) -> Self {
        let mut mapping: IndexMap<String, Color32> = categories
            .into_iter()
            .map(|c| (c.to_string(), Color32::GRAY))
            .collect();
        let palette = generate_palette(mapping.len());
        for (colour, slot) in palette.into_iter().zip(mapping.values_mut()) {
            *slot = colour;
        }

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given category.
    pub fn color_for(&self, category: &str) -> Color32 {
        self.mapping
            .get(category)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Return the legend entries (category → colour) for the UI.
    pub fn legend_entries(&self) -> Vec<(String, Color32)> {
        self.mapping
            .iter()
            .map(|(c, colour)| (c.clone(), *colour))
            .collect()
    }
}
