use std::f64::consts::TAU;

use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{Legend, MarkerShape, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};

use crate::data::query::{self, PieSlice};
use crate::state::AppState;

/// Points used to approximate a full circle.
const PIE_RESOLUTION: usize = 180;

// ---------------------------------------------------------------------------
// Success pie chart
// ---------------------------------------------------------------------------

/// Render the success pie for the current site selection.
pub fn success_pie(ui: &mut Ui, state: &AppState) {
    ui.heading(query::pie_title(&state.site));

    let total: u64 = state.pie.iter().map(|s| s.count).sum();
    if total == 0 {
        ui.label("No launches to show for this selection.");
        return;
    }

    Plot::new("success_pie")
        .legend(Legend::default())
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .height(320.0)
        .show(ui, |plot_ui| {
            for wedge in pie_wedges(&state.pie) {
                let color = state.pie_colors.color_for(&wedge.label);
                plot_ui.polygon(
                    Polygon::new(PlotPoints::from(wedge.outline))
                        .name(&wedge.label)
                        .fill_color(color)
                        .stroke(Stroke::new(1.0, Color32::WHITE)),
                );
                plot_ui.text(Text::new(
                    PlotPoint::new(wedge.label_at[0], wedge.label_at[1]),
                    RichText::new(format!("{:.1}%", wedge.share * 100.0)).strong(),
                ));
            }
        });
}

/// Geometry of one pie wedge on the unit circle.
struct Wedge {
    label: String,
    share: f64,
    outline: Vec<[f64; 2]>,
    label_at: [f64; 2],
}

/// Lay slices out clockwise from twelve o'clock. Zero-count slices get no
/// wedge but keep their legend colour slot.
fn pie_wedges(slices: &[PieSlice]) -> Vec<Wedge> {
    let total: u64 = slices.iter().map(|s| s.count).sum();
    if total == 0 {
        return Vec::new();
    }

    let mut start = TAU / 4.0;
    let mut wedges = Vec::new();
    for slice in slices.iter().filter(|s| s.count > 0) {
        let share = slice.count as f64 / total as f64;
        let sweep = share * TAU;
        let steps = ((PIE_RESOLUTION as f64 * share).ceil() as usize).max(2);

        let mut outline = vec![[0.0, 0.0]];
        outline.extend((0..=steps).map(|i| {
            let angle = start - sweep * i as f64 / steps as f64;
            [angle.cos(), angle.sin()]
        }));

        let mid = start - sweep / 2.0;
        wedges.push(Wedge {
            label: slice.label.clone(),
            share,
            outline,
            label_at: [0.65 * mid.cos(), 0.65 * mid.sin()],
        });
        start -= sweep;
    }
    wedges
}

// ---------------------------------------------------------------------------
// Payload / outcome scatter
// ---------------------------------------------------------------------------

/// Render payload mass against launch class, one series per booster category.
pub fn payload_scatter(ui: &mut Ui, state: &AppState) {
    ui.heading(query::scatter_title(&state.site));

    Plot::new("payload_scatter")
        .legend(Legend::default())
        .x_axis_label("Payload Mass (kg)")
        .y_axis_label("class")
        .include_x(0.0)
        .include_x(state.slider_max)
        .include_y(-0.25)
        .include_y(1.25)
        .height(360.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (category, color) in state.booster_colors.legend_entries() {
                let points: PlotPoints = state
                    .scatter
                    .iter()
                    .filter(|p| p.booster_version_category == category)
                    .map(|p| [p.payload_mass_kg, f64::from(p.class)])
                    .collect();
                if points.points().is_empty() {
                    continue;
                }

                plot_ui.points(
                    Points::new(points)
                        .name(&category)
                        .color(color)
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(5.0),
                );
            }
        });
}
