use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::query::{self, PAYLOAD_STEP_KG, SiteSelector};
use crate::state::AppState;

pub const DASHBOARD_TITLE: &str = "SpaceX Launch Records Dashboard";

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the title bar with the dataset summary and status line.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(
            RichText::new(DASHBOARD_TITLE)
                .size(32.0)
                .color(Color32::from_rgb(0x50, 0x3D, 0x36))
                .strong(),
        );
    });

    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!(
            "{} launches from {} sites",
            state.dataset.len(),
            state.dataset.sites().count()
        ));
        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).weak());
        }
    });
}

// ---------------------------------------------------------------------------
// Site dropdown
// ---------------------------------------------------------------------------

/// Searchable launch-site dropdown.
pub fn site_dropdown(ui: &mut Ui, state: &mut AppState, search: &mut String) {
    let mut selected: Option<SiteSelector> = None;

    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Launch Site");
        egui::ComboBox::from_id_salt("site_dropdown")
            .width(240.0)
            .selected_text(state.site.label())
            .show_ui(ui, |ui: &mut Ui| {
                ui.add(
                    egui::TextEdit::singleline(search).hint_text("Select a Launch Site"),
                );
                let needle = search.to_lowercase();
                for option in &state.site_options {
                    if !needle.is_empty() && !option.label.to_lowercase().contains(&needle) {
                        continue;
                    }
                    let is_current = state.site.value() == option.value;
                    if ui.selectable_label(is_current, &option.label).clicked() {
                        selected = Some(SiteSelector::parse(&option.value));
                    }
                }
            });
    });

    if let Some(site) = selected {
        search.clear();
        state.set_site(site);
    }
}

// ---------------------------------------------------------------------------
// Payload range slider
// ---------------------------------------------------------------------------

/// Two-handle payload range control in fixed steps.
pub fn payload_slider(ui: &mut Ui, state: &mut AppState) {
    ui.label("Payload range (Kg):");

    let mut low = state.payload.low();
    let mut high = state.payload.high();
    let max = state.slider_max;

    let low_changed = ui
        .add(
            egui::Slider::new(&mut low, 0.0..=max)
                .step_by(PAYLOAD_STEP_KG)
                .text("min"),
        )
        .changed();
    let high_changed = ui
        .add(
            egui::Slider::new(&mut high, 0.0..=max)
                .step_by(PAYLOAD_STEP_KG)
                .text("max"),
        )
        .changed();

    if low_changed {
        state.set_payload_low(low);
    }
    if high_changed {
        state.set_payload_high(high);
    }

    // Tick labels under the sliders
    ui.horizontal(|ui: &mut Ui| {
        for mark in query::slider_marks(max) {
            ui.label(RichText::new(format!("{mark:.0}")).small().weak());
            ui.add_space(24.0);
        }
    });
}
