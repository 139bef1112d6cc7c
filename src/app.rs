use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
    /// Text typed into the site dropdown's search box.
    site_search: String,
}

impl DashboardApp {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            site_search: String::new(),
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title and site selection ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
            ui.separator();
            panels::site_dropdown(ui, &mut self.state, &mut self.site_search);
            ui.add_space(4.0);
        });

        // ---- Central panel: pie, payload range, scatter ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    plot::success_pie(ui, &self.state);
                    ui.separator();
                    panels::payload_slider(ui, &mut self.state);
                    ui.separator();
                    plot::payload_scatter(ui, &self.state);
                });
        });
    }
}
