use std::sync::Arc;

use crate::color::ColorMap;
use crate::data::model::LaunchDataset;
use crate::data::query::{
    self, PayloadRange, PieSlice, ScatterPoint, SiteOption, SiteSelector,
};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The dashboard state, independent of rendering.
///
/// Each input setter recomputes exactly the chart that depends on it, the
/// same way the two chart callbacks of a reactive dashboard would.
pub struct AppState {
    /// Loaded launch table, shared read-only with the API server.
    pub dataset: Arc<LaunchDataset>,

    /// Dropdown entries (computed once).
    pub site_options: Vec<SiteOption>,

    /// Current dropdown selection.
    pub site: SiteSelector,

    /// Current payload slider handles, always `low <= high`.
    pub payload: PayloadRange,

    /// Slider upper bound.
    pub slider_max: f64,

    /// Pie data for the current selection (cached).
    pub pie: Vec<PieSlice>,

    /// Scatter data for the current selection and range (cached).
    pub scatter: Vec<ScatterPoint>,

    /// Colours for pie wedges (sites, then Success / Failure).
    pub pie_colors: ColorMap,

    /// Colours for scatter markers.
    pub booster_colors: ColorMap,

    /// Status message shown in the top bar (e.g. API address or bind error).
    pub status_message: Option<String>,
}

impl AppState {
    /// Initialise selections the way the dashboard opens: every site, and
    /// the payload range spanning the whole table.
    pub fn new(dataset: Arc<LaunchDataset>) -> Self {
        let site = SiteSelector::AllSites;
        let payload = PayloadRange::full(&dataset);
        let pie_colors = ColorMap::new(dataset.sites().chain(["Success", "Failure"]));
        let booster_colors = ColorMap::new(dataset.booster_categories());

        let mut state = Self {
            site_options: query::site_options(&dataset),
            slider_max: query::slider_max(&dataset),
            pie: Vec::new(),
            scatter: Vec::new(),
            pie_colors,
            booster_colors,
            status_message: None,
            dataset,
            site,
            payload,
        };
        state.refresh_pie();
        state.refresh_scatter();
        state
    }

    /// Change the site selection; both charts depend on it.
    pub fn set_site(&mut self, site: SiteSelector) {
        if site == self.site {
            return;
        }
        log::debug!("Site selection changed to {site}");
        self.site = site;
        self.refresh_pie();
        self.refresh_scatter();
    }

    /// Move the low slider handle, dragging the high one along if needed.
    pub fn set_payload_low(&mut self, low: f64) {
        let low = low.clamp(0.0, self.slider_max);
        let high = self.payload.high().max(low);
        self.set_payload(low, high);
    }

    /// Move the high slider handle, dragging the low one along if needed.
    pub fn set_payload_high(&mut self, high: f64) {
        let high = high.clamp(0.0, self.slider_max);
        let low = self.payload.low().min(high);
        self.set_payload(low, high);
    }

    fn set_payload(&mut self, low: f64, high: f64) {
        match PayloadRange::new(low, high) {
            Ok(range) if range != self.payload => {
                log::debug!("Payload range changed to {low}..={high} kg");
                self.payload = range;
                self.refresh_scatter();
            }
            Ok(_) => {}
            Err(e) => log::warn!("Ignoring slider update: {e}"),
        }
    }

    /// Recompute the pie after a site change.
    pub fn refresh_pie(&mut self) {
        self.pie = query::site_outcome_pie(&self.dataset, &self.site);
    }

    /// Recompute the scatter after a site or payload change.
    pub fn refresh_scatter(&mut self) {
        self.scatter = query::payload_scatter(&self.dataset, &self.site, self.payload);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{LaunchOutcome, LaunchRecord};

    fn dataset() -> Arc<LaunchDataset> {
        let rec = |site: &str, mass: f64, outcome: LaunchOutcome, booster: &str| LaunchRecord {
            launch_site: site.to_string(),
            payload_mass_kg: mass,
            outcome,
            booster_version_category: booster.to_string(),
        };
        Arc::new(LaunchDataset::from_records(vec![
            rec("CCAFS LC-40", 500.0, LaunchOutcome::Failure, "v1.0"),
            rec("KSC LC-39A", 3100.0, LaunchOutcome::Success, "FT"),
            rec("VAFB SLC-4E", 9600.0, LaunchOutcome::Success, "B4"),
        ]))
    }

    #[test]
    fn opens_on_all_sites_with_full_range() {
        let state = AppState::new(dataset());
        assert_eq!(state.site, SiteSelector::AllSites);
        assert_eq!(state.payload.low(), 500.0);
        assert_eq!(state.payload.high(), 9600.0);
        assert_eq!(state.slider_max, 10_000.0);
        assert_eq!(state.pie.len(), 3);
        assert_eq!(state.scatter.len(), 3);
        assert_eq!(state.site_options.len(), 4);
    }

    #[test]
    fn site_change_refreshes_both_charts() {
        let mut state = AppState::new(dataset());
        state.set_site(SiteSelector::parse("KSC LC-39A"));
        assert_eq!(state.pie[0].label, "Success");
        assert_eq!(state.pie[0].count, 1);
        assert_eq!(state.scatter.len(), 1);
        assert_eq!(state.scatter[0].booster_version_category, "FT");
    }

    #[test]
    fn slider_handles_never_cross() {
        let mut state = AppState::new(dataset());
        state.set_payload_low(5000.0);
        assert_eq!(state.payload.low(), 5000.0);
        assert_eq!(state.scatter.len(), 1);

        state.set_payload_high(1000.0);
        assert_eq!(state.payload.low(), 1000.0);
        assert_eq!(state.payload.high(), 1000.0);
        assert!(state.scatter.is_empty());

        state.set_payload_high(20_000.0);
        assert_eq!(state.payload.high(), 10_000.0);
    }

    #[test]
    fn payload_change_leaves_pie_alone() {
        let mut state = AppState::new(dataset());
        let pie = state.pie.clone();
        state.set_payload_low(9000.0);
        assert_eq!(state.pie, pie);
    }

    #[test]
    fn every_slice_has_a_colour() {
        let state = AppState::new(dataset());
        assert_eq!(state.pie_colors.legend_entries().len(), 5);
        assert_eq!(state.booster_colors.legend_entries().len(), 3);
    }
}
