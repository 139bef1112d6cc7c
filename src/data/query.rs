use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use super::model::{LaunchDataset, LaunchOutcome};

/// Dropdown value meaning "every site".
pub const ALL_SITES_VALUE: &str = "ALL";
pub const ALL_SITES_LABEL: &str = "All Sites";

/// Payload slider granularity in kg.
pub const PAYLOAD_STEP_KG: f64 = 500.0;
/// Distance between labelled slider ticks in kg.
pub const PAYLOAD_MARK_KG: f64 = 2500.0;

// ---------------------------------------------------------------------------
// Inputs: site selector and payload range
// ---------------------------------------------------------------------------

/// Current value of the site dropdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum SiteSelector {
    #[default]
    AllSites,
    Site(String),
}

impl SiteSelector {
    /// Interpret a raw dropdown value. `"ALL"` selects every site, anything
    /// else names one site (which may or may not exist).
    pub fn parse(value: &str) -> Self {
        if value == ALL_SITES_VALUE {
            SiteSelector::AllSites
        } else {
            SiteSelector::Site(value.to_string())
        }
    }

    /// Raw dropdown value, inverse of [`SiteSelector::parse`].
    pub fn value(&self) -> &str {
        match self {
            SiteSelector::AllSites => ALL_SITES_VALUE,
            SiteSelector::Site(site) => site,
        }
    }

    /// Human-readable dropdown label.
    pub fn label(&self) -> &str {
        match self {
            SiteSelector::AllSites => ALL_SITES_LABEL,
            SiteSelector::Site(site) => site,
        }
    }

    fn matches(&self, site: &str) -> bool {
        match self {
            SiteSelector::AllSites => true,
            SiteSelector::Site(selected) => selected == site,
        }
    }
}

impl fmt::Display for SiteSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum RangeError {
    #[error("payload bounds must be finite numbers")]
    NotFinite,
    #[error("payload bounds must be non-negative, got low = {0}")]
    Negative(f64),
    #[error("payload range is reversed: low = {low} > high = {high}")]
    Reversed { low: f64, high: f64 },
}

/// Inclusive payload mass bounds `[low, high]` in kg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayloadRange {
    low: f64,
    high: f64,
}

impl PayloadRange {
    pub fn new(low: f64, high: f64) -> Result<Self, RangeError> {
        if !low.is_finite() || !high.is_finite() {
            return Err(RangeError::NotFinite);
        }
        if low < 0.0 {
            return Err(RangeError::Negative(low));
        }
        if low > high {
            return Err(RangeError::Reversed { low, high });
        }
        Ok(PayloadRange { low, high })
    }

    /// The range spanning every payload in the dataset.
    pub fn full(dataset: &LaunchDataset) -> Self {
        PayloadRange {
            low: dataset.min_payload(),
            high: dataset.max_payload(),
        }
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn contains(&self, mass: f64) -> bool {
        self.low <= mass && mass <= self.high
    }
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// One pie wedge: a label and the count it represents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub count: u64,
}

impl PieSlice {
    fn new(label: impl Into<String>, count: u64) -> Self {
        PieSlice {
            label: label.into(),
            count,
        }
    }
}

/// One scatter marker: x = payload, y = class, colour = booster category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub payload_mass_kg: f64,
    pub class: u8,
    pub booster_version_category: String,
}

/// An entry of the site dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteOption {
    pub label: String,
    pub value: String,
}

// ---------------------------------------------------------------------------
// Aggregations
// ---------------------------------------------------------------------------

/// Pie data for the site dropdown value.
///
/// * all sites → successes per site, one slice per site in first-encounter order
/// * a recognized site → `Success` and `Failure` counts (both may be 0)
/// * an unrecognized site → no slices
pub fn site_outcome_pie(dataset: &LaunchDataset, selector: &SiteSelector) -> Vec<PieSlice> {
    match selector {
        SiteSelector::AllSites => {
            // Labels come from the grouping keys so a slice can never carry
            // another site's count.
            let mut successes: IndexMap<&str, u64> = IndexMap::new();
            for rec in dataset.records() {
                *successes.entry(rec.launch_site.as_str()).or_insert(0) +=
                    u64::from(rec.outcome.class());
            }
            successes
                .into_iter()
                .map(|(site, count)| PieSlice::new(site, count))
                .collect()
        }
        SiteSelector::Site(site) if dataset.is_known_site(site) => {
            let (mut success, mut failure) = (0u64, 0u64);
            for rec in dataset.records().iter().filter(|r| &r.launch_site == site) {
                if rec.outcome.is_success() {
                    success += 1;
                } else {
                    failure += 1;
                }
            }
            vec![
                PieSlice::new(LaunchOutcome::Success.to_string(), success),
                PieSlice::new(LaunchOutcome::Failure.to_string(), failure),
            ]
        }
        SiteSelector::Site(site) => {
            log::debug!("No pie for unrecognized site {site:?}");
            Vec::new()
        }
    }
}

/// Scatter data: launches with payload inside `range`, restricted to the
/// selected site, in dataset order.
pub fn payload_scatter(
    dataset: &LaunchDataset,
    selector: &SiteSelector,
    range: PayloadRange,
) -> Vec<ScatterPoint> {
    dataset
        .records()
        .iter()
        .filter(|rec| range.contains(rec.payload_mass_kg))
        .filter(|rec| selector.matches(&rec.launch_site))
        .map(|rec| ScatterPoint {
            payload_mass_kg: rec.payload_mass_kg,
            class: rec.outcome.class(),
            booster_version_category: rec.booster_version_category.clone(),
        })
        .collect()
}

pub fn pie_title(selector: &SiteSelector) -> String {
    match selector {
        SiteSelector::AllSites => "Total Success Launches By Site".to_string(),
        SiteSelector::Site(site) => format!("Successful Launches at {site}"),
    }
}

pub fn scatter_title(selector: &SiteSelector) -> String {
    match selector {
        SiteSelector::AllSites => {
            "Correlation Between Payload and Success for All Sites".to_string()
        }
        SiteSelector::Site(site) => {
            format!("Correlation Between Payload and Success for Site {site}")
        }
    }
}

/// Dropdown entries: "All Sites" followed by every site in the data.
pub fn site_options(dataset: &LaunchDataset) -> Vec<SiteOption> {
    std::iter::once(SiteSelector::AllSites)
        .chain(dataset.sites().map(|s| SiteSelector::Site(s.to_string())))
        .map(|sel| SiteOption {
            label: sel.label().to_string(),
            value: sel.value().to_string(),
        })
        .collect()
}

/// Upper bound of the payload slider: the heaviest payload rounded up to a
/// whole step, never less than one step.
pub fn slider_max(dataset: &LaunchDataset) -> f64 {
    let steps = (dataset.max_payload() / PAYLOAD_STEP_KG).ceil().max(1.0);
    steps * PAYLOAD_STEP_KG
}

/// Labelled slider ticks: every [`PAYLOAD_MARK_KG`] from 0 up to `max`.
pub fn slider_marks(max: f64) -> Vec<f64> {
    let n = (max / PAYLOAD_MARK_KG).floor() as usize;
    (0..=n).map(|i| i as f64 * PAYLOAD_MARK_KG).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::LaunchRecord;
    use proptest::prelude::*;

    fn rec(site: &str, mass: f64, success: bool, booster: &str) -> LaunchRecord {
        LaunchRecord {
            launch_site: site.to_string(),
            payload_mass_kg: mass,
            outcome: if success {
                LaunchOutcome::Success
            } else {
                LaunchOutcome::Failure
            },
            booster_version_category: booster.to_string(),
        }
    }

    /// Site A: 3 successes / 1 failure, site B: 0 successes / 2 failures.
    fn two_site_dataset() -> LaunchDataset {
        LaunchDataset::from_records(vec![
            rec("A", 600.0, true, "v1.0"),
            rec("B", 2000.0, false, "FT"),
            rec("A", 4000.0, true, "FT"),
            rec("A", 9000.0, false, "B4"),
            rec("B", 7500.0, false, "B5"),
            rec("A", 600.0, true, "v1.1"),
        ])
    }

    fn slice(label: &str, count: u64) -> PieSlice {
        PieSlice::new(label, count)
    }

    #[test]
    fn all_sites_pie_counts_successes_per_site() {
        let ds = two_site_dataset();
        let pie = site_outcome_pie(&ds, &SiteSelector::parse("ALL"));
        assert_eq!(pie, vec![slice("A", 3), slice("B", 0)]);
    }

    #[test]
    fn site_pie_splits_success_and_failure() {
        let ds = two_site_dataset();
        let pie = site_outcome_pie(&ds, &SiteSelector::parse("A"));
        assert_eq!(pie, vec![slice("Success", 3), slice("Failure", 1)]);
    }

    #[test]
    fn known_site_without_launches_gives_zero_counts() {
        let ds = two_site_dataset();
        let pie = site_outcome_pie(&ds, &SiteSelector::parse("KSC LC-39A"));
        assert_eq!(pie, vec![slice("Success", 0), slice("Failure", 0)]);
    }

    #[test]
    fn unrecognized_site_gives_empty_pie() {
        let ds = two_site_dataset();
        assert!(site_outcome_pie(&ds, &SiteSelector::parse("Nowhere")).is_empty());
    }

    #[test]
    fn all_sites_pie_uses_first_encounter_order() {
        let ds = LaunchDataset::from_records(vec![
            rec("Z", 1.0, true, "FT"),
            rec("M", 1.0, true, "FT"),
            rec("Z", 1.0, true, "FT"),
            rec("A", 1.0, false, "FT"),
        ]);
        let pie = site_outcome_pie(&ds, &SiteSelector::AllSites);
        assert_eq!(pie, vec![slice("Z", 2), slice("M", 1), slice("A", 0)]);
    }

    #[test]
    fn scatter_range_excluding_every_payload_is_empty() {
        let ds = LaunchDataset::from_records(vec![
            rec("A", 600.0, true, "FT"),
            rec("B", 600.0, false, "FT"),
        ]);
        let range = PayloadRange::new(0.0, 500.0).unwrap();
        assert!(payload_scatter(&ds, &SiteSelector::AllSites, range).is_empty());
    }

    #[test]
    fn scatter_for_site_keeps_booster_categories() {
        let ds = two_site_dataset();
        let range = PayloadRange::new(0.0, 10_000.0).unwrap();
        let points = payload_scatter(&ds, &SiteSelector::parse("B"), range);
        assert_eq!(
            points,
            vec![
                ScatterPoint {
                    payload_mass_kg: 2000.0,
                    class: 0,
                    booster_version_category: "FT".to_string(),
                },
                ScatterPoint {
                    payload_mass_kg: 7500.0,
                    class: 0,
                    booster_version_category: "B5".to_string(),
                },
            ]
        );
    }

    #[test]
    fn scatter_bounds_are_inclusive() {
        let ds = two_site_dataset();
        let range = PayloadRange::new(600.0, 4000.0).unwrap();
        let masses: Vec<f64> = payload_scatter(&ds, &SiteSelector::AllSites, range)
            .iter()
            .map(|p| p.payload_mass_kg)
            .collect();
        assert_eq!(masses, vec![600.0, 2000.0, 4000.0, 600.0]);
    }

    #[test]
    fn scatter_for_unknown_site_is_empty() {
        let ds = two_site_dataset();
        let range = PayloadRange::full(&ds);
        assert!(payload_scatter(&ds, &SiteSelector::parse("C"), range).is_empty());
    }

    #[test]
    fn payload_range_validation() {
        assert!(PayloadRange::new(0.0, 0.0).is_ok());
        assert_eq!(
            PayloadRange::new(5.0, 1.0),
            Err(RangeError::Reversed { low: 5.0, high: 1.0 })
        );
        assert_eq!(PayloadRange::new(-1.0, 1.0), Err(RangeError::Negative(-1.0)));
        assert_eq!(PayloadRange::new(f64::NAN, 1.0), Err(RangeError::NotFinite));
    }

    #[test]
    fn selector_round_trips_dropdown_values() {
        assert_eq!(SiteSelector::parse("ALL"), SiteSelector::AllSites);
        assert_eq!(SiteSelector::AllSites.value(), "ALL");
        assert_eq!(SiteSelector::AllSites.label(), "All Sites");
        assert_eq!(SiteSelector::parse("A").value(), "A");
    }

    #[test]
    fn titles_name_the_site() {
        let site = SiteSelector::parse("KSC LC-39A");
        assert_eq!(pie_title(&SiteSelector::AllSites), "Total Success Launches By Site");
        assert_eq!(pie_title(&site), "Successful Launches at KSC LC-39A");
        assert_eq!(
            scatter_title(&site),
            "Correlation Between Payload and Success for Site KSC LC-39A"
        );
    }

    #[test]
    fn options_start_with_all_sites() {
        let ds = two_site_dataset();
        let values: Vec<String> = site_options(&ds).into_iter().map(|o| o.value).collect();
        assert_eq!(values, ["ALL", "A", "B"]);
    }

    #[test]
    fn slider_max_rounds_up_to_step() {
        assert_eq!(slider_max(&two_site_dataset()), 9000.0);
        let ds = LaunchDataset::from_records(vec![rec("A", 9600.0, true, "FT")]);
        assert_eq!(slider_max(&ds), 10_000.0);
        assert_eq!(slider_max(&LaunchDataset::from_records(Vec::new())), 500.0);
    }

    #[test]
    fn slider_marks_every_2500_kg() {
        assert_eq!(slider_marks(10_000.0), vec![0.0, 2500.0, 5000.0, 7500.0, 10_000.0]);
        assert_eq!(slider_marks(500.0), vec![0.0]);
    }

    // -- Properties over generated tables --

    fn arb_dataset() -> impl Strategy<Value = LaunchDataset> {
        let site = prop::sample::select(vec!["A", "B", "C", "D"]);
        let booster = prop::sample::select(vec!["v1.0", "v1.1", "FT", "B4", "B5"]);
        prop::collection::vec((site, 0.0f64..10_000.0, any::<bool>(), booster), 0..60).prop_map(
            |rows| {
                LaunchDataset::from_records(
                    rows.into_iter()
                        .map(|(s, m, ok, b)| rec(s, m, ok, b))
                        .collect(),
                )
            },
        )
    }

    fn arb_selector() -> impl Strategy<Value = SiteSelector> {
        prop::sample::select(vec!["ALL", "A", "B", "C", "D", "E"]).prop_map(SiteSelector::parse)
    }

    proptest! {
        #[test]
        fn all_sites_pie_sums_to_total_successes(ds in arb_dataset()) {
            let pie = site_outcome_pie(&ds, &SiteSelector::AllSites);
            let total: u64 = pie.iter().map(|s| s.count).sum();
            let expected = ds.records().iter().filter(|r| r.outcome.is_success()).count() as u64;
            prop_assert_eq!(total, expected);
            prop_assert_eq!(pie.len(), ds.sites().count());
        }

        #[test]
        fn site_pie_sums_to_site_launches(ds in arb_dataset(), site in prop::sample::select(vec!["A", "B", "C", "D"])) {
            let pie = site_outcome_pie(&ds, &SiteSelector::parse(site));
            let launches = ds.records().iter().filter(|r| r.launch_site == site).count() as u64;
            if ds.is_known_site(site) {
                prop_assert_eq!(pie.len(), 2);
                prop_assert_eq!(pie[0].count + pie[1].count, launches);
            } else {
                prop_assert!(pie.is_empty());
            }
        }

        #[test]
        fn scatter_is_sound_and_complete(
            ds in arb_dataset(),
            selector in arb_selector(),
            a in 0.0f64..10_000.0,
            b in 0.0f64..10_000.0,
        ) {
            let range = PayloadRange::new(a.min(b), a.max(b)).unwrap();
            let points = payload_scatter(&ds, &selector, range);

            for p in &points {
                prop_assert!(range.low() <= p.payload_mass_kg && p.payload_mass_kg <= range.high());
            }

            let expected: Vec<ScatterPoint> = ds
                .records()
                .iter()
                .filter(|r| selector == SiteSelector::AllSites || r.launch_site == selector.value())
                .filter(|r| range.low() <= r.payload_mass_kg && r.payload_mass_kg <= range.high())
                .map(|r| ScatterPoint {
                    payload_mass_kg: r.payload_mass_kg,
                    class: r.outcome.class(),
                    booster_version_category: r.booster_version_category.clone(),
                })
                .collect();
            prop_assert_eq!(points, expected);
        }

        #[test]
        fn queries_are_idempotent(ds in arb_dataset(), selector in arb_selector()) {
            let range = PayloadRange::full(&ds);
            prop_assert_eq!(site_outcome_pie(&ds, &selector), site_outcome_pie(&ds, &selector));
            prop_assert_eq!(
                payload_scatter(&ds, &selector, range),
                payload_scatter(&ds, &selector, range)
            );
        }
    }
}
