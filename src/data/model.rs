use std::fmt;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Sites offered by the dashboard's dropdown regardless of what the loaded
/// table contains.
pub const KNOWN_LAUNCH_SITES: [&str; 4] =
    ["CCAFS LC-40", "VAFB SLC-4E", "KSC LC-39A", "CCAFS SLC-40"];

// ---------------------------------------------------------------------------
// LaunchOutcome – the binary `class` column
// ---------------------------------------------------------------------------

/// Outcome of a launch as stored in the `class` column (1 = success, 0 = failure).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub enum LaunchOutcome {
    Failure,
    Success,
}

impl LaunchOutcome {
    pub fn is_success(self) -> bool {
        self == LaunchOutcome::Success
    }

    /// Integer value of the `class` column.
    pub fn class(self) -> u8 {
        match self {
            LaunchOutcome::Failure => 0,
            LaunchOutcome::Success => 1,
        }
    }
}

impl TryFrom<i64> for LaunchOutcome {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(LaunchOutcome::Failure),
            1 => Ok(LaunchOutcome::Success),
            other => Err(format!("class must be 0 or 1, got {other}")),
        }
    }
}

impl From<LaunchOutcome> for u8 {
    fn from(outcome: LaunchOutcome) -> Self {
        outcome.class()
    }
}

impl fmt::Display for LaunchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchOutcome::Success => write!(f, "Success"),
            LaunchOutcome::Failure => write!(f, "Failure"),
        }
    }
}

// ---------------------------------------------------------------------------
// LaunchRecord – one row of the launch table
// ---------------------------------------------------------------------------

/// A single launch (one row of the source table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchRecord {
    #[serde(rename = "Launch Site")]
    pub launch_site: String,
    #[serde(rename = "Payload Mass (kg)")]
    pub payload_mass_kg: f64,
    #[serde(rename = "class")]
    pub outcome: LaunchOutcome,
    #[serde(rename = "Booster Version Category")]
    pub booster_version_category: String,
}

// ---------------------------------------------------------------------------
// LaunchDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed table with values derived once at load time.
///
/// There is no write path: every accessor borrows, and the UI and the API
/// share one instance behind an `Arc`.
#[derive(Debug, Clone)]
pub struct LaunchDataset {
    records: Vec<LaunchRecord>,
    /// Distinct sites in first-encounter order.
    sites: IndexSet<String>,
    /// Distinct booster categories in first-encounter order.
    booster_categories: IndexSet<String>,
    min_payload: Option<f64>,
    max_payload: Option<f64>,
}

impl LaunchDataset {
    /// Build the derived indices from the loaded records.
    pub fn from_records(records: Vec<LaunchRecord>) -> Self {
        let mut sites = IndexSet::new();
        let mut booster_categories = IndexSet::new();
        let mut min_payload: Option<f64> = None;
        let mut max_payload: Option<f64> = None;

        for rec in &records {
            // Re-inserting keeps the first-encounter position.
            sites.insert(rec.launch_site.clone());
            booster_categories.insert(rec.booster_version_category.clone());
            let mass = rec.payload_mass_kg;
            min_payload = Some(min_payload.map_or(mass, |m| m.min(mass)));
            max_payload = Some(max_payload.map_or(mass, |m| m.max(mass)));
        }

        LaunchDataset {
            records,
            sites,
            booster_categories,
            min_payload,
            max_payload,
        }
    }

    pub fn records(&self) -> &[LaunchRecord] {
        &self.records
    }

    /// Distinct launch sites, in the order they first appear.
    pub fn sites(&self) -> impl Iterator<Item = &str> {
        self.sites.iter().map(String::as_str)
    }

    /// Distinct booster version categories, in the order they first appear.
    pub fn booster_categories(&self) -> impl Iterator<Item = &str> {
        self.booster_categories.iter().map(String::as_str)
    }

    /// Smallest payload in the table (0 when empty).
    pub fn min_payload(&self) -> f64 {
        self.min_payload.unwrap_or(0.0)
    }

    /// Largest payload in the table (0 when empty).
    pub fn max_payload(&self) -> f64 {
        self.max_payload.unwrap_or(0.0)
    }

    /// A site is recognized when it appears in the data or in the fixed
    /// dropdown list.
    pub fn is_known_site(&self, site: &str) -> bool {
        self.sites.contains(site) || KNOWN_LAUNCH_SITES.contains(&site)
    }

    /// Number of launches.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(site: &str, mass: f64, outcome: LaunchOutcome, booster: &str) -> LaunchRecord {
        LaunchRecord {
            launch_site: site.to_string(),
            payload_mass_kg: mass,
            outcome,
            booster_version_category: booster.to_string(),
        }
    }

    #[test]
    fn derived_values_follow_first_encounter_order() {
        let ds = LaunchDataset::from_records(vec![
            rec("VAFB SLC-4E", 500.0, LaunchOutcome::Success, "FT"),
            rec("CCAFS LC-40", 9600.0, LaunchOutcome::Failure, "v1.1"),
            rec("VAFB SLC-4E", 0.0, LaunchOutcome::Failure, "FT"),
        ]);

        assert_eq!(ds.sites().collect::<Vec<_>>(), ["VAFB SLC-4E", "CCAFS LC-40"]);
        assert_eq!(ds.booster_categories().collect::<Vec<_>>(), ["FT", "v1.1"]);
        assert_eq!(ds.min_payload(), 0.0);
        assert_eq!(ds.max_payload(), 9600.0);
        assert_eq!(ds.len(), 3);
    }

    #[test]
    fn empty_dataset_has_zero_payload_bounds() {
        let ds = LaunchDataset::from_records(Vec::new());
        assert!(ds.is_empty());
        assert_eq!(ds.min_payload(), 0.0);
        assert_eq!(ds.max_payload(), 0.0);
        assert_eq!(ds.sites().count(), 0);
    }

    #[test]
    fn known_sites_include_dropdown_list() {
        let ds = LaunchDataset::from_records(vec![rec("Boca Chica", 1.0, LaunchOutcome::Success, "B5")]);
        assert!(ds.is_known_site("Boca Chica"));
        assert!(ds.is_known_site("KSC LC-39A"));
        assert!(!ds.is_known_site("Baikonur"));
    }

    #[test]
    fn outcome_converts_from_class_column() {
        assert_eq!(LaunchOutcome::try_from(1), Ok(LaunchOutcome::Success));
        assert_eq!(LaunchOutcome::try_from(0), Ok(LaunchOutcome::Failure));
        assert!(LaunchOutcome::try_from(2).is_err());
        assert_eq!(LaunchOutcome::Success.class(), 1);
    }
}
