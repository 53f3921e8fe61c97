use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::filter::Selection;
use crate::report::Panel;

pub const MALE_SOURCE_ENV: &str = "SCENTBOARD_MALE_SOURCE";
pub const FEMALE_SOURCE_ENV: &str = "SCENTBOARD_FEMALE_SOURCE";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Host settings. Every field has a default, so an empty JSON object (or no
/// file at all) is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub male_source: PathBuf,
    pub female_source: PathBuf,
    /// Rows kept by the ranking panels.
    pub top_n: usize,
    pub histogram_bins: usize,
    pub head_rows: usize,
    /// Panels rendered into the report, in order.
    pub panels: Vec<Panel>,
    /// Initial filter selection.
    pub selection: Selection,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            male_source: PathBuf::from("ebay_mens_perfume.csv"),
            female_source: PathBuf::from("ebay_womens_perfume.csv"),
            top_n: 10,
            histogram_bins: 20,
            head_rows: 5,
            panels: Panel::ALL.to_vec(),
            selection: Selection::default(),
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Defaults, then the optional file, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var_os(key).map(PathBuf::from));
        Ok(config)
    }

    /// Replace source paths with any values `lookup` finds for the
    /// `SCENTBOARD_*_SOURCE` variables.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<PathBuf>) {
        if let Some(p) = lookup(MALE_SOURCE_ENV) {
            self.male_source = p;
        }
        if let Some(p) = lookup(FEMALE_SOURCE_ENV) {
            self.female_source = p;
        }
    }
}
