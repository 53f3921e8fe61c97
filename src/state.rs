use std::sync::{Arc, OnceLock};

use crate::config::DashboardConfig;
use crate::data::error::IngestionError;
use crate::data::filter::{brand_options, cascade, gender_stage, Cascade, Selection};
use crate::data::loader;
use crate::data::model::{Catalog, Gender};
use crate::report::Report;

// ---------------------------------------------------------------------------
// Process-wide catalog
// ---------------------------------------------------------------------------

static CATALOG: OnceLock<Arc<Catalog>> = OnceLock::new();

/// The catalog for this process, ingested on first call.
///
/// Later calls return the same catalog regardless of `config`; a failed
/// ingestion leaves nothing cached, so the caller decides whether to retry.
pub fn shared_catalog(config: &DashboardConfig) -> Result<Arc<Catalog>, IngestionError> {
    if let Some(catalog) = CATALOG.get() {
        return Ok(Arc::clone(catalog));
    }
    let catalog = Arc::new(loader::ingest(&config.male_source, &config.female_source)?);
    Ok(Arc::clone(CATALOG.get_or_init(|| catalog)))
}

// ---------------------------------------------------------------------------
// Dashboard state
// ---------------------------------------------------------------------------

/// Per-session state of a presentation: the shared catalog plus the
/// current selection. Only the selection changes between requests.
#[derive(Debug, Default)]
pub struct AppState {
    /// Loaded catalog (None until ingestion succeeds).
    pub catalog: Option<Arc<Catalog>>,

    /// Current filter choices.
    pub selection: Selection,

    /// Catalog positions passing the current selection.
    pub visible_indices: Vec<usize>,

    /// Ingestion failure shown to the user; blocks further interaction.
    pub status_message: Option<String>,
}

impl AppState {
    /// Attach a freshly ingested catalog and show everything.
    pub fn set_catalog(&mut self, catalog: Arc<Catalog>) {
        self.visible_indices = (0..catalog.len()).collect();
        self.catalog = Some(catalog);
        self.selection = Selection::default();
        self.status_message = None;
    }

    /// Record a fatal ingestion failure.
    pub fn set_failure(&mut self, err: &IngestionError) {
        self.catalog = None;
        self.visible_indices.clear();
        self.status_message = Some(err.to_string());
    }

    /// Run the cascade for the current selection.
    pub fn cascade(&self) -> Option<Cascade<'_>> {
        let catalog = self.catalog.as_deref()?;
        Some(cascade(&catalog.view(), &self.selection))
    }

    /// Recompute `visible_indices` after a selection change.
    pub fn refilter(&mut self) {
        let indices = self.cascade().map(|c| c.view.indices().to_vec());
        if let Some(indices) = indices {
            self.visible_indices = indices;
        }
    }

    /// Replace the whole selection at once, e.g. one restored from config.
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
        self.refilter();
    }

    /// Change the gender choice. A brand no longer offered falls back to
    /// All, and the price range is reset since its bounds move.
    pub fn set_gender(&mut self, gender: Option<Gender>) {
        self.selection.gender = gender;
        let still_offered = match (self.catalog.as_deref(), &self.selection.brand) {
            (Some(catalog), Some(brand)) => {
                brand_options(&gender_stage(&catalog.view(), gender)).contains(brand)
            }
            _ => true,
        };
        if !still_offered {
            self.selection.brand = None;
        }
        self.clear_price_range();
        self.refilter();
    }

    /// Change the brand choice and reset the price range.
    pub fn set_brand(&mut self, brand: Option<String>) {
        self.selection.brand = brand;
        self.clear_price_range();
        self.refilter();
    }

    pub fn set_price_range(&mut self, lo: Option<f64>, hi: Option<f64>) {
        self.selection.price_lo = lo;
        self.selection.price_hi = hi;
        self.refilter();
    }

    pub fn set_stock_only(&mut self, stock_only: bool) {
        self.selection.stock_only = stock_only;
        self.refilter();
    }

    /// Build the report for the current selection.
    pub fn report(&self, config: &DashboardConfig) -> Option<Report> {
        let cascade = self.cascade()?;
        Some(Report::build(&cascade, &self.selection, config))
    }

    fn clear_price_range(&mut self) {
        self.selection.price_lo = None;
        self.selection.price_hi = None;
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::data::model::RawRecord;

    fn raw(brand: &str, price: &str, available: &str) -> RawRecord {
        RawRecord {
            brand: Some(brand.to_string()),
            price: Some(price.to_string()),
            available: Some(available.to_string()),
            ..Default::default()
        }
    }

    fn state() -> AppState {
        let catalog = Catalog::from_segments(
            vec![raw("Azzaro", "$20", "1"), raw("Dior", "$80", "0")],
            vec![raw("Chanel", "$120", "2"), raw("Dior", "$95", "4")],
        );
        let mut state = AppState::default();
        state.set_catalog(Arc::new(catalog));
        state
    }

    #[test]
    fn fresh_catalog_shows_everything() {
        let state = state();
        assert_eq!(state.visible_indices, vec![0, 1, 2, 3]);
        assert_eq!(state.selection, Selection::default());
    }

    #[test]
    fn brand_survives_gender_change_only_when_offered() {
        let mut state = state();
        state.set_brand(Some("Dior".into()));
        assert_eq!(state.visible_indices, vec![1, 3]);

        state.set_gender(Some(Gender::Female));
        assert_eq!(state.selection.brand.as_deref(), Some("Dior"));
        assert_eq!(state.visible_indices, vec![3]);

        state.set_brand(Some("Chanel".into()));
        state.set_gender(Some(Gender::Male));
        assert_eq!(state.selection.brand, None);
        assert_eq!(state.visible_indices, vec![0, 1]);
    }

    #[test]
    fn price_and_stock_refilter() {
        let mut state = state();
        state.set_price_range(Some(50.0), Some(100.0));
        assert_eq!(state.visible_indices, vec![1, 3]);
        state.set_stock_only(true);
        assert_eq!(state.visible_indices, vec![3]);
        state.set_brand(None);
        assert_eq!(state.selection.price_lo, None);
        assert_eq!(state.visible_indices, vec![0, 2, 3]);
    }

    #[test]
    fn failure_blocks_reports() {
        let mut state = state();
        let err = IngestionError::MissingSource {
            which: Gender::Female,
            path: PathBuf::from("women.csv"),
            reason: "No such file or directory".into(),
        };
        state.set_failure(&err);
        assert!(state.report(&DashboardConfig::default()).is_none());
        assert!(state.status_message.unwrap().contains("Female"));
    }
}
