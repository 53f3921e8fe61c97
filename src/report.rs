use serde::{Deserialize, Serialize};

use crate::config::DashboardConfig;
use crate::data::aggregate::{self, GroupKey, HistogramBin, Summary};
use crate::data::filter::{Cascade, PriceBounds, Selection};
use crate::data::model::{Gender, Listing, TableInfo};

// ---------------------------------------------------------------------------
// Panels: which aggregates a presentation wants
// ---------------------------------------------------------------------------

/// One block of dashboard output. Presentations differ only in which panels
/// they request; the computation behind each panel is shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
    Kpis,
    GenderSplit,
    TopBrands,
    TopTitles,
    TopLocations,
    PriceHistogram,
    Correlation,
    Info,
    Head,
}

impl Panel {
    pub const ALL: [Panel; 9] = [
        Panel::Kpis,
        Panel::GenderSplit,
        Panel::TopBrands,
        Panel::TopTitles,
        Panel::TopLocations,
        Panel::PriceHistogram,
        Panel::Correlation,
        Panel::Info,
        Panel::Head,
    ];
}

// ---------------------------------------------------------------------------
// Report – serializable snapshot handed to the presentation layer
// ---------------------------------------------------------------------------

/// Widget inputs derived by the cascade, always included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterContext {
    pub selection: Selection,
    pub brand_options: Vec<String>,
    pub price_bounds: Option<PriceBounds>,
    pub stage_counts: [usize; 4],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenderShare {
    pub gender: Gender,
    pub listings: usize,
    pub mean_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking {
    pub key: String,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Correlation {
    /// `None` when undefined (fewer than two rows, or a constant column).
    pub price_vs_sold: Option<f64>,
}

/// Everything the presentation layer renders for one selection. Panels that
/// were not requested are left out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub filters: FilterContext,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kpis: Option<Summary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender_split: Option<Vec<GenderShare>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_brands: Option<Vec<Ranking>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_titles: Option<Vec<Ranking>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_locations: Option<Vec<Ranking>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_histogram: Option<Vec<HistogramBin>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation: Option<Correlation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<TableInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Vec<Listing>>,
}

impl Report {
    /// Compute the requested panels over the cascade's final view.
    pub fn build(cascade: &Cascade<'_>, selection: &Selection, config: &DashboardConfig) -> Self {
        let view = &cascade.view;
        let mut report = Report {
            filters: FilterContext {
                selection: selection.clone(),
                brand_options: cascade.brand_options.clone(),
                price_bounds: cascade.price_bounds,
                stage_counts: cascade.stage_counts(),
            },
            kpis: None,
            gender_split: None,
            top_brands: None,
            top_titles: None,
            top_locations: None,
            price_histogram: None,
            correlation: None,
            info: None,
            head: None,
        };

        for panel in &config.panels {
            match panel {
                Panel::Kpis => report.kpis = Some(Summary::of(view)),
                Panel::GenderSplit => {
                    let counts = aggregate::gender_distribution(view);
                    let means = aggregate::mean_price_by_gender(view);
                    report.gender_split = Some(
                        counts
                            .into_iter()
                            .map(|(gender, listings)| GenderShare {
                                gender,
                                listings,
                                mean_price: means.get(&gender).copied().unwrap_or(0.0),
                            })
                            .collect(),
                    );
                }
                Panel::TopBrands => {
                    let top = aggregate::top_n_by_sold(view, GroupKey::Brand, config.top_n);
                    report.top_brands = Some(rankings(top));
                }
                Panel::TopTitles => {
                    let top = aggregate::top_n_by_sold(view, GroupKey::Title, config.top_n);
                    report.top_titles = Some(rankings(top));
                }
                Panel::TopLocations => {
                    let top = aggregate::top_locations(view, config.top_n);
                    report.top_locations = Some(rankings(top));
                }
                Panel::PriceHistogram => {
                    let bins = aggregate::price_histogram(view, config.histogram_bins);
                    report.price_histogram = Some(bins);
                }
                Panel::Correlation => {
                    report.correlation = Some(Correlation {
                        price_vs_sold: aggregate::price_correlation(view),
                    });
                }
                Panel::Info => report.info = Some(view.catalog().info()),
                Panel::Head => report.head = Some(aggregate::head(view, config.head_rows)),
            }
        }
        report
    }
}

fn rankings(pairs: Vec<(String, u64)>) -> Vec<Ranking> {
    pairs
        .into_iter()
        .map(|(key, value)| Ranking { key, value })
        .collect()
}
