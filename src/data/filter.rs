//! Cascading filter pipeline.
//!
//! Stages run in a fixed order: gender → brand → price range → stock. The
//! options each stage offers (brand candidates, price bounds) are derived
//! only from the rows that survived the previous stage, never from the full
//! catalog.

use serde::{Deserialize, Serialize};

use super::model::{Gender, View};

// ---------------------------------------------------------------------------
// Selection: the caller's per-request choices
// ---------------------------------------------------------------------------

/// One request's worth of filter choices. Every field is optional; an omitted
/// field means "no constraint" for its stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selection {
    /// `None` = All.
    pub gender: Option<Gender>,
    /// `None` = All.
    pub brand: Option<String>,
    pub price_lo: Option<f64>,
    pub price_hi: Option<f64>,
    pub stock_only: bool,
}

impl Selection {
    /// Run the full cascade and return only the final view.
    pub fn apply<'a>(&self, view: &View<'a>) -> View<'a> {
        cascade(view, self).view
    }
}

/// Inclusive price range observed in a view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceBounds {
    pub min: f64,
    pub max: f64,
}

impl PriceBounds {
    /// A single-point range cannot narrow anything.
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// Stage 1. `None` passes everything through.
pub fn gender_stage<'a>(view: &View<'a>, gender: Option<Gender>) -> View<'a> {
    match gender {
        None => view.clone(),
        Some(g) => view.retain(|l| l.gender == g),
    }
}

/// Brand candidates offered after the gender stage, sorted.
pub fn brand_options(view: &View<'_>) -> Vec<String> {
    view.brands().into_iter().map(str::to_string).collect()
}

/// Stage 2. A brand outside the view's candidates yields an empty view.
pub fn brand_stage<'a>(view: &View<'a>, brand: Option<&str>) -> View<'a> {
    match brand {
        None => view.clone(),
        Some(b) => view.retain(|l| l.brand == b),
    }
}

/// Price bounds of a view, or `None` when it is empty.
pub fn price_bounds(view: &View<'_>) -> Option<PriceBounds> {
    let mut prices = view.iter().map(|l| l.price);
    let first = prices.next()?;
    let (min, max) = prices.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
    Some(PriceBounds { min, max })
}

/// Stage 3. The requested range is intersected with the view's own bounds.
///
/// An empty view or a single-point range passes through untouched. Omitted
/// (or NaN) ends default to the matching bound; a range that misses the
/// bounds entirely yields an empty view.
pub fn price_stage<'a>(view: &View<'a>, lo: Option<f64>, hi: Option<f64>) -> View<'a> {
    let Some(bounds) = price_bounds(view) else {
        return view.clone();
    };
    if bounds.is_degenerate() {
        return view.clone();
    }
    let lo = lo.filter(|v| !v.is_nan()).map_or(bounds.min, |v| v.max(bounds.min));
    let hi = hi.filter(|v| !v.is_nan()).map_or(bounds.max, |v| v.min(bounds.max));
    if lo > hi {
        return view.emptied();
    }
    view.retain(|l| lo <= l.price && l.price <= hi)
}

/// Stage 4. Keep listings with stock on hand when enabled.
pub fn stock_stage<'a>(view: &View<'a>, stock_only: bool) -> View<'a> {
    if stock_only {
        view.retain(|l| l.available > 0)
    } else {
        view.clone()
    }
}

// ---------------------------------------------------------------------------
// Whole cascade
// ---------------------------------------------------------------------------

/// Output of every stage plus the options derived along the way, so a
/// presentation layer can build its widgets from the same values the
/// pipeline used.
#[derive(Debug, Clone)]
pub struct Cascade<'a> {
    pub by_gender: View<'a>,
    /// Computed from `by_gender`.
    pub brand_options: Vec<String>,
    pub by_brand: View<'a>,
    /// Computed from `by_brand`.
    pub price_bounds: Option<PriceBounds>,
    pub by_price: View<'a>,
    /// Final result.
    pub view: View<'a>,
}

impl Cascade<'_> {
    /// Surviving row counts after each stage, in order.
    pub fn stage_counts(&self) -> [usize; 4] {
        [
            self.by_gender.len(),
            self.by_brand.len(),
            self.by_price.len(),
            self.view.len(),
        ]
    }
}

/// Run all four stages in order over `view`.
pub fn cascade<'a>(view: &View<'a>, selection: &Selection) -> Cascade<'a> {
    let by_gender = gender_stage(view, selection.gender);
    let brand_options = brand_options(&by_gender);
    let by_brand = brand_stage(&by_gender, selection.brand.as_deref());
    let price_bounds = price_bounds(&by_brand);
    let by_price = price_stage(&by_brand, selection.price_lo, selection.price_hi);
    let view = stock_stage(&by_price, selection.stock_only);

    let cascade = Cascade {
        by_gender,
        brand_options,
        by_brand,
        price_bounds,
        by_price,
        view,
    };
    log::debug!("Cascade stage counts: {:?}", cascade.stage_counts());
    cascade
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Catalog, RawRecord};

    fn raw(brand: &str, price: &str, available: &str) -> RawRecord {
        RawRecord {
            brand: Some(brand.to_string()),
            price: Some(price.to_string()),
            available: Some(available.to_string()),
            ..Default::default()
        }
    }

    fn catalog() -> Catalog {
        Catalog::from_segments(
            vec![
                raw("Azzaro", "$20", "0"),
                raw("Dior", "$80", "3"),
                raw("Azzaro", "$35", "1"),
            ],
            vec![raw("Chanel", "$120", "2"), raw("Dior", "$95", "0")],
        )
    }

    #[test]
    fn gender_all_is_identity() {
        let c = catalog();
        assert_eq!(gender_stage(&c.view(), None), c.view());
        assert_eq!(gender_stage(&c.view(), Some(Gender::Female)).indices(), &[3, 4]);
    }

    #[test]
    fn brand_options_follow_gender_stage() {
        let c = catalog();
        let male = gender_stage(&c.view(), Some(Gender::Male));
        assert_eq!(brand_options(&male), vec!["Azzaro", "Dior"]);
        let female = gender_stage(&c.view(), Some(Gender::Female));
        assert_eq!(brand_options(&female), vec!["Chanel", "Dior"]);
    }

    #[test]
    fn unknown_brand_gives_empty_view() {
        let c = catalog();
        let male = gender_stage(&c.view(), Some(Gender::Male));
        assert!(brand_stage(&male, Some("Chanel")).is_empty());
    }

    #[test]
    fn price_bounds_come_from_brand_stage() {
        let c = catalog();
        let sel = Selection {
            gender: Some(Gender::Male),
            brand: Some("Azzaro".into()),
            ..Default::default()
        };
        let out = cascade(&c.view(), &sel);
        assert_eq!(out.price_bounds, Some(PriceBounds { min: 20.0, max: 35.0 }));
    }

    #[test]
    fn price_range_is_inclusive_and_clamped() {
        let c = catalog();
        let v = c.view();
        assert_eq!(price_stage(&v, Some(35.0), Some(95.0)).indices(), &[1, 2, 4]);
        assert_eq!(price_stage(&v, Some(-100.0), Some(1e9)), v);
        assert_eq!(price_stage(&v, None, Some(30.0)).indices(), &[0]);
        assert!(price_stage(&v, Some(500.0), Some(600.0)).is_empty());
        assert!(price_stage(&v, Some(90.0), Some(50.0)).is_empty());
        assert_eq!(price_stage(&v, Some(f64::NAN), None), v);
    }

    #[test]
    fn degenerate_price_range_passes_through() {
        let c = Catalog::from_segments(vec![raw("A", "$10", "1"), raw("A", "$10", "0")], vec![]);
        let v = c.view();
        assert_eq!(price_stage(&v, Some(50.0), Some(60.0)), v);
    }

    #[test]
    fn empty_view_has_no_bounds() {
        let c = catalog();
        let empty = c.view().emptied();
        assert_eq!(price_bounds(&empty), None);
        assert!(price_stage(&empty, Some(1.0), Some(2.0)).is_empty());
    }

    #[test]
    fn stock_only_drops_out_of_stock() {
        let c = catalog();
        assert_eq!(stock_stage(&c.view(), true).indices(), &[1, 2, 3]);
        assert_eq!(stock_stage(&c.view(), false), c.view());
    }

    #[test]
    fn cascade_reports_stage_counts() {
        let c = catalog();
        let sel = Selection {
            gender: Some(Gender::Male),
            brand: Some("Azzaro".into()),
            price_lo: Some(30.0),
            price_hi: None,
            stock_only: true,
        };
        let out = cascade(&c.view(), &sel);
        assert_eq!(out.stage_counts(), [3, 2, 1, 1]);
        assert_eq!(out.view.indices(), &[2]);
        assert_eq!(sel.apply(&c.view()), out.view);
    }

    #[test]
    fn price_range_survives_reapplication() {
        let c = catalog();
        let sel = Selection {
            price_lo: Some(30.0),
            price_hi: Some(100.0),
            ..Default::default()
        };
        let once = sel.apply(&c.view());
        assert_eq!(once.indices(), &[1, 2, 4]);
        assert_eq!(sel.apply(&once), once);

        let in_stock = Selection {
            stock_only: true,
            ..sel
        };
        let once = in_stock.apply(&c.view());
        assert_eq!(once.indices(), &[1, 2]);
        assert_eq!(in_stock.apply(&once), once);
    }
}
