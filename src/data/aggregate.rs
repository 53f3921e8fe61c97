//! Scalar metrics and grouped projections over a view.
//!
//! All functions are total: an empty view yields zero, an empty sequence or
//! `None`, never an error. Results are owned snapshots and hold no borrow of
//! the catalog.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::model::{Gender, Listing, View};

pub fn count(view: &View<'_>) -> usize {
    view.len()
}

/// Arithmetic mean of `price`, `0.0` for an empty view.
pub fn mean_price(view: &View<'_>) -> f64 {
    running_mean(view.iter().map(|l| l.price))
}

/// Sum of `sold`, saturating at `u64::MAX`.
pub fn total_sold(view: &View<'_>) -> u64 {
    view.iter().fold(0u64, |acc, l| acc.saturating_add(l.sold))
}

pub fn distinct_brands(view: &View<'_>) -> usize {
    view.brands().len()
}

/// Listing count per gender present in the view.
pub fn gender_distribution(view: &View<'_>) -> BTreeMap<Gender, usize> {
    let mut out = BTreeMap::new();
    for l in view.iter() {
        *out.entry(l.gender).or_insert(0) += 1;
    }
    out
}

/// Mean price per gender present in the view.
pub fn mean_price_by_gender(view: &View<'_>) -> BTreeMap<Gender, f64> {
    let mut prices: BTreeMap<Gender, Vec<f64>> = BTreeMap::new();
    for l in view.iter() {
        prices.entry(l.gender).or_default().push(l.price);
    }
    prices
        .into_iter()
        .map(|(g, values)| (g, running_mean(values)))
        .collect()
}

/// Incremental mean; stays finite for any finite non-negative input, where a
/// plain sum could overflow to infinity.
fn running_mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let mut mean = 0.0;
    for (k, v) in values.into_iter().enumerate() {
        mean += (v - mean) / (k + 1) as f64;
    }
    mean
}

/// Column used to group listings for ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    Brand,
    Title,
}

impl GroupKey {
    fn of<'l>(&self, listing: &'l Listing) -> &'l str {
        match self {
            GroupKey::Brand => &listing.brand,
            GroupKey::Title => &listing.title,
        }
    }
}

/// Sum `sold` per group and return the `n` largest groups, descending.
/// Ties are ordered by key so the result is deterministic.
pub fn top_n_by_sold(view: &View<'_>, key: GroupKey, n: usize) -> Vec<(String, u64)> {
    let mut sums: HashMap<&str, u64> = HashMap::new();
    for l in view.iter() {
        let sum = sums.entry(key.of(l)).or_insert(0);
        *sum = sum.saturating_add(l.sold);
    }
    rank(sums, n)
}

/// Listing count per location, descending, ties by name. Listings without a
/// location are skipped.
pub fn top_locations(view: &View<'_>, n: usize) -> Vec<(String, u64)> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for loc in view.iter().filter_map(|l| l.location.as_deref()) {
        *counts.entry(loc).or_insert(0) += 1;
    }
    rank(counts, n)
}

fn rank(groups: HashMap<&str, u64>, n: usize) -> Vec<(String, u64)> {
    let mut ranked: Vec<(&str, u64)> = groups.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(n)
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// Pearson correlation between `price` and `sold`.
///
/// `None` when fewer than two rows are present or when either column is
/// constant.
pub fn price_correlation(view: &View<'_>) -> Option<f64> {
    if view.len() < 2 {
        return None;
    }
    let xs: Vec<f64> = view.iter().map(|l| l.price).collect();
    let ys: Vec<f64> = view.iter().map(|l| l.sold as f64).collect();
    if is_constant(&xs) || is_constant(&ys) {
        return None;
    }

    // r is scale-invariant; unit-scaling keeps the sums of squares finite.
    let xs = unit_scaled(xs);
    let ys = unit_scaled(ys);
    let mean_x = running_mean(xs.iter().copied());
    let mean_y = running_mean(ys.iter().copied());
    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(&ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    let r = cov / (var_x.sqrt() * var_y.sqrt());
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Divide by the largest value so everything lies in `[0, 1]`.
fn unit_scaled(values: Vec<f64>) -> Vec<f64> {
    let max = values.iter().copied().fold(0.0, f64::max);
    if max > 0.0 {
        values.into_iter().map(|v| v / max).collect()
    } else {
        values
    }
}

/// One equal-width price bin, `[lower, upper)` except the last which is
/// closed on both ends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width price histogram over the view's own price range.
///
/// An empty view or `bins == 0` gives no bins; a single-point range gives one
/// bin holding every row.
pub fn price_histogram(view: &View<'_>, bins: usize) -> Vec<HistogramBin> {
    let mut prices = view.iter().map(|l| l.price);
    let Some(first) = prices.next() else {
        return Vec::new();
    };
    if bins == 0 {
        return Vec::new();
    }
    let (min, max) = prices.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
    if min == max {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: view.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();
    for l in view.iter() {
        let slot = (((l.price - min) / width) as usize).min(bins - 1);
        out[slot].count += 1;
    }
    out
}

/// Headline numbers shown together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean_price: f64,
    pub total_sold: u64,
    pub distinct_brands: usize,
    pub gender_distribution: BTreeMap<Gender, usize>,
    pub price_correlation: Option<f64>,
}

impl Summary {
    pub fn of(view: &View<'_>) -> Self {
        Summary {
            count: count(view),
            mean_price: mean_price(view),
            total_sold: total_sold(view),
            distinct_brands: distinct_brands(view),
            gender_distribution: gender_distribution(view),
            price_correlation: price_correlation(view),
        }
    }
}

/// Owned copies of the first `n` listings in view order.
pub fn head(view: &View<'_>, n: usize) -> Vec<Listing> {
    view.iter().take(n).cloned().collect()
}
