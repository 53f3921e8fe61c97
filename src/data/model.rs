use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::normalize::{normalize_listings, parse_stock, NormalizeStats};

// ---------------------------------------------------------------------------
// Gender – source provenance of a listing
// ---------------------------------------------------------------------------

/// Which catalog a listing came from. Assigned at ingestion, never inferred
/// from listing content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "Male"),
            Gender::Female => write!(f, "Female"),
        }
    }
}

// ---------------------------------------------------------------------------
// RawRecord – one row as it appears in a source file
// ---------------------------------------------------------------------------

/// A listing exactly as scraped. Every field is kept as text; numeric-looking
/// columns are parsed later by the normalization pass.
///
/// Columns not named here (`priceWithCurrency`, `lastUpdated`, anything else)
/// are ignored when deserializing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    pub brand: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub perfume_type: Option<String>,
    pub price: Option<String>,
    pub available: Option<String>,
    pub sold: Option<String>,
    #[serde(rename = "itemLocation")]
    pub item_location: Option<String>,
}

impl RawRecord {
    /// Source columns that carry into the canonical schema.
    pub const COLUMNS: [&'static str; 7] = [
        "brand",
        "title",
        "type",
        "price",
        "available",
        "sold",
        "itemLocation",
    ];

    /// Assign a source column by name. Returns `false` for columns that have
    /// no place in the canonical schema.
    pub fn set(&mut self, column: &str, value: Option<String>) -> bool {
        let slot = match column {
            "brand" => &mut self.brand,
            "title" => &mut self.title,
            "type" => &mut self.perfume_type,
            "price" => &mut self.price,
            "available" => &mut self.available,
            "sold" => &mut self.sold,
            "itemLocation" => &mut self.item_location,
            _ => return false,
        };
        *slot = value.filter(|v| !v.is_empty());
        true
    }

    /// Map onto the canonical vocabulary and tag with `gender`.
    ///
    /// `price` and `sold` stay at zero here; they are derived afterwards by
    /// [`normalize_listings`].
    fn into_listing(self, gender: Gender) -> Listing {
        Listing {
            brand: self.brand.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            perfume_type: self.perfume_type,
            available: parse_stock(self.available.as_deref()),
            price_raw: self.price,
            price: 0.0,
            sold_raw: self.sold,
            sold: 0,
            location: self.item_location,
            gender,
        }
    }
}

// ---------------------------------------------------------------------------
// Listing – one canonical row
// ---------------------------------------------------------------------------

/// A normalized, source-agnostic listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub brand: String,
    pub title: String,
    pub perfume_type: Option<String>,
    /// Price text as scraped, kept for audit.
    pub price_raw: Option<String>,
    /// Parsed price, `0.0` when the text was unusable.
    pub price: f64,
    pub available: u64,
    /// Sold text as scraped, e.g. `"1,024 sold"`.
    pub sold_raw: Option<String>,
    pub sold: u64,
    pub location: Option<String>,
    pub gender: Gender,
}

// ---------------------------------------------------------------------------
// Catalog – the merged canonical table
// ---------------------------------------------------------------------------

/// All listings from both sources: male listings in source order followed by
/// female listings in source order. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    listings: Vec<Listing>,
    male_len: usize,
}

impl Catalog {
    /// Tag, merge, rename and normalize the two raw segments.
    pub fn from_segments(male: Vec<RawRecord>, female: Vec<RawRecord>) -> Self {
        Self::from_segments_with_stats(male, female).0
    }

    pub(crate) fn from_segments_with_stats(
        male: Vec<RawRecord>,
        female: Vec<RawRecord>,
    ) -> (Self, NormalizeStats) {
        let male_len = male.len();
        let mut listings: Vec<Listing> = male
            .into_iter()
            .map(|r| r.into_listing(Gender::Male))
            .chain(female.into_iter().map(|r| r.into_listing(Gender::Female)))
            .collect();
        let stats = normalize_listings(&mut listings);
        (Catalog { listings, male_len }, stats)
    }

    /// All listings in canonical order.
    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Number of listings that came from the given source.
    pub fn segment_len(&self, gender: Gender) -> usize {
        match gender {
            Gender::Male => self.male_len,
            Gender::Female => self.listings.len() - self.male_len,
        }
    }

    /// A view over every listing; the usual starting point of a cascade.
    pub fn view(&self) -> View<'_> {
        View {
            catalog: self,
            indices: (0..self.listings.len()).collect(),
        }
    }

    /// Column overview of the canonical schema.
    pub fn info(&self) -> TableInfo {
        let rows = self.listings.len();
        let columns = vec![
            ColumnInfo::new("brand", ValueKind::Text, self.non_null(|l| !l.brand.is_empty())),
            ColumnInfo::new("title", ValueKind::Text, self.non_null(|l| !l.title.is_empty())),
            ColumnInfo::new(
                "perfume_type",
                ValueKind::Text,
                self.non_null(|l| l.perfume_type.is_some()),
            ),
            ColumnInfo::new("price_raw", ValueKind::Text, self.non_null(|l| l.price_raw.is_some())),
            ColumnInfo::new("price", ValueKind::Float, rows),
            ColumnInfo::new("available", ValueKind::Integer, rows),
            ColumnInfo::new("sold_raw", ValueKind::Text, self.non_null(|l| l.sold_raw.is_some())),
            ColumnInfo::new("sold", ValueKind::Integer, rows),
            ColumnInfo::new("location", ValueKind::Text, self.non_null(|l| l.location.is_some())),
            ColumnInfo::new("gender", ValueKind::Category, rows),
        ];
        TableInfo { rows, columns }
    }

    fn non_null(&self, present: impl Fn(&Listing) -> bool) -> usize {
        self.listings.iter().filter(|l| present(l)).count()
    }
}

/// Storage kind of a canonical column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Text,
    Float,
    Integer,
    Category,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnInfo {
    pub name: &'static str,
    pub kind: ValueKind,
    pub non_null: usize,
}

impl ColumnInfo {
    fn new(name: &'static str, kind: ValueKind, non_null: usize) -> Self {
        Self { name, kind, non_null }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableInfo {
    pub rows: usize,
    pub columns: Vec<ColumnInfo>,
}

// ---------------------------------------------------------------------------
// View – a filtered subset of the catalog
// ---------------------------------------------------------------------------

/// An ordered subset of catalog rows, stored as indices into the catalog.
///
/// Views never mutate the catalog; every filter produces a fresh view.
#[derive(Debug, Clone)]
pub struct View<'a> {
    catalog: &'a Catalog,
    indices: Vec<usize>,
}

impl<'a> View<'a> {
    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Catalog positions of the rows in this view, ascending.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Listing> + '_ {
        let listings = self.catalog.listings();
        self.indices.iter().map(move |&i| &listings[i])
    }

    /// A new view keeping only rows that satisfy `keep`.
    pub fn retain(&self, mut keep: impl FnMut(&Listing) -> bool) -> View<'a> {
        let listings = self.catalog.listings();
        View {
            catalog: self.catalog,
            indices: self
                .indices
                .iter()
                .copied()
                .filter(|&i| keep(&listings[i]))
                .collect(),
        }
    }

    /// An empty view over the same catalog.
    pub fn emptied(&self) -> View<'a> {
        View {
            catalog: self.catalog,
            indices: Vec::new(),
        }
    }

    /// Sorted distinct brands present in this view.
    pub fn brands(&self) -> BTreeSet<&'a str> {
        self.iter().map(|l| l.brand.as_str()).collect()
    }
}

impl PartialEq for View<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.catalog, other.catalog) && self.indices == other.indices
    }
}
