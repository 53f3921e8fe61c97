/// Data layer: core types, ingestion, filtering and aggregation.
///
/// Architecture:
/// ```text
///  men's .csv / .json / .parquet     women's .csv / .json / .parquet
///              │                                │
///              └───────────────┬────────────────┘
///                              ▼
///                        ┌──────────┐
///                        │  loader   │  read → tag by source → merge
///                        └──────────┘
///                              │
///                              ▼
///                        ┌───────────┐
///                        │ normalize  │  price / sold / stock text → numbers
///                        └───────────┘
///                              │
///                              ▼
///                        ┌──────────┐
///                        │ Catalog   │  immutable canonical listings
///                        └──────────┘
///                              │
///                              ▼
///                        ┌──────────┐
///                        │  filter   │  gender → brand → price → stock
///                        └──────────┘
///                              │
///                              ▼
///                        ┌───────────┐
///                        │ aggregate  │  KPIs, rankings, histogram
///                        └───────────┘
/// ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
