//! Scentboard: ingestion, cascading filters and aggregates over two
//! marketplace perfume catalogs (one per gender segment).
//!
//! ```no_run
//! use std::path::Path;
//! use scentboard::data::{aggregate, filter::Selection, loader, model::Gender};
//!
//! let catalog = loader::ingest(
//!     Path::new("ebay_mens_perfume.csv"),
//!     Path::new("ebay_womens_perfume.csv"),
//! )?;
//! let selection = Selection { gender: Some(Gender::Male), ..Default::default() };
//! let view = selection.apply(&catalog.view());
//! println!(
//!     "{} listings, mean price {:.2}",
//!     aggregate::count(&view),
//!     aggregate::mean_price(&view),
//! );
//! # Ok::<(), scentboard::data::error::IngestionError>(())
//! ```

pub mod config;
pub mod data;
pub mod report;
pub mod state;
