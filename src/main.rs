mod cli;

use anyhow::Context;
use clap::Parser;
use scentboard::config::DashboardConfig;
use scentboard::data::model::Gender;
use scentboard::state::{shared_catalog, AppState};

use crate::cli::Cli;

/// Text host: ingest both catalogs once, apply the configured selection and
/// print the requested panels as JSON.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    env_logger::init();

    let config = DashboardConfig::load(cli.config.as_deref())?;

    let mut state = AppState::default();
    match shared_catalog(&config) {
        Ok(catalog) => {
            log::info!(
                "Catalog ready: {} male / {} female listings",
                catalog.segment_len(Gender::Male),
                catalog.segment_len(Gender::Female),
            );
            state.set_catalog(catalog);
        }
        Err(e) => {
            log::error!("Failed to load catalogs: {e}");
            state.set_failure(&e);
            return Err(e.into());
        }
    }

    state.set_selection(config.selection.clone());
    let report = state.report(&config).context("no catalog loaded")?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
