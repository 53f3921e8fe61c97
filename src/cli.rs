//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::Parser;

/// Print a perfume-listing dashboard report as JSON
#[derive(Parser, Debug)]
#[command(name = "scentboard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// JSON config file (defaults apply when omitted)
    #[arg(value_name = "CONFIG")]
    pub config: Option<PathBuf>,
}
