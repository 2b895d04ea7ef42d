//! Utils

use clap::Parser;

/// Arguments for the planning examples
#[derive(Debug, Parser)]
pub struct ScenarioArgs {
    /// Path to a scenario fixture file
    #[clap(short, long, default_value = "fixtures/duo.yml")]
    pub scenario: String,

    /// Enumerate up to this many alternative plans instead of solving for
    /// the single optimum
    #[clap(short, long)]
    pub alternatives: Option<usize>,
}
