//! Scenario Planning Example
//!
//! Loads a scenario fixture, solves it and prints the resulting plan(s).
//!
//! Use `-s` to point at a scenario file
//! Use `-a` to enumerate alternative plans instead of the single optimum

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use humanize_duration::{Truncate, prelude::DurationExt};

use reprice::{
    fixtures::Scenario,
    report::{plan_table, plans_table},
    search::{alternative_plans, optimal_plan},
    solvers::MilpSolver,
    utils::ScenarioArgs,
};

/// Scenario Planning Example
#[expect(clippy::print_stdout, reason = "Example program output to user")]
pub fn main() -> Result<()> {
    let args = ScenarioArgs::parse();

    let scenario = Scenario::from_path(&args.scenario)?;
    let params = scenario.params()?;

    let start = Instant::now();

    let rendered = match args.alternatives {
        Some(cap) => {
            let plans = alternative_plans(&params, cap, &MilpSolver)?;

            plans_table(&plans)
        }
        None => match optimal_plan(&params, &MilpSolver)? {
            Some(plan) => plan_table(&plan),
            None => "no feasible plan under the given rules".to_string(),
        },
    };

    let elapsed = start.elapsed();

    println!("{rendered}");
    println!(
        " {} ({}s)",
        elapsed.human(Truncate::Nano),
        elapsed.as_secs_f32()
    );

    Ok(())
}
