//! Plan Reports

use tabled::{builder::Builder, settings::Style};

use crate::plan::AdjustmentPlan;

/// Render one plan as a text table of per-role deltas and totals.
#[must_use]
pub fn plan_table(plan: &AdjustmentPlan) -> String {
    let mut builder = Builder::default();

    builder.push_record(["role", "adjustment"]);

    for (role, delta) in &plan.adjustments {
        builder.push_record([role.clone(), format!("{delta:+.2}")]);
    }

    builder.push_record(["final total".to_string(), format!("{:.2}", plan.final_total)]);
    builder.push_record(["drift".to_string(), format!("{:+.2}", plan.diff)]);

    let mut table = builder.build();
    table.with(Style::psql());

    table.to_string()
}

/// Render a numbered sequence of plans, one table per plan.
#[must_use]
pub fn plans_table(plans: &[AdjustmentPlan]) -> String {
    let mut rendered = String::new();

    for (index, plan) in plans.iter().enumerate() {
        if index > 0 {
            rendered.push('\n');
        }

        rendered.push_str(&format!("plan {}\n", index + 1));
        rendered.push_str(&plan_table(plan));
        rendered.push('\n');
    }

    rendered
}
