//! Outage cost computation engine.
//!
//! The `engine` module is responsible for turning [`ValidatedInputs`]
//! into a [`CostBreakdown`].  [`estimate`] gates the calculator behind
//! the validator, and [`estimate_batch`] uses the [`rayon`] crate to
//! evaluate independent scenarios across multiple CPU cores.

use crate::models::{
    CostBreakdown, RawInputs, ScenarioOutcome, ScenarioReport, ScenarioResult, ScenarioSet,
    ValidatedInputs,
};
use crate::validate::{validate, ValidationErrors};
use rayon::prelude::*;

/// Computes the cost breakdown for inputs that already passed
/// [`validate`].  Performs no validation of its own.
///
/// When a profit margin is supplied the profit loss replaces the running
/// total, so productivity loss is not part of the final figure in that
/// case.
pub fn calculate(v: &ValidatedInputs) -> CostBreakdown {
    let annual_hours = v.calculation_basis.annual_hours();

    let hourly_revenue_rate = v.annual_revenue / annual_hours;
    let revenue_loss = hourly_revenue_rate * v.downtime_duration;
    let profit_loss = v
        .profit_margin_percent
        .map(|margin| revenue_loss * (margin / 100.0));
    let productivity_loss = v.affected_employees as f64 * v.hourly_wage * v.downtime_duration;
    let overhead_loss = v
        .annual_overhead
        .filter(|overhead| *overhead != 0.0)
        .map(|overhead| (overhead / annual_hours) * v.downtime_duration);
    let penalty_cost = v.penalty_cost.unwrap_or(0.0);

    let mut total = revenue_loss + productivity_loss;
    if let Some(profit_loss) = profit_loss {
        total = profit_loss;
    }
    if let Some(overhead_loss) = overhead_loss {
        total += overhead_loss;
    }
    if penalty_cost > 0.0 {
        total += penalty_cost;
    }

    CostBreakdown {
        hourly_revenue_rate,
        revenue_loss,
        profit_loss,
        productivity_loss,
        overhead_loss,
        penalty_cost,
        total_estimated_cost: total,
    }
}

/// Validates `raw` and, only if it is valid, calculates its cost.
pub fn estimate(raw: &RawInputs) -> Result<CostBreakdown, ValidationErrors> {
    let inputs = validate(raw)?;
    tracing::trace!(basis = %inputs.calculation_basis, "calculating breakdown");
    Ok(calculate(&inputs))
}

/// Estimates every scenario in the set.
///
/// Scenarios are independent; a rejected one does not affect the
/// others.  Results keep the order of the input.
pub fn estimate_batch(set: ScenarioSet) -> ScenarioReport {
    let results = set
        .scenarios
        .into_par_iter()
        .map(|scenario| {
            let outcome = match estimate(&scenario.inputs) {
                Ok(breakdown) => ScenarioOutcome::Estimated { breakdown },
                Err(errors) => ScenarioOutcome::Rejected { errors },
            };
            ScenarioResult {
                name: scenario.name,
                outcome,
            }
        })
        .collect();
    ScenarioReport { results }
}
