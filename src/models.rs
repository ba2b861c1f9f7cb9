//! Data models for the Downtime Cost Engine.
//!
//! The `models` module defines the serialisable structs and enums that
//! flow through the engine: raw form input as typed by a user, the
//! range-checked values the validator produces, and the cost breakdown
//! the calculator returns.  Scenario types wrap raw input for batch
//! evaluation.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::validate::ValidationErrors;

/// Whether annual hours cover the whole year or business hours only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Basis {
    /// Round-the-clock operation, 8760 hours per year.
    #[serde(rename = "24/7")]
    AroundTheClock,
    /// Business hours only, 2000 hours per year (8 hours × 250 days).
    #[serde(rename = "business")]
    BusinessHours,
}

impl Basis {
    /// Hours in a year under this basis.
    pub fn annual_hours(self) -> f64 {
        match self {
            Basis::AroundTheClock => 8760.0,
            Basis::BusinessHours => 2000.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Basis::AroundTheClock => "24/7",
            Basis::BusinessHours => "business",
        }
    }
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field values exactly as a user typed them.
///
/// Every field is a string so that the validator can decide what counts
/// as a number.  Missing JSON keys and `null` decode to the empty string,
/// and JSON numbers are accepted as their decimal text, so API clients
/// may send either `"1000"` or `1000`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawInputs {
    /// `"24/7"` or `"business"`.  Empty means `"24/7"`.
    #[serde(deserialize_with = "text_or_number")]
    pub calculation_basis: String,
    #[serde(deserialize_with = "text_or_number")]
    pub annual_revenue: String,
    /// Outage length in hours.
    #[serde(deserialize_with = "text_or_number")]
    pub downtime_duration: String,
    #[serde(deserialize_with = "text_or_number")]
    pub affected_employees: String,
    #[serde(deserialize_with = "text_or_number")]
    pub hourly_wage: String,
    #[serde(deserialize_with = "text_or_number")]
    pub annual_overhead: String,
    /// Percentage in `[0, 100]`.
    #[serde(deserialize_with = "text_or_number")]
    pub profit_margin: String,
    #[serde(deserialize_with = "text_or_number")]
    pub penalty_cost: String,
}

impl Default for RawInputs {
    fn default() -> Self {
        Self {
            calculation_basis: Basis::AroundTheClock.as_str().to_string(),
            annual_revenue: String::new(),
            downtime_duration: String::new(),
            affected_employees: String::new(),
            hourly_wage: String::new(),
            annual_overhead: String::new(),
            profit_margin: String::new(),
            penalty_cost: String::new(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<TextOrNumber>::deserialize(deserializer)? {
        Some(TextOrNumber::Text(s)) => s,
        Some(TextOrNumber::Number(n)) => n.to_string(),
        None => String::new(),
    })
}

/// Typed, range-checked inputs.  Only [`crate::validate::validate`]
/// constructs these from user data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedInputs {
    pub calculation_basis: Basis,
    /// Strictly positive.
    pub annual_revenue: f64,
    /// Strictly positive, in hours.
    pub downtime_duration: f64,
    pub affected_employees: u64,
    /// Non-negative.
    pub hourly_wage: f64,
    pub annual_overhead: Option<f64>,
    /// Percentage in `[0, 100]`, not a fraction.
    pub profit_margin_percent: Option<f64>,
    pub penalty_cost: Option<f64>,
}

/// The estimated cost of an outage, broken down by component.
///
/// Absent components serialise as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub hourly_revenue_rate: f64,
    pub revenue_loss: f64,
    /// Present only when a profit margin was supplied.
    pub profit_loss: Option<f64>,
    pub productivity_loss: f64,
    /// Present only when a non-zero annual overhead was supplied.
    pub overhead_loss: Option<f64>,
    pub penalty_cost: f64,
    pub total_estimated_cost: f64,
}

/// A named set of raw inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub inputs: RawInputs,
}

/// Input to batch evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSet {
    pub scenarios: Vec<Scenario>,
}

/// What happened to one scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ScenarioOutcome {
    Estimated { breakdown: CostBreakdown },
    Rejected { errors: ValidationErrors },
}

/// The result of evaluating a single scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub outcome: ScenarioOutcome,
}

/// The aggregate result of a batch, in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    pub results: Vec<ScenarioResult>,
}

impl ScenarioReport {
    /// Number of scenarios that failed validation.
    pub fn rejected(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, ScenarioOutcome::Rejected { .. }))
            .count()
    }
}
