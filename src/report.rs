//! Text rendering for the command line.
//!
//! None of this affects the numbers; it only decides how a
//! [`CostBreakdown`] or a set of [`ValidationErrors`] is shown.

use crate::models::{CostBreakdown, ScenarioOutcome, ScenarioReport};
use crate::validate::ValidationErrors;
use std::fmt::Write;

/// Formats an amount as US dollars with two decimals and thousands
/// separators, e.g. `$1,234.56`.
pub fn format_currency(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    // Amounts that round to zero never show a sign.
    let sign = if value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };
    format!("{sign}${grouped}.{cents}")
}

/// Renders the results block.  Profit loss is shown in place of revenue
/// loss when present; overhead and penalty lines appear only when they
/// contribute.
pub fn render_breakdown(breakdown: &CostBreakdown) -> String {
    let mut rows: Vec<(&str, f64)> = vec![("Hourly Revenue Rate", breakdown.hourly_revenue_rate)];
    match breakdown.profit_loss {
        Some(profit_loss) => rows.push(("Profit Loss", profit_loss)),
        None => rows.push(("Revenue Loss", breakdown.revenue_loss)),
    }
    rows.push(("Productivity Loss", breakdown.productivity_loss));
    if let Some(overhead_loss) = breakdown.overhead_loss {
        rows.push(("Overhead Loss", overhead_loss));
    }
    if breakdown.penalty_cost > 0.0 {
        rows.push(("Compliance/Penalty Cost", breakdown.penalty_cost));
    }
    rows.push(("Total Estimated Cost", breakdown.total_estimated_cost));

    let amounts: Vec<String> = rows.iter().map(|(_, v)| format_currency(*v)).collect();
    let label_width = rows.iter().map(|(l, _)| l.len() + 1).max().unwrap_or(0);
    let amount_width = amounts.iter().map(String::len).max().unwrap_or(0);

    let mut out = String::from("Downtime Cost Results\n");
    for ((label, _), amount) in rows.iter().zip(&amounts) {
        let _ = writeln!(
            out,
            "  {:<label_width$}  {:>amount_width$}",
            format!("{label}:"),
            amount
        );
    }
    out
}

/// One line per rejected field.
pub fn render_errors(errors: &ValidationErrors) -> String {
    let mut out = String::new();
    for (field, error) in errors.iter() {
        let _ = writeln!(out, "  {field}: {error}");
    }
    out
}

/// Renders every scenario in a batch, headed by its name.
pub fn render_report(report: &ScenarioReport) -> String {
    let mut out = String::new();
    for (i, result) in report.results.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let name = result.name.as_deref().unwrap_or("(unnamed)");
        match &result.outcome {
            ScenarioOutcome::Estimated { breakdown } => {
                let _ = writeln!(out, "== {name}");
                out.push_str(&render_breakdown(breakdown));
            }
            ScenarioOutcome::Rejected { errors } => {
                let _ = writeln!(out, "== {name} (invalid input)");
                out.push_str(&render_errors(errors));
            }
        }
    }
    out
}
