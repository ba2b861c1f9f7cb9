//! Entry point for the Downtime Cost Engine binary.
//!
//! `downtime-cost serve` starts an HTTP server exposing the engine.
//! `downtime-cost estimate` evaluates one outage from flags, or a batch
//! of scenarios from a JSON file or directory, and prints the result.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use downtime_cost::config::{self, Settings, BIND_ADDR_ENV, DEFAULT_BIND_ADDR, THREADS_ENV};
use downtime_cost::models::{RawInputs, ScenarioSet};
use downtime_cost::{api, engine, report, scenario};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "downtime-cost", version, about = "Estimate the cost of an IT service outage")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API
    Serve {
        /// Address to listen on
        #[arg(long, env = BIND_ADDR_ENV, default_value = DEFAULT_BIND_ADDR)]
        bind: String,
    },
    /// Estimate outage cost from flags or scenario files
    Estimate(EstimateArgs),
}

#[derive(Args)]
struct EstimateArgs {
    /// Scenario JSON file, or a directory of them
    #[arg(long, short, conflicts_with_all = [
        "basis", "annual_revenue", "downtime_duration", "affected_employees",
        "hourly_wage", "annual_overhead", "profit_margin", "penalty_cost",
    ])]
    input: Option<PathBuf>,

    /// Print JSON instead of a text report
    #[arg(long)]
    json: bool,

    /// Upper bound on worker threads for batch estimation
    #[arg(long, env = THREADS_ENV)]
    threads: Option<usize>,

    /// "24/7" or "business"
    #[arg(long, default_value = "24/7")]
    basis: String,
    #[arg(long, default_value = "")]
    annual_revenue: String,
    /// Outage length in hours
    #[arg(long, default_value = "")]
    downtime_duration: String,
    #[arg(long, default_value = "")]
    affected_employees: String,
    /// Average hourly wage of affected staff
    #[arg(long, default_value = "")]
    hourly_wage: String,
    #[arg(long, default_value = "")]
    annual_overhead: String,
    /// Profit margin in percent
    #[arg(long, default_value = "")]
    profit_margin: String,
    /// Compliance or contractual penalty
    #[arg(long, default_value = "")]
    penalty_cost: String,
}

impl EstimateArgs {
    fn raw_inputs(&self) -> RawInputs {
        RawInputs {
            calculation_basis: self.basis.clone(),
            annual_revenue: self.annual_revenue.clone(),
            downtime_duration: self.downtime_duration.clone(),
            affected_employees: self.affected_employees.clone(),
            hourly_wage: self.hourly_wage.clone(),
            annual_overhead: self.annual_overhead.clone(),
            profit_margin: self.profit_margin.clone(),
            penalty_cost: self.penalty_cost.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    config::init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { bind } => {
            let settings = Settings::new(&bind)?;
            api::serve(settings.bind_addr).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Estimate(args) => run_estimate(args),
    }
}

/// What an `estimate` run prints and whether every input was accepted.
struct EstimateOutput {
    stdout: String,
    stderr: String,
    success: bool,
}

fn run_estimate(args: EstimateArgs) -> Result<ExitCode> {
    if args.input.is_some() {
        config::apply_thread_limit(args.threads)?;
    }
    let output = evaluate(&args)?;
    print!("{}", output.stdout);
    eprint!("{}", output.stderr);
    Ok(if output.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn evaluate(args: &EstimateArgs) -> Result<EstimateOutput> {
    let Some(path) = &args.input else {
        return Ok(match engine::estimate(&args.raw_inputs()) {
            Ok(breakdown) => EstimateOutput {
                stdout: if args.json {
                    format!("{}\n", serde_json::to_string_pretty(&breakdown)?)
                } else {
                    report::render_breakdown(&breakdown)
                },
                stderr: String::new(),
                success: true,
            },
            Err(errors) if args.json => EstimateOutput {
                stdout: format!(
                    "{}\n",
                    serde_json::to_string_pretty(&serde_json::json!({ "errors": errors }))?
                ),
                stderr: String::new(),
                success: false,
            },
            Err(errors) => EstimateOutput {
                stdout: String::new(),
                stderr: format!("Invalid input:\n{}", report::render_errors(&errors)),
                success: false,
            },
        });
    };

    let set: ScenarioSet = scenario::load_scenarios(path)?;
    if set.scenarios.is_empty() {
        tracing::warn!(path = %path.display(), "no scenarios found");
    }
    let batch = engine::estimate_batch(set);
    let stdout = if args.json {
        format!("{}\n", serde_json::to_string_pretty(&batch)?)
    } else {
        report::render_report(&batch)
    };
    Ok(EstimateOutput {
        stdout,
        stderr: String::new(),
        success: batch.rejected() == 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_become_raw_inputs() {
        let cli = Cli::parse_from([
            "downtime-cost",
            "estimate",
            "--annual-revenue",
            "8760000",
            "--downtime-duration",
            "1",
            "--affected-employees",
            "10",
            "--hourly-wage",
            "50",
        ]);
        let Command::Estimate(args) = cli.command else {
            panic!("expected estimate");
        };
        let raw = args.raw_inputs();
        assert_eq!(raw.calculation_basis, "24/7");
        assert_eq!(raw.profit_margin, "");
        let breakdown = engine::estimate(&raw).unwrap();
        assert_eq!(breakdown.total_estimated_cost, 1500.0);
    }

    #[test]
    fn test_input_conflicts_with_field_flags() {
        let result = Cli::try_parse_from([
            "downtime-cost",
            "estimate",
            "--input",
            "scenarios.json",
            "--annual-revenue",
            "5",
        ]);
        assert!(result.is_err());
    }

    fn estimate_args(argv: &[&str]) -> EstimateArgs {
        let cli = Cli::parse_from(["downtime-cost", "estimate"].iter().chain(argv));
        match cli.command {
            Command::Estimate(args) => args,
            Command::Serve { .. } => panic!("expected estimate"),
        }
    }

    fn write_mixed_batch(dir: &std::path::Path) -> std::path::PathBuf {
        let path = dir.join("outages.json");
        std::fs::write(
            &path,
            r#"[
                {"name": "core switch", "annualRevenue": "8760000", "downtimeDuration": "1",
                 "affectedEmployees": "10", "hourlyWage": "50"},
                {"name": "half filled", "annualRevenue": "100"}
            ]"#,
        )
        .unwrap();
        path
    }

    #[test]
    fn test_batch_with_rejected_scenario_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_mixed_batch(dir.path());
        let output = evaluate(&estimate_args(&["--input", path.to_str().unwrap()])).unwrap();
        assert!(!output.success);
        assert!(output.stdout.contains("== core switch\n"));
        assert!(output.stdout.contains("$1,500.00"));
        assert!(output.stdout.contains("== half filled (invalid input)"));
        assert!(output.stdout.contains("downtimeDuration: Required"));
    }

    #[test]
    fn test_batch_json_reports_each_status() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_mixed_batch(dir.path());
        let output =
            evaluate(&estimate_args(&["--input", path.to_str().unwrap(), "--json"])).unwrap();
        assert!(!output.success);
        let body: serde_json::Value = serde_json::from_str(&output.stdout).unwrap();
        assert_eq!(body["results"][0]["status"], "estimated");
        assert_eq!(body["results"][1]["status"], "rejected");
    }

    #[test]
    fn test_all_valid_batch_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("one.json");
        std::fs::write(
            &path,
            r#"{"annualRevenue": 2000000, "downtimeDuration": 1, "affectedEmployees": 0,
                "hourlyWage": 0, "calculationBasis": "business"}"#,
        )
        .unwrap();
        let output = evaluate(&estimate_args(&["--input", path.to_str().unwrap()])).unwrap();
        assert!(output.success);
        assert!(output.stdout.contains("== one\n"));
    }

    #[test]
    fn test_single_invalid_input_goes_to_stderr() {
        let output = evaluate(&estimate_args(&["--annual-revenue", "-1"])).unwrap();
        assert!(!output.success);
        assert!(output.stdout.is_empty());
        assert!(output.stderr.starts_with("Invalid input:\n"));
        assert!(output.stderr.contains("annualRevenue: Must be a positive number"));
    }

    #[test]
    fn test_single_invalid_input_as_json() {
        let output = evaluate(&estimate_args(&["--json"])).unwrap();
        assert!(!output.success);
        let body: serde_json::Value = serde_json::from_str(&output.stdout).unwrap();
        assert_eq!(body["errors"]["hourlyWage"], "Required");
    }

    #[test]
    fn test_single_valid_input_renders_breakdown() {
        let output = evaluate(&estimate_args(&[
            "--annual-revenue", "8760000", "--downtime-duration", "1",
            "--affected-employees", "10", "--hourly-wage", "50", "--penalty-cost", "500",
        ]))
        .unwrap();
        assert!(output.success);
        assert!(output.stdout.contains("Compliance/Penalty Cost:"));
        assert!(output.stdout.contains("$2,000.00"));
    }
}
