//! Command-line parsing for the WELLBY cost-effectiveness tool.
//!
//! Parsing and dispatch stay separate from the engine: everything here turns
//! flags into the plain config structs the engine takes.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{DecayKind, SessionCostInputs};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "wellby", version, about = "WELLBY cost-effectiveness for coaching programmes")]
pub struct Cli {
    /// Log filter used when `RUST_LOG` is unset (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Evaluate every configured programme and print the comparison.
    Evaluate(EvaluateArgs),
    /// Evaluate a single decay curve and its WELLBY total.
    Curve(CurveArgs),
    /// Derive the marginal cost per session from branch staffing costs.
    SessionCost(SessionCostArgs),
}

#[derive(Debug, Args, Clone)]
pub struct EvaluateArgs {
    /// Programme configuration JSON (defaults to `WELLBY_CONFIG`, then the bundled file).
    #[arg(long, value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// Override the evaluation horizon in months.
    #[arg(long)]
    pub horizon_months: Option<f64>,

    /// Override the cost per coaching session.
    #[arg(long)]
    pub cost_per_session: Option<f64>,

    /// Export the comparison to JSON.
    #[arg(long = "export-json", value_name = "PATH")]
    pub export_json: Option<PathBuf>,

    /// Export the comparison to CSV.
    #[arg(long = "export-csv", value_name = "PATH")]
    pub export_csv: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct CurveArgs {
    /// Decay model.
    #[arg(long, value_enum)]
    pub model: DecayKind,

    /// Annual decay rate for the exponential model, in (0, 1).
    #[arg(long, required_if_eq("model", "exponential"))]
    pub annual_decay_rate: Option<f64>,

    /// Months until the benefit reaches zero for the linear model.
    #[arg(long, required_if_eq("model", "linear"))]
    pub months_to_zero: Option<f64>,

    /// Relative benefit at months 3, 6, 9 and 12 for the custom model.
    #[arg(
        long,
        value_delimiter = ',',
        value_name = "P3,P6,P9,P12",
        required_if_eq("model", "custom")
    )]
    pub points: Vec<f64>,

    /// Peak weekly wellbeing gain.
    #[arg(long, default_value_t = 1.0)]
    pub peak_gain: f64,

    /// Horizon in weeks.
    #[arg(long, default_value_t = 52.0)]
    pub horizon_weeks: f64,
}

#[derive(Debug, Args, Clone)]
pub struct SessionCostArgs {
    #[arg(long, default_value_t = 15)]
    pub coaches: u32,

    #[arg(long, default_value_t = 15)]
    pub clients_per_coach: u32,

    #[arg(long, default_value_t = 5)]
    pub sessions_per_client: u32,

    #[arg(long, default_value_t = 500.0)]
    pub counsellor_salary: f64,

    #[arg(long, default_value_t = 500.0)]
    pub head_of_training_salary: f64,

    #[arg(long, default_value_t = 350.0)]
    pub va_salary: f64,

    #[arg(long, default_value_t = 500.0)]
    pub branch_manager_salary: f64,

    #[arg(long, default_value_t = 400.0)]
    pub hiring_manager_salary: f64,

    /// Leave the hiring manager out of the monthly costs.
    #[arg(long)]
    pub no_hiring_manager: bool,

    #[arg(long, default_value_t = 300.0)]
    pub other_costs: f64,

    /// Leave the final roleplay assessment out of the monthly costs.
    #[arg(long)]
    pub no_final_assessment: bool,
}

impl SessionCostArgs {
    pub fn to_inputs(&self) -> SessionCostInputs {
        SessionCostInputs {
            coaches_per_cohort: self.coaches,
            clients_per_coach: self.clients_per_coach,
            sessions_per_client: self.sessions_per_client,
            counsellor_salary: self.counsellor_salary,
            head_of_training_salary: self.head_of_training_salary,
            va_salary: self.va_salary,
            branch_manager_salary: self.branch_manager_salary,
            hiring_manager_salary: self.hiring_manager_salary,
            hiring_manager_enabled: !self.no_hiring_manager,
            other_costs: self.other_costs,
            final_roleplay_assessment: !self.no_final_assessment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cost_defaults_match_engine_defaults() {
        let cli = Cli::parse_from(["wellby", "session-cost"]);
        let Command::SessionCost(args) = cli.command else {
            panic!("expected session-cost");
        };
        assert_eq!(args.to_inputs(), SessionCostInputs::default());
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn curve_parses_custom_points() {
        let cli = Cli::parse_from([
            "wellby", "curve", "--model", "custom", "--points", "0.75,0.5,0.3,0.15",
        ]);
        let Command::Curve(args) = cli.command else {
            panic!("expected curve");
        };
        assert_eq!(args.model, DecayKind::Custom);
        assert_eq!(args.points, vec![0.75, 0.5, 0.3, 0.15]);
        assert_eq!(args.horizon_weeks, 52.0);
    }

    #[test]
    fn exponential_requires_rate() {
        assert!(Cli::try_parse_from(["wellby", "curve", "--model", "exponential"]).is_err());
    }

    #[test]
    fn global_log_level_after_subcommand() {
        let cli = Cli::try_parse_from(["wellby", "evaluate", "--log-level", "debug"]).unwrap();
        assert_eq!(cli.log_level, "debug");
    }
}
