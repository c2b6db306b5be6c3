//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - installs the tracing subscriber
//! - loads the programme configuration
//! - runs the evaluation, curve or session-cost command
//! - prints reports and writes optional exports

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, CurveArgs, EvaluateArgs, SessionCostArgs};
use crate::domain::{CustomParams, DecayKind, DecayModel, ExponentialParams, LinearParams};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `wellby` binary.
pub fn run() -> Result<(), AppError> {
    // `wellby` and `wellby --config x.json` behave like `wellby evaluate ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    init_tracing(&cli.log_level);

    match cli.command {
        Command::Evaluate(args) => handle_evaluate(args),
        Command::Curve(args) => handle_curve(args),
        Command::SessionCost(args) => handle_session_cost(args),
    }
}

/// Logs go to stderr; `RUST_LOG` wins over `--log-level`.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let overrides = pipeline::ParameterOverrides {
        horizon_months: args.horizon_months,
        cost_per_session: args.cost_per_session,
    };
    let run = pipeline::run_evaluation(args.config.as_deref(), overrides)?;

    println!(
        "{}",
        crate::report::format_comparison(&run.comparison, &run.config.model)
    );

    if let Some(path) = &args.export_json {
        crate::io::write_comparison_json(path, &run.comparison)?;
    }
    if let Some(path) = &args.export_csv {
        crate::io::write_comparison_csv(path, &run.comparison)?;
    }

    Ok(())
}

fn handle_curve(args: CurveArgs) -> Result<(), AppError> {
    let model = decay_model_from_args(&args)?;
    let run = pipeline::run_curve(model, args.peak_gain, args.horizon_weeks)?;
    println!(
        "{}",
        crate::report::format_curve(&run.curve, &run.model, run.peak_gain, run.wellbys)
    );
    Ok(())
}

fn handle_session_cost(args: SessionCostArgs) -> Result<(), AppError> {
    let inputs = args.to_inputs();
    let breakdown = crate::programme::session_cost(&inputs)?;
    println!("{}", crate::report::format_session_cost(&inputs, &breakdown));
    Ok(())
}

pub fn decay_model_from_args(args: &CurveArgs) -> Result<DecayModel, AppError> {
    let missing = |flag: &str| AppError::new(2, format!("--{flag} is required for the {:?} model", args.model));

    let model = match args.model {
        DecayKind::Exponential => DecayModel::Exponential(ExponentialParams {
            annual_decay_rate: args.annual_decay_rate.ok_or_else(|| missing("annual-decay-rate"))?,
        }),
        DecayKind::Linear => DecayModel::Linear(LinearParams {
            months_to_zero: args.months_to_zero.ok_or_else(|| missing("months-to-zero"))?,
        }),
        DecayKind::Custom => match args.points.as_slice() {
            [p3, p6, p9, p12] => DecayModel::Custom(CustomParams::new(*p3, *p6, *p9, *p12)),
            other => {
                return Err(AppError::new(
                    2,
                    format!("--points takes exactly 4 values (months 3, 6, 9, 12), got {}", other.len()),
                ));
            }
        },
    };
    Ok(model)
}

/// Rewrite argv so `wellby` defaults to `wellby evaluate`.
///
/// Rules:
/// - `wellby`                          -> `wellby evaluate`
/// - `wellby --config x.json ...`      -> `wellby evaluate --config x.json ...`
/// - `wellby --help/--version/-h`      -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("evaluate".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "evaluate" | "curve" | "session-cost");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "evaluate".to_string());
    }

    argv
}
