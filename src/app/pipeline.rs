//! Shared evaluation pipeline used by the CLI handlers.
//!
//! config load -> parameter overrides -> per-programme evaluation -> overall totals
//!
//! Keeping this apart from `app` lets tests drive a whole run without printing.

use std::path::Path;

use crate::domain::{Comparison, DecayCurve, DecayModel, EvaluationConfig};
use crate::error::AppError;
use crate::integrate::evaluate_and_integrate;
use crate::io::load_config;
use crate::programme::compare_programmes;

/// Command-line overrides applied on top of the loaded configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParameterOverrides {
    pub horizon_months: Option<f64>,
    pub cost_per_session: Option<f64>,
}

impl ParameterOverrides {
    pub fn apply(&self, config: &mut EvaluationConfig) {
        if let Some(months) = self.horizon_months {
            config.model.horizon_months = months;
        }
        if let Some(cost) = self.cost_per_session {
            config.model.cost_per_session = cost;
        }
    }
}

/// All computed outputs of a single `wellby evaluate` run.
#[derive(Debug, Clone)]
pub struct EvaluationRun {
    pub config: EvaluationConfig,
    pub comparison: Comparison,
}

/// Load the configuration and evaluate every programme.
pub fn run_evaluation(
    config_path: Option<&Path>,
    overrides: ParameterOverrides,
) -> Result<EvaluationRun, AppError> {
    let config = load_config(config_path)?;
    run_evaluation_with_config(config, overrides)
}

/// Evaluate an already loaded configuration.
pub fn run_evaluation_with_config(
    mut config: EvaluationConfig,
    overrides: ParameterOverrides,
) -> Result<EvaluationRun, AppError> {
    overrides.apply(&mut config);
    let comparison = compare_programmes(&config)?;
    Ok(EvaluationRun { config, comparison })
}

/// Output of a single `wellby curve` run.
#[derive(Debug, Clone)]
pub struct CurveRun {
    pub model: DecayModel,
    pub peak_gain: f64,
    pub curve: DecayCurve,
    pub wellbys: f64,
}

pub fn run_curve(model: DecayModel, peak_gain: f64, horizon_weeks: f64) -> Result<CurveRun, AppError> {
    let (curve, estimate) = evaluate_and_integrate(peak_gain, &model, horizon_weeks)?;
    Ok(CurveRun {
        model,
        peak_gain,
        curve,
        wellbys: estimate.wellbys,
    })
}
