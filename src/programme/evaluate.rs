//! Per-programme evaluation and the overall comparison.
//!
//! The flow per programme is:
//! decay curve -> WELLBYs per completer -> scale by completers and harm
//! proportion -> session costs -> cost per WELLBY.
//!
//! Programmes are independent pure evaluations, so they are fanned out with
//! rayon and collected back in configuration order.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::domain::{
    Comparison, EvaluationConfig, MAX_HORIZON_MONTHS, ModelParameters, OverallSummary, ProgrammeConfig,
    ProgrammeOutcome, RetainedClientWellbys,
};
use crate::error::EngineError;
use crate::integrate::evaluate_and_integrate;

/// Evaluate one programme.
pub fn evaluate_programme(
    programme: &ProgrammeConfig,
    params: &ModelParameters,
) -> Result<ProgrammeOutcome, EngineError> {
    validate_programme(programme)?;
    validate_parameters(params)?;

    let horizon_weeks = params.horizon_weeks();
    let gain = programme.peak_weekly_gain();

    let (curve, estimate) = evaluate_and_integrate(gain, &programme.decay, horizon_weeks)?;

    let clients_seen = programme.participants;
    let clients_retained = clients_seen * programme.retention;

    let gross_wellbys = estimate.wellbys * clients_retained;
    let net_wellbys = gross_wellbys / programme.harm_proportion;

    let total_cost = programme.sessions_per_participant * params.cost_per_session * clients_seen;
    let cost_per_wellby = ratio(total_cost, net_wellbys);

    let per_retained_client = if clients_retained > 0.0 {
        let client = gross_wellbys / clients_retained;
        let total = net_wellbys / clients_retained;
        RetainedClientWellbys {
            client,
            society: total - client,
            total,
        }
    } else {
        RetainedClientWellbys::default()
    };

    debug!(
        programme = %programme.name,
        wellbys_per_completer = estimate.wellbys,
        net_wellbys,
        total_cost,
        "evaluated programme"
    );

    Ok(ProgrammeOutcome {
        name: programme.name.clone(),
        decay: programme.decay.kind(),
        peak_weekly_gain: gain,
        total_cost,
        net_wellbys,
        cost_per_wellby,
        clients_seen,
        clients_retained,
        per_retained_client,
        warnings: curve.warnings,
    })
}

/// Evaluate every configured programme and total the results.
pub fn compare_programmes(config: &EvaluationConfig) -> Result<Comparison, EngineError> {
    validate_parameters(&config.model)?;
    info!(programmes = config.programmes.len(), "evaluating programmes");

    let programmes = config
        .programmes
        .par_iter()
        .map(|p| evaluate_programme(p, &config.model))
        .collect::<Result<Vec<_>, _>>()?;

    let overall = summarise(&programmes);
    let horizon_weeks = crate::math::whole_weeks(config.model.horizon_weeks()).unwrap_or(0);

    Ok(Comparison {
        horizon_weeks,
        programmes,
        overall,
    })
}

/// Total row across programme outcomes.
pub fn summarise(outcomes: &[ProgrammeOutcome]) -> OverallSummary {
    let total_cost: f64 = outcomes.iter().map(|o| o.total_cost).sum();
    let net_wellbys: f64 = outcomes.iter().map(|o| o.net_wellbys).sum();
    let clients_seen: f64 = outcomes.iter().map(|o| o.clients_seen).sum();
    let clients_retained: f64 = outcomes.iter().map(|o| o.clients_retained).sum();

    OverallSummary {
        total_cost,
        net_wellbys,
        clients_seen,
        clients_retained,
        wellbys_per_retained_client: ratio(net_wellbys, clients_retained),
        cost_per_wellby: ratio(total_cost, net_wellbys),
    }
}

/// `numer / denom`, undefined unless `denom` is positive.
fn ratio(numer: f64, denom: f64) -> Option<f64> {
    (denom > 0.0).then(|| numer / denom)
}

fn validate_programme(p: &ProgrammeConfig) -> Result<(), EngineError> {
    if !(p.participants.is_finite() && p.participants >= 0.0) {
        return Err(EngineError::invalid("participants", format!("{} must be >= 0", p.participants)));
    }
    if !(p.retention.is_finite() && (0.0..=1.0).contains(&p.retention)) {
        return Err(EngineError::invalid("retention", format!("{} is outside [0, 1]", p.retention)));
    }
    if !(p.sessions_per_participant.is_finite() && p.sessions_per_participant >= 0.0) {
        return Err(EngineError::invalid(
            "sessions_per_participant",
            format!("{} must be >= 0", p.sessions_per_participant),
        ));
    }
    for (name, score) in [
        ("baseline_wellbeing", p.baseline_wellbeing),
        ("peak_wellbeing", p.peak_wellbeing),
    ] {
        if !(score.is_finite() && (0.0..=10.0).contains(&score)) {
            return Err(EngineError::invalid(name, format!("{score} is outside the 0-10 scale")));
        }
    }
    if !(p.harm_proportion.is_finite() && p.harm_proportion > 0.0 && p.harm_proportion <= 1.0) {
        return Err(EngineError::invalid(
            "harm_proportion",
            format!("{} is outside (0, 1]", p.harm_proportion),
        ));
    }
    Ok(())
}

fn validate_parameters(params: &ModelParameters) -> Result<(), EngineError> {
    if !(params.cost_per_session.is_finite() && params.cost_per_session >= 0.0) {
        return Err(EngineError::invalid(
            "cost_per_session",
            format!("{} must be >= 0", params.cost_per_session),
        ));
    }
    if !(params.horizon_months.is_finite()
        && params.horizon_months > 0.0
        && params.horizon_months <= MAX_HORIZON_MONTHS)
    {
        return Err(EngineError::invalid(
            "horizon_months",
            format!("{} is outside (0, {MAX_HORIZON_MONTHS}]", params.horizon_months),
        ));
    }
    Ok(())
}
