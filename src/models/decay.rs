//! Decay curve evaluation for the exponential / linear / custom models.
//!
//! Every model is reduced to a validated [`BenefitFn`], which the integrator
//! and the chart sampler both consume. Two primitive operations are exposed:
//!
//! - relative benefit at an elapsed month (charting)
//! - relative benefit at a horizon week (integration)
//!
//! For the analytic models the week-to-month mapping is the calendar one
//! (`month = week * 12 / 52`). The custom curve maps the horizon's week indices
//! linearly onto its `[0, 12]` month span (`month = 12 * week / horizon`).

use tracing::{debug, warn};

use crate::domain::{
    CUSTOM_CONTROL_MONTHS, CurvePoint, CustomParams, DecayCurve, DecayModel, DegenerateInput,
    ExponentialParams, LinearParams, MAX_HORIZON_WEEKS, MONTHS_PER_YEAR, months_to_weeks,
};
use crate::error::EngineError;
use crate::math::{Pchip, whole_weeks};

/// A validated relative-benefit function.
#[derive(Debug, Clone, PartialEq)]
pub enum BenefitFn {
    Exponential { weekly_factor: f64 },
    Linear { weeks_to_zero: f64 },
    /// No measurable benefit at any time (degenerate linear input).
    Zero,
    Custom(Pchip),
}

impl BenefitFn {
    /// Validate model parameters and build the benefit function.
    ///
    /// Returns the non-fatal correction applied, if any.
    pub fn from_model(model: &DecayModel) -> Result<(Self, Option<DegenerateInput>), EngineError> {
        match model {
            DecayModel::Exponential(p) => {
                validate_exponential(p)?;
                Ok((
                    BenefitFn::Exponential {
                        weekly_factor: p.weekly_factor(),
                    },
                    None,
                ))
            }
            DecayModel::Linear(p) => linear_fn(p),
            DecayModel::Custom(p) => Ok((BenefitFn::Custom(custom_interpolant(p)?), None)),
        }
    }

    /// Relative benefit after `month` elapsed months, clamped to `[0, 1]`.
    pub fn at_month(&self, month: f64) -> f64 {
        match self {
            BenefitFn::Exponential { weekly_factor } => weekly_factor.powf(months_to_weeks(month)),
            BenefitFn::Linear { weeks_to_zero } => linear_benefit(months_to_weeks(month), *weeks_to_zero),
            BenefitFn::Zero => 0.0,
            BenefitFn::Custom(pchip) => pchip.evaluate(month).clamp(0.0, 1.0),
        }
    }

    /// Unclamped relative benefit at horizon week `week` of `horizon` weeks.
    ///
    /// `week` must be below `horizon`.
    pub fn raw_at_week(&self, week: usize, horizon: usize) -> f64 {
        match self {
            BenefitFn::Exponential { weekly_factor } => weekly_factor.powf(week as f64),
            BenefitFn::Linear { weeks_to_zero } => linear_benefit(week as f64, *weeks_to_zero),
            BenefitFn::Zero => 0.0,
            BenefitFn::Custom(pchip) => {
                let span = CUSTOM_CONTROL_MONTHS[CUSTOM_CONTROL_MONTHS.len() - 1];
                pchip.evaluate(week as f64 / horizon as f64 * span)
            }
        }
    }
}

fn linear_benefit(week: f64, weeks_to_zero: f64) -> f64 {
    (1.0 - week / weeks_to_zero).max(0.0)
}

/// Reject decay rates outside the open interval `(0, 1)`.
///
/// `0` means no decay and `1` means instant total decay; neither is a valid
/// exponential model.
pub fn validate_exponential(p: &ExponentialParams) -> Result<(), EngineError> {
    let r = p.annual_decay_rate;
    if !(r.is_finite() && r > 0.0 && r < 1.0) {
        return Err(EngineError::invalid(
            "annual_decay_rate",
            format!("{r} is outside the open interval (0, 1)"),
        ));
    }
    Ok(())
}

fn linear_fn(p: &LinearParams) -> Result<(BenefitFn, Option<DegenerateInput>), EngineError> {
    let m = p.months_to_zero;
    if !m.is_finite() {
        return Err(EngineError::invalid(
            "months_to_zero",
            format!("{m} is not a finite number of months"),
        ));
    }
    if m <= 0.0 {
        warn!(months_to_zero = m, "non-positive months to zero; using the zero curve");
        return Ok((
            BenefitFn::Zero,
            Some(DegenerateInput::NonPositiveMonthsToZero { months_to_zero: m }),
        ));
    }
    Ok((
        BenefitFn::Linear {
            weeks_to_zero: p.weeks_to_zero(),
        },
        None,
    ))
}

/// Build the monotone interpolant through `(0, 1.0)` and the four free points.
pub fn custom_interpolant(p: &CustomParams) -> Result<Pchip, EngineError> {
    let mut ys = [1.0; 5];
    for (slot, (name, value)) in ys[1..].iter_mut().zip(p.free_points()) {
        let Some(v) = value else {
            return Err(EngineError::invalid(name, "custom control point is not set"));
        };
        if !(v.is_finite() && (0.0..=1.0).contains(&v)) {
            return Err(EngineError::invalid(
                name,
                format!("{v} is outside the relative benefit range [0, 1]"),
            ));
        }
        *slot = v;
    }

    Pchip::new(&CUSTOM_CONTROL_MONTHS, &ys)
        .ok_or_else(|| EngineError::invalid("custom", "control points do not define a curve"))
}

/// Sample a validated benefit function once per whole horizon week.
///
/// Values outside `[0, 1]` are clamped and reported.
pub fn sample_weeks(benefit: &BenefitFn, horizon: usize) -> (Vec<f64>, Vec<DegenerateInput>) {
    let mut warnings = Vec::new();
    let weekly = (0..horizon)
        .map(|week| {
            let raw = benefit.raw_at_week(week, horizon);
            let clamped = raw.clamp(0.0, 1.0);
            if clamped != raw {
                debug!(week, raw, "clamped interpolated benefit");
                warnings.push(DegenerateInput::ClampedOvershoot { week, raw });
            }
            clamped
        })
        .collect();
    (weekly, warnings)
}

/// Relative benefit for every whole week of the horizon, for any model.
pub fn weekly_benefit_factors(
    model: &DecayModel,
    horizon_weeks: f64,
) -> Result<(Vec<f64>, Vec<DegenerateInput>), EngineError> {
    let horizon = whole_horizon(horizon_weeks)?;
    let (benefit, degenerate) = BenefitFn::from_model(model)?;
    let (weekly, clamped) = sample_weeks(&benefit, horizon);
    let mut warnings: Vec<DegenerateInput> = degenerate.into_iter().collect();
    warnings.extend(clamped);
    Ok((weekly, warnings))
}

/// Evaluate a decay model into chart samples and, for the custom model, the
/// weekly benefit factors the integrator consumes.
pub fn evaluate_decay_curve(model: &DecayModel, horizon_weeks: f64) -> Result<DecayCurve, EngineError> {
    let horizon = whole_horizon(horizon_weeks)?;
    let (benefit, degenerate) = BenefitFn::from_model(model)?;
    let mut warnings: Vec<DegenerateInput> = degenerate.into_iter().collect();

    let chart = chart_samples(&benefit);

    let (control_points, weekly_benefit_factors) = match &benefit {
        BenefitFn::Custom(pchip) => {
            let (weekly, clamped) = sample_weeks(&benefit, horizon);
            if !clamped.is_empty() {
                warn!(count = clamped.len(), "custom curve overshoot clamped to [0, 1]");
            }
            warnings.extend(clamped);
            let control = pchip
                .nodes()
                .map(|(month, benefit)| CurvePoint { month, benefit })
                .collect();
            (control, Some(weekly))
        }
        _ => (Vec::new(), None),
    };

    debug!(
        kind = ?model.kind(),
        horizon,
        warnings = warnings.len(),
        "evaluated decay curve"
    );

    Ok(DecayCurve {
        kind: model.kind(),
        horizon_weeks: horizon,
        chart,
        control_points,
        weekly_benefit_factors,
        warnings,
    })
}

/// Month-granularity samples over the 12-month chart window.
fn chart_samples(benefit: &BenefitFn) -> Vec<CurvePoint> {
    let months = MONTHS_PER_YEAR as usize;
    (0..=months)
        .map(|m| {
            let month = m as f64;
            CurvePoint {
                month,
                benefit: benefit.at_month(month),
            }
        })
        .collect()
}

/// Whole-week horizon, bounded by `MAX_HORIZON_WEEKS`.
pub(crate) fn whole_horizon(horizon_weeks: f64) -> Result<usize, EngineError> {
    if horizon_weeks > MAX_HORIZON_WEEKS {
        return Err(EngineError::invalid(
            "horizon_weeks",
            format!("{horizon_weeks} exceeds the {MAX_HORIZON_WEEKS}-week maximum"),
        ));
    }
    whole_weeks(horizon_weeks).ok_or_else(|| {
        EngineError::invalid(
            "horizon_weeks",
            format!("{horizon_weeks} is not a finite, non-negative number of weeks"),
        )
    })
}
