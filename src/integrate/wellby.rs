//! WELLBY integration over the benefit horizon.
//!
//! Every path computes the same quantity:
//!
//! ```text
//! WELLBYs = Σ_{w=0}^{H-1} gain · b(w) / 52
//! ```
//!
//! where `H` is the whole-week horizon and `b(w)` the model's relative benefit
//! at week `w`. Dividing by 52 turns accumulated weekly wellbeing points into
//! wellbeing-point years.
//!
//! - exponential: closed-form truncated geometric series
//! - linear: closed-form arithmetic series, cut off at `weeks_to_zero`
//! - custom: one pass over the evaluated weekly curve

use tracing::{debug, warn};

use crate::domain::{
    DecayCurve, DecayModel, EstimateQuality, FLAT_FALLBACK_BENEFIT, MissingCurvePolicy,
    WEEKS_PER_YEAR, WellbyEstimate,
};
use crate::error::EngineError;
use crate::math::{geometric_sum, linear_sum};
use crate::models::{BenefitFn, evaluate_decay_curve, whole_horizon};

/// Total WELLBYs for one completer, strict form.
///
/// The custom model requires `weekly_benefit_factors` (as produced by
/// [`evaluate_decay_curve`]); a missing curve is an invalid parameter.
pub fn total_wellbys(
    peak_weekly_gain: f64,
    model: &DecayModel,
    horizon_weeks: f64,
    weekly_benefit_factors: Option<&[f64]>,
) -> Result<f64, EngineError> {
    integrate_wellbys(
        peak_weekly_gain,
        model,
        horizon_weeks,
        weekly_benefit_factors,
        MissingCurvePolicy::Reject,
    )
    .map(|estimate| estimate.wellbys)
}

/// Total WELLBYs for one completer, with an explicit policy for a custom
/// model whose weekly curve is missing.
///
/// The returned [`EstimateQuality`] tells the exact path apart from the
/// degraded flat fallback.
pub fn integrate_wellbys(
    peak_weekly_gain: f64,
    model: &DecayModel,
    horizon_weeks: f64,
    weekly_benefit_factors: Option<&[f64]>,
    missing_curve: MissingCurvePolicy,
) -> Result<WellbyEstimate, EngineError> {
    if !peak_weekly_gain.is_finite() {
        return Err(EngineError::invalid(
            "peak_weekly_gain",
            format!("{peak_weekly_gain} is not a finite wellbeing gain"),
        ));
    }
    let horizon = whole_horizon(horizon_weeks)?;

    // Building the benefit function validates every model's parameters.
    let (benefit, _) = BenefitFn::from_model(model)?;

    let (weekly_points, quality) = match benefit {
        BenefitFn::Exponential { weekly_factor } => {
            ignore_supplied_curve(weekly_benefit_factors);
            (geometric_sum(weekly_factor, horizon), EstimateQuality::Exact)
        }
        BenefitFn::Linear { weeks_to_zero } => {
            ignore_supplied_curve(weekly_benefit_factors);
            (linear_sum(weeks_to_zero, horizon), EstimateQuality::Exact)
        }
        BenefitFn::Zero => {
            ignore_supplied_curve(weekly_benefit_factors);
            (0.0, EstimateQuality::Exact)
        }
        BenefitFn::Custom(_) => match weekly_benefit_factors {
            Some(weekly) => (sum_weekly_curve(weekly, horizon)?, EstimateQuality::Exact),
            None => match missing_curve {
                MissingCurvePolicy::Reject => {
                    return Err(EngineError::invalid(
                        "weekly_benefit_factors",
                        "the custom model needs an evaluated weekly curve",
                    ));
                }
                MissingCurvePolicy::FlatHalfBenefit => {
                    warn!(
                        horizon,
                        benefit = FLAT_FALLBACK_BENEFIT,
                        "no custom weekly curve supplied; using degraded flat-benefit estimate"
                    );
                    (
                        horizon as f64 * FLAT_FALLBACK_BENEFIT,
                        EstimateQuality::DegradedFlatFallback,
                    )
                }
            },
        },
    };

    let wellbys = peak_weekly_gain * weekly_points / WEEKS_PER_YEAR;
    debug!(kind = ?model.kind(), horizon, peak_weekly_gain, wellbys, ?quality, "integrated WELLBYs");

    Ok(WellbyEstimate {
        wellbys,
        quality,
        horizon_weeks: horizon,
    })
}

/// Evaluate the decay curve and integrate it in one call.
///
/// This is the normal caller path: the custom model's weekly curve is always
/// produced before integration, so the estimate is never degraded.
pub fn evaluate_and_integrate(
    peak_weekly_gain: f64,
    model: &DecayModel,
    horizon_weeks: f64,
) -> Result<(DecayCurve, WellbyEstimate), EngineError> {
    let curve = evaluate_decay_curve(model, horizon_weeks)?;
    let estimate = integrate_wellbys(
        peak_weekly_gain,
        model,
        horizon_weeks,
        curve.weekly_benefit_factors.as_deref(),
        MissingCurvePolicy::Reject,
    )?;
    Ok((curve, estimate))
}

fn sum_weekly_curve(weekly: &[f64], horizon: usize) -> Result<f64, EngineError> {
    if weekly.len() != horizon {
        return Err(EngineError::CurveLengthMismatch {
            expected: horizon,
            actual: weekly.len(),
        });
    }
    if let Some((week, v)) = weekly
        .iter()
        .enumerate()
        .find(|(_, v)| !(v.is_finite() && (0.0..=1.0).contains(*v)))
    {
        return Err(EngineError::invalid(
            "weekly_benefit_factors",
            format!("week {week} has benefit {v}, outside [0, 1]"),
        ));
    }
    Ok(weekly.iter().sum())
}

fn ignore_supplied_curve(weekly: Option<&[f64]>) {
    if weekly.is_some() {
        debug!("weekly curve ignored; analytic model integrated in closed form");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CustomParams, ExponentialParams, LinearParams};
    use crate::models::weekly_benefit_factors;
    use proptest::prelude::*;

    fn exponential(r: f64) -> DecayModel {
        DecayModel::Exponential(ExponentialParams { annual_decay_rate: r })
    }

    fn linear(m: f64) -> DecayModel {
        DecayModel::Linear(LinearParams { months_to_zero: m })
    }

    fn default_custom() -> DecayModel {
        DecayModel::Custom(CustomParams::new(0.75, 0.50, 0.30, 0.15))
    }

    #[test]
    fn exponential_closed_form_matches_term_sum() {
        let model = exponential(0.5);
        let closed = total_wellbys(1.0, &model, 52.0, None).unwrap();
        let (weekly, _) = weekly_benefit_factors(&model, 52.0).unwrap();
        let direct: f64 = weekly.iter().sum::<f64>() / 52.0;
        assert!(((closed - direct) / direct).abs() < 1e-9, "{closed} vs {direct}");
    }

    #[test]
    fn exponential_half_decay_scenario() {
        let f = 0.5_f64.powf(1.0 / 52.0);
        let expected = 1.5 * (1.0 - f.powi(52)) / (1.0 - f) / 52.0;
        let got = total_wellbys(1.5, &exponential(0.5), 52.0, None).unwrap();
        assert!((got - expected).abs() < 1e-9);
        assert!((got - 1.0892).abs() < 0.01, "got {got}");
    }

    #[test]
    fn exponential_boundaries_rejected() {
        for r in [0.0, 1.0] {
            let err = total_wellbys(1.0, &exponential(r), 52.0, None).unwrap_err();
            assert!(matches!(
                err,
                EngineError::InvalidParameter { name: "annual_decay_rate", .. }
            ));
        }
    }

    #[test]
    fn linear_year_to_zero_scenario() {
        let got = total_wellbys(1.0, &linear(12.0), 52.0, None).unwrap();
        // Weeks 0..51 of the triangle: 26.5 weekly points.
        assert!((got - 26.5 / 52.0).abs() < 1e-12);
        assert!((got - 0.5).abs() < 0.01);
    }

    #[test]
    fn linear_closed_form_matches_term_sum() {
        for m in [1.0, 3.5, 7.0, 12.0, 24.0, 60.0] {
            let model = linear(m);
            let closed = total_wellbys(2.0, &model, 52.0, None).unwrap();
            let (weekly, _) = weekly_benefit_factors(&model, 52.0).unwrap();
            let direct = 2.0 * weekly.iter().sum::<f64>() / 52.0;
            assert!((closed - direct).abs() < 1e-12, "m={m}: {closed} vs {direct}");
        }
    }

    #[test]
    fn linear_non_positive_months_gives_zero() {
        assert_eq!(total_wellbys(1.5, &linear(0.0), 52.0, None).unwrap(), 0.0);
        assert_eq!(total_wellbys(1.5, &linear(-2.0), 52.0, None).unwrap(), 0.0);
    }

    #[test]
    fn custom_lies_between_linear_and_flat() {
        let (_, custom) = evaluate_and_integrate(1.0, &default_custom(), 52.0).unwrap();
        let linear = total_wellbys(1.0, &linear(12.0), 52.0, None).unwrap();
        let flat = 1.0;
        assert_eq!(custom.quality, EstimateQuality::Exact);
        assert!(custom.wellbys > linear && custom.wellbys < flat, "{}", custom.wellbys);
        assert!((custom.wellbys - 0.5368).abs() < 1e-3);
    }

    #[test]
    fn custom_without_curve_rejected_by_default() {
        let err = total_wellbys(1.0, &default_custom(), 52.0, None).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidParameter { name: "weekly_benefit_factors", .. }
        ));
    }

    #[test]
    fn custom_flat_fallback_is_marked_degraded() {
        let estimate = integrate_wellbys(
            1.0,
            &default_custom(),
            52.0,
            None,
            MissingCurvePolicy::FlatHalfBenefit,
        )
        .unwrap();
        assert_eq!(estimate.quality, EstimateQuality::DegradedFlatFallback);
        assert!(estimate.quality.is_degraded());
        assert!((estimate.wellbys - 0.5).abs() < 1e-12);
    }

    #[test]
    fn custom_fallback_still_validates_control_points() {
        let model = DecayModel::Custom(CustomParams::default());
        let err = integrate_wellbys(1.0, &model, 52.0, None, MissingCurvePolicy::FlatHalfBenefit)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameter { name: "month_3", .. }));
    }

    #[test]
    fn custom_curve_length_must_match_horizon() {
        let weekly = vec![1.0; 40];
        let err = total_wellbys(1.0, &default_custom(), 52.0, Some(&weekly)).unwrap_err();
        assert_eq!(err, EngineError::CurveLengthMismatch { expected: 52, actual: 40 });
    }

    #[test]
    fn custom_curve_values_must_be_unit_range() {
        let mut weekly = vec![0.5; 52];
        weekly[10] = 1.5;
        assert!(total_wellbys(1.0, &default_custom(), 52.0, Some(&weekly)).is_err());
    }

    #[test]
    fn non_finite_gain_rejected() {
        assert!(total_wellbys(f64::NAN, &exponential(0.5), 52.0, None).is_err());
    }

    #[test]
    fn zero_horizon_and_zero_gain_give_zero() {
        assert_eq!(total_wellbys(1.0, &exponential(0.5), 0.0, None).unwrap(), 0.0);
        assert_eq!(total_wellbys(0.0, &linear(12.0), 52.0, None).unwrap(), 0.0);
    }

    #[test]
    fn partial_final_week_is_dropped() {
        let whole = total_wellbys(1.0, &exponential(0.5), 52.0, None).unwrap();
        let partial = total_wellbys(1.0, &exponential(0.5), 52.7, None).unwrap();
        assert_eq!(whole, partial);
    }

    #[test]
    fn oversized_horizon_is_an_error_not_an_allocation() {
        for model in [default_custom(), exponential(0.5), linear(12.0)] {
            let err = evaluate_and_integrate(1.0, &model, 1e18).unwrap_err();
            assert!(matches!(err, EngineError::InvalidParameter { name: "horizon_weeks", .. }));
        }
        let estimate = integrate_wellbys(
            1.0,
            &default_custom(),
            1e18,
            None,
            MissingCurvePolicy::FlatHalfBenefit,
        );
        assert!(estimate.is_err());
    }

    #[test]
    fn degenerate_linear_ignores_supplied_curve() {
        let curve = vec![1.0; 52];
        let estimate = integrate_wellbys(
            1.0,
            &linear(0.0),
            52.0,
            Some(&curve),
            MissingCurvePolicy::Reject,
        )
        .unwrap();
        assert_eq!(estimate.wellbys, 0.0);
        assert_eq!(estimate.quality, EstimateQuality::Exact);
    }

    fn any_model() -> impl Strategy<Value = DecayModel> {
        prop_oneof![
            (0.001f64..0.999).prop_map(exponential),
            (0.1f64..60.0).prop_map(linear),
            (0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0)
                .prop_map(|(a, b, c, d)| DecayModel::Custom(CustomParams::new(a, b, c, d))),
        ]
    }

    proptest! {
        #[test]
        fn monotone_and_non_negative_in_gain(
            model in any_model(),
            g1 in 0.0f64..10.0,
            g2 in 0.0f64..10.0,
        ) {
            let (lo, hi) = if g1 <= g2 { (g1, g2) } else { (g2, g1) };
            let (_, a) = evaluate_and_integrate(lo, &model, 52.0).unwrap();
            let (_, b) = evaluate_and_integrate(hi, &model, 52.0).unwrap();
            prop_assert!(a.wellbys >= 0.0);
            prop_assert!(b.wellbys >= a.wellbys);
        }

        #[test]
        fn non_decreasing_in_horizon(model in any_model(), h in 1usize..200) {
            // Only the analytic models have a fixed per-week benefit. The custom
            // curve is re-sampled so its 12 months span H weeks, and a
            // non-monotone curve can then lose total as H grows: points
            // [0, 1, 0, 1] give 0.0385 at H = 2 and 0.0292 at H = 3.
            prop_assume!(!matches!(model, DecayModel::Custom(_)));
            let short = total_wellbys(1.0, &model, h as f64, None).unwrap();
            let long = total_wellbys(1.0, &model, (h + 1) as f64, None).unwrap();
            prop_assert!(long >= short);
        }

        #[test]
        fn never_exceeds_flat_benefit(model in any_model(), g in 0.0f64..10.0) {
            let (_, estimate) = evaluate_and_integrate(g, &model, 52.0).unwrap();
            prop_assert!(estimate.wellbys <= g + 1e-9);
        }
    }
}
