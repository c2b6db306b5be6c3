//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed as explicit configuration into every evaluation
//! - exported to JSON/CSV
//! - reloaded from a programme configuration file

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Weeks in a WELLBY year. Fixed at 52 regardless of calendar weeks.
pub const WEEKS_PER_YEAR: f64 = 52.0;

pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Default benefit integration window.
pub const HORIZON_MONTHS: f64 = 12.0;

/// Longest accepted evaluation horizon: five years.
pub const MAX_HORIZON_MONTHS: f64 = 60.0;

/// `MAX_HORIZON_MONTHS` on the 52-week year. Bounds the weekly sample count.
pub const MAX_HORIZON_WEEKS: f64 = MAX_HORIZON_MONTHS / MONTHS_PER_YEAR * WEEKS_PER_YEAR;

/// Month marks of the custom curve control points. Month 0 is pinned to 1.0.
pub const CUSTOM_CONTROL_MONTHS: [f64; 5] = [0.0, 3.0, 6.0, 9.0, 12.0];

/// Relative benefit used by the degraded flat fallback for a missing custom curve.
pub const FLAT_FALLBACK_BENEFIT: f64 = 0.5;

/// Convert a month count to weeks on the 52-week WELLBY year.
pub fn months_to_weeks(months: f64) -> f64 {
    months / MONTHS_PER_YEAR * WEEKS_PER_YEAR
}

/// Exponential decay: a fixed fraction of the remaining benefit is lost per year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExponentialParams {
    /// Fraction lost per year, strictly inside `(0, 1)`.
    pub annual_decay_rate: f64,
}

impl ExponentialParams {
    /// Weekly survival multiplier `(1 - r)^(1/52)`.
    ///
    /// Only meaningful once `annual_decay_rate` has been validated.
    pub fn weekly_factor(&self) -> f64 {
        (1.0 - self.annual_decay_rate).powf(1.0 / WEEKS_PER_YEAR)
    }
}

/// Linear decay from 1.0 at month 0 to 0.0 at `months_to_zero`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearParams {
    pub months_to_zero: f64,
}

impl LinearParams {
    pub fn weeks_to_zero(&self) -> f64 {
        months_to_weeks(self.months_to_zero)
    }
}

/// User-shaped decay through control points at months 3, 6, 9 and 12.
///
/// Points are optional so an incompletely specified curve can be represented
/// and rejected at evaluation time instead of being silently defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CustomParams {
    #[serde(default)]
    pub month_3: Option<f64>,
    #[serde(default)]
    pub month_6: Option<f64>,
    #[serde(default)]
    pub month_9: Option<f64>,
    #[serde(default)]
    pub month_12: Option<f64>,
}

impl CustomParams {
    pub fn new(month_3: f64, month_6: f64, month_9: f64, month_12: f64) -> Self {
        Self {
            month_3: Some(month_3),
            month_6: Some(month_6),
            month_9: Some(month_9),
            month_12: Some(month_12),
        }
    }

    /// The four free control points, paired with their parameter names.
    pub fn free_points(&self) -> [(&'static str, Option<f64>); 4] {
        [
            ("month_3", self.month_3),
            ("month_6", self.month_6),
            ("month_9", self.month_9),
            ("month_12", self.month_12),
        ]
    }
}

/// A decay model together with its model-specific parameters.
///
/// JSON form is internally tagged, e.g. `{"model": "linear", "months_to_zero": 12}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "lowercase")]
pub enum DecayModel {
    Exponential(ExponentialParams),
    Linear(LinearParams),
    Custom(CustomParams),
}

impl DecayModel {
    pub fn kind(&self) -> DecayKind {
        match self {
            DecayModel::Exponential(_) => DecayKind::Exponential,
            DecayModel::Linear(_) => DecayKind::Linear,
            DecayModel::Custom(_) => DecayKind::Custom,
        }
    }

    /// Short parameter description for terminal output.
    pub fn describe(&self) -> String {
        match self {
            DecayModel::Exponential(p) => {
                format!("exponential, {:.1}% annual decay", p.annual_decay_rate * 100.0)
            }
            DecayModel::Linear(p) => format!("linear, zero after {:.1} months", p.months_to_zero),
            DecayModel::Custom(p) => {
                let parts: Vec<String> = p
                    .free_points()
                    .iter()
                    .map(|(_, v)| v.map(|v| format!("{v:.2}")).unwrap_or_else(|| "?".to_string()))
                    .collect();
                format!("custom, 1.00 -> {}", parts.join(" -> "))
            }
        }
    }
}

/// Decay model selector without parameters (CLI and report labels).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DecayKind {
    Exponential,
    Linear,
    Custom,
}

impl DecayKind {
    /// Identifier used in configuration files and exports.
    pub fn key(self) -> &'static str {
        match self {
            DecayKind::Exponential => "exponential",
            DecayKind::Linear => "linear",
            DecayKind::Custom => "custom",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            DecayKind::Exponential => "Exponential Decay",
            DecayKind::Linear => "Linear Decay",
            DecayKind::Custom => "Custom Curve",
        }
    }
}

/// Non-fatal input corrections made while evaluating a curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DegenerateInput {
    /// A linear model with `months_to_zero <= 0` is treated as the zero curve.
    NonPositiveMonthsToZero { months_to_zero: f64 },
    /// An interpolated weekly value fell outside `[0, 1]` and was clamped.
    ClampedOvershoot { week: usize, raw: f64 },
}

impl std::fmt::Display for DegenerateInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DegenerateInput::NonPositiveMonthsToZero { months_to_zero } => write!(
                f,
                "months to zero is {months_to_zero}; treated as no measurable benefit"
            ),
            DegenerateInput::ClampedOvershoot { week, raw } => {
                write!(f, "week {week}: interpolated benefit {raw:.6} clamped to [0, 1]")
            }
        }
    }
}

/// A single chart sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub month: f64,
    pub benefit: f64,
}

/// Output of the decay curve evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecayCurve {
    pub kind: DecayKind,
    /// Whole-week horizon the curve was evaluated for.
    pub horizon_weeks: usize,
    /// Month-granularity samples (months 0..=12) for charting.
    pub chart: Vec<CurvePoint>,
    /// Control points of a custom curve (empty for the analytic models).
    pub control_points: Vec<CurvePoint>,
    /// Relative benefit per horizon week. Only produced for the custom model;
    /// the analytic models are integrated in closed form.
    pub weekly_benefit_factors: Option<Vec<f64>>,
    pub warnings: Vec<DegenerateInput>,
}

/// What to do when a custom model is integrated without a weekly curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingCurvePolicy {
    /// Fail with an invalid-parameter error.
    #[default]
    Reject,
    /// Assume a flat 50% benefit and mark the estimate as degraded.
    FlatHalfBenefit,
}

/// Whether a WELLBY estimate came from the model or from the degraded fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateQuality {
    Exact,
    DegradedFlatFallback,
}

impl EstimateQuality {
    pub fn is_degraded(self) -> bool {
        self != EstimateQuality::Exact
    }
}

/// Output of the WELLBY integrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellbyEstimate {
    /// Wellbeing-point years accrued over the horizon.
    pub wellbys: f64,
    pub quality: EstimateQuality,
    pub horizon_weeks: usize,
}

/// Parameters shared by every programme in an evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    /// Direct cost of one coaching session (USD).
    pub cost_per_session: f64,
    #[serde(default = "default_horizon_months")]
    pub horizon_months: f64,
}

fn default_horizon_months() -> f64 {
    HORIZON_MONTHS
}

impl ModelParameters {
    pub fn horizon_weeks(&self) -> f64 {
        months_to_weeks(self.horizon_months)
    }
}

/// Per-programme configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgrammeConfig {
    pub name: String,
    /// Clients who start the programme.
    pub participants: f64,
    /// Fraction of participants who complete every session, in `[0, 1]`.
    pub retention: f64,
    pub sessions_per_participant: f64,
    /// Wellbeing before the intervention (0-10 scale).
    pub baseline_wellbeing: f64,
    /// Wellbeing at peak effect (0-10 scale).
    pub peak_wellbeing: f64,
    /// Fraction of a case's total harm borne by the affected person, in `(0, 1]`.
    pub harm_proportion: f64,
    pub decay: DecayModel,
}

impl ProgrammeConfig {
    pub fn peak_weekly_gain(&self) -> f64 {
        self.peak_wellbeing - self.baseline_wellbeing
    }
}

/// A full evaluation run's configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    pub model: ModelParameters,
    pub programmes: Vec<ProgrammeConfig>,
}

/// WELLBYs per client who completes the programme.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RetainedClientWellbys {
    /// Benefit to the client.
    pub client: f64,
    /// Benefit to family, friends, colleagues and community.
    pub society: f64,
    pub total: f64,
}

/// Evaluated outcome for one programme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgrammeOutcome {
    pub name: String,
    pub decay: DecayKind,
    pub peak_weekly_gain: f64,
    /// Direct session cost (USD).
    pub total_cost: f64,
    /// WELLBYs after scaling by the harm proportion.
    pub net_wellbys: f64,
    /// `None` when no positive WELLBYs were generated.
    pub cost_per_wellby: Option<f64>,
    pub clients_seen: f64,
    pub clients_retained: f64,
    pub per_retained_client: RetainedClientWellbys,
    pub warnings: Vec<DegenerateInput>,
}

/// Totals across every evaluated programme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallSummary {
    pub total_cost: f64,
    pub net_wellbys: f64,
    pub clients_seen: f64,
    pub clients_retained: f64,
    pub wellbys_per_retained_client: Option<f64>,
    pub cost_per_wellby: Option<f64>,
}

/// Programme outcomes in configuration order plus their totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub horizon_weeks: usize,
    pub programmes: Vec<ProgrammeOutcome>,
    pub overall: OverallSummary,
}

/// Staffing and operating inputs for the marginal cost-per-session calculator.
///
/// Salaries are monthly (USD). One cohort is trained per month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionCostInputs {
    pub coaches_per_cohort: u32,
    pub clients_per_coach: u32,
    pub sessions_per_client: u32,
    pub counsellor_salary: f64,
    pub head_of_training_salary: f64,
    pub va_salary: f64,
    pub branch_manager_salary: f64,
    pub hiring_manager_salary: f64,
    pub hiring_manager_enabled: bool,
    pub other_costs: f64,
    /// A core-team member runs a final roleplay assessment with each coach.
    pub final_roleplay_assessment: bool,
}

impl Default for SessionCostInputs {
    fn default() -> Self {
        Self {
            coaches_per_cohort: 15,
            clients_per_coach: 15,
            sessions_per_client: 5,
            counsellor_salary: 500.0,
            head_of_training_salary: 500.0,
            va_salary: 350.0,
            branch_manager_salary: 500.0,
            hiring_manager_salary: 400.0,
            hiring_manager_enabled: true,
            other_costs: 300.0,
            final_roleplay_assessment: true,
        }
    }
}

/// Result of the marginal cost-per-session calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionCostBreakdown {
    pub final_assessment_cost: f64,
    pub hiring_manager_cost: f64,
    pub total_monthly_costs: f64,
    pub sessions_per_cohort: u64,
    pub cost_per_session: f64,
    pub monthly_client_capacity: u64,
    pub yearly_client_capacity: u64,
}
