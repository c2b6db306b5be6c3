//! Formatted terminal output.

use crate::domain::{
    Comparison, DecayCurve, DecayModel, ModelParameters, SessionCostBreakdown, SessionCostInputs,
};

/// Format the programme comparison: one row per programme, a total row, then notes.
pub fn format_comparison(comparison: &Comparison, params: &ModelParameters) -> String {
    let mut out = String::new();

    out.push_str("=== wellby - Programme Cost-Effectiveness ===\n");
    out.push_str(&format!(
        "Horizon: {:.1} months ({} weeks) | Cost per session: {:.2}\n\n",
        params.horizon_months, comparison.horizon_weeks, params.cost_per_session
    ));

    out.push_str(
        format!(
            "{:<24} {:<12} {:>9} {:>9} {:>12} {:>12} {:>12} {:>10}\n",
            "programme", "decay", "seen", "retained", "cost", "wellbys", "cost/wellby", "per client"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<24} {:-<12} {:-<9} {:-<9} {:-<12} {:-<12} {:-<12} {:-<10}\n",
            "", "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for p in &comparison.programmes {
        let per_client = (p.clients_retained > 0.0).then_some(p.per_retained_client.total);
        out.push_str(
            format!(
                "{:<24} {:<12} {:>9.1} {:>9.1} {:>12.2} {:>12.3} {:>12} {:>10}\n",
                truncate(&p.name, 24),
                p.decay.key(),
                p.clients_seen,
                p.clients_retained,
                p.total_cost,
                p.net_wellbys,
                fmt_optional(p.cost_per_wellby, 2),
                fmt_optional(per_client, 3),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    let o = &comparison.overall;
    out.push_str(
        format!(
            "{:<24} {:<12} {:>9.1} {:>9.1} {:>12.2} {:>12.3} {:>12} {:>10}\n",
            "Total",
            "",
            o.clients_seen,
            o.clients_retained,
            o.total_cost,
            o.net_wellbys,
            fmt_optional(o.cost_per_wellby, 2),
            fmt_optional(o.wellbys_per_retained_client, 3),
        )
        .trim_end(),
    );
    out.push('\n');

    let retained: Vec<_> = comparison
        .programmes
        .iter()
        .filter(|p| p.clients_retained > 0.0)
        .collect();
    if !retained.is_empty() {
        out.push_str("\nWELLBYs per retained client (client / society / total):\n");
        for p in retained {
            let r = &p.per_retained_client;
            out.push_str(&format!(
                "- {}: {:.3} / {:.3} / {:.3}\n",
                p.name, r.client, r.society, r.total
            ));
        }
    }

    let notes: Vec<String> = comparison
        .programmes
        .iter()
        .flat_map(|p| p.warnings.iter().map(move |w| format!("- {}: {w}\n", p.name)))
        .collect();
    if !notes.is_empty() {
        out.push_str("\nNotes:\n");
        for note in notes {
            out.push_str(&note);
        }
    }

    out
}

/// Format a decay curve: month samples, control points, notes and total WELLBYs.
pub fn format_curve(curve: &DecayCurve, model: &DecayModel, peak_gain: f64, wellbys: f64) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== {} ===\n", curve.kind.display_name()));
    out.push_str(&format!("Model: {}\n", model.describe()));
    out.push_str(&format!("Horizon: {} weeks\n\n", curve.horizon_weeks));

    out.push_str(&format!("{:>6} {:>8}\n", "month", "benefit"));
    out.push_str(&format!("{:->6} {:->8}\n", "", ""));
    for point in &curve.chart {
        let bar = "#".repeat((point.benefit.clamp(0.0, 1.0) * 40.0).round() as usize);
        out.push_str(format!("{:>6.0} {:>8.4} {bar}\n", point.month, point.benefit).trim_end());
        out.push('\n');
    }

    if !curve.control_points.is_empty() {
        let parts: Vec<String> = curve
            .control_points
            .iter()
            .map(|p| format!("m{:.0}={:.2}", p.month, p.benefit))
            .collect();
        out.push_str(&format!("\nControl points: {}\n", parts.join(", ")));
    }

    if !curve.warnings.is_empty() {
        out.push_str("\nNotes:\n");
        for w in &curve.warnings {
            out.push_str(&format!("- {w}\n"));
        }
    }

    out.push_str(&format!(
        "\nPeak weekly gain {peak_gain:.3} -> {wellbys:.6} WELLBYs per completer\n"
    ));

    out
}

/// Format the marginal cost-per-session breakdown.
pub fn format_session_cost(inputs: &SessionCostInputs, breakdown: &SessionCostBreakdown) -> String {
    let mut out = String::new();

    out.push_str("=== wellby - Marginal Cost per Session ===\n");
    out.push_str(&format!(
        "Cohort: {} coaches x {} clients x {} sessions\n\n",
        inputs.coaches_per_cohort, inputs.clients_per_coach, inputs.sessions_per_client
    ));

    let rows = [
        ("Counsellor", inputs.counsellor_salary),
        ("Head of training", inputs.head_of_training_salary),
        ("Virtual assistant", inputs.va_salary),
        ("Branch manager", inputs.branch_manager_salary),
        ("Hiring manager", breakdown.hiring_manager_cost),
        ("Other costs", inputs.other_costs),
        ("Final assessment", breakdown.final_assessment_cost),
    ];
    for (label, value) in rows {
        out.push_str(&format!("{label:<20} {value:>10.2}\n"));
    }
    out.push_str(&format!("{:-<20} {:->10}\n", "", ""));
    out.push_str(&format!("{:<20} {:>10.2}\n\n", "Monthly total", breakdown.total_monthly_costs));

    out.push_str(&format!("Sessions per cohort: {}\n", breakdown.sessions_per_cohort));
    out.push_str(&format!("Cost per session: {:.4}\n", breakdown.cost_per_session));
    out.push_str(&format!(
        "Client capacity: {} per month, {} per year\n",
        breakdown.monthly_client_capacity, breakdown.yearly_client_capacity
    ));

    out
}

fn fmt_optional(v: Option<f64>, decimals: usize) -> String {
    v.map(|x| format!("{x:.decimals$}")).unwrap_or_else(|| "n/a".to_string())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        CustomParams, DecayModel, EvaluationConfig, ExponentialParams, LinearParams,
        ProgrammeConfig,
    };
    use crate::models::evaluate_decay_curve;
    use crate::programme::{compare_programmes, session_cost};

    fn params() -> ModelParameters {
        ModelParameters {
            cost_per_session: 2.36,
            horizon_months: 12.0,
        }
    }

    fn programme(name: &str, retention: f64, decay: DecayModel) -> ProgrammeConfig {
        ProgrammeConfig {
            name: name.to_string(),
            participants: 100.0,
            retention,
            sessions_per_participant: 4.0,
            baseline_wellbeing: 5.0,
            peak_wellbeing: 6.0,
            harm_proportion: 0.5,
            decay,
        }
    }

    #[test]
    fn comparison_report_lists_rows_and_notes() {
        let config = EvaluationConfig {
            model: params(),
            programmes: vec![
                programme(
                    "Procrastination",
                    0.7,
                    DecayModel::Exponential(ExponentialParams { annual_decay_rate: 0.8 }),
                ),
                programme("Dropouts", 0.0, DecayModel::Linear(LinearParams { months_to_zero: -1.0 })),
            ],
        };
        let cmp = compare_programmes(&config).unwrap();
        let text = format_comparison(&cmp, &config.model);

        assert!(text.contains("(52 weeks)"));
        assert!(text.contains("Cost per session: 2.36"));
        assert!(text.lines().any(|l| l.starts_with("Procrastination") && l.contains("exponential")));
        let dropouts = text.lines().find(|l| l.starts_with("Dropouts")).unwrap();
        assert!(dropouts.ends_with("n/a        n/a"));
        assert!(text.lines().any(|l| l.starts_with("Total")));
        assert!(text.contains("Notes:\n- Dropouts: months to zero is -1"));
        assert!(!text.contains("- Dropouts: 0.000"));
    }

    #[test]
    fn curve_report_has_thirteen_month_rows() {
        let model = DecayModel::Custom(CustomParams::new(0.75, 0.5, 0.3, 0.15));
        let curve = evaluate_decay_curve(&model, 52.0).unwrap();
        let text = format_curve(&curve, &model, 1.0, 0.5368);

        let rows = text
            .lines()
            .filter(|l| l.trim_start().chars().next().is_some_and(|c| c.is_ascii_digit()))
            .count();
        assert_eq!(rows, 13);
        assert!(text.contains("Control points: m0=1.00, m3=0.75"));
        assert!(text.contains("0.536800 WELLBYs per completer"));
        assert!(!text.contains("Notes:"));
    }

    #[test]
    fn session_cost_report_shows_totals() {
        let inputs = SessionCostInputs::default();
        let breakdown = session_cost(&inputs).unwrap();
        let text = format_session_cost(&inputs, &breakdown);
        assert!(text.contains("Monthly total           2655.00"));
        assert!(text.contains("Sessions per cohort: 1125"));
        assert!(text.contains("Cost per session: 2.3600"));
        assert!(text.contains("225 per month, 2700 per year"));
    }

    #[test]
    fn truncate_marks_long_names() {
        assert_eq!(truncate("Insomnia", 24), "Insomnia");
        assert_eq!(truncate("abcdef", 4), "abc.");
    }
}
