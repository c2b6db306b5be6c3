//! Marginal cost per coaching session for a single branch.
//!
//! One cohort of coaches is trained per month, so monthly running costs are
//! spread over the sessions one cohort delivers.

use crate::domain::{SessionCostBreakdown, SessionCostInputs};
use crate::error::EngineError;

/// Cost of the final roleplay assessment, per coach.
pub const FINAL_ASSESSMENT_COST_PER_COACH: f64 = 7.0;

const COHORTS_PER_YEAR: u64 = 12;

pub fn session_cost(inputs: &SessionCostInputs) -> Result<SessionCostBreakdown, EngineError> {
    for (name, value) in [
        ("counsellor_salary", inputs.counsellor_salary),
        ("head_of_training_salary", inputs.head_of_training_salary),
        ("va_salary", inputs.va_salary),
        ("branch_manager_salary", inputs.branch_manager_salary),
        ("hiring_manager_salary", inputs.hiring_manager_salary),
        ("other_costs", inputs.other_costs),
    ] {
        if !(value.is_finite() && value >= 0.0) {
            return Err(EngineError::invalid(name, format!("{value} must be >= 0")));
        }
    }

    let final_assessment_cost = if inputs.final_roleplay_assessment {
        FINAL_ASSESSMENT_COST_PER_COACH * f64::from(inputs.coaches_per_cohort)
    } else {
        0.0
    };
    let hiring_manager_cost = if inputs.hiring_manager_enabled {
        inputs.hiring_manager_salary
    } else {
        0.0
    };

    let total_monthly_costs = inputs.counsellor_salary
        + inputs.head_of_training_salary
        + inputs.va_salary
        + inputs.branch_manager_salary
        + hiring_manager_cost
        + inputs.other_costs
        + final_assessment_cost;

    let monthly_client_capacity =
        u64::from(inputs.coaches_per_cohort) * u64::from(inputs.clients_per_coach);
    let sessions_per_cohort = monthly_client_capacity * u64::from(inputs.sessions_per_client);

    let cost_per_session = if sessions_per_cohort > 0 {
        total_monthly_costs / sessions_per_cohort as f64
    } else {
        0.0
    };

    Ok(SessionCostBreakdown {
        final_assessment_cost,
        hiring_manager_cost,
        total_monthly_costs,
        sessions_per_cohort,
        cost_per_session,
        monthly_client_capacity,
        yearly_client_capacity: monthly_client_capacity * COHORTS_PER_YEAR,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_branch() {
        let b = session_cost(&SessionCostInputs::default()).unwrap();
        assert_eq!(b.final_assessment_cost, 105.0);
        assert_eq!(b.hiring_manager_cost, 400.0);
        assert_eq!(b.total_monthly_costs, 2655.0);
        assert_eq!(b.sessions_per_cohort, 1125);
        assert!((b.cost_per_session - 2.36).abs() < 1e-12);
        assert_eq!(b.monthly_client_capacity, 225);
        assert_eq!(b.yearly_client_capacity, 2700);
    }

    #[test]
    fn toggles_remove_their_costs() {
        let inputs = SessionCostInputs {
            hiring_manager_enabled: false,
            final_roleplay_assessment: false,
            ..SessionCostInputs::default()
        };
        let b = session_cost(&inputs).unwrap();
        assert_eq!(b.final_assessment_cost, 0.0);
        assert_eq!(b.hiring_manager_cost, 0.0);
        assert_eq!(b.total_monthly_costs, 2150.0);
    }

    #[test]
    fn no_sessions_means_zero_cost_per_session() {
        let inputs = SessionCostInputs {
            sessions_per_client: 0,
            ..SessionCostInputs::default()
        };
        let b = session_cost(&inputs).unwrap();
        assert_eq!(b.sessions_per_cohort, 0);
        assert_eq!(b.cost_per_session, 0.0);
    }

    #[test]
    fn negative_salary_rejected() {
        let inputs = SessionCostInputs {
            va_salary: -1.0,
            ..SessionCostInputs::default()
        };
        assert!(session_cost(&inputs).is_err());
    }
}
