use serde::Deserialize;

use super::super::domain::{Benefit, EmploymentStatus};
use super::criteria::{benefit_item, parse_section};
use super::{EligibilityStrategy, EvaluationContext, StrategyError, Verdict};

#[derive(Debug, Deserialize)]
struct ReskillingCriteria {
    #[serde(default = "default_age_threshold")]
    age_threshold: u32,
    #[serde(default = "unemployed")]
    employment_status: EmploymentStatus,
}

fn default_age_threshold() -> u32 {
    40
}

fn unemployed() -> EmploymentStatus {
    EmploymentStatus::Unemployed
}

const BENEFIT_KEYS: [&str; 2] = ["skillsfuture_credit_top_up", "study_allowance"];

/// Middle-aged jobseekers: credit top-up plus a monthly study allowance.
#[derive(Debug, Clone, Copy, Default)]
pub struct MiddleAgedReskillingEligibility;

impl EligibilityStrategy for MiddleAgedReskillingEligibility {
    fn is_eligible(&self, ctx: &EvaluationContext<'_>) -> Result<Verdict, StrategyError> {
        let criteria: ReskillingCriteria =
            parse_section(&ctx.scheme.eligibility_criteria, "eligibility_criteria")?;
        let applicant = ctx.applicant;
        let age = applicant.age_on(ctx.as_of);
        let mut reasons = Vec::new();

        if age < criteria.age_threshold {
            reasons.push(format!(
                "applicant age {age} is below the minimum of {}",
                criteria.age_threshold
            ));
        }
        if applicant.employment_status != criteria.employment_status {
            reasons.push(format!(
                "employment status '{}' does not match required '{}'",
                applicant.employment_status.label(),
                criteria.employment_status.label()
            ));
        }

        if reasons.is_empty() {
            Ok(Verdict::eligible(format!("eligible for {}", ctx.scheme.name)))
        } else {
            Ok(Verdict {
                eligible: false,
                reasons,
            })
        }
    }

    fn calculate_benefits(
        &self,
        ctx: &EvaluationContext<'_>,
    ) -> Result<Vec<Benefit>, StrategyError> {
        let applicant = ctx.applicant;
        BENEFIT_KEYS
            .iter()
            .map(|key| {
                let item = benefit_item(&ctx.scheme.benefits, key)?;
                Ok(item.award(key, &applicant.name, item.amount_for(applicant)))
            })
            .collect()
    }
}
