use serde::Deserialize;

use super::super::domain::Benefit;
use super::criteria::{benefit_items, parse_section};
use super::{EligibilityStrategy, EvaluationContext, StrategyError, Verdict};

#[derive(Debug, Deserialize)]
struct SeniorCriteria {
    age_threshold: u32,
}

/// Age-gated assistance paying every item of the scheme's benefit table.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeniorCitizenAssistanceEligibility;

impl EligibilityStrategy for SeniorCitizenAssistanceEligibility {
    fn is_eligible(&self, ctx: &EvaluationContext<'_>) -> Result<Verdict, StrategyError> {
        let criteria: SeniorCriteria =
            parse_section(&ctx.scheme.eligibility_criteria, "eligibility_criteria")?;
        let age = ctx.applicant.age_on(ctx.as_of);

        if age >= criteria.age_threshold {
            Ok(Verdict::eligible(format!("eligible for {}", ctx.scheme.name)))
        } else {
            Ok(Verdict::ineligible(format!(
                "applicant age {age} is below the minimum of {}",
                criteria.age_threshold
            )))
        }
    }

    fn calculate_benefits(
        &self,
        ctx: &EvaluationContext<'_>,
    ) -> Result<Vec<Benefit>, StrategyError> {
        let applicant = ctx.applicant;
        Ok(benefit_items(&ctx.scheme.benefits)?
            .into_iter()
            .map(|(name, item)| item.award(&name, &applicant.name, item.amount_for(applicant)))
            .collect())
    }
}
