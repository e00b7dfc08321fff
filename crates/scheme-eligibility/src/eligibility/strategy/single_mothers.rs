use chrono::NaiveDate;
use serde::Deserialize;

use super::super::domain::{
    Applicant, Benefit, EmploymentStatus, HouseholdMember, MaritalStatus, Relation, Sex,
};
use super::criteria::{benefit_item, parse_section};
use super::{EligibilityStrategy, EvaluationContext, StrategyError, Verdict};

#[derive(Debug, Deserialize)]
struct SingleParentCriteria {
    #[serde(default)]
    sex: Option<Sex>,
    marital_status: Vec<MaritalStatus>,
    #[serde(default)]
    employment_status: Option<EmploymentStatus>,
    /// Exclusive ceiling on monthly household income.
    #[serde(default)]
    max_household_income: Option<u64>,
    household_composition: DependentRule,
}

#[derive(Debug, Deserialize)]
struct DependentRule {
    #[serde(default = "child")]
    relation: Relation,
    age_range: DependentAge,
}

#[derive(Debug, Deserialize)]
struct DependentAge {
    /// Inclusive maximum age of a qualifying dependant.
    age_threshold: u32,
}

fn child() -> Relation {
    Relation::Child
}

impl SingleParentCriteria {
    fn dependants<'a>(
        &self,
        applicant: &'a Applicant,
        as_of: NaiveDate,
    ) -> impl Iterator<Item = &'a HouseholdMember> + 'a {
        let threshold = self.household_composition.age_range.age_threshold;
        applicant
            .members_with(self.household_composition.relation)
            .filter(move |member| member.age_on(as_of) <= threshold)
    }
}

/// Single working parents with young dependants, optionally capped by household income.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleWorkingMothersSupportEligibility;

impl EligibilityStrategy for SingleWorkingMothersSupportEligibility {
    fn is_eligible(&self, ctx: &EvaluationContext<'_>) -> Result<Verdict, StrategyError> {
        let criteria: SingleParentCriteria =
            parse_section(&ctx.scheme.eligibility_criteria, "eligibility_criteria")?;
        let applicant = ctx.applicant;
        let mut reasons = Vec::new();

        if let Some(sex) = criteria.sex {
            if applicant.sex != sex {
                reasons.push("applicant sex does not match the scheme requirement".to_string());
            }
        }

        if !criteria.marital_status.contains(&applicant.marital_status) {
            let accepted: Vec<&str> = criteria
                .marital_status
                .iter()
                .map(|status| status.label())
                .collect();
            reasons.push(format!(
                "marital status '{}' is not one of [{}]",
                applicant.marital_status.label(),
                accepted.join(", ")
            ));
        }

        if let Some(required) = criteria.employment_status {
            if applicant.employment_status != required {
                reasons.push(format!(
                    "employment status '{}' does not match required '{}'",
                    applicant.employment_status.label(),
                    required.label()
                ));
            }
        }

        if let Some(ceiling) = criteria.max_household_income {
            let income = applicant.household_income();
            if income >= ceiling {
                reasons.push(format!(
                    "household income {income} is not below the ceiling of {ceiling}"
                ));
            }
        }

        if criteria.dependants(applicant, ctx.as_of).next().is_none() {
            reasons.push(format!(
                "no child aged {} or younger in the household",
                criteria.household_composition.age_range.age_threshold
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
        let criteria: SingleParentCriteria =
            parse_section(&ctx.scheme.eligibility_criteria, "eligibility_criteria")?;
        let applicant = ctx.applicant;

        let cash = benefit_item(&ctx.scheme.benefits, "cash_assistance")?;
        let mut benefits = vec![cash.award(
            "cash_assistance",
            &applicant.name,
            cash.amount_for(applicant),
        )];

        if ctx.scheme.benefits.get("income_tax_rebates").is_some() {
            let rebate = benefit_item(&ctx.scheme.benefits, "income_tax_rebates")?;
            for dependant in criteria.dependants(applicant, ctx.as_of) {
                let mut award = rebate.award(
                    "income_tax_rebates",
                    &applicant.name,
                    rebate.disbursement_amount,
                );
                award.description = format!("{} ({})", rebate.description, dependant.name);
                benefits.push(award);
            }
        }

        Ok(benefits)
    }
}
