use serde::Deserialize;

use super::super::domain::{Benefit, DisbursementFrequency, EmploymentStatus, Relation};
use super::criteria::{parse_section, within_last_months, BenefitItem};
use super::{EligibilityStrategy, EvaluationContext, StrategyError, Verdict};

#[derive(Debug, Deserialize)]
struct RetrenchmentCriteria {
    #[serde(default = "unemployed")]
    employment_status: EmploymentStatus,
    #[serde(default = "default_period", alias = "retrechment_period_months")]
    retrenchment_period_months: u32,
}

fn unemployed() -> EmploymentStatus {
    EmploymentStatus::Unemployed
}

fn default_period() -> u32 {
    6
}

#[derive(Debug, Deserialize)]
struct RetrenchmentBenefits {
    cash_assistance: BenefitItem,
    #[serde(default)]
    school_meal_vouchers: Option<PerMemberVoucher<AgeRange>>,
    #[serde(default)]
    extra_cdc_vouchers: Option<PerMemberVoucher<AgeThreshold>>,
}

/// Voucher paid once per household member matching `eligibility`.
#[derive(Debug, Deserialize)]
struct PerMemberVoucher<E> {
    description: String,
    #[serde(alias = "amount_per_child", alias = "amount_per_parent")]
    amount_per_member: u32,
    #[serde(alias = "disbursment_frequency")]
    disbursement_frequency: DisbursementFrequency,
    #[serde(default, alias = "disbursment_duration_months")]
    disbursement_duration_months: Option<u32>,
    eligibility: E,
}

#[derive(Debug, Deserialize)]
struct AgeRange {
    #[serde(default = "child")]
    relation: Relation,
    age_range: Bounds,
}

#[derive(Debug, Deserialize)]
struct Bounds {
    min: u32,
    max: u32,
}

#[derive(Debug, Deserialize)]
struct AgeThreshold {
    #[serde(default = "parent")]
    relation: Relation,
    age_threshold: u32,
}

fn child() -> Relation {
    Relation::Child
}

fn parent() -> Relation {
    Relation::Parent
}

impl<E> PerMemberVoucher<E> {
    fn award(&self, name: &str, beneficiary: &str) -> Benefit {
        Benefit {
            name: name.to_string(),
            description: self.description.clone(),
            beneficiary: beneficiary.to_string(),
            amount: self.amount_per_member,
            frequency: self.disbursement_frequency,
            duration_months: self.disbursement_duration_months,
        }
    }
}

/// Recently retrenched applicants, with vouchers for school-age children and elderly parents.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetrenchmentAssistanceEligibility;

impl EligibilityStrategy for RetrenchmentAssistanceEligibility {
    fn is_eligible(&self, ctx: &EvaluationContext<'_>) -> Result<Verdict, StrategyError> {
        let criteria: RetrenchmentCriteria =
            parse_section(&ctx.scheme.eligibility_criteria, "eligibility_criteria")?;
        let applicant = ctx.applicant;

        if applicant.employment_status != criteria.employment_status {
            return Ok(Verdict::ineligible(format!(
                "employment status '{}' does not match required '{}'",
                applicant.employment_status.label(),
                criteria.employment_status.label()
            )));
        }

        let Some(changed_on) = applicant.employment_status_change_date else {
            return Ok(Verdict::ineligible("no employment status change date on record"));
        };

        if changed_on > ctx.as_of {
            return Ok(Verdict::ineligible(format!(
                "employment status change date {changed_on} is after the evaluation date {}",
                ctx.as_of
            )));
        }

        if !within_last_months(changed_on, criteria.retrenchment_period_months, ctx.as_of) {
            return Ok(Verdict::ineligible(format!(
                "employment status changed on {changed_on}, outside the {}-month retrenchment window",
                criteria.retrenchment_period_months
            )));
        }

        Ok(Verdict::eligible(format!("eligible for {}", ctx.scheme.name)))
    }

    fn calculate_benefits(
        &self,
        ctx: &EvaluationContext<'_>,
    ) -> Result<Vec<Benefit>, StrategyError> {
        let table: RetrenchmentBenefits = parse_section(&ctx.scheme.benefits, "benefits")?;
        let applicant = ctx.applicant;

        let mut benefits = vec![table.cash_assistance.award(
            "cash_assistance",
            &applicant.name,
            table.cash_assistance.amount_for(applicant),
        )];

        if let Some(vouchers) = &table.school_meal_vouchers {
            let range = &vouchers.eligibility.age_range;
            benefits.extend(
                applicant
                    .members_with(vouchers.eligibility.relation)
                    .filter(|member| {
                        let age = member.age_on(ctx.as_of);
                        range.min <= age && age <= range.max
                    })
                    .map(|member| vouchers.award("school_meal_vouchers", &member.name)),
            );
        }

        if let Some(vouchers) = &table.extra_cdc_vouchers {
            let threshold = vouchers.eligibility.age_threshold;
            benefits.extend(
                applicant
                    .members_with(vouchers.eligibility.relation)
                    .filter(|member| member.age_on(ctx.as_of) > threshold)
                    .map(|member| vouchers.award("extra_cdc_vouchers", &member.name)),
            );
        }

        Ok(benefits)
    }
}
