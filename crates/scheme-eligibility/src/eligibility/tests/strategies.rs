use super::common::*;
use serde_json::json;

use crate::eligibility::domain::{DisbursementFrequency, MaritalStatus, Relation};
use crate::eligibility::strategy::{
    EligibilityStrategy, EvaluationContext, FallbackEligibility, FallbackPolicy,
    MiddleAgedReskillingEligibility, RetrenchmentAssistanceEligibility,
    SeniorCitizenAssistanceEligibility, SingleWorkingMothersSupportEligibility, StrategyError,
};

#[test]
fn single_mother_with_young_child_is_eligible_for_tiered_cash() {
    let applicant = single_mother();
    let scheme = single_mothers_scheme();
    let ctx = EvaluationContext::new(&applicant, &scheme, as_of());
    let strategy = SingleWorkingMothersSupportEligibility;

    let verdict = strategy.is_eligible(&ctx).expect("evaluates");
    assert!(verdict.eligible, "reasons: {:?}", verdict.reasons);

    let benefits = strategy.calculate_benefits(&ctx).expect("benefits");
    assert_eq!(benefits.len(), 2);
    assert_eq!(benefits[0].name, "cash_assistance");
    assert_eq!(benefits[0].amount, 800);
    assert_eq!(benefits[0].frequency, DisbursementFrequency::OneOff);
    assert_eq!(benefits[1].name, "income_tax_rebates");
    assert_eq!(benefits[1].description, "Income tax rebate (Nur Rahman)");
    assert_eq!(benefits[1].beneficiary, "Aisha Rahman");
    assert_eq!(benefits[1].duration_months, Some(60));
}

#[test]
fn single_mother_collects_every_failing_condition() {
    let mut applicant = single_mother();
    applicant.marital_status = MaritalStatus::Married;
    applicant.monthly_income = 2500;
    applicant.household_members.clear();
    let scheme = single_mothers_scheme();

    let verdict = SingleWorkingMothersSupportEligibility
        .is_eligible(&EvaluationContext::new(&applicant, &scheme, as_of()))
        .expect("evaluates");

    assert!(!verdict.eligible);
    assert_eq!(verdict.reasons.len(), 3);
    assert!(verdict.reasons[0].contains("marital status 'married'"));
    assert!(verdict.reasons[1].contains("household income 2500"));
    assert!(verdict.reasons[2].contains("no child aged 15 or younger"));
}

#[test]
fn income_ceiling_is_exclusive() {
    let mut applicant = single_mother();
    applicant.monthly_income = 2000;
    let scheme = single_mothers_scheme();

    let verdict = SingleWorkingMothersSupportEligibility
        .is_eligible(&EvaluationContext::new(&applicant, &scheme, as_of()))
        .expect("evaluates");

    assert!(!verdict.eligible);
}

#[test]
fn employed_applicant_fails_retrenchment_on_employment_status() {
    let applicant = employed();
    let scheme = retrenchment_scheme();

    let verdict = RetrenchmentAssistanceEligibility
        .is_eligible(&EvaluationContext::new(&applicant, &scheme, as_of()))
        .expect("evaluates");

    assert!(!verdict.eligible);
    assert_eq!(
        verdict.reasons,
        vec!["employment status 'employed' does not match required 'unemployed'".to_string()]
    );
}

#[test]
fn retrenchment_requires_a_recent_status_change() {
    let scheme = retrenchment_scheme();

    let mut stale = retrenched();
    stale.employment_status_change_date = Some(date(2024, 11, 30));
    let verdict = RetrenchmentAssistanceEligibility
        .is_eligible(&EvaluationContext::new(&stale, &scheme, as_of()))
        .expect("evaluates");
    assert!(!verdict.eligible);
    assert!(verdict.reasons[0].contains("6-month retrenchment window"));

    let mut undated = retrenched();
    undated.employment_status_change_date = None;
    let verdict = RetrenchmentAssistanceEligibility
        .is_eligible(&EvaluationContext::new(&undated, &scheme, as_of()))
        .expect("evaluates");
    assert_eq!(
        verdict.reasons,
        vec!["no employment status change date on record".to_string()]
    );

    let mut future = retrenched();
    future.employment_status_change_date = Some(date(2026, 8, 15));
    let verdict = RetrenchmentAssistanceEligibility
        .is_eligible(&EvaluationContext::new(&future, &scheme, as_of()))
        .expect("evaluates");
    assert!(!verdict.eligible);
    assert_eq!(
        verdict.reasons,
        vec![
            "employment status change date 2026-08-15 is after the evaluation date 2025-06-01"
                .to_string()
        ]
    );
}

#[test]
fn retrenchment_vouchers_follow_household_ages() {
    let applicant = retrenched();
    let scheme = retrenchment_scheme();
    let ctx = EvaluationContext::new(&applicant, &scheme, as_of());

    assert!(RetrenchmentAssistanceEligibility
        .is_eligible(&ctx)
        .expect("evaluates")
        .eligible);
    let benefits = RetrenchmentAssistanceEligibility
        .calculate_benefits(&ctx)
        .expect("benefits");

    let summary: Vec<(&str, &str, u32)> = benefits
        .iter()
        .map(|benefit| {
            (
                benefit.name.as_str(),
                benefit.beneficiary.as_str(),
                benefit.amount,
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            ("cash_assistance", "Daniel Koh", 1000),
            ("school_meal_vouchers", "Ethan Koh", 100),
            ("extra_cdc_vouchers", "Koh Ah Seng", 200),
        ]
    );
    assert_eq!(benefits[1].frequency, DisbursementFrequency::Monthly);
    assert_eq!(benefits[1].duration_months, Some(12));
}

#[test]
fn senior_threshold_is_reached_on_the_birthday() {
    let scheme = senior_scheme();
    let applicant = senior();

    let day_before = SeniorCitizenAssistanceEligibility
        .is_eligible(&EvaluationContext::new(&applicant, &scheme, date(2020, 2, 29)))
        .expect("evaluates");
    assert!(!day_before.eligible);
    assert_eq!(
        day_before.reasons,
        vec!["applicant age 64 is below the minimum of 65".to_string()]
    );

    let birthday = SeniorCitizenAssistanceEligibility
        .is_eligible(&EvaluationContext::new(&applicant, &scheme, date(2020, 3, 1)))
        .expect("evaluates");
    assert!(birthday.eligible);
}

#[test]
fn senior_pays_every_benefit_item() {
    let applicant = senior();
    let scheme = senior_scheme();
    let benefits = SeniorCitizenAssistanceEligibility
        .calculate_benefits(&EvaluationContext::new(&applicant, &scheme, as_of()))
        .expect("benefits");

    let names: Vec<&str> = benefits.iter().map(|benefit| benefit.name.as_str()).collect();
    assert_eq!(names, vec!["cdc_voucher", "cpf_top_up"]);
    assert!(benefits.iter().all(|benefit| benefit.amount == 200));
}

#[test]
fn missing_threshold_is_a_configuration_error() {
    let applicant = senior();
    let mut scheme = senior_scheme();
    scheme.eligibility_criteria = json!({ "minimum_age": 65 });

    let err = SeniorCitizenAssistanceEligibility
        .is_eligible(&EvaluationContext::new(&applicant, &scheme, as_of()))
        .expect_err("threshold is required");

    assert!(matches!(err, StrategyError::InvalidConfiguration(ref msg) if msg.contains("age_threshold")));
}

#[test]
fn reskilling_checks_age_and_employment_together() {
    let scheme = reskilling_scheme();

    let mut young = retrenched();
    young.date_of_birth = date(1990, 1, 1);
    young.employment_status = crate::eligibility::domain::EmploymentStatus::Employed;
    let verdict = MiddleAgedReskillingEligibility
        .is_eligible(&EvaluationContext::new(&young, &scheme, as_of()))
        .expect("evaluates");
    assert!(!verdict.eligible);
    assert_eq!(verdict.reasons.len(), 2);

    let applicant = retrenched();
    let ctx = EvaluationContext::new(&applicant, &scheme, as_of());
    assert!(MiddleAgedReskillingEligibility
        .is_eligible(&ctx)
        .expect("evaluates")
        .eligible);
    let benefits = MiddleAgedReskillingEligibility
        .calculate_benefits(&ctx)
        .expect("benefits");
    let amounts: Vec<(&str, u32)> = benefits
        .iter()
        .map(|benefit| (benefit.name.as_str(), benefit.amount))
        .collect();
    assert_eq!(
        amounts,
        vec![("skillsfuture_credit_top_up", 1000), ("study_allowance", 2000)]
    );
}

#[test]
fn reskilling_without_study_allowance_is_misconfigured() {
    let applicant = retrenched();
    let mut scheme = reskilling_scheme();
    scheme.benefits = json!({
        "skillsfuture_credit_top_up": {
            "disbursment_amount": 1000,
            "disbursment_frequency": "One-Off",
            "description": "One-time credit top-up."
        }
    });

    let err = MiddleAgedReskillingEligibility
        .calculate_benefits(&EvaluationContext::new(&applicant, &scheme, as_of()))
        .expect_err("allowance entry missing");

    assert!(matches!(err, StrategyError::InvalidConfiguration(ref msg) if msg.contains("study_allowance")));
}

#[test]
fn fallback_outcome_follows_policy() {
    let applicant = employed();
    let scheme = scheme(
        crate::eligibility::domain::SchemeId(9),
        "Housing Grant",
        "housing_grant",
        json!({}),
        json!({}),
    );
    let ctx = EvaluationContext::new(&applicant, &scheme, as_of());

    let strict = FallbackEligibility::new(FallbackPolicy::Ineligible);
    let verdict = strict.is_eligible(&ctx).expect("infallible");
    assert!(!verdict.eligible);
    assert_eq!(
        verdict.reasons,
        vec!["no eligibility strategy registered for scheme type 'housing_grant'".to_string()]
    );
    assert!(strict.is_fallback());

    let lenient = FallbackEligibility::new(FallbackPolicy::EligibleWithoutBenefits);
    assert!(lenient.is_eligible(&ctx).expect("infallible").eligible);
    assert!(lenient.calculate_benefits(&ctx).expect("infallible").is_empty());
}

#[test]
fn dependants_are_matched_by_relation() {
    let mut applicant = single_mother();
    applicant.household_members[0].relation = Relation::Sibling;
    let scheme = single_mothers_scheme();

    let verdict = SingleWorkingMothersSupportEligibility
        .is_eligible(&EvaluationContext::new(&applicant, &scheme, as_of()))
        .expect("evaluates");

    assert!(!verdict.eligible);
}
