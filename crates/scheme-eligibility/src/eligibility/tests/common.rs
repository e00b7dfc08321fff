use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::eligibility::domain::{
    Applicant, ApplicantId, Application, ApplicationId, Benefit, EmploymentStatus,
    HouseholdMember, MaritalStatus, NewApplication, Relation, Scheme, SchemeId, Sex,
};
use crate::eligibility::repository::{ApplicationRepository, RepositoryError, SchemeRepository};
use crate::eligibility::strategy::{EligibilityStrategy, EvaluationContext, StrategyError, Verdict};
use crate::eligibility::{
    ApplicationDecisionService, FixedClock, InMemoryStore, StrategyFactory, StrategyRegistry,
};

pub(super) const RETRENCHMENT_ID: SchemeId = SchemeId(1);
pub(super) const RESKILLING_ID: SchemeId = SchemeId(2);
pub(super) const SENIOR_ID: SchemeId = SchemeId(3);
pub(super) const SINGLE_MOTHERS_ID: SchemeId = SchemeId(4);

pub(super) const SINGLE_MOTHER: ApplicantId = ApplicantId(10);
pub(super) const RETRENCHED: ApplicantId = ApplicantId(20);
pub(super) const SENIOR: ApplicantId = ApplicantId(30);
pub(super) const EMPLOYED: ApplicantId = ApplicantId(40);

pub(super) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub(super) fn as_of() -> NaiveDate {
    date(2025, 6, 1)
}

pub(super) fn member(id: u64, name: &str, relation: Relation, born: NaiveDate) -> HouseholdMember {
    HouseholdMember {
        id,
        name: name.to_string(),
        relation,
        date_of_birth: born,
        employment_status: None,
        sex: None,
        monthly_income: 0,
    }
}

/// Aged 29, single, employed, income 1200, one child aged 5.
pub(super) fn single_mother() -> Applicant {
    Applicant {
        id: SINGLE_MOTHER,
        name: "Aisha Rahman".to_string(),
        sex: Sex::Female,
        date_of_birth: date(1996, 1, 15),
        marital_status: MaritalStatus::Single,
        employment_status: EmploymentStatus::Employed,
        employment_status_change_date: None,
        monthly_income: 1200,
        household_members: vec![member(11, "Nur Rahman", Relation::Child, date(2020, 1, 10))],
    }
}

/// Unemployed since 2025-04-01 with two children and two parents at home.
pub(super) fn retrenched() -> Applicant {
    Applicant {
        id: RETRENCHED,
        name: "Daniel Koh".to_string(),
        sex: Sex::Male,
        date_of_birth: date(1980, 8, 20),
        marital_status: MaritalStatus::Married,
        employment_status: EmploymentStatus::Unemployed,
        employment_status_change_date: Some(date(2025, 4, 1)),
        monthly_income: 0,
        household_members: vec![
            member(21, "Ethan Koh", Relation::Child, date(2017, 3, 1)),
            member(22, "Chloe Koh", Relation::Child, date(2011, 1, 1)),
            member(23, "Koh Ah Seng", Relation::Parent, date(1955, 1, 1)),
            member(24, "Lee Mei Ling", Relation::Parent, date(1965, 1, 1)),
        ],
    }
}

pub(super) fn senior() -> Applicant {
    Applicant {
        id: SENIOR,
        name: "Tan Bee Hoon".to_string(),
        sex: Sex::Female,
        date_of_birth: date(1955, 3, 1),
        marital_status: MaritalStatus::Widowed,
        employment_status: EmploymentStatus::Unemployed,
        employment_status_change_date: None,
        monthly_income: 0,
        household_members: Vec::new(),
    }
}

pub(super) fn employed() -> Applicant {
    Applicant {
        id: EMPLOYED,
        name: "Marcus Ng".to_string(),
        sex: Sex::Male,
        date_of_birth: date(1990, 5, 5),
        marital_status: MaritalStatus::Married,
        employment_status: EmploymentStatus::Employed,
        employment_status_change_date: None,
        monthly_income: 4200,
        household_members: Vec::new(),
    }
}

pub(super) fn scheme(
    id: SchemeId,
    name: &str,
    scheme_type: &str,
    eligibility_criteria: Value,
    benefits: Value,
) -> Scheme {
    Scheme {
        id,
        name: name.to_string(),
        description: format!("{name} description"),
        scheme_type: scheme_type.to_string(),
        validity_start_date: date(2024, 1, 1),
        validity_end_date: None,
        eligibility_criteria,
        benefits,
    }
}

pub(super) fn retrenchment_scheme() -> Scheme {
    scheme(
        RETRENCHMENT_ID,
        "Retrenchment Assistance Scheme",
        "retrenchment_assistance",
        json!({
            "employment_status": "unemployed",
            "retrechment_period_months": 6
        }),
        json!({
            "cash_assistance": {
                "disbursment_amount": 1000,
                "disbursment_frequency": "One-Off",
                "disbursment_duration_months": null,
                "description": "Cash assistance provided to all eligible applicants."
            },
            "school_meal_vouchers": {
                "amount_per_child": 100,
                "disbursment_frequency": "Monthly",
                "disbursment_duration_months": 12,
                "description": "Meal vouchers for primary school children.",
                "eligibility": { "relation": "child", "age_range": { "min": 6, "max": 11 } }
            },
            "extra_cdc_vouchers": {
                "amount_per_parent": 200,
                "disbursment_frequency": "One-Off",
                "description": "Extra CDC vouchers for elderly parents.",
                "eligibility": { "relation": "parent", "age_threshold": 65 }
            }
        }),
    )
}

pub(super) fn reskilling_scheme() -> Scheme {
    scheme(
        RESKILLING_ID,
        "Middle-aged Reskilling Assistance Scheme",
        "middleaged_reskilling_assistance",
        json!({ "age_threshold": 40, "employment_status": "unemployed" }),
        json!({
            "skillsfuture_credit_top_up": {
                "disbursment_amount": 1000,
                "disbursment_frequency": "One-Off",
                "description": "One-time credit top-up."
            },
            "study_allowance": {
                "disbursment_amount": 2000,
                "disbursment_frequency": "Monthly",
                "disbursment_duration_months": 6,
                "description": "Monthly study allowance."
            }
        }),
    )
}

pub(super) fn senior_scheme() -> Scheme {
    scheme(
        SENIOR_ID,
        "Senior Citizen Assistance Scheme",
        "senior_citizen_assistance",
        json!({ "age_threshold": 65 }),
        json!({
            "cdc_voucher": {
                "disbursment_amount": 200,
                "disbursment_frequency": "One-Off",
                "description": "One-time CDC voucher."
            },
            "cpf_top_up": {
                "disbursment_amount": 200,
                "disbursment_frequency": "One-Off",
                "description": "One-time CPF top-up."
            }
        }),
    )
}

/// Single parents with a child under 16 and household income below 2000, tiered cash.
pub(super) fn single_mothers_scheme() -> Scheme {
    scheme(
        SINGLE_MOTHERS_ID,
        "Single Working Mothers Support Scheme",
        "single_working_mothers_support",
        json!({
            "sex": "F",
            "marital_status": ["single", "divorced", "widowed"],
            "employment_status": "employed",
            "max_household_income": 2000,
            "household_composition": {
                "relation": "child",
                "age_range": { "age_threshold": 15 }
            }
        }),
        json!({
            "cash_assistance": {
                "disbursement_amount": 500,
                "disbursement_frequency": "one_off",
                "description": "Cash assistance.",
                "income_tiers": [
                    { "max_household_income": 1000, "amount": 1200 },
                    { "max_household_income": 2000, "amount": 800 }
                ]
            },
            "income_tax_rebates": {
                "disbursment_amount": 1000,
                "disbursment_frequency": "annually",
                "disbursment_duration_months": 60,
                "description": "Income tax rebate"
            }
        }),
    )
}

pub(super) fn standard_schemes() -> Vec<Scheme> {
    vec![
        retrenchment_scheme(),
        reskilling_scheme(),
        senior_scheme(),
        single_mothers_scheme(),
    ]
}

pub(super) fn seeded_store() -> Arc<InMemoryStore> {
    Arc::new(InMemoryStore::with_records(
        vec![single_mother(), retrenched(), senior(), employed()],
        standard_schemes(),
    ))
}

pub(super) type MemoryService = ApplicationDecisionService<InMemoryStore, InMemoryStore, InMemoryStore>;

pub(super) fn build_service(store: &Arc<InMemoryStore>) -> MemoryService {
    build_service_with(store, StrategyFactory::standard())
}

pub(super) fn build_service_with(
    store: &Arc<InMemoryStore>,
    factory: Arc<StrategyFactory>,
) -> MemoryService {
    ApplicationDecisionService::new(store.clone(), store.clone(), store.clone(), factory)
        .with_clock(FixedClock::on(as_of()))
}

/// Strategy that always reports an evaluation failure.
pub(super) struct BrokenStrategy;

impl EligibilityStrategy for BrokenStrategy {
    fn is_eligible(&self, _ctx: &EvaluationContext<'_>) -> Result<Verdict, StrategyError> {
        Err(StrategyError::Evaluation("household lookup failed".to_string()))
    }

    fn calculate_benefits(
        &self,
        _ctx: &EvaluationContext<'_>,
    ) -> Result<Vec<Benefit>, StrategyError> {
        Ok(Vec::new())
    }
}

/// Strategy that panics mid-evaluation.
pub(super) struct PanickingStrategy;

impl EligibilityStrategy for PanickingStrategy {
    fn is_eligible(&self, _ctx: &EvaluationContext<'_>) -> Result<Verdict, StrategyError> {
        panic!("index out of range in benefit table")
    }

    fn calculate_benefits(
        &self,
        _ctx: &EvaluationContext<'_>,
    ) -> Result<Vec<Benefit>, StrategyError> {
        Ok(Vec::new())
    }
}

pub(super) fn factory_with_faulty_types() -> Arc<StrategyFactory> {
    Arc::new(
        StrategyRegistry::with_builtin()
            .register("broken", BrokenStrategy)
            .register("panicking", PanickingStrategy)
            .build(),
    )
}

/// Scheme source that ignores the date filter and returns records in reverse id order.
pub(super) struct UnsortedSchemes(pub Vec<Scheme>);

impl SchemeRepository for UnsortedSchemes {
    fn list_active(&self, _as_of: NaiveDate) -> Result<Vec<Scheme>, RepositoryError> {
        let mut schemes = self.0.clone();
        schemes.sort_by_key(|scheme| std::cmp::Reverse(scheme.id));
        Ok(schemes)
    }

    fn get(&self, id: SchemeId) -> Result<Option<Scheme>, RepositoryError> {
        Ok(self.0.iter().find(|scheme| scheme.id == id).cloned())
    }
}

/// Application store whose `find` never sees existing records, forcing the backstop.
pub(super) struct StaleReadStore {
    pub inner: Arc<InMemoryStore>,
}

impl ApplicationRepository for StaleReadStore {
    fn find(
        &self,
        _applicant_id: ApplicantId,
        _scheme_id: SchemeId,
    ) -> Result<Vec<Application>, RepositoryError> {
        Ok(Vec::new())
    }

    fn create(&self, application: NewApplication) -> Result<Application, RepositoryError> {
        ApplicationRepository::create(self.inner.as_ref(), application)
    }

    fn get(&self, id: ApplicationId) -> Result<Option<Application>, RepositoryError> {
        ApplicationRepository::get(self.inner.as_ref(), id)
    }
}

pub(super) struct UnavailableApplications;

impl ApplicationRepository for UnavailableApplications {
    fn find(
        &self,
        _applicant_id: ApplicantId,
        _scheme_id: SchemeId,
    ) -> Result<Vec<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn create(&self, _application: NewApplication) -> Result<Application, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn get(&self, _id: ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(response.status(), expected);
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
