use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier wrapper for applicants.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ApplicantId(pub u64);

/// Identifier wrapper for schemes. Ordering defines the canonical report order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SchemeId(pub u64);

/// Identifier wrapper for persisted applications.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ApplicationId(pub u64);

impl fmt::Display for ApplicantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for SchemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
    Single,
    Married,
    Divorced,
    Widowed,
}

impl MaritalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            MaritalStatus::Single => "single",
            MaritalStatus::Married => "married",
            MaritalStatus::Divorced => "divorced",
            MaritalStatus::Widowed => "widowed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    Employed,
    Unemployed,
}

impl EmploymentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            EmploymentStatus::Employed => "employed",
            EmploymentStatus::Unemployed => "unemployed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Parent,
    Child,
    Spouse,
    Sibling,
    Other,
}

/// Co-resident whose attributes feed household predicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseholdMember {
    pub id: u64,
    pub name: String,
    pub relation: Relation,
    pub date_of_birth: NaiveDate,
    #[serde(default)]
    pub employment_status: Option<EmploymentStatus>,
    #[serde(default)]
    pub sex: Option<Sex>,
    #[serde(default)]
    pub monthly_income: u32,
}

impl HouseholdMember {
    pub fn age_on(&self, as_of: NaiveDate) -> u32 {
        age_on(self.date_of_birth, as_of)
    }
}

/// Applicant snapshot as returned by the applicant repository, household included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    pub id: ApplicantId,
    pub name: String,
    pub sex: Sex,
    pub date_of_birth: NaiveDate,
    pub marital_status: MaritalStatus,
    pub employment_status: EmploymentStatus,
    #[serde(default)]
    pub employment_status_change_date: Option<NaiveDate>,
    #[serde(default)]
    pub monthly_income: u32,
    #[serde(default)]
    pub household_members: Vec<HouseholdMember>,
}

impl Applicant {
    pub fn age_on(&self, as_of: NaiveDate) -> u32 {
        age_on(self.date_of_birth, as_of)
    }

    /// Applicant income plus every member's contribution.
    pub fn household_income(&self) -> u64 {
        self.household_members
            .iter()
            .map(|member| u64::from(member.monthly_income))
            .sum::<u64>()
            + u64::from(self.monthly_income)
    }

    pub fn members_with(&self, relation: Relation) -> impl Iterator<Item = &HouseholdMember> {
        self.household_members
            .iter()
            .filter(move |member| member.relation == relation)
    }
}

/// Completed years between `date_of_birth` and `as_of`; zero for future birth dates.
pub fn age_on(date_of_birth: NaiveDate, as_of: NaiveDate) -> u32 {
    let mut years = as_of.year() - date_of_birth.year();
    if (as_of.month(), as_of.day()) < (date_of_birth.month(), date_of_birth.day()) {
        years -= 1;
    }
    years.max(0) as u32
}

/// Scheme record with the configuration documents its strategy interprets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scheme {
    pub id: SchemeId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub scheme_type: String,
    pub validity_start_date: NaiveDate,
    #[serde(default)]
    pub validity_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub eligibility_criteria: Value,
    #[serde(default)]
    pub benefits: Value,
}

impl Scheme {
    /// Validity window is inclusive on both ends; an open end never expires.
    pub fn is_active_on(&self, as_of: NaiveDate) -> bool {
        self.validity_start_date <= as_of
            && self.validity_end_date.map_or(true, |end| as_of <= end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisbursementFrequency {
    #[serde(alias = "One-Off", alias = "one-off")]
    OneOff,
    #[serde(alias = "Monthly")]
    Monthly,
    #[serde(alias = "Annually")]
    Annually,
}

/// Named, quantified award for an eligible (applicant, scheme) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Benefit {
    pub name: String,
    pub description: String,
    pub beneficiary: String,
    pub amount: u32,
    pub frequency: DisbursementFrequency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_months: Option<u32>,
}

/// Error class reported when a scheme could not be evaluated during an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidSchemeConfiguration,
    EligibilityEvaluation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationFailure {
    pub kind: FailureKind,
    pub message: String,
}

/// Outcome of evaluating one scheme for one applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityResult {
    pub scheme_id: SchemeId,
    pub scheme_name: String,
    pub scheme_description: String,
    pub validity_start_date: NaiveDate,
    pub validity_end_date: Option<NaiveDate>,
    pub eligible: bool,
    pub benefits: Vec<Benefit>,
    pub reasons: Vec<String>,
    /// Set when no strategy is registered for the scheme type.
    pub fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<EvaluationFailure>,
}

/// Decision recorded on an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

/// Decision awaiting persistence; the repository assigns the identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApplication {
    pub applicant_id: ApplicantId,
    pub scheme_id: SchemeId,
    pub status: ApplicationStatus,
    pub benefits: Vec<Benefit>,
    pub reasons: Vec<String>,
    pub decided_at: DateTime<Utc>,
}

impl NewApplication {
    pub fn into_application(self, id: ApplicationId) -> Application {
        Application {
            id,
            applicant_id: self.applicant_id,
            scheme_id: self.scheme_id,
            status: self.status,
            benefits: self.benefits,
            reasons: self.reasons,
            decided_at: self.decided_at,
        }
    }
}

/// Persisted decision. Fields are read-only once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    id: ApplicationId,
    applicant_id: ApplicantId,
    scheme_id: SchemeId,
    status: ApplicationStatus,
    benefits: Vec<Benefit>,
    reasons: Vec<String>,
    decided_at: DateTime<Utc>,
}

impl Application {
    pub fn id(&self) -> ApplicationId {
        self.id
    }

    pub fn applicant_id(&self) -> ApplicantId {
        self.applicant_id
    }

    pub fn scheme_id(&self) -> SchemeId {
        self.scheme_id
    }

    pub fn status(&self) -> ApplicationStatus {
        self.status
    }

    pub fn is_approved(&self) -> bool {
        self.status == ApplicationStatus::Approved
    }

    pub fn benefits(&self) -> &[Benefit] {
        &self.benefits
    }

    pub fn reasons(&self) -> &[String] {
        &self.reasons
    }

    pub fn decided_at(&self) -> DateTime<Utc> {
        self.decided_at
    }
}
