//! Scheme eligibility assessment and application decisions.
//!
//! Strategies are resolved per scheme type through the [`StrategyFactory`]; the
//! [`SchemesManager`] fans one applicant out across every open scheme, and the
//! [`ApplicationDecisionService`] turns a single evaluation into a persisted decision while
//! holding at most one approved application per applicant and scheme.

pub mod assessment;
pub mod clock;
pub mod domain;
pub mod factory;
pub mod memory;
pub mod repository;
pub mod router;
pub mod service;
pub mod strategy;

#[cfg(test)]
mod tests;

pub use assessment::{evaluate_scheme, AssessmentReport, EvaluationError, SchemesManager};
pub use clock::{Clock, FixedClock, SystemClock};
pub use domain::{
    Applicant, ApplicantId, Application, ApplicationId, ApplicationStatus, Benefit,
    DisbursementFrequency, EligibilityResult, EmploymentStatus, EvaluationFailure, FailureKind,
    HouseholdMember, MaritalStatus, NewApplication, Relation, Scheme, SchemeId, Sex,
};
pub use factory::{StrategyFactory, StrategyRegistry};
pub use memory::InMemoryStore;
pub use repository::{
    ApplicantRepository, ApplicationRepository, RepositoryError, SchemeRepository,
};
pub use router::{eligibility_router, ApplicationRequest};
pub use service::{ApplicationDecisionService, ApplicationServiceError};
pub use strategy::{
    EligibilityStrategy, EvaluationContext, FallbackPolicy, StrategyError, Verdict,
    DEFAULT_FALLBACK_POLICY,
};
