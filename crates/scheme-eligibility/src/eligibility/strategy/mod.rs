//! Scheme-type strategies and the capability trait they share.
//!
//! Every strategy reads its thresholds and benefit tables from the scheme record carried by the
//! [`EvaluationContext`]; none of them hold mutable state, so one instance serves every scheme of
//! its type across threads.

mod criteria;
mod fallback;
mod reskilling;
mod retrenchment;
mod senior_citizen;
mod single_mothers;

pub use criteria::{BenefitItem, IncomeTier};
pub use fallback::{FallbackEligibility, FallbackPolicy, DEFAULT_FALLBACK_POLICY};
pub use reskilling::MiddleAgedReskillingEligibility;
pub use retrenchment::RetrenchmentAssistanceEligibility;
pub use senior_citizen::SeniorCitizenAssistanceEligibility;
pub use single_mothers::SingleWorkingMothersSupportEligibility;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{Applicant, Benefit, Scheme};

/// Immutable snapshot shared by the predicate and the benefit computation.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub applicant: &'a Applicant,
    pub scheme: &'a Scheme,
    pub as_of: NaiveDate,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(applicant: &'a Applicant, scheme: &'a Scheme, as_of: NaiveDate) -> Self {
        Self {
            applicant,
            scheme,
            as_of,
        }
    }
}

/// Predicate outcome with the human-readable trail behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub eligible: bool,
    pub reasons: Vec<String>,
}

impl Verdict {
    pub fn eligible(reason: impl Into<String>) -> Self {
        Self {
            eligible: true,
            reasons: vec![reason.into()],
        }
    }

    pub fn ineligible(reason: impl Into<String>) -> Self {
        Self {
            eligible: false,
            reasons: vec![reason.into()],
        }
    }
}

/// Failure raised from inside a strategy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StrategyError {
    #[error("invalid scheme configuration: {0}")]
    InvalidConfiguration(String),
    #[error("eligibility evaluation failed: {0}")]
    Evaluation(String),
}

/// Eligibility predicate and benefit schedule for one scheme type.
pub trait EligibilityStrategy: Send + Sync {
    fn is_eligible(&self, ctx: &EvaluationContext<'_>) -> Result<Verdict, StrategyError>;

    /// Called only after `is_eligible` accepted the same context.
    fn calculate_benefits(&self, ctx: &EvaluationContext<'_>)
        -> Result<Vec<Benefit>, StrategyError>;

    fn is_fallback(&self) -> bool {
        false
    }
}
