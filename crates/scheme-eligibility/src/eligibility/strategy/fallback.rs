use serde::{Deserialize, Serialize};

use super::super::domain::Benefit;
use super::{EligibilityStrategy, EvaluationContext, StrategyError, Verdict};

/// Outcome reported for a scheme whose type has no registered strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Never eligible, no benefits.
    Ineligible,
    /// Eligible with an empty benefit list.
    EligibleWithoutBenefits,
}

/// Policy in force unless configuration overrides it.
pub const DEFAULT_FALLBACK_POLICY: FallbackPolicy = FallbackPolicy::Ineligible;

impl FallbackPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ineligible" => Some(Self::Ineligible),
            "eligible_without_benefits" => Some(Self::EligibleWithoutBenefits),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            FallbackPolicy::Ineligible => "ineligible",
            FallbackPolicy::EligibleWithoutBenefits => "eligible_without_benefits",
        }
    }
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        DEFAULT_FALLBACK_POLICY
    }
}

/// Strategy served for unregistered scheme types. Infallible.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackEligibility {
    policy: FallbackPolicy,
}

impl FallbackEligibility {
    pub fn new(policy: FallbackPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }
}

impl EligibilityStrategy for FallbackEligibility {
    fn is_eligible(&self, ctx: &EvaluationContext<'_>) -> Result<Verdict, StrategyError> {
        let reason = format!(
            "no eligibility strategy registered for scheme type '{}'",
            ctx.scheme.scheme_type
        );
        Ok(Verdict {
            eligible: self.policy == FallbackPolicy::EligibleWithoutBenefits,
            reasons: vec![reason],
        })
    }

    fn calculate_benefits(
        &self,
        _ctx: &EvaluationContext<'_>,
    ) -> Result<Vec<Benefit>, StrategyError> {
        Ok(Vec::new())
    }

    fn is_fallback(&self) -> bool {
        true
    }
}
