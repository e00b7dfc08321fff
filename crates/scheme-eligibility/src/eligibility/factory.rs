use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use super::strategy::{
    EligibilityStrategy, FallbackEligibility, FallbackPolicy, MiddleAgedReskillingEligibility,
    RetrenchmentAssistanceEligibility, SeniorCitizenAssistanceEligibility,
    SingleWorkingMothersSupportEligibility,
};

pub const RETRENCHMENT_ASSISTANCE: &str = "retrenchment_assistance";
pub const SINGLE_WORKING_MOTHERS_SUPPORT: &str = "single_working_mothers_support";
pub const SENIOR_CITIZEN_ASSISTANCE: &str = "senior_citizen_assistance";
pub const MIDDLEAGED_RESKILLING_ASSISTANCE: &str = "middleaged_reskilling_assistance";

fn normalize(scheme_type: &str) -> String {
    scheme_type.trim().to_ascii_lowercase()
}

/// Builder for the scheme-type registry. Consumed by [`StrategyRegistry::build`].
#[derive(Default)]
pub struct StrategyRegistry {
    strategies: BTreeMap<String, Arc<dyn EligibilityStrategy>>,
    fallback_policy: FallbackPolicy,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with every built-in scheme type.
    pub fn with_builtin() -> Self {
        Self::new()
            .register(RETRENCHMENT_ASSISTANCE, RetrenchmentAssistanceEligibility)
            .register(SINGLE_WORKING_MOTHERS_SUPPORT, SingleWorkingMothersSupportEligibility)
            .register(SENIOR_CITIZEN_ASSISTANCE, SeniorCitizenAssistanceEligibility)
            .register(MIDDLEAGED_RESKILLING_ASSISTANCE, MiddleAgedReskillingEligibility)
    }

    /// Later registrations for the same type replace earlier ones.
    pub fn register<S>(mut self, scheme_type: &str, strategy: S) -> Self
    where
        S: EligibilityStrategy + 'static,
    {
        self.strategies
            .insert(normalize(scheme_type), Arc::new(strategy));
        self
    }

    pub fn fallback_policy(mut self, policy: FallbackPolicy) -> Self {
        self.fallback_policy = policy;
        self
    }

    pub fn build(self) -> StrategyFactory {
        StrategyFactory {
            strategies: self.strategies,
            fallback: Arc::new(FallbackEligibility::new(self.fallback_policy)),
        }
    }
}

/// Read-only mapping from scheme type to strategy.
pub struct StrategyFactory {
    strategies: BTreeMap<String, Arc<dyn EligibilityStrategy>>,
    fallback: Arc<FallbackEligibility>,
}

impl StrategyFactory {
    /// Process-wide factory with the built-in types and the default fallback policy.
    pub fn standard() -> Arc<StrategyFactory> {
        static STANDARD: OnceLock<Arc<StrategyFactory>> = OnceLock::new();
        Arc::clone(STANDARD.get_or_init(|| Arc::new(StrategyRegistry::with_builtin().build())))
    }

    /// Never fails: unregistered types resolve to the fallback strategy.
    pub fn get_strategy(&self, scheme_type: &str) -> Arc<dyn EligibilityStrategy> {
        match self.strategies.get(&normalize(scheme_type)) {
            Some(strategy) => Arc::clone(strategy),
            None => self.fallback.clone(),
        }
    }

    pub fn is_registered(&self, scheme_type: &str) -> bool {
        self.strategies.contains_key(&normalize(scheme_type))
    }

    pub fn registered_types(&self) -> Vec<&str> {
        self.strategies.keys().map(String::as_str).collect()
    }

    pub fn fallback_policy(&self) -> FallbackPolicy {
        self.fallback.policy()
    }
}

impl std::fmt::Debug for StrategyFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyFactory")
            .field("registered_types", &self.registered_types())
            .field("fallback_policy", &self.fallback_policy())
            .finish()
    }
}
