use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use scheme_eligibility::config::EligibilityConfig;
use scheme_eligibility::eligibility::{
    Applicant, ApplicationDecisionService, InMemoryStore, Scheme, StrategyFactory,
    StrategyRegistry,
};
use scheme_eligibility::error::AppError;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

const SEED_SCHEMES: &str = include_str!("../data/schemes.json");
const SEED_APPLICANTS: &str = include_str!("../data/applicants.json");

pub(crate) type MemoryDecisionService =
    ApplicationDecisionService<InMemoryStore, InMemoryStore, InMemoryStore>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Store preloaded with the provisioned schemes and demo applicants.
pub(crate) fn seeded_store() -> Result<InMemoryStore, AppError> {
    let schemes: Vec<Scheme> = serde_json::from_str(SEED_SCHEMES)?;
    let applicants: Vec<Applicant> = serde_json::from_str(SEED_APPLICANTS)?;
    Ok(InMemoryStore::with_records(applicants, schemes))
}

/// Built-in strategies with the configured fallback policy.
pub(crate) fn strategy_factory(config: &EligibilityConfig) -> Arc<StrategyFactory> {
    Arc::new(
        StrategyRegistry::with_builtin()
            .fallback_policy(config.fallback_policy)
            .build(),
    )
}

pub(crate) fn decision_service(
    config: &EligibilityConfig,
) -> Result<MemoryDecisionService, AppError> {
    let store = Arc::new(seeded_store()?);
    Ok(ApplicationDecisionService::new(
        store.clone(),
        store.clone(),
        store,
        strategy_factory(config),
    ))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
