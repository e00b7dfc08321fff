use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::domain::{
    Applicant, ApplicantId, EligibilityResult, EvaluationFailure, FailureKind, Scheme, SchemeId,
};
use super::factory::StrategyFactory;
use super::repository::{RepositoryError, SchemeRepository};
use super::strategy::{EvaluationContext, StrategyError};

/// Failure to evaluate a single (applicant, scheme) pair.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvaluationError {
    #[error("scheme {scheme_id} has an invalid configuration: {detail}")]
    InvalidSchemeConfiguration { scheme_id: SchemeId, detail: String },
    #[error("eligibility evaluation failed for scheme {scheme_id}: {detail}")]
    EligibilityEvaluation { scheme_id: SchemeId, detail: String },
}

impl EvaluationError {
    fn from_strategy(scheme_id: SchemeId, err: StrategyError) -> Self {
        match err {
            StrategyError::InvalidConfiguration(detail) => {
                Self::InvalidSchemeConfiguration { scheme_id, detail }
            }
            StrategyError::Evaluation(detail) => Self::EligibilityEvaluation { scheme_id, detail },
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            EvaluationError::InvalidSchemeConfiguration { .. } => {
                FailureKind::InvalidSchemeConfiguration
            }
            EvaluationError::EligibilityEvaluation { .. } => FailureKind::EligibilityEvaluation,
        }
    }
}

fn panic_detail(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("strategy panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("strategy panicked: {message}")
    } else {
        "strategy panicked".to_string()
    }
}

/// Evaluate one scheme: predicate first, benefits only when eligible, both on one snapshot.
///
/// A panic inside the strategy is reported as [`EvaluationError::EligibilityEvaluation`].
pub fn evaluate_scheme(
    factory: &StrategyFactory,
    applicant: &Applicant,
    scheme: &Scheme,
    as_of: NaiveDate,
) -> Result<EligibilityResult, EvaluationError> {
    let strategy = factory.get_strategy(&scheme.scheme_type);
    let ctx = EvaluationContext::new(applicant, scheme, as_of);

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let verdict = strategy.is_eligible(&ctx)?;
        let benefits = if verdict.eligible {
            strategy.calculate_benefits(&ctx)?
        } else {
            Vec::new()
        };
        Ok::<_, StrategyError>((verdict, benefits))
    }));

    let (verdict, benefits) = match outcome {
        Ok(Ok(evaluated)) => evaluated,
        Ok(Err(err)) => return Err(EvaluationError::from_strategy(scheme.id, err)),
        Err(payload) => {
            return Err(EvaluationError::EligibilityEvaluation {
                scheme_id: scheme.id,
                detail: panic_detail(payload),
            })
        }
    };

    Ok(EligibilityResult {
        scheme_id: scheme.id,
        scheme_name: scheme.name.clone(),
        scheme_description: scheme.description.clone(),
        validity_start_date: scheme.validity_start_date,
        validity_end_date: scheme.validity_end_date,
        eligible: verdict.eligible,
        benefits,
        reasons: verdict.reasons,
        fallback: strategy.is_fallback(),
        failure: None,
    })
}

fn failed_result(scheme: &Scheme, err: &EvaluationError) -> EligibilityResult {
    let class = match err.kind() {
        FailureKind::InvalidSchemeConfiguration => "invalid scheme configuration",
        FailureKind::EligibilityEvaluation => "eligibility evaluation error",
    };
    EligibilityResult {
        scheme_id: scheme.id,
        scheme_name: scheme.name.clone(),
        scheme_description: scheme.description.clone(),
        validity_start_date: scheme.validity_start_date,
        validity_end_date: scheme.validity_end_date,
        eligible: false,
        benefits: Vec::new(),
        reasons: vec![format!("{class}: scheme could not be assessed")],
        fallback: false,
        failure: Some(EvaluationFailure {
            kind: err.kind(),
            message: err.to_string(),
        }),
    }
}

/// Full eligibility report for one applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentReport {
    pub applicant_id: ApplicantId,
    pub as_of: NaiveDate,
    pub results: Vec<EligibilityResult>,
}

impl AssessmentReport {
    pub fn eligible(&self) -> impl Iterator<Item = &EligibilityResult> {
        self.results.iter().filter(|result| result.eligible)
    }

    pub fn result_for(&self, scheme_id: SchemeId) -> Option<&EligibilityResult> {
        self.results
            .iter()
            .find(|result| result.scheme_id == scheme_id)
    }
}

/// Assessment facade: every open scheme, one applicant, failures isolated per scheme.
pub struct SchemesManager<S> {
    schemes: Arc<S>,
    factory: Arc<StrategyFactory>,
}

impl<S> Clone for SchemesManager<S> {
    fn clone(&self) -> Self {
        Self {
            schemes: Arc::clone(&self.schemes),
            factory: Arc::clone(&self.factory),
        }
    }
}

impl<S> SchemesManager<S>
where
    S: SchemeRepository + 'static,
{
    pub fn new(schemes: Arc<S>, factory: Arc<StrategyFactory>) -> Self {
        Self { schemes, factory }
    }

    /// Results ordered by ascending scheme id; only schemes open on `as_of` appear.
    pub fn assess(
        &self,
        applicant: &Applicant,
        as_of: NaiveDate,
    ) -> Result<Vec<EligibilityResult>, RepositoryError> {
        let mut schemes: Vec<Scheme> = self
            .schemes
            .list_active(as_of)?
            .into_iter()
            .filter(|scheme| scheme.is_active_on(as_of))
            .collect();
        schemes.sort_by_key(|scheme| scheme.id);
        schemes.dedup_by_key(|scheme| scheme.id);

        let results = schemes
            .iter()
            .map(|scheme| match self.check_scheme(applicant, scheme, as_of) {
                Ok(result) => {
                    if result.fallback {
                        warn!(
                            scheme_id = %scheme.id,
                            scheme_type = %scheme.scheme_type,
                            "no strategy registered; fallback outcome reported"
                        );
                    }
                    result
                }
                Err(err) => {
                    warn!(
                        applicant_id = %applicant.id,
                        scheme_id = %scheme.id,
                        error = %err,
                        "scheme evaluation failed; reporting as ineligible"
                    );
                    failed_result(scheme, &err)
                }
            })
            .collect::<Vec<_>>();

        debug!(
            applicant_id = %applicant.id,
            schemes = results.len(),
            eligible = results.iter().filter(|result| result.eligible).count(),
            "assessment complete"
        );
        Ok(results)
    }

    pub fn report(
        &self,
        applicant: &Applicant,
        as_of: NaiveDate,
    ) -> Result<AssessmentReport, RepositoryError> {
        Ok(AssessmentReport {
            applicant_id: applicant.id,
            as_of,
            results: self.assess(applicant, as_of)?,
        })
    }

    /// Single-scheme evaluation; failures propagate to the caller.
    pub fn check_scheme(
        &self,
        applicant: &Applicant,
        scheme: &Scheme,
        as_of: NaiveDate,
    ) -> Result<EligibilityResult, EvaluationError> {
        evaluate_scheme(&self.factory, applicant, scheme, as_of)
    }
}
