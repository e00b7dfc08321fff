use std::sync::Arc;

use axum::http::StatusCode;
use chrono::NaiveDate;
use tracing::{info, warn};

use super::assessment::{AssessmentReport, EvaluationError, SchemesManager};
use super::clock::{Clock, SystemClock};
use super::domain::{
    ApplicantId, Application, ApplicationId, ApplicationStatus, NewApplication, SchemeId,
};
use super::factory::StrategyFactory;
use super::repository::{
    ApplicantRepository, ApplicationRepository, RepositoryError, SchemeRepository,
};

/// Service deciding applications: one evaluation, one persisted record per call.
pub struct ApplicationDecisionService<A, S, P> {
    applicants: Arc<A>,
    schemes: Arc<S>,
    applications: Arc<P>,
    manager: SchemesManager<S>,
    clock: Arc<dyn Clock>,
}

impl<A, S, P> ApplicationDecisionService<A, S, P>
where
    A: ApplicantRepository + 'static,
    S: SchemeRepository + 'static,
    P: ApplicationRepository + 'static,
{
    pub fn new(
        applicants: Arc<A>,
        schemes: Arc<S>,
        applications: Arc<P>,
        factory: Arc<StrategyFactory>,
    ) -> Self {
        let manager = SchemesManager::new(Arc::clone(&schemes), factory);
        Self {
            applicants,
            schemes,
            applications,
            manager,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock<C>(mut self, clock: C) -> Self
    where
        C: Clock + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    /// Assess the applicant against every scheme open today.
    pub fn assess_eligibility(
        &self,
        applicant_id: ApplicantId,
    ) -> Result<AssessmentReport, ApplicationServiceError> {
        self.assess_eligibility_on(applicant_id, self.clock.today())
    }

    pub fn assess_eligibility_on(
        &self,
        applicant_id: ApplicantId,
        as_of: NaiveDate,
    ) -> Result<AssessmentReport, ApplicationServiceError> {
        let applicant = self
            .applicants
            .get(applicant_id)?
            .ok_or(ApplicationServiceError::ApplicantNotFound(applicant_id))?;
        Ok(self.manager.report(&applicant, as_of)?)
    }

    /// Decide and persist an application for one (applicant, scheme) pair.
    ///
    /// Caller errors and evaluation failures leave the repository untouched.
    pub fn create_application(
        &self,
        applicant_id: ApplicantId,
        scheme_id: SchemeId,
    ) -> Result<Application, ApplicationServiceError> {
        let applicant = self
            .applicants
            .get(applicant_id)?
            .ok_or(ApplicationServiceError::ApplicantNotFound(applicant_id))?;
        let scheme = self
            .schemes
            .get(scheme_id)?
            .ok_or(ApplicationServiceError::SchemeNotFound(scheme_id))?;

        let existing = self.applications.find(applicant_id, scheme_id)?;
        if existing.iter().any(Application::is_approved) {
            return Err(ApplicationServiceError::DuplicateApplication {
                applicant_id,
                scheme_id,
            });
        }

        let today = self.clock.today();
        let (status, benefits, reasons) = if scheme.is_active_on(today) {
            let result = self.manager.check_scheme(&applicant, &scheme, today)?;
            if result.fallback {
                warn!(
                    %scheme_id,
                    scheme_type = %scheme.scheme_type,
                    "deciding with fallback strategy"
                );
            }
            if result.eligible {
                (ApplicationStatus::Approved, result.benefits, result.reasons)
            } else {
                (ApplicationStatus::Rejected, Vec::new(), result.reasons)
            }
        } else {
            let reason = format!("scheme '{}' is not open on {today}", scheme.name);
            (ApplicationStatus::Rejected, Vec::new(), vec![reason])
        };

        let created = self
            .applications
            .create(NewApplication {
                applicant_id,
                scheme_id,
                status,
                benefits,
                reasons,
                decided_at: self.clock.now(),
            })
            .map_err(|err| match err {
                RepositoryError::Conflict => ApplicationServiceError::DuplicateApplication {
                    applicant_id,
                    scheme_id,
                },
                other => ApplicationServiceError::Repository(other),
            })?;

        info!(
            application_id = %created.id(),
            %applicant_id,
            %scheme_id,
            status = created.status().label(),
            benefits = created.benefits().len(),
            "application decided"
        );
        Ok(created)
    }

    pub fn get_application(
        &self,
        application_id: ApplicationId,
    ) -> Result<Application, ApplicationServiceError> {
        self.applications
            .get(application_id)?
            .ok_or(ApplicationServiceError::ApplicationNotFound(application_id))
    }

    /// Every decision recorded for the pair, approved or not.
    pub fn applications_for(
        &self,
        applicant_id: ApplicantId,
        scheme_id: SchemeId,
    ) -> Result<Vec<Application>, ApplicationServiceError> {
        Ok(self.applications.find(applicant_id, scheme_id)?)
    }
}

/// Error raised by the decision service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error("applicant {0} not found")]
    ApplicantNotFound(ApplicantId),
    #[error("scheme {0} not found")]
    SchemeNotFound(SchemeId),
    #[error("application {0} not found")]
    ApplicationNotFound(ApplicationId),
    #[error("applicant {applicant_id} already has an approved application for scheme {scheme_id}")]
    DuplicateApplication {
        applicant_id: ApplicantId,
        scheme_id: SchemeId,
    },
    #[error("scheme {scheme_id} has an invalid configuration: {detail}")]
    InvalidSchemeConfiguration { scheme_id: SchemeId, detail: String },
    #[error("eligibility evaluation failed for scheme {scheme_id}: {detail}")]
    EligibilityEvaluation { scheme_id: SchemeId, detail: String },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<EvaluationError> for ApplicationServiceError {
    fn from(err: EvaluationError) -> Self {
        match err {
            EvaluationError::InvalidSchemeConfiguration { scheme_id, detail } => {
                Self::InvalidSchemeConfiguration { scheme_id, detail }
            }
            EvaluationError::EligibilityEvaluation { scheme_id, detail } => {
                Self::EligibilityEvaluation { scheme_id, detail }
            }
        }
    }
}

impl ApplicationServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ApplicantNotFound(_)
            | Self::SchemeNotFound(_)
            | Self::ApplicationNotFound(_)
            | Self::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            Self::DuplicateApplication { .. } | Self::Repository(RepositoryError::Conflict) => {
                StatusCode::CONFLICT
            }
            Self::InvalidSchemeConfiguration { .. } | Self::EligibilityEvaluation { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::Repository(RepositoryError::Unavailable(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Caller errors are not worth retrying; repository outages may be.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Repository(RepositoryError::Unavailable(_)))
    }
}
