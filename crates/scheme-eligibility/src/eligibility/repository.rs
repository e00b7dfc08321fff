use chrono::NaiveDate;

use super::domain::{
    Applicant, ApplicantId, Application, ApplicationId, NewApplication, Scheme, SchemeId,
};

/// Read access to applicants, household members included.
pub trait ApplicantRepository: Send + Sync {
    fn get(&self, id: ApplicantId) -> Result<Option<Applicant>, RepositoryError>;
}

/// Read access to scheme records.
pub trait SchemeRepository: Send + Sync {
    /// Schemes whose validity window contains `as_of`.
    fn list_active(&self, as_of: NaiveDate) -> Result<Vec<Scheme>, RepositoryError>;
    fn get(&self, id: SchemeId) -> Result<Option<Scheme>, RepositoryError>;
}

/// Append-only store of decisions.
pub trait ApplicationRepository: Send + Sync {
    fn find(
        &self,
        applicant_id: ApplicantId,
        scheme_id: SchemeId,
    ) -> Result<Vec<Application>, RepositoryError>;

    /// Persist a decision. The "no approved application for this pair" check and the insert
    /// must happen atomically; an approved insert that would violate it returns
    /// [`RepositoryError::Conflict`] and writes nothing.
    fn create(&self, application: NewApplication) -> Result<Application, RepositoryError>;

    fn get(&self, id: ApplicationId) -> Result<Option<Application>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
