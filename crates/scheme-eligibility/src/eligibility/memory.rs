use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};

use chrono::NaiveDate;

use super::domain::{
    Applicant, ApplicantId, Application, ApplicationId, ApplicationStatus, NewApplication, Scheme,
    SchemeId,
};
use super::repository::{
    ApplicantRepository, ApplicationRepository, RepositoryError, SchemeRepository,
};

fn poisoned<T>(_: PoisonError<T>) -> RepositoryError {
    RepositoryError::Unavailable("store lock poisoned".to_string())
}

#[derive(Debug, Default)]
struct ApplicationLedger {
    next_id: u64,
    records: BTreeMap<ApplicationId, Application>,
}

/// Process-local store implementing every repository trait.
///
/// Applicants and schemes sit behind read-write locks so the demo binary can update them;
/// applications are append-only behind a single mutex, which makes the approved-uniqueness
/// check and the insert one critical section.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    applicants: RwLock<BTreeMap<ApplicantId, Applicant>>,
    schemes: RwLock<BTreeMap<SchemeId, Scheme>>,
    applications: Mutex<ApplicationLedger>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(applicants: Vec<Applicant>, schemes: Vec<Scheme>) -> Self {
        Self {
            applicants: RwLock::new(
                applicants
                    .into_iter()
                    .map(|applicant| (applicant.id, applicant))
                    .collect(),
            ),
            schemes: RwLock::new(schemes.into_iter().map(|scheme| (scheme.id, scheme)).collect()),
            applications: Mutex::default(),
        }
    }

    pub fn upsert_applicant(&self, applicant: Applicant) -> Result<(), RepositoryError> {
        self.applicants
            .write()
            .map_err(poisoned)?
            .insert(applicant.id, applicant);
        Ok(())
    }

    pub fn upsert_scheme(&self, scheme: Scheme) -> Result<(), RepositoryError> {
        self.schemes
            .write()
            .map_err(poisoned)?
            .insert(scheme.id, scheme);
        Ok(())
    }

    pub fn applications(&self) -> Result<Vec<Application>, RepositoryError> {
        Ok(self.ledger()?.records.values().cloned().collect())
    }

    fn ledger(&self) -> Result<MutexGuard<'_, ApplicationLedger>, RepositoryError> {
        self.applications.lock().map_err(poisoned)
    }
}

impl ApplicantRepository for InMemoryStore {
    fn get(&self, id: ApplicantId) -> Result<Option<Applicant>, RepositoryError> {
        let guard = self.applicants.read().map_err(poisoned)?;
        Ok(guard.get(&id).cloned())
    }
}

impl SchemeRepository for InMemoryStore {
    fn list_active(&self, as_of: NaiveDate) -> Result<Vec<Scheme>, RepositoryError> {
        let guard = self.schemes.read().map_err(poisoned)?;
        Ok(guard
            .values()
            .filter(|scheme| scheme.is_active_on(as_of))
            .cloned()
            .collect())
    }

    fn get(&self, id: SchemeId) -> Result<Option<Scheme>, RepositoryError> {
        let guard = self.schemes.read().map_err(poisoned)?;
        Ok(guard.get(&id).cloned())
    }
}

impl ApplicationRepository for InMemoryStore {
    fn find(
        &self,
        applicant_id: ApplicantId,
        scheme_id: SchemeId,
    ) -> Result<Vec<Application>, RepositoryError> {
        let ledger = self.ledger()?;
        Ok(ledger
            .records
            .values()
            .filter(|record| {
                record.applicant_id() == applicant_id && record.scheme_id() == scheme_id
            })
            .cloned()
            .collect())
    }

    fn create(&self, application: NewApplication) -> Result<Application, RepositoryError> {
        let mut ledger = self.ledger()?;

        if application.status == ApplicationStatus::Approved
            && ledger.records.values().any(|record| {
                record.is_approved()
                    && record.applicant_id() == application.applicant_id
                    && record.scheme_id() == application.scheme_id
            })
        {
            return Err(RepositoryError::Conflict);
        }

        ledger.next_id += 1;
        let id = ApplicationId(ledger.next_id);
        let stored = application.into_application(id);
        ledger.records.insert(id, stored.clone());
        Ok(stored)
    }

    fn get(&self, id: ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Ok(self.ledger()?.records.get(&id).cloned())
    }
}
