use std::sync::Arc;

use tracing::{debug, info, warn};

use super::domain::{
    Candidate, CandidateId, CandidateSubmission, NewCandidate, NewEducation, NewResume,
    NewWorkExperience,
};
use super::repository::{CandidateStore, PersistenceError};
use super::validator::{
    CandidateValidator, SubmissionValidator, ValidationError, ValidationPolicy,
};

pub const DUPLICATE_EMAIL_MESSAGE: &str = "The email already exists in the database";

/// Service composing submission validation with the persistence gateway.
pub struct CandidateIntakeService<S, V = CandidateValidator> {
    store: Arc<S>,
    validator: Arc<V>,
}

impl<S> CandidateIntakeService<S, CandidateValidator>
where
    S: CandidateStore + 'static,
{
    pub fn new(store: Arc<S>, policy: ValidationPolicy) -> Self {
        Self::with_validator(store, Arc::new(CandidateValidator::with_policy(policy)))
    }
}

impl<S, V> CandidateIntakeService<S, V>
where
    S: CandidateStore + 'static,
    V: SubmissionValidator + 'static,
{
    pub fn with_validator(store: Arc<S>, validator: Arc<V>) -> Self {
        Self { store, validator }
    }

    /// Validate a submission and persist the candidate followed by its children.
    ///
    /// The candidate row is saved first; educations, work experiences and the optional CV
    /// follow in that order, each in input order. The first failure aborts the remaining
    /// saves. Rows already written stay in storage.
    pub async fn add_candidate(
        &self,
        submission: &CandidateSubmission,
    ) -> Result<Candidate, IntakeError> {
        let normalized = self.validator.validate(submission)?;

        let mut candidate = self
            .store
            .save_candidate(NewCandidate::from_submission(&normalized))
            .await
            .map_err(|error| {
                if error.is_conflict() {
                    warn!(%error, "rejected candidate with duplicate email");
                    IntakeError::DuplicateEmail
                } else {
                    IntakeError::Persistence(error)
                }
            })?;

        let candidate_id = candidate.id.clone();

        for input in normalized.educations {
            let education = self
                .store
                .save_education(NewEducation::new(candidate_id.clone(), input))
                .await
                .map_err(|error| partial_write(&candidate_id, "education", error))?;
            debug!(candidate_id = %candidate_id, record_id = %education.id.0, "education saved");
            candidate.education.push(education);
        }

        for input in normalized.work_experiences {
            let experience = self
                .store
                .save_work_experience(NewWorkExperience::new(candidate_id.clone(), input))
                .await
                .map_err(|error| partial_write(&candidate_id, "work_experience", error))?;
            debug!(
                candidate_id = %candidate_id,
                record_id = %experience.id.0,
                "work experience saved"
            );
            candidate.work_experience.push(experience);
        }

        if let Some(cv) = normalized.cv {
            let resume = self
                .store
                .save_resume(NewResume::new(candidate_id.clone(), cv))
                .await
                .map_err(|error| partial_write(&candidate_id, "resume", error))?;
            debug!(candidate_id = %candidate_id, record_id = %resume.id.0, "resume saved");
            candidate.resumes.push(resume);
        }

        info!(
            candidate_id = %candidate.id,
            educations = candidate.education.len(),
            work_experiences = candidate.work_experience.len(),
            resumes = candidate.resumes.len(),
            "candidate added"
        );

        Ok(candidate)
    }
}

fn partial_write(
    candidate_id: &CandidateId,
    entity: &'static str,
    error: PersistenceError,
) -> IntakeError {
    warn!(
        candidate_id = %candidate_id,
        entity,
        %error,
        "child save failed after candidate was persisted"
    );
    IntakeError::Persistence(error)
}

/// Error raised by the intake service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{}", DUPLICATE_EMAIL_MESSAGE)]
    DuplicateEmail,
    #[error(transparent)]
    Persistence(PersistenceError),
}
