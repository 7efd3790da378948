use async_trait::async_trait;

use super::domain::{
    Candidate, Education, NewCandidate, NewEducation, NewResume, NewWorkExperience, Resume,
    WorkExperience,
};

/// Storage abstraction so the intake service can be exercised in isolation.
///
/// Every save is awaited on its own; implementations assign identities and enforce the
/// email uniqueness constraint.
#[async_trait]
pub trait CandidateStore: Send + Sync {
    async fn save_candidate(&self, candidate: NewCandidate) -> Result<Candidate, PersistenceError>;

    async fn save_education(&self, education: NewEducation)
        -> Result<Education, PersistenceError>;

    async fn save_work_experience(
        &self,
        experience: NewWorkExperience,
    ) -> Result<WorkExperience, PersistenceError>;

    async fn save_resume(&self, resume: NewResume) -> Result<Resume, PersistenceError>;
}

/// Failure reported by the persistence gateway.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistenceError {
    #[error("unique constraint violated on {field}")]
    UniqueViolation { field: String },
    #[error("{0}")]
    Unavailable(String),
    #[error("{0}")]
    Failure(String),
}

impl PersistenceError {
    pub fn unique_violation(field: impl Into<String>) -> Self {
        Self::UniqueViolation {
            field: field.into(),
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::UniqueViolation { .. })
    }
}
