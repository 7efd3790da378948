//! Candidate intake: submission validation, record construction, and ordered persistence.
//!
//! A submission is validated once, the candidate row is saved, and each education, work
//! experience and CV record is saved afterwards and attached to the returned candidate.
//! Storage is reached only through [`CandidateStore`], so the service runs against any gateway.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod validator;

#[cfg(test)]
mod tests;

pub use domain::{
    Candidate, CandidateId, CandidateSubmission, Education, EducationInput, NewCandidate,
    NewEducation, NewResume, NewWorkExperience, NormalizedSubmission, RecordId, Resume,
    ResumeInput, WorkExperience, WorkExperienceInput,
};
pub use repository::{CandidateStore, PersistenceError};
pub use router::candidate_router;
pub use service::{CandidateIntakeService, IntakeError, DUPLICATE_EMAIL_MESSAGE};
pub use validator::{
    validate_candidate_data, CandidateValidator, SubmissionValidator, ValidationError,
    ValidationPolicy,
};
