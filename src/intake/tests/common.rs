use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::intake::domain::{
    Candidate, CandidateId, CandidateSubmission, Education, EducationInput, NewCandidate,
    NewEducation, NewResume, NewWorkExperience, NormalizedSubmission, RecordId, Resume,
    ResumeInput, WorkExperience, WorkExperienceInput,
};
use crate::intake::repository::{CandidateStore, PersistenceError};
use crate::intake::validator::{
    CandidateValidator, SubmissionValidator, ValidationError, ValidationPolicy,
};
use crate::intake::CandidateIntakeService;

pub(super) fn education(degree: &str, institution: &str) -> EducationInput {
    EducationInput {
        degree: degree.to_string(),
        institution: institution.to_string(),
        start_date: None,
        end_date: None,
    }
}

pub(super) fn work_experience(company: &str, position: &str) -> WorkExperienceInput {
    WorkExperienceInput {
        company: company.to_string(),
        position: position.to_string(),
        description: None,
        start_date: None,
        end_date: None,
    }
}

pub(super) fn cv() -> ResumeInput {
    ResumeInput {
        file_name: "resume.pdf".to_string(),
        file_content: "...".to_string(),
        file_type: None,
    }
}

pub(super) fn submission() -> CandidateSubmission {
    CandidateSubmission {
        name: "John Doe".to_string(),
        email: "john.doe@example.com".to_string(),
        phone: None,
        address: None,
        educations: vec![education("BSc Computer Science", "University X")],
        work_experiences: vec![work_experience("Company Y", "Developer")],
        cv: Some(cv()),
    }
}

pub(super) fn bare_submission() -> CandidateSubmission {
    CandidateSubmission {
        educations: Vec::new(),
        work_experiences: Vec::new(),
        cv: None,
        ..submission()
    }
}

/// Every call made into the fakes, in the order it happened.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Call {
    Validate(CandidateSubmission),
    SaveCandidate(NewCandidate),
    SaveEducation(NewEducation),
    SaveWorkExperience(NewWorkExperience),
    SaveResume(NewResume),
}

#[derive(Debug, Clone, Default)]
pub(super) struct Journal {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl Journal {
    fn record(&self, call: Call) {
        self.calls.lock().expect("journal mutex poisoned").push(call);
    }

    pub(super) fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("journal mutex poisoned").clone()
    }

    pub(super) fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|call| predicate(call)).count()
    }

    pub(super) fn saves(&self) -> usize {
        self.count(|call| !matches!(call, Call::Validate(_)))
    }
}

/// Validator fake that records the submission it receives and can be told to reject it.
pub(super) struct RecordingValidator {
    journal: Journal,
    inner: CandidateValidator,
    rejection: Option<ValidationError>,
}

impl RecordingValidator {
    pub(super) fn new(journal: Journal) -> Self {
        Self {
            journal,
            inner: CandidateValidator::default(),
            rejection: None,
        }
    }

    pub(super) fn rejecting(journal: Journal, rejection: ValidationError) -> Self {
        Self {
            rejection: Some(rejection),
            ..Self::new(journal)
        }
    }
}

impl SubmissionValidator for RecordingValidator {
    fn validate(
        &self,
        submission: &CandidateSubmission,
    ) -> Result<NormalizedSubmission, ValidationError> {
        self.journal.record(Call::Validate(submission.clone()));
        match &self.rejection {
            Some(rejection) => Err(rejection.clone()),
            None => self.inner.validate(submission),
        }
    }
}

/// Store fake returning scripted ids and failures.
#[derive(Default)]
pub(super) struct RecordingStore {
    journal: Journal,
    candidate_id: String,
    candidate_failure: Option<PersistenceError>,
    education_failure: Option<(usize, PersistenceError)>,
    work_experience_failure: Option<(usize, PersistenceError)>,
    resume_failure: Option<PersistenceError>,
    sequence: Mutex<u64>,
}

impl RecordingStore {
    pub(super) fn new(journal: Journal) -> Self {
        Self {
            journal,
            candidate_id: "123".to_string(),
            ..Self::default()
        }
    }

    pub(super) fn failing_candidate(mut self, error: PersistenceError) -> Self {
        self.candidate_failure = Some(error);
        self
    }

    pub(super) fn failing_education(mut self, index: usize, error: PersistenceError) -> Self {
        self.education_failure = Some((index, error));
        self
    }

    pub(super) fn failing_work_experience(
        mut self,
        index: usize,
        error: PersistenceError,
    ) -> Self {
        self.work_experience_failure = Some((index, error));
        self
    }

    pub(super) fn failing_resume(mut self, error: PersistenceError) -> Self {
        self.resume_failure = Some(error);
        self
    }

    fn next_record_id(&self) -> RecordId {
        let mut sequence = self.sequence.lock().expect("sequence mutex poisoned");
        *sequence += 1;
        RecordId(format!("rec-{sequence}"))
    }

    fn saved_so_far(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.journal.count(predicate) - 1
    }
}

#[async_trait]
impl CandidateStore for RecordingStore {
    async fn save_candidate(&self, candidate: NewCandidate) -> Result<Candidate, PersistenceError> {
        self.journal.record(Call::SaveCandidate(candidate.clone()));
        if let Some(error) = &self.candidate_failure {
            return Err(error.clone());
        }
        Ok(candidate.into_candidate(CandidateId(self.candidate_id.clone())))
    }

    async fn save_education(
        &self,
        education: NewEducation,
    ) -> Result<Education, PersistenceError> {
        self.journal.record(Call::SaveEducation(education.clone()));
        let index = self.saved_so_far(|call| matches!(call, Call::SaveEducation(_)));
        match &self.education_failure {
            Some((failing, error)) if *failing == index => Err(error.clone()),
            _ => Ok(education.into_record(self.next_record_id())),
        }
    }

    async fn save_work_experience(
        &self,
        experience: NewWorkExperience,
    ) -> Result<WorkExperience, PersistenceError> {
        self.journal
            .record(Call::SaveWorkExperience(experience.clone()));
        let index = self.saved_so_far(|call| matches!(call, Call::SaveWorkExperience(_)));
        match &self.work_experience_failure {
            Some((failing, error)) if *failing == index => Err(error.clone()),
            _ => Ok(experience.into_record(self.next_record_id())),
        }
    }

    async fn save_resume(&self, resume: NewResume) -> Result<Resume, PersistenceError> {
        self.journal.record(Call::SaveResume(resume.clone()));
        if let Some(error) = &self.resume_failure {
            return Err(error.clone());
        }
        let uploaded_at = Utc
            .with_ymd_and_hms(2025, 10, 1, 9, 30, 0)
            .single()
            .expect("valid timestamp");
        Ok(resume.into_record(self.next_record_id(), uploaded_at))
    }
}

pub(super) fn build_service(
    store: RecordingStore,
    journal: &Journal,
) -> CandidateIntakeService<RecordingStore, RecordingValidator> {
    CandidateIntakeService::with_validator(
        Arc::new(store),
        Arc::new(RecordingValidator::new(journal.clone())),
    )
}

pub(super) fn default_service(
    store: RecordingStore,
) -> CandidateIntakeService<RecordingStore, CandidateValidator> {
    CandidateIntakeService::new(Arc::new(store), ValidationPolicy::default())
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
