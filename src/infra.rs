use async_trait::async_trait;
use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::intake::{
    Candidate, CandidateId, CandidateStore, Education, NewCandidate, NewEducation, NewResume,
    NewWorkExperience, PersistenceError, RecordId, Resume, WorkExperience,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local persistence gateway backing the binary.
///
/// Emails are unique case-insensitively and child rows require an existing candidate.
#[derive(Default, Clone)]
pub struct InMemoryCandidateStore {
    tables: Arc<Mutex<Tables>>,
}

#[derive(Default)]
struct Tables {
    next_id: u64,
    emails: HashSet<String>,
    candidates: HashMap<CandidateId, Candidate>,
    educations: Vec<Education>,
    work_experiences: Vec<WorkExperience>,
    resumes: Vec<Resume>,
}

impl Tables {
    fn next_id(&mut self) -> String {
        self.next_id += 1;
        self.next_id.to_string()
    }

    fn require_candidate(&self, id: &CandidateId) -> Result<(), PersistenceError> {
        if self.candidates.contains_key(id) {
            Ok(())
        } else {
            Err(PersistenceError::Failure(format!(
                "foreign key violation: candidate {id} does not exist"
            )))
        }
    }
}

impl InMemoryCandidateStore {
    fn lock(&self) -> Result<MutexGuard<'_, Tables>, PersistenceError> {
        self.tables.lock().map_err(|_| {
            PersistenceError::Unavailable("candidate store lock poisoned".to_string())
        })
    }

    /// Stored candidate row, without child collections.
    pub fn candidate(&self, id: &CandidateId) -> Option<Candidate> {
        self.lock().ok()?.candidates.get(id).cloned()
    }

    pub fn candidate_count(&self) -> usize {
        self.lock().map(|tables| tables.candidates.len()).unwrap_or(0)
    }

    pub fn educations_for(&self, id: &CandidateId) -> Vec<Education> {
        self.lock()
            .map(|tables| {
                tables
                    .educations
                    .iter()
                    .filter(|row| &row.candidate_id == id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn work_experiences_for(&self, id: &CandidateId) -> Vec<WorkExperience> {
        self.lock()
            .map(|tables| {
                tables
                    .work_experiences
                    .iter()
                    .filter(|row| &row.candidate_id == id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn resumes_for(&self, id: &CandidateId) -> Vec<Resume> {
        self.lock()
            .map(|tables| {
                tables
                    .resumes
                    .iter()
                    .filter(|row| &row.candidate_id == id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl CandidateStore for InMemoryCandidateStore {
    async fn save_candidate(&self, candidate: NewCandidate) -> Result<Candidate, PersistenceError> {
        let mut tables = self.lock()?;
        let key = candidate.email.to_lowercase();
        if tables.emails.contains(&key) {
            return Err(PersistenceError::unique_violation("email"));
        }

        let id = CandidateId(tables.next_id());
        let stored = candidate.into_candidate(id.clone());
        tables.emails.insert(key);
        tables.candidates.insert(id, stored.clone());
        Ok(stored)
    }

    async fn save_education(
        &self,
        education: NewEducation,
    ) -> Result<Education, PersistenceError> {
        let mut tables = self.lock()?;
        tables.require_candidate(&education.candidate_id)?;
        let record = education.into_record(RecordId(tables.next_id()));
        tables.educations.push(record.clone());
        Ok(record)
    }

    async fn save_work_experience(
        &self,
        experience: NewWorkExperience,
    ) -> Result<WorkExperience, PersistenceError> {
        let mut tables = self.lock()?;
        tables.require_candidate(&experience.candidate_id)?;
        let record = experience.into_record(RecordId(tables.next_id()));
        tables.work_experiences.push(record.clone());
        Ok(record)
    }

    async fn save_resume(&self, resume: NewResume) -> Result<Resume, PersistenceError> {
        let mut tables = self.lock()?;
        tables.require_candidate(&resume.candidate_id)?;
        let record = resume.into_record(RecordId(tables.next_id()), Utc::now());
        tables.resumes.push(record.clone());
        Ok(record)
    }
}
