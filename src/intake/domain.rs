use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned to a candidate row by the persistence gateway.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub String);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier assigned to child rows (education, work experience, resume).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub String);

/// Raw intake request as received from the HTTP layer or the CLI.
///
/// Absent text fields decode as empty so the validator reports them as missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub educations: Vec<EducationInput>,
    #[serde(default)]
    pub work_experiences: Vec<WorkExperienceInput>,
    #[serde(default)]
    pub cv: Option<ResumeInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationInput {
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperienceInput {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

/// CV metadata. The binary itself is stored elsewhere; `file_content` is an inline
/// payload or a storage reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeInput {
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub file_content: String,
    #[serde(default)]
    pub file_type: Option<String>,
}

/// Validator output. Top-level fields are trimmed; child inputs are carried unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedSubmission {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub educations: Vec<EducationInput>,
    pub work_experiences: Vec<WorkExperienceInput>,
    pub cv: Option<ResumeInput>,
}

/// Persisted candidate root with the child collections attached during intake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub education: Vec<Education>,
    pub work_experience: Vec<WorkExperience>,
    pub resumes: Vec<Resume>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub id: RecordId,
    pub candidate_id: CandidateId,
    pub degree: String,
    pub institution: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperience {
    pub id: RecordId,
    pub candidate_id: CandidateId,
    pub company: String,
    pub position: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    pub id: RecordId,
    pub candidate_id: CandidateId,
    pub file_name: String,
    pub file_type: Option<String>,
    #[serde(skip_serializing, default)]
    pub file_content: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Unsaved candidate row. Collections are attached by the intake service after saving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCandidate {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl NewCandidate {
    pub fn from_submission(submission: &NormalizedSubmission) -> Self {
        Self {
            name: submission.name.clone(),
            email: submission.email.clone(),
            phone: submission.phone.clone(),
            address: submission.address.clone(),
        }
    }

    /// Shape the stored row into a candidate with empty collections.
    pub fn into_candidate(self, id: CandidateId) -> Candidate {
        Candidate {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            education: Vec::new(),
            work_experience: Vec::new(),
            resumes: Vec::new(),
        }
    }
}

/// Unsaved education row keyed to its parent candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEducation {
    pub candidate_id: CandidateId,
    pub input: EducationInput,
}

impl NewEducation {
    pub fn new(candidate_id: CandidateId, input: EducationInput) -> Self {
        Self {
            candidate_id,
            input,
        }
    }

    pub fn into_record(self, id: RecordId) -> Education {
        let EducationInput {
            degree,
            institution,
            start_date,
            end_date,
        } = self.input;
        Education {
            id,
            candidate_id: self.candidate_id,
            degree,
            institution,
            start_date,
            end_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorkExperience {
    pub candidate_id: CandidateId,
    pub input: WorkExperienceInput,
}

impl NewWorkExperience {
    pub fn new(candidate_id: CandidateId, input: WorkExperienceInput) -> Self {
        Self {
            candidate_id,
            input,
        }
    }

    pub fn into_record(self, id: RecordId) -> WorkExperience {
        let WorkExperienceInput {
            company,
            position,
            description,
            start_date,
            end_date,
        } = self.input;
        WorkExperience {
            id,
            candidate_id: self.candidate_id,
            company,
            position,
            description,
            start_date,
            end_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewResume {
    pub candidate_id: CandidateId,
    pub input: ResumeInput,
}

impl NewResume {
    pub fn new(candidate_id: CandidateId, input: ResumeInput) -> Self {
        Self {
            candidate_id,
            input,
        }
    }

    pub fn into_record(self, id: RecordId, uploaded_at: DateTime<Utc>) -> Resume {
        let ResumeInput {
            file_name,
            file_content,
            file_type,
        } = self.input;
        Resume {
            id,
            candidate_id: self.candidate_id,
            file_name,
            file_type,
            file_content,
            uploaded_at,
        }
    }
}
