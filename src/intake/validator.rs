use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use super::domain::{
    CandidateSubmission, EducationInput, NormalizedSubmission, ResumeInput, WorkExperienceInput,
};
use crate::config::IntakeConfig;

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}][\p{L} '.\-]*$").expect("valid name regex"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9][0-9 \-]*$").expect("valid phone regex"));

const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 100;
const EMAIL_MAX_CHARS: usize = 254;
const PHONE_MIN_DIGITS: usize = 7;
const PHONE_MAX_DIGITS: usize = 15;
const ADDRESS_MAX_CHARS: usize = 100;
const INSTITUTION_MAX_CHARS: usize = 100;
const DEGREE_MAX_CHARS: usize = 250;
const COMPANY_MAX_CHARS: usize = 100;
const POSITION_MAX_CHARS: usize = 100;
const DESCRIPTION_MAX_CHARS: usize = 200;
const FILE_NAME_MAX_CHARS: usize = 255;

pub(crate) const DEFAULT_MAX_ENTRIES: usize = 50;
pub(crate) const DEFAULT_MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;

/// Rejections raised before anything touches storage. The message is surfaced to callers as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    MissingField { field: String },
    #[error("name must be 2-100 characters of letters, spaces, apostrophes, hyphens or periods")]
    InvalidName,
    #[error("email must be a valid address")]
    InvalidEmail,
    #[error("phone must contain 7-15 digits")]
    InvalidPhone,
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },
    #[error("{field} end date {end} precedes start date {start}")]
    InvalidDateRange {
        field: String,
        start: NaiveDate,
        end: NaiveDate,
    },
    #[error("{field} accepts at most {max} entries (found {found})")]
    TooManyEntries {
        field: &'static str,
        max: usize,
        found: usize,
    },
    #[error("cv exceeds {max} bytes (found {found})")]
    ResumeTooLarge { max: usize, found: usize },
}

/// Limits applied on top of the fixed field rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationPolicy {
    pub max_entries: usize,
    pub max_resume_bytes: usize,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            max_resume_bytes: DEFAULT_MAX_RESUME_BYTES,
        }
    }
}

impl From<&IntakeConfig> for ValidationPolicy {
    fn from(config: &IntakeConfig) -> Self {
        Self {
            max_entries: config.max_entries,
            max_resume_bytes: config.max_resume_bytes,
        }
    }
}

/// Seam between the intake service and submission validation.
pub trait SubmissionValidator: Send + Sync {
    fn validate(
        &self,
        submission: &CandidateSubmission,
    ) -> Result<NormalizedSubmission, ValidationError>;
}

/// Default validator enforcing the candidate field rules.
#[derive(Debug, Clone, Default)]
pub struct CandidateValidator {
    policy: ValidationPolicy,
}

impl CandidateValidator {
    pub fn with_policy(policy: ValidationPolicy) -> Self {
        Self { policy }
    }
}

impl SubmissionValidator for CandidateValidator {
    fn validate(
        &self,
        submission: &CandidateSubmission,
    ) -> Result<NormalizedSubmission, ValidationError> {
        validate_candidate_data(submission, &self.policy)
    }
}

/// Check a raw submission and return its normalized form.
///
/// Top-level strings are trimmed and the email is lower-cased. Child inputs are checked but
/// returned untouched so each one reaches its record constructor exactly as submitted.
pub fn validate_candidate_data(
    submission: &CandidateSubmission,
    policy: &ValidationPolicy,
) -> Result<NormalizedSubmission, ValidationError> {
    let name = validate_name(&submission.name)?;
    let email = validate_email(&submission.email)?;
    let phone = normalize_optional(submission.phone.as_deref())
        .map(validate_phone)
        .transpose()?;
    let address = normalize_optional(submission.address.as_deref())
        .map(|address| {
            ensure_max_chars("address", address, ADDRESS_MAX_CHARS)?;
            Ok(address.to_string())
        })
        .transpose()?;

    ensure_entry_count("educations", submission.educations.len(), policy)?;
    for (index, education) in submission.educations.iter().enumerate() {
        validate_education(index, education)?;
    }

    ensure_entry_count("workExperiences", submission.work_experiences.len(), policy)?;
    for (index, experience) in submission.work_experiences.iter().enumerate() {
        validate_work_experience(index, experience)?;
    }

    if let Some(cv) = &submission.cv {
        validate_resume(cv, policy)?;
    }

    Ok(NormalizedSubmission {
        name,
        email,
        phone,
        address,
        educations: submission.educations.clone(),
        work_experiences: submission.work_experiences.clone(),
        cv: submission.cv.clone(),
    })
}

fn validate_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(missing("name"));
    }

    let chars = name.chars().count();
    if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&chars) || !NAME_RE.is_match(name) {
        return Err(ValidationError::InvalidName);
    }

    Ok(name.to_string())
}

fn validate_email(raw: &str) -> Result<String, ValidationError> {
    let email = raw.trim();
    if email.is_empty() {
        return Err(missing("email"));
    }

    if email.chars().count() > EMAIL_MAX_CHARS || !EMAIL_RE.is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(email.to_lowercase())
}

fn validate_phone(phone: &str) -> Result<String, ValidationError> {
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if !PHONE_RE.is_match(phone) || !(PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits) {
        return Err(ValidationError::InvalidPhone);
    }
    Ok(phone.to_string())
}

fn validate_education(index: usize, education: &EducationInput) -> Result<(), ValidationError> {
    let prefix = format!("educations[{index}]");
    ensure_required(&prefix, "institution", &education.institution)?;
    ensure_max_chars(
        &format!("{prefix}.institution"),
        &education.institution,
        INSTITUTION_MAX_CHARS,
    )?;
    ensure_required(&prefix, "degree", &education.degree)?;
    ensure_max_chars(
        &format!("{prefix}.degree"),
        &education.degree,
        DEGREE_MAX_CHARS,
    )?;
    ensure_date_order(&prefix, education.start_date, education.end_date)
}

fn validate_work_experience(
    index: usize,
    experience: &WorkExperienceInput,
) -> Result<(), ValidationError> {
    let prefix = format!("workExperiences[{index}]");
    ensure_required(&prefix, "company", &experience.company)?;
    ensure_max_chars(
        &format!("{prefix}.company"),
        &experience.company,
        COMPANY_MAX_CHARS,
    )?;
    ensure_required(&prefix, "position", &experience.position)?;
    ensure_max_chars(
        &format!("{prefix}.position"),
        &experience.position,
        POSITION_MAX_CHARS,
    )?;
    if let Some(description) = &experience.description {
        ensure_max_chars(
            &format!("{prefix}.description"),
            description,
            DESCRIPTION_MAX_CHARS,
        )?;
    }
    ensure_date_order(&prefix, experience.start_date, experience.end_date)
}

fn validate_resume(cv: &ResumeInput, policy: &ValidationPolicy) -> Result<(), ValidationError> {
    ensure_required("cv", "fileName", &cv.file_name)?;
    ensure_max_chars("cv.fileName", &cv.file_name, FILE_NAME_MAX_CHARS)?;
    ensure_required("cv", "fileContent", &cv.file_content)?;

    let found = cv.file_content.len();
    if found > policy.max_resume_bytes {
        return Err(ValidationError::ResumeTooLarge {
            max: policy.max_resume_bytes,
            found,
        });
    }
    Ok(())
}

fn ensure_entry_count(
    field: &'static str,
    found: usize,
    policy: &ValidationPolicy,
) -> Result<(), ValidationError> {
    if found > policy.max_entries {
        return Err(ValidationError::TooManyEntries {
            field,
            max: policy.max_entries,
            found,
        });
    }
    Ok(())
}

fn ensure_required(prefix: &str, field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(missing(&format!("{prefix}.{field}")));
    }
    Ok(())
}

fn ensure_max_chars(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

fn ensure_date_order(
    field: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), ValidationError> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(ValidationError::InvalidDateRange {
            field: field.to_string(),
            start,
            end,
        }),
        _ => Ok(()),
    }
}

fn normalize_optional(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn missing(field: &str) -> ValidationError {
    ValidationError::MissingField {
        field: field.to_string(),
    }
}
