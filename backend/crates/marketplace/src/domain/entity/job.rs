//! Job Entity
//!
//! A job posting with its embedded applicant list. Each user applies to a
//! job at most once; entries move through [`ApplicationStatus`] and are
//! frozen once accepted or rejected.

use accounts::domain::value_object::{Email, MobileNumber};
use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::{JobId, UserId};
use platform::document::Document;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Listing;
use crate::domain::validator::{ApplicationForm, JobDraft};
use crate::domain::value_objects::{ApplicationStatus, JobStatus, JobType, Salary};
use crate::error::{MarketError, MarketResult};

/// Contact details from the application form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantContact {
    pub full_name: String,
    pub contact_number: MobileNumber,
    #[serde(default)]
    pub email: Option<Email>,
    pub address: String,
    pub region: String,
    #[serde(default)]
    pub experience: Option<String>,
}

/// One user's application, owned by the job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Applicant {
    pub user: UserId,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub contact: Option<ApplicantContact>,
    pub applied_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub employer: UserId,
    pub title: String,
    pub description: String,
    pub job_type: JobType,
    pub location: String,
    #[serde(default)]
    pub salary: Salary,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub experience_required: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    applicants: Vec<Applicant>,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(employer: UserId, draft: JobDraft) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            employer,
            title: draft.title,
            description: draft.description,
            job_type: draft.job_type,
            location: draft.location,
            salary: draft.salary,
            duration: draft.duration,
            experience_required: draft.experience_required,
            skills: draft.skills,
            applicants: Vec::new(),
            status: draft.status,
            start_date: draft.start_date,
            end_date: draft.end_date,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, draft: JobDraft) {
        self.title = draft.title;
        self.description = draft.description;
        self.job_type = draft.job_type;
        self.location = draft.location;
        self.salary = draft.salary;
        self.duration = draft.duration;
        self.experience_required = draft.experience_required;
        self.skills = draft.skills;
        self.status = draft.status;
        self.start_date = draft.start_date;
        self.end_date = draft.end_date;
        self.touch();
    }

    // ========================================================================
    // Applicants
    // ========================================================================

    pub fn applicants(&self) -> &[Applicant] {
        &self.applicants
    }

    pub fn applicant(&self, user: UserId) -> Option<&Applicant> {
        self.applicants.iter().find(|a| a.user == user)
    }

    /// Append an application for `user`
    ///
    /// One application per user per job, ever; only open jobs accept them.
    pub fn add_applicant(&mut self, user: UserId, form: ApplicationForm) -> MarketResult<Applicant> {
        if self.applicant(user).is_some() {
            return Err(MarketError::DuplicateApplication);
        }
        if self.status != JobStatus::Open {
            return Err(MarketError::JobClosed(self.status));
        }

        let applicant = Applicant {
            user,
            status: ApplicationStatus::Pending,
            message: form.message,
            contact: form.contact,
            applied_at: Utc::now(),
        };
        self.applicants.push(applicant.clone());
        self.touch();
        Ok(applicant)
    }

    /// Move `user`'s application to `next`
    pub fn set_applicant_status(
        &mut self,
        user: UserId,
        next: ApplicationStatus,
    ) -> MarketResult<Applicant> {
        let applicant = self
            .applicants
            .iter_mut()
            .find(|a| a.user == user)
            .ok_or(MarketError::NotFound("Application"))?;

        if !applicant.status.can_transition_to(next) {
            return Err(MarketError::InvalidTransition {
                from: applicant.status,
                to: next,
            });
        }

        applicant.status = next;
        let updated = applicant.clone();
        self.touch();
        Ok(updated)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Document for Job {
    const COLLECTION: &'static str = "jobs";

    fn key(&self) -> Uuid {
        self.id.into_uuid()
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Listing for Job {
    type Id = JobId;
    const NAME: &'static str = "Job";

    fn id(&self) -> JobId {
        self.id
    }

    fn owner(&self) -> UserId {
        self.employer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validator::{JobInput, validate_job};

    fn sample() -> Job {
        let draft = validate_job(JobInput {
            title: Some("Tractor driver".into()),
            description: Some("Ploughing for the rabi season".into()),
            job_type: Some("seasonal".into()),
            location: Some("Ludhiana".into()),
            ..Default::default()
        })
        .unwrap();
        Job::new(UserId::new(), draft)
    }

    fn form(job: &Job) -> ApplicationForm {
        ApplicationForm {
            job_id: job.id,
            message: Some("Five years on a Mahindra 575".into()),
            contact: None,
        }
    }

    #[test]
    fn test_one_application_per_user() {
        let mut job = sample();
        let user = UserId::new();
        let first = job.add_applicant(user, form(&job)).unwrap();
        assert_eq!(first.status, ApplicationStatus::Pending);

        let again = job.add_applicant(user, form(&job));
        assert!(matches!(again, Err(MarketError::DuplicateApplication)));
        assert_eq!(job.applicants(), &[first]);
    }

    #[test]
    fn test_duplicate_rejected_even_after_terminal_state() {
        let mut job = sample();
        let user = UserId::new();
        job.add_applicant(user, form(&job)).unwrap();
        job.set_applicant_status(user, ApplicationStatus::Rejected).unwrap();

        assert!(matches!(
            job.add_applicant(user, form(&job)),
            Err(MarketError::DuplicateApplication)
        ));
    }

    #[test]
    fn test_closed_job_refuses_applications() {
        let mut job = sample();
        job.status = JobStatus::Filled;
        assert!(matches!(
            job.add_applicant(UserId::new(), form(&job)),
            Err(MarketError::JobClosed(JobStatus::Filled))
        ));
    }

    #[test]
    fn test_status_lifecycle() {
        let mut job = sample();
        let user = UserId::new();
        job.add_applicant(user, form(&job)).unwrap();

        assert_eq!(
            job.set_applicant_status(user, ApplicationStatus::Reviewed).unwrap().status,
            ApplicationStatus::Reviewed
        );
        assert!(matches!(
            job.set_applicant_status(user, ApplicationStatus::Pending),
            Err(MarketError::InvalidTransition { .. })
        ));
        job.set_applicant_status(user, ApplicationStatus::Accepted).unwrap();

        for next in ApplicationStatus::ALL {
            assert!(matches!(
                job.set_applicant_status(user, *next),
                Err(MarketError::InvalidTransition { .. })
            ));
        }
        assert_eq!(job.applicant(user).unwrap().status, ApplicationStatus::Accepted);

        assert!(matches!(
            job.set_applicant_status(UserId::new(), ApplicationStatus::Reviewed),
            Err(MarketError::NotFound("Application"))
        ));
    }
}
