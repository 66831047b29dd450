//! Application Subsystem
//!
//! Applicant entries live inside the job document, so the duplicate check,
//! the open-job check and the append happen in one atomic update. Two
//! concurrent applications by the same user leave exactly one entry.

use std::sync::Arc;

use kernel::id::{JobId, UserId};

use crate::application::listing;
use crate::domain::entity::{Applicant, Job, Listing};
use crate::domain::repository::ListingRepository;
use crate::domain::validator::{ApplyInput, validate_application};
use crate::domain::value_objects::ApplicationStatus;
use crate::error::{MarketError, MarketResult};

/// Application use case
pub struct ApplicationService<J>
where
    J: ListingRepository<Job>,
{
    jobs: Arc<J>,
}

impl<J> ApplicationService<J>
where
    J: ListingRepository<Job> + Sync,
{
    pub fn new(jobs: Arc<J>) -> Self {
        Self { jobs }
    }

    /// Submit `applicant`'s application to the job named in the form
    pub async fn apply(&self, applicant: UserId, input: ApplyInput) -> MarketResult<Applicant> {
        let form = validate_application(input)?;
        let job_id = form.job_id;

        let record = self
            .jobs
            .modify(job_id, |job| job.add_applicant(applicant, form.clone()))
            .await?
            .ok_or(MarketError::NotFound("Job"))?;

        tracing::info!(job_id = %job_id, applicant = %applicant, "Application submitted");

        Ok(record)
    }

    /// Employer moves one applicant's entry along the state machine
    pub async fn set_status(
        &self,
        job_id: JobId,
        applicant: UserId,
        next: ApplicationStatus,
        requester: UserId,
    ) -> MarketResult<Applicant> {
        let record = self
            .jobs
            .modify(job_id, |job| {
                job.ensure_owner(requester)?;
                job.set_applicant_status(applicant, next)
            })
            .await?
            .ok_or(MarketError::NotFound("Job"))?;

        tracing::info!(
            job_id = %job_id,
            applicant = %applicant,
            status = %next,
            "Application status changed"
        );

        Ok(record)
    }

    /// Every entry on the job; employer only
    pub async fn list_applicants(&self, job_id: JobId, requester: UserId) -> MarketResult<Vec<Applicant>> {
        let job: Job = listing::fetch(self.jobs.as_ref(), job_id).await?;
        job.ensure_owner(requester)?;
        Ok(job.applicants().to_vec())
    }

    /// The requester's own entry on the job
    pub async fn my_application(&self, job_id: JobId, user: UserId) -> MarketResult<Applicant> {
        let job: Job = listing::fetch(self.jobs.as_ref(), job_id).await?;
        job.applicant(user)
            .cloned()
            .ok_or(MarketError::NotFound("Application"))
    }
}
