//! Job Service

use std::sync::Arc;

use kernel::id::{JobId, UserId};

use crate::application::config::MarketConfig;
use crate::application::listing;
use crate::domain::entity::Job;
use crate::domain::filter::{JobFilter, Page};
use crate::domain::repository::ListingRepository;
use crate::domain::search::SearchQuery;
use crate::domain::validator::{JobInput, validate_job};
use crate::error::MarketResult;

/// Job listing store
pub struct JobService<J>
where
    J: ListingRepository<Job>,
{
    jobs: Arc<J>,
    config: Arc<MarketConfig>,
}

impl<J> JobService<J>
where
    J: ListingRepository<Job> + Sync,
{
    pub fn new(jobs: Arc<J>, config: Arc<MarketConfig>) -> Self {
        Self { jobs, config }
    }

    pub async fn create(&self, employer: UserId, input: JobInput) -> MarketResult<Job> {
        let draft = validate_job(input)?;
        let job = Job::new(employer, draft);
        self.jobs.create(&job).await?;

        tracing::info!(job_id = %job.id, employer = %employer, "Job posted");

        Ok(job)
    }

    pub async fn get(&self, id: JobId) -> MarketResult<Job> {
        listing::fetch(self.jobs.as_ref(), id).await
    }

    pub async fn list(
        &self,
        filter: &JobFilter,
        page: Page,
        q: Option<&str>,
        fields: Option<&str>,
    ) -> MarketResult<Vec<Job>> {
        let pattern = filter.pattern()?;
        let query = SearchQuery::parse::<Job>(q, fields)?;
        listing::browse(self.jobs.as_ref(), &pattern, &query, self.config.slice(page)).await
    }

    /// Owner-only patch; this is also how an employer closes or fills a job
    pub async fn update(&self, id: JobId, requester: UserId, patch: JobInput) -> MarketResult<Job> {
        let job = listing::edit(self.jobs.as_ref(), id, requester, |job: &mut Job| {
            let merged = JobInput::from(&*job).merge(patch.clone());
            job.apply(validate_job(merged)?);
            Ok(())
        })
        .await?;

        tracing::info!(job_id = %id, status = %job.status, "Job updated");

        Ok(job)
    }

    pub async fn delete(&self, id: JobId, requester: UserId) -> MarketResult<()> {
        listing::remove::<Job, _>(self.jobs.as_ref(), id, requester).await
    }
}
