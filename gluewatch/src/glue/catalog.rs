use std::fmt::Debug;

use async_trait::async_trait;

use super::pagination::{drain_pages, Page};
use super::{GlueError, JobRun};
use crate::glue;

/// Read-only page queries against the Glue job service.
#[async_trait]
pub trait GlueApi: Debug + Send + Sync {
    async fn list_jobs(&self, next_token: Option<String>) -> Result<Page<String>, GlueError>;

    async fn get_job_runs(&self, job_name: &str, next_token: Option<String>) -> Result<Page<JobRun>, GlueError>;
}

/// Every job name known to Glue, in discovery order.
#[tracing::instrument(level = "info", skip(api))]
pub async fn list_all_job_names<G>(api: &G) -> Result<Vec<String>, GlueError>
where
    G: GlueApi + ?Sized,
{
    let _timer = glue::start_glue_api_timer(glue::LIST_JOBS);
    let result = drain_pages(move |token| api.list_jobs(token)).await;
    glue::track_result(glue::LIST_JOBS, result, "failed to list glue jobs")
}

/// The complete run history of a job, in the order Glue returns it (most recent first).
/// A job that never ran yields an empty history.
#[tracing::instrument(level = "info", skip(api))]
pub async fn list_job_runs<G>(api: &G, job_name: &str) -> Result<Vec<JobRun>, GlueError>
where
    G: GlueApi + ?Sized,
{
    let _timer = glue::start_glue_api_timer(glue::GET_JOB_RUNS);
    let result = drain_pages(move |token| api.get_job_runs(job_name, token)).await;
    glue::track_result(glue::GET_JOB_RUNS, result, "failed to fetch glue job run history")
}
