use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_glue::Client;

use super::catalog::GlueApi;
use super::pagination::Page;
use super::{GlueError, JobRun};
use crate::settings::{self, GlueSettings};

/// AWS Glue client used for the job catalog and run history queries.
#[derive(Debug, Clone)]
pub struct GlueContext {
    inner: Arc<GlueContextRef>,
}

impl GlueContext {
    pub fn new(client: Client, page_size: Option<i32>) -> Self {
        Self { inner: Arc::new(GlueContextRef { client, page_size }) }
    }

    #[tracing::instrument(level = "info")]
    pub async fn from_settings(settings: &GlueSettings) -> Self {
        let sdk_config = settings::load_aws_config(settings.region.as_deref()).await;
        let mut builder = aws_sdk_glue::config::Builder::from(&sdk_config);
        if let Some(ref endpoint_url) = settings.endpoint_url {
            builder = builder.endpoint_url(endpoint_url);
        }

        Self::new(Client::from_conf(builder.build()), settings.page_size)
    }

    pub fn client(&self) -> &Client {
        &self.inner.client
    }
}

#[async_trait]
impl GlueApi for GlueContext {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn list_jobs(&self, next_token: Option<String>) -> Result<Page<String>, GlueError> {
        let response = self
            .inner
            .client
            .list_jobs()
            .set_next_token(next_token)
            .set_max_results(self.inner.page_size.map(|size| size.clamp(1, MAX_LIST_JOBS_RESULTS)))
            .send()
            .await?;

        let job_names = response.job_names().to_vec();
        tracing::debug!(nr_jobs=%job_names.len(), next_token=?response.next_token(), "glue list jobs page received");
        Ok(Page::new(job_names, response.next_token().map(|t| t.to_string())))
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn get_job_runs(&self, job_name: &str, next_token: Option<String>) -> Result<Page<JobRun>, GlueError> {
        let response = self
            .inner
            .client
            .get_job_runs()
            .job_name(job_name)
            .set_next_token(next_token)
            .set_max_results(self.inner.page_size.map(|size| size.clamp(1, MAX_GET_JOB_RUNS_RESULTS)))
            .send()
            .await
            .map_err(|source| GlueError::GetJobRuns { job_name: job_name.to_string(), source })?;

        let runs = response
            .job_runs()
            .iter()
            .map(JobRun::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(nr_runs=%runs.len(), next_token=?response.next_token(), "glue job runs page received");
        Ok(Page::new(runs, response.next_token().map(|t| t.to_string())))
    }
}

const MAX_LIST_JOBS_RESULTS: i32 = 1000;
const MAX_GET_JOB_RUNS_RESULTS: i32 = 200;

struct GlueContextRef {
    client: Client,
    /// Requested page size; Glue picks its own when unset.
    page_size: Option<i32>,
}

impl fmt::Debug for GlueContextRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlueContextRef")
            .field("page_size", &self.page_size)
            .finish()
    }
}
