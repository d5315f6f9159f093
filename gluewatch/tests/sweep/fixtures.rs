use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use aws_sdk_cloudwatch::error::SdkError;
use chrono::{DateTime, TimeZone, Utc};
use gluewatch::cloudwatch::{MetricBatch, MetricsPublisher, PublishError, RunScope};
use gluewatch::engine::{Clock, Forwarder};
use gluewatch::glue::{GlueApi, GlueError, JobRun, Page, RunState};
use gluewatch::settings::Settings;
use once_cell::sync::Lazy;

pub static NOW: Lazy<DateTime<Utc>> = Lazy::new(|| Utc.timestamp_opt(1_700_000_000, 0).unwrap());

pub fn fixed_clock() -> Clock {
    Arc::new(|| *NOW)
}

pub fn secs_ago(secs: i64) -> DateTime<Utc> {
    *NOW - chrono::Duration::seconds(secs)
}

pub fn make_run(id: &str, state: RunState, completed_secs_ago: Option<i64>, execution_time_secs: i64) -> JobRun {
    JobRun {
        id: id.to_string(),
        state,
        started_on: Some(secs_ago(7_200)),
        completed_on: completed_secs_ago.map(secs_ago),
        execution_time_secs,
        error_message: None,
    }
}

/// Glue job service held in memory, serving listings in pages of `page_size`. Continuation
/// tokens are the offset of the next page.
#[derive(Debug)]
pub struct InMemoryGlue {
    jobs: Vec<(String, Vec<JobRun>)>,
    page_size: usize,
    pub list_jobs_requests: Mutex<Vec<Option<String>>>,
    pub job_runs_requests: Mutex<Vec<(String, Option<String>)>>,
}

impl InMemoryGlue {
    pub fn new(jobs: Vec<(&str, Vec<JobRun>)>, page_size: usize) -> Self {
        Self {
            jobs: jobs.into_iter().map(|(name, runs)| (name.to_string(), runs)).collect(),
            page_size,
            list_jobs_requests: Mutex::new(Vec::new()),
            job_runs_requests: Mutex::new(Vec::new()),
        }
    }

    fn page_of<T: Clone>(&self, items: &[T], next_token: Option<&str>) -> Page<T> {
        let offset: usize = next_token.and_then(|t| t.parse().ok()).unwrap_or(0);
        let end = (offset + self.page_size).min(items.len());
        let next_token = if end < items.len() { Some(end.to_string()) } else { None };
        Page::new(items[offset..end].to_vec(), next_token)
    }
}

#[async_trait]
impl GlueApi for InMemoryGlue {
    async fn list_jobs(&self, next_token: Option<String>) -> Result<Page<String>, GlueError> {
        self.list_jobs_requests.lock().unwrap().push(next_token.clone());
        let names: Vec<String> = self.jobs.iter().map(|(name, _)| name.clone()).collect();
        Ok(self.page_of(&names, next_token.as_deref()))
    }

    async fn get_job_runs(&self, job_name: &str, next_token: Option<String>) -> Result<Page<JobRun>, GlueError> {
        self.job_runs_requests
            .lock()
            .unwrap()
            .push((job_name.to_string(), next_token.clone()));
        let runs = self
            .jobs
            .iter()
            .find(|(name, _)| name == job_name)
            .map(|(_, runs)| runs.clone())
            .unwrap_or_default();
        Ok(self.page_of(&runs, next_token.as_deref()))
    }
}

/// Publisher recording every batch it accepts and rejecting batches for the listed
/// `(job name, run id)` pairs.
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    pub accepted: Mutex<Vec<MetricBatch>>,
    pub attempts: Mutex<HashMap<String, usize>>,
    rejects: Vec<(String, String)>,
}

impl RecordingPublisher {
    pub fn rejecting(rejects: Vec<(&str, &str)>) -> Self {
        Self {
            rejects: rejects.into_iter().map(|(j, r)| (j.to_string(), r.to_string())).collect(),
            ..Self::default()
        }
    }

    pub fn accepted_for(&self, job_name: &str) -> Vec<MetricBatch> {
        self.accepted
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.job_name == job_name)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl MetricsPublisher for RecordingPublisher {
    async fn publish(&self, batch: &MetricBatch) -> Result<(), PublishError> {
        *self.attempts.lock().unwrap().entry(batch.job_name.clone()).or_default() += 1;

        let rejected = self
            .rejects
            .iter()
            .any(|(job, run)| job == &batch.job_name && run == batch.scope.run_id());
        if rejected {
            return Err(PublishError::PutMetricData(SdkError::construction_failure("rejected by test")));
        }

        self.accepted.lock().unwrap().push(batch.clone());
        Ok(())
    }
}

pub fn make_forwarder(glue: InMemoryGlue, publisher: RecordingPublisher) -> Forwarder<InMemoryGlue, RecordingPublisher> {
    Forwarder::new(glue, publisher, &Settings::default()).with_clock(fixed_clock())
}

pub fn aggregate(batches: &[MetricBatch]) -> Vec<&MetricBatch> {
    batches.iter().filter(|b| b.scope == RunScope::Aggregate).collect()
}

pub fn per_run(batches: &[MetricBatch]) -> Vec<&MetricBatch> {
    batches.iter().filter(|b| b.scope != RunScope::Aggregate).collect()
}
