mod outcome;

pub use outcome::{PublishFailure, SweepOutcome};

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts};

use crate::cloudwatch::{self, MetricBatch, MetricsPublisher, RunScope};
use crate::glue::{self, GlueApi, GlueError, JobRun};
use crate::phases::derive::{self, AverageMode};
use crate::phases::eligibility::EligibilityPolicy;
use crate::settings::Settings;

pub static SWEEP_TIME: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new("sweep_time", "Time spent on a full sweep of the Glue job catalog in seconds")
            .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0, 60.0, 120.0, 300.0]),
    )
    .expect("failed creating sweep_time metric")
});

/// Source of the capture and reference times of a sweep.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Walks the Glue job catalog and forwards job and run health to the metrics publisher.
pub struct Forwarder<G, P> {
    glue: G,
    publisher: P,
    eligibility: EligibilityPolicy,
    average: AverageMode,
    source_tag: String,
    clock: Clock,
}

impl<G, P> fmt::Debug for Forwarder<G, P>
where
    G: fmt::Debug,
    P: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Forwarder")
            .field("glue", &self.glue)
            .field("publisher", &self.publisher)
            .field("eligibility", &self.eligibility)
            .field("average", &self.average)
            .field("source_tag", &self.source_tag)
            .finish()
    }
}

impl<G, P> Forwarder<G, P>
where
    G: GlueApi,
    P: MetricsPublisher,
{
    pub fn new(glue: G, publisher: P, settings: &Settings) -> Self {
        Self {
            glue,
            publisher,
            eligibility: EligibilityPolicy::new(&settings.eligibility),
            average: settings.derive.average,
            source_tag: settings.cloudwatch.source_tag.clone(),
            clock: Arc::new(Utc::now),
        }
    }

    pub fn with_clock(self, clock: Clock) -> Self {
        Self { clock, ..self }
    }

    pub fn glue(&self) -> &G {
        &self.glue
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// One pass over every job: aggregate metrics per job followed by per-run metrics for its
    /// eligible runs. Glue failures abort the sweep; publish failures are recorded in the
    /// outcome and the sweep moves on.
    #[tracing::instrument(level = "info", skip(self))]
    pub async fn sweep(&self) -> Result<SweepOutcome, GlueError> {
        let _timer = SWEEP_TIME.start_timer();
        let mut outcome = SweepOutcome::default();

        let job_names = glue::list_all_job_names(&self.glue).await?;
        tracing::info!(nr_jobs=%job_names.len(), "glue job catalog listed");

        for job_name in job_names {
            self.forward_job(&job_name, &mut outcome).await?;
        }

        tracing::info!(?outcome, "glue sweep finished");
        Ok(outcome)
    }

    #[tracing::instrument(level = "info", skip(self, outcome))]
    async fn forward_job(&self, job_name: &str, outcome: &mut SweepOutcome) -> Result<(), GlueError> {
        outcome.jobs_seen += 1;

        let runs = glue::list_job_runs(&self.glue, job_name).await?;
        let latest = match runs.first() {
            Some(latest) => latest,
            None => {
                tracing::info!(%job_name, "no runs found for glue job - skipping");
                outcome.jobs_skipped += 1;
                return Ok(());
            },
        };

        if let Some(values) = derive::derive_job_metrics(&runs, self.average) {
            let batch = MetricBatch::new(
                job_name,
                RunScope::Aggregate,
                values,
                latest.error_message.as_deref(),
                self.source_tag.as_str(),
                (self.clock)(),
            );
            self.publish(batch, outcome).await;
        }

        let reference_time = (self.clock)();
        let eligible = self.eligibility.select_eligible(&runs, reference_time);
        tracing::debug!(%job_name, nr_runs=%runs.len(), nr_eligible=%eligible.len(), "eligible glue job runs selected");
        for run in eligible {
            self.forward_run(job_name, run, outcome).await;
        }

        Ok(())
    }

    async fn forward_run(&self, job_name: &str, run: &JobRun, outcome: &mut SweepOutcome) {
        let batch = MetricBatch::new(
            job_name,
            RunScope::Run(run.id.clone()),
            derive::derive_run_metrics(run),
            run.error_message.as_deref(),
            self.source_tag.as_str(),
            (self.clock)(),
        );
        self.publish(batch, outcome).await;
    }

    async fn publish(&self, batch: MetricBatch, outcome: &mut SweepOutcome) {
        match cloudwatch::publish_tracked(&self.publisher, &batch).await {
            Ok(()) => outcome.record_published(&batch),
            Err(error) => outcome.record_failure(PublishFailure {
                job_name: batch.job_name,
                scope: batch.scope,
                error,
            }),
        }
    }
}
