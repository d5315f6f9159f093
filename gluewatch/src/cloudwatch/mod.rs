mod context;
mod error;
mod model;
mod publisher;

pub use context::CloudWatchContext;
pub use error::PublishError;
pub use model::{
    Dimension, MetricBatch, MetricPoint, MetricUnit, MetricValue, RunScope, AGGREGATE_RUN_ID,
    MAX_DIMENSION_VALUE_LEN, NO_ERROR_PLACEHOLDER,
};
pub use model::{DIMENSION_ERROR_MESSAGE, DIMENSION_JOB_NAME, DIMENSION_JOB_RUN_ID, DIMENSION_NAMESPACE};
#[cfg(test)]
pub use publisher::MockMetricsPublisher;
pub use publisher::MetricsPublisher;

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramTimer, HistogramVec, IntCounterVec, Opts};

use crate::error::MetricLabel;

/// Default CloudWatch namespace for the published custom metrics.
pub const DEFAULT_NAMESPACE: &str = "Broadcom/AwsCustomMetric";

/// Default value of the source-system `Namespace` dimension.
pub const DEFAULT_SOURCE_TAG: &str = "Glue";

pub static PUBLISH_TIME: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new("publish_time", "Time spent publishing a metric batch to CloudWatch in seconds")
            .buckets(vec![0.05, 0.1, 0.15, 0.2, 0.3, 0.4, 0.5, 1.0, 2.5, 5.0, 10.0]),
        &["scope"],
    )
    .expect("failed creating publish_time metric")
});

#[inline]
pub(crate) fn start_publish_timer(scope: &RunScope) -> HistogramTimer {
    PUBLISH_TIME.with_label_values(&[scope.label()]).start_timer()
}

pub static PUBLISHED_POINTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("published_points", "Number of metric points accepted by CloudWatch"),
        &["scope"],
    )
    .expect("failed creating published_points metric")
});

pub static PUBLISH_ERRORS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("publish_errors", "Number of errors publishing metric batches to CloudWatch"),
        &["scope", "error_type"],
    )
    .expect("failed creating publish_errors metric")
});

/// Publish the batch, recording timing, point counts and errors.
#[tracing::instrument(level = "info", skip(publisher, batch), fields(job_name=%batch.job_name, run_id=%batch.scope))]
pub async fn publish_tracked<P>(publisher: &P, batch: &MetricBatch) -> Result<(), PublishError>
where
    P: MetricsPublisher + ?Sized,
{
    let _timer = start_publish_timer(&batch.scope);
    let result = publisher.publish(batch).await;
    match result {
        Ok(()) => {
            PUBLISHED_POINTS
                .with_label_values(&[batch.scope.label()])
                .inc_by(batch.len() as u64);
        },
        Err(ref err) => {
            tracing::error!(error=?err, job_name=%batch.job_name, run_id=%batch.scope, "failed to publish metric batch");
            PUBLISH_ERRORS
                .with_label_values(&[batch.scope.label(), err.label().as_str()])
                .inc();
        },
    }
    result
}
