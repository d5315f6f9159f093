use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_cloudwatch::primitives::DateTime as AwsDateTime;
use aws_sdk_cloudwatch::types::{Dimension as AwsDimension, MetricDatum};
use aws_sdk_cloudwatch::Client;

use super::publisher::MetricsPublisher;
use super::{MetricBatch, MetricPoint, PublishError};
use crate::settings::{self, CloudWatchSettings};

/// CloudWatch client publishing batches under the custom namespace.
#[derive(Debug, Clone)]
pub struct CloudWatchContext {
    inner: Arc<CloudWatchContextRef>,
}

impl CloudWatchContext {
    pub fn new(client: Client, namespace: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(CloudWatchContextRef { client, namespace: namespace.into() }),
        }
    }

    #[tracing::instrument(level = "info")]
    pub async fn from_settings(settings: &CloudWatchSettings) -> Self {
        let sdk_config = settings::load_aws_config(settings.region.as_deref()).await;
        let mut builder = aws_sdk_cloudwatch::config::Builder::from(&sdk_config);
        if let Some(ref endpoint_url) = settings.endpoint_url {
            builder = builder.endpoint_url(endpoint_url);
        }

        Self::new(Client::from_conf(builder.build()), settings.namespace.as_str())
    }

    pub fn namespace(&self) -> &str {
        self.inner.namespace.as_str()
    }
}

#[async_trait]
impl MetricsPublisher for CloudWatchContext {
    #[tracing::instrument(
        level = "debug",
        skip(self, batch),
        fields(job_name=%batch.job_name, run_id=%batch.scope, nr_points=%batch.len())
    )]
    async fn publish(&self, batch: &MetricBatch) -> Result<(), PublishError> {
        let metric_data = batch.points.iter().map(to_metric_datum).collect();

        self.inner
            .client
            .put_metric_data()
            .namespace(self.inner.namespace.as_str())
            .set_metric_data(Some(metric_data))
            .send()
            .await?;

        tracing::info!(
            job_name=%batch.job_name, run_id=%batch.scope, namespace=%self.inner.namespace,
            "successfully pushed metrics to CloudWatch"
        );
        Ok(())
    }
}

fn to_metric_datum(point: &MetricPoint) -> MetricDatum {
    let dimensions = point
        .dimensions
        .iter()
        .map(|d| AwsDimension::builder().name(d.name).value(d.value.as_str()).build())
        .collect();

    MetricDatum::builder()
        .metric_name(point.name)
        .value(point.value)
        .unit(point.unit.into())
        .timestamp(AwsDateTime::from_millis(point.timestamp.timestamp_millis()))
        .set_dimensions(Some(dimensions))
        .build()
}

struct CloudWatchContextRef {
    client: Client,
    namespace: String,
}

impl fmt::Debug for CloudWatchContextRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudWatchContextRef")
            .field("namespace", &self.namespace)
            .finish()
    }
}
