use std::fmt::Debug;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::{MetricBatch, PublishError};

/// Sink for derived metric batches.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MetricsPublisher: Debug + Send + Sync {
    /// Submit every point of the batch in one write.
    async fn publish(&self, batch: &MetricBatch) -> Result<(), PublishError>;
}
