use std::fmt;

use itertools::Itertools;

use crate::cloudwatch::{MetricBatch, PublishError, RunScope};

/// A batch CloudWatch did not accept.
#[derive(Debug)]
pub struct PublishFailure {
    pub job_name: String,
    pub scope: RunScope,
    pub error: PublishError,
}

impl fmt::Display for PublishFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            RunScope::Aggregate => write!(f, "Failed to Publish Glue Job Custom Metrics for: {}", self.job_name),
            RunScope::Run(run_id) => write!(
                f,
                "Failed to Publish Glue Job Run Custom Metrics for Job: {} and Run Id: {}",
                self.job_name, run_id
            ),
        }
    }
}

/// Tally of a single sweep.
#[derive(Debug, Default)]
pub struct SweepOutcome {
    pub jobs_seen: usize,
    /// Jobs without any run history.
    pub jobs_skipped: usize,
    pub job_batches: usize,
    pub run_batches: usize,
    pub points_published: u64,
    pub failures: Vec<PublishFailure>,
}

impl SweepOutcome {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub(super) fn record_published(&mut self, batch: &MetricBatch) {
        match batch.scope {
            RunScope::Aggregate => self.job_batches += 1,
            RunScope::Run(_) => self.run_batches += 1,
        }
        self.points_published += batch.len() as u64;
    }

    pub(super) fn record_failure(&mut self, failure: PublishFailure) {
        tracing::warn!(error=?failure.error, "{}", failure);
        self.failures.push(failure);
    }
}

impl fmt::Display for SweepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_failures() {
            write!(f, "{}", self.failures.iter().join("; "))
        } else if self.job_batches == 0 {
            f.write_str("No Glue Job Custom Metrics Published")
        } else {
            f.write_str("Glue Job Custom Metrics Published; Glue Job Run Custom Metrics Published")
        }
    }
}
