use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cloudwatch::{MetricUnit, MetricValue};
use crate::glue::JobRun;


pub const EXECUTION_COUNT: &str = "Execution Count";
pub const AVG_EXECUTION_DURATION_SECS: &str = "Average Execution Duration (Sec)";
pub const LATEST_RUN_STATE: &str = "Latest Run State";
pub const LATEST_RUN_EXECUTION_DURATION_SECS: &str = "Latest Run Execution Duration (Sec)";
pub const LATEST_RUN_START_TIME_EPOCH: &str = "Latest Run Start Time (Epoch)";
pub const LATEST_RUN_COMPLETION_TIME_EPOCH: &str = "Latest Run Completion Time (Epoch)";
pub const LATEST_RUN_ERROR_STATE: &str = "Latest Run Error State";

pub const CURRENT_RUN_STATE: &str = "Current Run State";
pub const RUN_START_TIME_EPOCH: &str = "Run Start Time (Epoch)";
pub const RUN_COMPLETION_TIME_EPOCH: &str = "Run Completion Time (Epoch)";
pub const RUN_EXECUTION_DURATION_SECS: &str = "Run Execution Duration (Sec)";
pub const RUN_ERROR_STATE: &str = "Run Error State";

/// How the average execution duration is reduced to a published value.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AverageMode {
    /// Integer mean truncated toward zero, as existing dashboards expect.
    Truncated,
    /// Floating-point mean.
    Exact,
}

impl Default for AverageMode {
    fn default() -> Self {
        Self::Truncated
    }
}

/// Mean execution time over the runs; `None` when there are no runs.
pub fn average_execution_secs(runs: &[JobRun], mode: AverageMode) -> Option<f64> {
    if runs.is_empty() {
        return None;
    }

    let nr_runs = runs.len() as i64;
    let total_secs: i64 = runs.iter().map(|r| r.execution_time_secs).sum();
    let average = match mode {
        AverageMode::Truncated => (total_secs / nr_runs) as f64,
        AverageMode::Exact => total_secs as f64 / nr_runs as f64,
    };
    Some(average)
}

/// Job-level metrics over the whole run history. The latest run is the first one in the
/// history as Glue ordered it. `None` for an empty history.
#[tracing::instrument(level = "debug", skip(runs), fields(nr_runs=%runs.len()))]
pub fn derive_job_metrics(runs: &[JobRun], mode: AverageMode) -> Option<Vec<MetricValue>> {
    let latest = runs.first()?;
    let average = average_execution_secs(runs, mode)?;

    let mut values = vec![
        MetricValue::new(EXECUTION_COUNT, runs.len() as f64, MetricUnit::Count),
        MetricValue::new(AVG_EXECUTION_DURATION_SECS, average, MetricUnit::Seconds),
        MetricValue::new(LATEST_RUN_STATE, f64::from(latest.state.code()), MetricUnit::None),
        MetricValue::new(
            LATEST_RUN_EXECUTION_DURATION_SECS,
            latest.execution_time_secs as f64,
            MetricUnit::Seconds,
        ),
    ];

    if let Some(started_on) = latest.started_on {
        values.push(epoch_secs(LATEST_RUN_START_TIME_EPOCH, started_on));
    }

    if let Some(completed_on) = latest.completed_on {
        values.push(epoch_secs(LATEST_RUN_COMPLETION_TIME_EPOCH, completed_on));
    }

    values.push(MetricValue::new(LATEST_RUN_ERROR_STATE, latest.error_state(), MetricUnit::None));
    Some(values)
}

/// Metrics describing a single run.
#[tracing::instrument(level = "debug", skip(run), fields(run_id=%run.id))]
pub fn derive_run_metrics(run: &JobRun) -> Vec<MetricValue> {
    let mut values = vec![MetricValue::new(CURRENT_RUN_STATE, f64::from(run.state.code()), MetricUnit::None)];

    if let Some(started_on) = run.started_on {
        values.push(epoch_secs(RUN_START_TIME_EPOCH, started_on));
    }

    if let Some(completed_on) = run.completed_on {
        values.push(epoch_secs(RUN_COMPLETION_TIME_EPOCH, completed_on));
    }

    values.push(MetricValue::new(
        RUN_EXECUTION_DURATION_SECS,
        run.execution_time_secs as f64,
        MetricUnit::Seconds,
    ));
    values.push(MetricValue::new(RUN_ERROR_STATE, run.error_state(), MetricUnit::None));
    values
}

fn epoch_secs(name: &'static str, ts: DateTime<Utc>) -> MetricValue {
    MetricValue::new(name, ts.timestamp() as f64, MetricUnit::Seconds)
}
