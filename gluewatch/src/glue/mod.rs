mod catalog;
mod context;
mod error;
mod model;
pub mod pagination;

pub use catalog::{list_all_job_names, list_job_runs, GlueApi};
pub use context::GlueContext;
pub use error::GlueError;
pub use model::{JobRun, RunState, KNOWN_RUN_STATES};
pub use pagination::Page;

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramTimer, HistogramVec, IntCounterVec, Opts};

use crate::error::MetricLabel;

pub(crate) const LIST_JOBS: &str = "list_jobs";
pub(crate) const GET_JOB_RUNS: &str = "get_job_runs";

pub static GLUE_API_TIME: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "glue_api_time",
            "Time spent draining a paginated Glue listing in seconds",
        )
        .buckets(vec![0.1, 0.15, 0.2, 0.3, 0.4, 0.5, 1.0, 2.5, 5.0, 7.5, 10.0]),
        &["action"],
    )
    .expect("failed creating glue_api_time metric")
});

#[inline]
pub(crate) fn start_glue_api_timer(action: &str) -> HistogramTimer {
    GLUE_API_TIME.with_label_values(&[action]).start_timer()
}

pub static GLUE_ERRORS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("glue_errors", "Number of errors calling the Glue API"),
        &["action", "error_type"],
    )
    .expect("failed creating glue_errors metric")
});

#[inline]
pub(crate) fn track_result<T>(action: &str, result: Result<T, GlueError>, error_message: &str) -> Result<T, GlueError> {
    if let Err(ref err) = result {
        tracing::error!(error=?err, %action, "{}", error_message);
        track_glue_errors(action, err);
    }

    result
}

#[inline]
pub(crate) fn track_glue_errors<E: MetricLabel>(action: &str, error: &E) {
    GLUE_ERRORS.with_label_values(&[action, error.label().as_str()]).inc()
}
