use std::borrow::Cow;

use aws_sdk_glue::error::SdkError;
use aws_sdk_glue::operation::get_job_runs::GetJobRunsError;
use aws_sdk_glue::operation::list_jobs::ListJobsError;
use thiserror::Error;

use crate::error::{sdk_error_kind, MetricLabel};

#[derive(Debug, Error)]
pub enum GlueError {
    #[error("failed to fetch the list of glue jobs: {0}")]
    ListJobs(#[from] SdkError<ListJobsError>),

    #[error("failed to fetch runs of glue job {job_name}: {source}")]
    GetJobRuns {
        job_name: String,
        #[source]
        source: SdkError<GetJobRunsError>,
    },

    #[error("glue {record} record missing required field: {field}")]
    MissingField { record: &'static str, field: &'static str },
}

impl MetricLabel for GlueError {
    fn slug(&self) -> Cow<'static, str> {
        "glue".into()
    }

    fn kind(&self) -> Cow<'static, str> {
        match self {
            Self::ListJobs(err) => sdk_error_kind(err),
            Self::GetJobRuns { source, .. } => sdk_error_kind(source),
            Self::MissingField { .. } => "missing_field".into(),
        }
    }
}
