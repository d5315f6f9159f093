use std::borrow::Cow;

use aws_sdk_cloudwatch::error::SdkError;
use aws_sdk_cloudwatch::operation::put_metric_data::PutMetricDataError;
use thiserror::Error;

use crate::error::{sdk_error_kind, MetricLabel};

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to push custom metrics to CloudWatch: {0}")]
    PutMetricData(#[from] SdkError<PutMetricDataError>),
}

impl MetricLabel for PublishError {
    fn slug(&self) -> Cow<'static, str> {
        "cloudwatch".into()
    }

    fn kind(&self) -> Cow<'static, str> {
        match self {
            Self::PutMetricData(err) => sdk_error_kind(err),
        }
    }
}
