use std::borrow::Cow;

use aws_sdk_glue::error::SdkError;

/// Names an error for the `error_type` label of the error counters.
pub trait MetricLabel {
    fn slug(&self) -> Cow<'static, str>;

    fn kind(&self) -> Cow<'static, str>;

    fn label(&self) -> String {
        format!("{}::{}", self.slug(), self.kind())
    }
}

/// Glue and CloudWatch clients share the smithy `SdkError`, so one classification serves both.
pub(crate) fn sdk_error_kind<E, R>(error: &SdkError<E, R>) -> Cow<'static, str> {
    match error {
        SdkError::ConstructionFailure(_) => "sdk::construction".into(),
        SdkError::TimeoutError(_) => "sdk::timeout".into(),
        SdkError::DispatchFailure(_) => "sdk::dispatch".into(),
        SdkError::ResponseError(_) => "sdk::response".into(),
        SdkError::ServiceError(_) => "sdk::service".into(),
        _ => "sdk::other".into(),
    }
}
