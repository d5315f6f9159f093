use std::fmt;

use aws_sdk_cloudwatch::types::StandardUnit;
use chrono::{DateTime, Utc};

/// Run identifier dimension value used for job-level aggregate points.
pub const AGGREGATE_RUN_ID: &str = "ALL";

/// Error message dimension value for runs that reported no error.
pub const NO_ERROR_PLACEHOLDER: &str = "No Error";

/// CloudWatch rejects dimension values longer than this.
pub const MAX_DIMENSION_VALUE_LEN: usize = 1024;

pub const DIMENSION_JOB_NAME: &str = "JobName";
pub const DIMENSION_JOB_RUN_ID: &str = "JobRunId";
pub const DIMENSION_ERROR_MESSAGE: &str = "ErrorMessage";
pub const DIMENSION_NAMESPACE: &str = "Namespace";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MetricUnit {
    Count,
    Seconds,
    None,
}

impl From<MetricUnit> for StandardUnit {
    fn from(unit: MetricUnit) -> Self {
        match unit {
            MetricUnit::Count => Self::Count,
            MetricUnit::Seconds => Self::Seconds,
            MetricUnit::None => Self::None,
        }
    }
}

/// A derived `(name, value, unit)` observation before it is stamped and tagged.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricValue {
    pub name: &'static str,
    pub value: f64,
    pub unit: MetricUnit,
}

impl MetricValue {
    pub const fn new(name: &'static str, value: f64, unit: MetricUnit) -> Self {
        Self { name, value, unit }
    }
}

/// Whether a batch describes a whole job or a single run of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RunScope {
    Aggregate,
    Run(String),
}

impl RunScope {
    pub fn run_id(&self) -> &str {
        match self {
            Self::Aggregate => AGGREGATE_RUN_ID,
            Self::Run(id) => id.as_str(),
        }
    }

    /// Label for the self-instrumentation metrics.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Aggregate => "job",
            Self::Run(_) => "run",
        }
    }
}

impl fmt::Display for RunScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.run_id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub name: &'static str,
    pub value: String,
}

impl Dimension {
    pub fn new(name: &'static str, value: impl AsRef<str>) -> Self {
        Self { name, value: sanitize_dimension_value(value.as_ref()) }
    }
}

/// Reduce a value to what CloudWatch accepts in a dimension: printable ASCII, whitespace
/// runs and control characters collapsed to a single space, trimmed, and at most
/// [`MAX_DIMENSION_VALUE_LEN`] characters. Other non-ASCII characters become `?`.
pub fn sanitize_dimension_value(value: &str) -> String {
    let mut sanitized = String::with_capacity(value.len().min(MAX_DIMENSION_VALUE_LEN));
    let mut pending_space = false;

    for c in value.chars() {
        if c.is_whitespace() || c.is_control() {
            pending_space = !sanitized.is_empty();
            continue;
        }

        if pending_space {
            sanitized.push(' ');
            pending_space = false;
        }
        sanitized.push(if c.is_ascii() { c } else { '?' });

        if MAX_DIMENSION_VALUE_LEN <= sanitized.len() {
            break;
        }
    }

    sanitized.truncate(MAX_DIMENSION_VALUE_LEN);
    sanitized.truncate(sanitized.trim_end().len());
    sanitized
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricPoint {
    pub name: &'static str,
    pub value: f64,
    pub unit: MetricUnit,
    /// Capture time of the sweep, not the time of the run.
    pub timestamp: DateTime<Utc>,
    pub dimensions: Vec<Dimension>,
}

/// The points of one publish call, sent to CloudWatch as a single request.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricBatch {
    pub job_name: String,
    pub scope: RunScope,
    pub points: Vec<MetricPoint>,
}

impl MetricBatch {
    pub fn new(
        job_name: &str, scope: RunScope, values: Vec<MetricValue>, error_message: Option<&str>, source_tag: &str,
        captured_at: DateTime<Utc>,
    ) -> Self {
        let error_message = error_message
            .map(sanitize_dimension_value)
            .filter(|msg| !msg.is_empty())
            .unwrap_or_else(|| NO_ERROR_PLACEHOLDER.to_string());

        let dimensions = vec![
            Dimension::new(DIMENSION_JOB_NAME, job_name),
            Dimension::new(DIMENSION_JOB_RUN_ID, scope.run_id()),
            Dimension::new(DIMENSION_ERROR_MESSAGE, error_message),
            Dimension::new(DIMENSION_NAMESPACE, source_tag),
        ];

        let points = values
            .into_iter()
            .map(|v| MetricPoint {
                name: v.name,
                value: v.value,
                unit: v.unit,
                timestamp: captured_at,
                dimensions: dimensions.clone(),
            })
            .collect();

        Self { job_name: job_name.to_string(), scope, points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn point(&self, name: &str) -> Option<&MetricPoint> {
        self.points.iter().find(|p| p.name == name)
    }
}
