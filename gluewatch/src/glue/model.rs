use std::fmt;
use std::str::FromStr;

use aws_sdk_glue::primitives::DateTime as AwsDateTime;
use aws_sdk_glue::types as glue_types;
use chrono::{DateTime, TimeZone, Utc};
use strum_macros::EnumString;

use super::GlueError;

pub const KNOWN_RUN_STATES: [RunState; 10] = [
    RunState::Starting,
    RunState::Running,
    RunState::Stopping,
    RunState::Stopped,
    RunState::Succeeded,
    RunState::Failed,
    RunState::Timeout,
    RunState::Error,
    RunState::Waiting,
    RunState::Expired,
];

/// Lifecycle state of a Glue job run. States Glue may add later land in `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RunState {
    Starting,
    Running,
    Stopping,
    Stopped,
    Succeeded,
    Failed,
    Timeout,
    Error,
    Waiting,
    Expired,
    #[strum(default)]
    Unknown(String),
}

impl RunState {
    pub const UNKNOWN_CODE: i32 = -1;

    /// Numeric code published for the state metrics.
    pub const fn code(&self) -> i32 {
        match self {
            Self::Starting => 0,
            Self::Running => 1,
            Self::Stopping => 2,
            Self::Stopped => 3,
            Self::Succeeded => 4,
            Self::Failed => 5,
            Self::Timeout => 6,
            Self::Error => 7,
            Self::Waiting => 8,
            Self::Expired => 9,
            Self::Unknown(_) => Self::UNKNOWN_CODE,
        }
    }

    /// A run in an active state may still be executing and has no completion time yet.
    pub const fn is_active(&self) -> bool {
        matches!(self.code(), 0 | 1 | 2 | 8)
    }

    /// Total parse: any representation Glue does not document becomes `Unknown`.
    pub fn parse(rep: &str) -> Self {
        Self::from_str(rep).unwrap_or_else(|_| Self::Unknown(rep.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Starting => "STARTING",
            Self::Running => "RUNNING",
            Self::Stopping => "STOPPING",
            Self::Stopped => "STOPPED",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::Timeout => "TIMEOUT",
            Self::Error => "ERROR",
            Self::Waiting => "WAITING",
            Self::Expired => "EXPIRED",
            Self::Unknown(rep) => rep.as_str(),
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


impl From<&glue_types::JobRunState> for RunState {
    fn from(state: &glue_types::JobRunState) -> Self {
        Self::parse(state.as_str())
    }
}

/// One execution attempt of a Glue job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRun {
    pub id: String,
    pub state: RunState,
    pub started_on: Option<DateTime<Utc>>,
    /// Absent while the run is still in progress.
    pub completed_on: Option<DateTime<Utc>>,
    /// Elapsed time so far for incomplete runs.
    pub execution_time_secs: i64,
    pub error_message: Option<String>,
}

impl JobRun {
    pub fn has_error(&self) -> bool {
        self.error_message.as_deref().map_or(false, |msg| !msg.is_empty())
    }

    pub fn error_state(&self) -> f64 {
        if self.has_error() {
            1.0
        } else {
            0.0
        }
    }
}

impl TryFrom<&glue_types::JobRun> for JobRun {
    type Error = GlueError;

    fn try_from(run: &glue_types::JobRun) -> Result<Self, Self::Error> {
        let id = run
            .id()
            .filter(|id| !id.is_empty())
            .ok_or(GlueError::MissingField { record: "JobRun", field: "Id" })?
            .to_string();

        let state = run
            .job_run_state()
            .map(RunState::from)
            .unwrap_or_else(|| RunState::Unknown(String::new()));

        Ok(Self {
            id,
            state,
            started_on: run.started_on().and_then(to_utc),
            completed_on: run.completed_on().and_then(to_utc),
            execution_time_secs: i64::from(run.execution_time()),
            error_message: run.error_message().filter(|msg| !msg.is_empty()).map(|msg| msg.to_string()),
        })
    }
}

fn to_utc(ts: &AwsDateTime) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(ts.secs(), ts.subsec_nanos()).single()
}
