use std::time::Duration;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use prometheus::{IntCounterVec, Opts};

use crate::glue::JobRun;
use crate::settings::EligibilitySettings;


pub(crate) static ELIGIBILITY_SELECTED_RUNS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "eligibility_selected_runs",
            "Number of job runs selected for per-run metric reporting",
        ),
        &["reason"],
    )
    .expect("failed creating eligibility_selected_runs metric")
});

/// Why a run was selected for per-run reporting.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Eligibility {
    /// Not yet complete and in an active state.
    Active,
    /// Completed within the trailing window.
    RecentlyCompleted,
}

impl Eligibility {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::RecentlyCompleted => "recently_completed",
        }
    }
}

/// Selects the runs current enough to report individually: runs still in flight and runs
/// that completed within the trailing window before the reference time.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EligibilityPolicy {
    window: Duration,
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        Self { window: EligibilitySettings::DEFAULT_WINDOW }
    }
}

impl EligibilityPolicy {
    pub const fn new(settings: &EligibilitySettings) -> Self {
        Self { window: settings.window }
    }

    pub const fn with_window(window: Duration) -> Self {
        Self { window }
    }

    pub const fn window(&self) -> Duration {
        self.window
    }

    pub fn eligibility(&self, run: &JobRun, reference_time: DateTime<Utc>) -> Option<Eligibility> {
        match run.completed_on {
            None if run.state.is_active() => Some(Eligibility::Active),
            None => None,
            Some(completed_on) => {
                let cutoff = chrono::Duration::from_std(self.window)
                    .ok()
                    .and_then(|window| reference_time.checked_sub_signed(window));

                match cutoff {
                    Some(cutoff) if completed_on < cutoff => None,
                    _ => Some(Eligibility::RecentlyCompleted),
                }
            },
        }
    }

    pub fn is_eligible(&self, run: &JobRun, reference_time: DateTime<Utc>) -> bool {
        self.eligibility(run, reference_time).is_some()
    }

    /// Filter `runs` down to the eligible subset, preserving input order.
    #[tracing::instrument(level = "debug", skip(self, runs), fields(nr_runs=%runs.len(), window=?self.window))]
    pub fn select_eligible<'r>(&self, runs: &'r [JobRun], reference_time: DateTime<Utc>) -> Vec<&'r JobRun> {
        runs.iter()
            .filter(|run| match self.eligibility(run, reference_time) {
                Some(reason) => {
                    ELIGIBILITY_SELECTED_RUNS.with_label_values(&[reason.label()]).inc();
                    tracing::debug!(run_id=%run.id, state=%run.state, ?reason, "run selected for reporting");
                    true
                },
                None => false,
            })
            .collect()
    }
}

/// Filter with an explicit trailing window; see [`EligibilityPolicy`].
pub fn select_eligible(runs: &[JobRun], reference_time: DateTime<Utc>, window: Duration) -> Vec<&JobRun> {
    EligibilityPolicy::with_window(window).select_eligible(runs, reference_time)
}
