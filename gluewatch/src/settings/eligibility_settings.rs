use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSeconds};

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EligibilitySettings {
    /// Trailing window before the sweep time in which completed runs are still reported
    /// individually.
    #[serde(rename = "window_secs")]
    #[serde_as(as = "DurationSeconds<u64>")]
    pub window: Duration,
}

impl EligibilitySettings {
    pub const DEFAULT_WINDOW: Duration = Duration::from_secs(900);
}

impl Default for EligibilitySettings {
    fn default() -> Self {
        Self { window: Self::DEFAULT_WINDOW }
    }
}
