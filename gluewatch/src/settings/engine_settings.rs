use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSeconds};

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Repeat the sweep on this fixed interval. When unset the binary runs a single sweep and
    /// exits, leaving scheduling to the host.
    #[serde(rename = "sweep_interval_secs", skip_serializing_if = "Option::is_none")]
    #[serde_as(as = "Option<DurationSeconds<u64>>")]
    pub sweep_interval: Option<Duration>,

    /// Log the prometheus text exposition of the forwarder's own metrics after each sweep.
    pub log_self_metrics: bool,
}
