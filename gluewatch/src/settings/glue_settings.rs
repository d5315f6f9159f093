use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlueSettings {
    /// Region override; the default provider chain decides when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Endpoint override, e.g., for a local emulator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,

    /// Requested `MaxResults` for `ListJobs` and `GetJobRuns`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i32>,
}
