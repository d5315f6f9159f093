use serde::{Deserialize, Serialize};

use crate::cloudwatch::{DEFAULT_NAMESPACE, DEFAULT_SOURCE_TAG};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudWatchSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,

    /// Custom metric namespace the batches are published under.
    pub namespace: String,

    /// Value of the `Namespace` dimension identifying the source system.
    pub source_tag: String,
}

impl Default for CloudWatchSettings {
    fn default() -> Self {
        Self {
            region: None,
            endpoint_url: None,
            namespace: DEFAULT_NAMESPACE.to_string(),
            source_tag: DEFAULT_SOURCE_TAG.to_string(),
        }
    }
}
