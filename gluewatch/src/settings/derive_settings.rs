use serde::{Deserialize, Serialize};

use crate::phases::derive::AverageMode;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeriveSettings {
    pub average: AverageMode,
}
