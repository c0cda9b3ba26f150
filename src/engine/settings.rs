use serde::{Deserialize, Serialize};

use crate::container::resolver::TagClasses;

/// Engine-wide switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Master switch; a disabled engine passes everything through
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Hide values already pushed into a container from push fields,
    /// and never list an included value twice
    #[serde(default = "default_true")]
    pub suppress_duplicates: bool,

    #[serde(default)]
    pub tags: TagClasses,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            suppress_duplicates: true,
            tags: TagClasses::default(),
        }
    }
}

fn default_true() -> bool { true }
