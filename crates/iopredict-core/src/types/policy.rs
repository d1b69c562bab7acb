//! Model granularity and the two per-granularity behavioral policies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Unit at which a separate prediction graph is maintained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One graph and one context for the whole process.
    #[default]
    Process,
    /// One graph and one context per open file handle, discarded on close.
    Handle,
}

impl Granularity {
    /// Name written to the `granularity=` report line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Process => "per-process",
            Self::Handle => "per-handle",
        }
    }

    /// Cold-start guard historically used by this granularity.
    pub fn default_cold_start_guard(&self) -> ColdStartGuard {
        match self {
            Self::Process => ColdStartGuard::OwnPrediction,
            Self::Handle => ColdStartGuard::MfuPrediction,
        }
    }

    /// Fresh-node seed historically used by this granularity.
    pub fn default_node_seed(&self) -> NodeSeed {
        match self {
            Self::Process => NodeSeed::Unset,
            Self::Handle => NodeSeed::SelfLoop,
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Granularity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "process" | "per-process" => Ok(Self::Process),
            "handle" | "per-handle" | "per-open" | "fd" => Ok(Self::Handle),
            other => Err(ConfigError::InvalidValue {
                field: "model.granularity".to_string(),
                message: format!("unknown granularity '{other}', expected 'process' or 'handle'"),
            }),
        }
    }
}

/// Which pending prediction must be unset for the MRU cold-start fallback to count a hit.
///
/// The MFU fallback is always guarded by the MFU prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColdStartGuard {
    /// MRU fallback requires the pending MRU prediction to be unset.
    OwnPrediction,
    /// MRU fallback requires the pending MFU prediction to be unset.
    /// Matches results published with per-handle graphs.
    MfuPrediction,
}

/// Initial `mru_successor` of a freshly created graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeSeed {
    /// Start at the unset sentinel.
    Unset,
    /// Start pointing at the node's own context.
    SelfLoop,
}
