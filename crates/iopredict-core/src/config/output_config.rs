//! Report and debug output configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where and whether the tracer writes its files.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    /// Root directory for reports. Default: the working directory.
    pub dump_folder: Option<PathBuf>,
    /// Sub-directory grouping the reports of one experiment.
    pub experiment_name: Option<String>,
    /// Write one debug line per I/O next to the report. Default: false.
    pub debug_model: Option<bool>,
    /// Hostname prefix on which tracing is disabled (e.g. a login node).
    pub ignore_node: Option<String>,
}

impl OutputConfig {
    /// Returns whether the per-I/O debug file is enabled.
    pub fn effective_debug_model(&self) -> bool {
        self.debug_model.unwrap_or(false)
    }

    /// True when `hostname` starts with the configured ignore prefix.
    pub fn is_ignored_host(&self, hostname: &str) -> bool {
        match self.ignore_node.as_deref() {
            Some(prefix) if !prefix.is_empty() => hostname.starts_with(prefix),
            _ => false,
        }
    }
}
