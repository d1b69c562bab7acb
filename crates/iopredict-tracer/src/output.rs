//! Location and naming of the report and debug files.

use std::path::{Path, PathBuf};

use iopredict_core::config::OutputConfig;
use iopredict_core::constants::MODULE_PREFIX;
use iopredict_core::errors::TracerError;
use iopredict_core::types::Granularity;

/// Who is writing: distinguishes the files of concurrent processes and nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessIdentity {
    pub hostname: String,
    pub process_name: String,
    pub pid: u32,
}

impl ProcessIdentity {
    pub fn current() -> Self {
        Self {
            hostname: hostname(),
            process_name: process_name(),
            pid: std::process::id(),
        }
    }

    /// `<host>_<process>_pid<pid>`
    pub fn file_stem(&self) -> String {
        format!("{}_{}_pid{}", self.hostname, self.process_name, self.pid)
    }
}

/// Resolved output locations for one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub directory: PathBuf,
    pub report: PathBuf,
    pub debug: PathBuf,
}

impl OutputPaths {
    /// `<dump_folder>/<experiment>/<module>/` when a dump folder is configured,
    /// `<cwd>/<module>/` otherwise.
    pub fn resolve(
        output: &OutputConfig,
        granularity: Granularity,
        identity: &ProcessIdentity,
    ) -> Result<Self, TracerError> {
        let mut directory = match &output.dump_folder {
            Some(folder) => {
                let mut dir = folder.clone();
                if let Some(experiment) = output.experiment_name.as_deref() {
                    dir.push(experiment);
                }
                dir
            }
            None => std::env::current_dir().map_err(|source| TracerError::Output {
                path: ".".to_string(),
                source,
            })?,
        };
        directory.push(module_name(granularity));

        let stem = identity.file_stem();
        Ok(Self {
            report: directory.join(format!("{stem}.csv")),
            debug: directory.join(format!("{stem}.debug")),
            directory,
        })
    }

    /// Create the report directory and its parents. Existing directories are fine.
    pub fn create_directory(&self) -> Result<(), TracerError> {
        std::fs::create_dir_all(&self.directory).map_err(|source| output_error(&self.directory, source))
    }
}

/// Directory name of a model variant, e.g. `iopredict-per-handle`.
pub fn module_name(granularity: Granularity) -> String {
    format!("{MODULE_PREFIX}-{}", granularity.name())
}

pub(crate) fn output_error(path: &Path, source: std::io::Error) -> TracerError {
    TracerError::Output {
        path: path.display().to_string(),
        source,
    }
}

fn hostname() -> String {
    if let Some(name) = std::env::var("HOSTNAME").ok().filter(|h| !h.is_empty()) {
        return name;
    }
    std::fs::read_to_string("/proc/sys/kernel/hostname")
        .map(|h| h.trim().to_string())
        .ok()
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

fn process_name() -> String {
    std::env::args_os()
        .next()
        .or_else(|| std::env::current_exe().ok().map(PathBuf::into_os_string))
        .and_then(|arg0| {
            Path::new(&arg0)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "?".to_string())
}
