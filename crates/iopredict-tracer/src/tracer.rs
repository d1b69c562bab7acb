//! Tracer: serializes intercepted I/O notifications into one prediction model.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use iopredict_core::collections::FxHashSet;
use iopredict_core::config::{OutputConfig, PredictConfig};
use iopredict_core::errors::TracerError;
use iopredict_core::tracing::init_tracing;
use iopredict_core::traits::CallStackSource;
use iopredict_core::types::{Handle, IoEvent, OpKind};
use iopredict_model::{PredictionModel, Report};

use crate::backtrace_source::BacktraceSource;
use crate::clock;
use crate::output::{output_error, OutputPaths, ProcessIdentity};

/// Process-wide entry point for an interception layer.
///
/// All notification methods take `&self` and may be called from any thread;
/// model updates are serialized by an internal mutex.
pub struct Tracer<S: CallStackSource> {
    state: Mutex<TracerState<S>>,
}

struct TracerState<S: CallStackSource> {
    model: PredictionModel<S>,
    /// `None` once a forked child failed to open its own files.
    files: Option<OutputFiles>,
    output: OutputConfig,
    identity: ProcessIdentity,
    /// Handles in direct-I/O mode, never fed to the model.
    direct: FxHashSet<Handle>,
}

struct OutputFiles {
    paths: OutputPaths,
    report: BufWriter<File>,
    debug: Option<BufWriter<File>>,
    /// OS handles of the files above, so the tracer never models its own output.
    own: Vec<Handle>,
}

impl OutputFiles {
    fn create(paths: OutputPaths, with_debug: bool) -> Result<Self, TracerError> {
        paths.create_directory()?;
        let report = File::create(&paths.report).map_err(|e| output_error(&paths.report, e))?;
        let debug = if with_debug {
            Some(File::create(&paths.debug).map_err(|e| output_error(&paths.debug, e))?)
        } else {
            None
        };

        let own = std::iter::once(&report)
            .chain(debug.as_ref())
            .filter_map(raw_handle)
            .collect();

        tracing::debug!(report = %paths.report.display(), debug = with_debug, "output files opened");
        Ok(Self {
            paths,
            report: BufWriter::new(report),
            debug: debug.map(BufWriter::new),
            own,
        })
    }

    /// Close without flushing: buffered bytes belong to the parent after a fork.
    fn abandon(self) {
        let (_report, _) = self.report.into_parts();
        if let Some(debug) = self.debug {
            let (_debug, _) = debug.into_parts();
        }
    }
}

impl Tracer<BacktraceSource> {
    /// Load configuration from the environment and trace with real call stacks.
    ///
    /// `Ok(None)` means this host is excluded from tracing.
    pub fn start() -> Result<Option<Self>, TracerError> {
        init_tracing();
        let config = PredictConfig::load(None)?;
        Self::initialize_with(&config, ProcessIdentity::current(), |config| {
            BacktraceSource::for_current_process(config.model.effective_hash_seed())
        })
    }
}

impl<S: CallStackSource> Tracer<S> {
    /// Set up logging, output files, and the model for the current process.
    pub fn initialize(config: &PredictConfig, source: S) -> Result<Option<Self>, TracerError> {
        init_tracing();
        Self::initialize_as(config, ProcessIdentity::current(), source)
    }

    /// As [`initialize`](Self::initialize), with an explicit process identity.
    pub fn initialize_as(
        config: &PredictConfig,
        identity: ProcessIdentity,
        source: S,
    ) -> Result<Option<Self>, TracerError> {
        Self::initialize_with(config, identity, |_| Ok(source))
    }

    /// Build the call-stack source only once the host is known to be traced.
    pub fn initialize_with(
        config: &PredictConfig,
        identity: ProcessIdentity,
        make_source: impl FnOnce(&PredictConfig) -> Result<S, TracerError>,
    ) -> Result<Option<Self>, TracerError> {
        if config.output.is_ignored_host(&identity.hostname) {
            tracing::info!(hostname = %identity.hostname, "host ignored, tracing disabled");
            return Ok(None);
        }

        let source = make_source(config)?;
        let settings = config.model_settings();
        let paths = OutputPaths::resolve(&config.output, settings.granularity, &identity)?;
        let files = OutputFiles::create(paths, config.output.effective_debug_model())?;
        let model = PredictionModel::init(settings, source);

        Ok(Some(Self {
            state: Mutex::new(TracerState {
                model,
                files: Some(files),
                output: config.output.clone(),
                identity,
                direct: FxHashSet::default(),
            }),
        }))
    }

    /// A handle was opened. Handles opened for direct I/O are not modeled.
    pub fn record_open(&self, handle: Handle, direct: bool) -> Result<(), TracerError> {
        let mut state = self.lock()?;
        if direct {
            tracing::debug!(handle, "direct mode detected");
            state.direct.insert(handle);
            return Ok(());
        }
        state.direct.remove(&handle);
        state.apply(handle, OpKind::Open, 0, 0, Duration::ZERO)
    }

    /// A handle was closed. Its direct-mode flag is forgotten with it.
    pub fn record_close(&self, handle: Handle) -> Result<(), TracerError> {
        let mut state = self.lock()?;
        if state.direct.remove(&handle) {
            return Ok(());
        }
        state.apply(handle, OpKind::Close, 0, 0, Duration::ZERO)
    }

    pub fn record_read(
        &self,
        handle: Handle,
        offset: i64,
        length: u64,
        elapsed: Duration,
    ) -> Result<(), TracerError> {
        self.record_transfer(handle, OpKind::Read, offset, length, elapsed)
    }

    pub fn record_write(
        &self,
        handle: Handle,
        offset: i64,
        length: u64,
        elapsed: Duration,
    ) -> Result<(), TracerError> {
        self.record_transfer(handle, OpKind::Write, offset, length, elapsed)
    }

    /// Follow a change of the handle's direct-I/O flag (`fcntl(F_SETFL)`).
    pub fn set_direct_mode(&self, handle: Handle, enabled: bool) -> Result<(), TracerError> {
        let mut state = self.lock()?;
        if enabled {
            if state.direct.insert(handle) {
                tracing::debug!(handle, "direct mode detected");
            }
        } else if state.direct.remove(&handle) {
            tracing::debug!(handle, "direct mode reset");
        }
        Ok(())
    }

    /// Call in the child after `fork`: zero the inherited statistics and switch
    /// to output files named for the new pid. Learned graphs are kept.
    ///
    /// The parent's files are released even when the child's cannot be
    /// created; the child then keeps modeling but writes no report.
    pub fn follow_fork(&self) -> Result<(), TracerError> {
        let mut state = self.lock()?;
        let state = &mut *state;
        state.model.results_reset();
        state.identity.pid = std::process::id();
        if let Some(inherited) = state.files.take() {
            inherited.abandon();
        }
        tracing::info!(pid = state.identity.pid, "following forked child");

        let paths = OutputPaths::resolve(
            &state.output,
            state.model.settings().granularity,
            &state.identity,
        )?;
        state.files = Some(OutputFiles::create(
            paths,
            state.output.effective_debug_model(),
        )?);
        Ok(())
    }

    /// Write the report, close the output files, and release the model.
    pub fn terminate(self) -> Result<Report, TracerError> {
        let state = self
            .state
            .into_inner()
            .map_err(|_| TracerError::LockPoisoned)?;
        let TracerState { mut model, files, .. } = state;

        let Some(mut files) = files else {
            let report = model.finalize();
            tracing::warn!(io_count = report.io_count, "no output file, report not written");
            return Ok(report);
        };
        let report = model.results_dump(&mut files.report)?;
        if let Some(debug) = files.debug.as_mut() {
            debug.flush().map_err(|e| output_error(&files.paths.debug, e))?;
        }
        model.finalize();
        tracing::info!(report = %files.paths.report.display(), "tracer terminated");
        Ok(report)
    }

    /// Statistics so far, without writing anything.
    pub fn report(&self) -> Result<Report, TracerError> {
        Ok(self.lock()?.model.report())
    }

    /// Current output locations, `None` when no files are open.
    pub fn paths(&self) -> Result<Option<OutputPaths>, TracerError> {
        Ok(self.lock()?.files.as_ref().map(|f| f.paths.clone()))
    }

    /// True when `handle` is one of the tracer's own output files.
    pub fn is_output_handle(&self, handle: Handle) -> Result<bool, TracerError> {
        Ok(self.lock()?.owns(handle))
    }

    /// Run `f` on the call-stack source under the model lock.
    pub fn with_source<R>(&self, f: impl FnOnce(&mut S) -> R) -> Result<R, TracerError> {
        let mut state = self.lock()?;
        Ok(f(state.model.source_mut()))
    }

    fn record_transfer(
        &self,
        handle: Handle,
        op: OpKind,
        offset: i64,
        length: u64,
        elapsed: Duration,
    ) -> Result<(), TracerError> {
        let mut state = self.lock()?;
        if state.direct.contains(&handle) || state.owns(handle) {
            return Ok(());
        }
        state.apply(handle, op, offset, length, elapsed)
    }

    fn lock(&self) -> Result<MutexGuard<'_, TracerState<S>>, TracerError> {
        self.state.lock().map_err(|_| TracerError::LockPoisoned)
    }
}

impl<S: CallStackSource> TracerState<S> {
    fn owns(&self, handle: Handle) -> bool {
        self.files.as_ref().is_some_and(|f| f.own.contains(&handle))
    }

    fn apply(
        &mut self,
        handle: Handle,
        op: OpKind,
        offset: i64,
        length: u64,
        elapsed: Duration,
    ) -> Result<(), TracerError> {
        let event = IoEvent {
            timestamp: clock::now_ms(),
            thread_id: clock::thread_id(),
            handle,
            offset,
            length,
            duration_ns: u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX),
            op,
        };
        let debug = self
            .files
            .as_mut()
            .and_then(|f| f.debug.as_mut())
            .map(|w| w as &mut dyn Write);
        self.model.on_io(&event, debug)?;
        Ok(())
    }
}

#[cfg(unix)]
fn raw_handle(file: &File) -> Option<Handle> {
    use std::os::fd::AsRawFd;
    Some(file.as_raw_fd())
}

#[cfg(not(unix))]
fn raw_handle(_file: &File) -> Option<Handle> {
    None
}
