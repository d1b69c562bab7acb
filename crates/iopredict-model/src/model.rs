//! PredictionModel: the entry points the interception layer drives.
//!
//! `init` is [`PredictionModel::init`], `finalize` consumes the model, so no
//! call can reach a model that was never initialized or already finalized.
//! The model does no locking; the caller serializes calls.

use std::io::Write;
use std::time::Instant;

use iopredict_core::config::ModelSettings;
use iopredict_core::constants::VERSION;
use iopredict_core::errors::{ModelError, ReportError};
use iopredict_core::traits::CallStackSource;
use iopredict_core::types::{CallStackId, Granularity, Handle, IoEvent, OpKind};

use crate::graph::Prediction;
use crate::scope::{ScopeStore, StepOutcome};
use crate::stats::{Report, StatsRecorder};

/// One model instance: prediction state at the configured granularity plus statistics.
pub struct PredictionModel<S: CallStackSource> {
    settings: ModelSettings,
    scope: ScopeStore,
    stats: StatsRecorder,
    source: S,
}

impl<S: CallStackSource> PredictionModel<S> {
    /// Create an active model. Statistics start at zero and the application clock starts now.
    pub fn init(settings: ModelSettings, source: S) -> Self {
        tracing::info!(
            version = VERSION,
            context_size = settings.context_size,
            call_stack_depth = settings.call_stack_depth,
            granularity = %settings.granularity,
            cold_start_guard = ?settings.cold_start_guard,
            node_seed = ?settings.node_seed,
            "prediction model initialized"
        );
        Self {
            scope: ScopeStore::new(&settings),
            stats: StatsRecorder::new(),
            settings,
            source,
        }
    }

    /// Process one intercepted I/O: capture its call stack, then update the model.
    ///
    /// With a `debug` sink, one line describing the step is appended to it.
    pub fn on_io(
        &mut self,
        event: &IoEvent,
        debug: Option<&mut dyn Write>,
    ) -> Result<StepOutcome, ModelError> {
        let started = Instant::now();
        let call_stack = self.source.capture(self.settings.call_stack_depth);
        self.stats.record_instrumentation(elapsed_ns(started));

        self.on_io_with_call_stack(event, call_stack, debug)
    }

    /// Process one I/O whose call stack the caller already resolved.
    pub fn on_io_with_call_stack(
        &mut self,
        event: &IoEvent,
        call_stack: CallStackId,
        debug: Option<&mut dyn Write>,
    ) -> Result<StepOutcome, ModelError> {
        let started = Instant::now();

        self.stats
            .record_io(event.op, event.length, event.duration_ns);

        let outcome = self
            .scope
            .entry_for(event)
            .step(call_stack, self.settings.cold_start_guard);

        self.stats
            .record_hits(outcome.hits, event.length, event.duration_ns);

        tracing::trace!(
            handle = event.handle,
            op = event.op.name(),
            call_stack = %outcome.call_stack,
            context = %outcome.context,
            mru_next = %outcome.prediction.mru,
            mfu_next = %outcome.prediction.mfu,
            "io step"
        );

        let logged = match debug {
            Some(sink) => write_debug_line(sink, event, &outcome),
            None => Ok(()),
        };

        self.stats.record_model_time(elapsed_ns(started));

        if event.op == OpKind::Close && self.settings.granularity == Granularity::Handle {
            self.sample_footprint();
            self.scope.close(event.handle);
        }

        logged.map_err(ModelError::DebugSink)?;
        Ok(outcome)
    }

    /// Zero the statistics, keeping configuration, contexts, and graphs.
    ///
    /// Called in a forked child so inherited I/O is not counted twice.
    pub fn results_reset(&mut self) {
        self.stats.reset();
        tracing::info!("statistics reset");
    }

    /// Sample the memory footprint, then write and flush the report.
    pub fn results_dump<W: Write + ?Sized>(&mut self, sink: &mut W) -> Result<Report, ReportError> {
        self.sample_footprint();
        let report = self.report();
        report.write_to(sink)?;
        tracing::info!(
            io_count = report.io_count,
            mru_hits = report.mru_correct_prediction_count,
            mfu_hits = report.mfu_correct_prediction_count,
            memory_footprint = report.model_memory_footprint,
            "report written"
        );
        Ok(report)
    }

    /// Current statistics without writing anything.
    pub fn report(&self) -> Report {
        self.stats
            .report(&self.settings, self.memory_footprint())
    }

    /// Release every context and graph, returning the final statistics.
    pub fn finalize(mut self) -> Report {
        self.sample_footprint();
        let report = self.report();
        tracing::info!(
            graphs = self.scope.graph_count(),
            node_count = self.scope.node_count(),
            memory_footprint = report.model_memory_footprint,
            "prediction model finalized"
        );
        report
    }

    /// Next-I/O prediction for `handle`, if the handle has prediction state.
    pub fn pending(&self, handle: Handle) -> Option<Prediction> {
        self.scope.pending(handle)
    }

    /// Estimated bytes held by the model right now.
    pub fn memory_footprint(&self) -> u64 {
        let fixed = std::mem::size_of::<ModelSettings>() + std::mem::size_of::<StatsRecorder>();
        (fixed + self.scope.memory_footprint()) as u64
    }

    pub fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    pub fn scope(&self) -> &ScopeStore {
        &self.scope
    }

    pub fn stats(&self) -> &StatsRecorder {
        &self.stats
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    fn sample_footprint(&mut self) {
        let bytes = self.memory_footprint();
        self.stats.sample_footprint(bytes);
    }
}

fn write_debug_line(
    sink: &mut dyn Write,
    event: &IoEvent,
    outcome: &StepOutcome,
) -> std::io::Result<()> {
    writeln!(
        sink,
        "timestamp={}, io_call_stack={}, io_context={}, mru_next_context={}, mfu_next_context={}",
        event.timestamp,
        outcome.call_stack,
        outcome.context,
        outcome.prediction.mru,
        outcome.prediction.mfu
    )
}

fn elapsed_ns(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX)
}
