//! ScopeStore: one prediction state for the whole process, or one per open handle.

pub mod entry;
pub mod handle_table;

pub use entry::{ScopeEntry, StepOutcome};
pub use handle_table::HandleTable;

use iopredict_core::config::ModelSettings;
use iopredict_core::types::{Granularity, Handle, IoEvent, OpKind};

use crate::graph::Prediction;

/// Prediction state at the configured granularity.
#[derive(Debug, Clone)]
pub enum ScopeStore {
    /// A single context and graph shared by every handle.
    Process(ScopeEntry),
    /// Independent context and graph per handle.
    Handle(HandleTable),
}

impl ScopeStore {
    pub fn new(settings: &ModelSettings) -> Self {
        match settings.granularity {
            Granularity::Process => Self::Process(ScopeEntry::new(settings)),
            Granularity::Handle => Self::Handle(HandleTable::new(settings)),
        }
    }

    pub fn granularity(&self) -> Granularity {
        match self {
            Self::Process(_) => Granularity::Process,
            Self::Handle(_) => Granularity::Handle,
        }
    }

    /// Entry that `event` updates.
    ///
    /// In handle scope an OPEN starts a fresh entry before the update, and any
    /// other event on an unknown handle opens one implicitly.
    pub fn entry_for(&mut self, event: &IoEvent) -> &mut ScopeEntry {
        match self {
            Self::Process(entry) => entry,
            Self::Handle(table) => {
                if event.op == OpKind::Open {
                    table.open(event.handle);
                }
                table.ensure(event.handle)
            }
        }
    }

    /// Drop the entry of a closed handle. No-op in process scope.
    pub fn close(&mut self, handle: Handle) -> Option<ScopeEntry> {
        match self {
            Self::Process(_) => None,
            Self::Handle(table) => table.close(handle),
        }
    }

    /// Entry that events on `handle` currently update, if any.
    pub fn entry(&self, handle: Handle) -> Option<&ScopeEntry> {
        match self {
            Self::Process(entry) => Some(entry),
            Self::Handle(table) => table.get(handle),
        }
    }

    /// Next-I/O prediction for `handle`: what a prefetcher should act on.
    pub fn pending(&self, handle: Handle) -> Option<Prediction> {
        self.entry(handle).map(ScopeEntry::pending)
    }

    /// Number of live graphs.
    pub fn graph_count(&self) -> usize {
        match self {
            Self::Process(_) => 1,
            Self::Handle(table) => table.len(),
        }
    }

    /// Number of nodes across all live graphs.
    pub fn node_count(&self) -> usize {
        match self {
            Self::Process(entry) => entry.graph().len(),
            Self::Handle(table) => table.iter().map(|(_, e)| e.graph().len()).sum(),
        }
    }

    /// Fixed size of the store plus everything it owns on the heap.
    pub fn memory_footprint(&self) -> usize {
        let owned = match self {
            Self::Process(entry) => entry.heap_bytes(),
            Self::Handle(table) => table.heap_bytes(),
        };
        std::mem::size_of::<Self>() + owned
    }
}
