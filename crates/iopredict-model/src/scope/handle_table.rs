//! Per-handle scope entries with explicit open/close and implicit-open recovery.

use std::collections::hash_map::Entry;

use iopredict_core::collections::FxHashMap;
use iopredict_core::config::ModelSettings;
use iopredict_core::types::Handle;

use super::ScopeEntry;

/// Table of live handle entries, keyed by OS handle.
///
/// Liveness is only ever changed by open/close events, never inferred from
/// the handle value; a reused handle number gets a fresh entry on its next open.
#[derive(Debug, Clone)]
pub struct HandleTable {
    entries: FxHashMap<Handle, ScopeEntry>,
    settings: ModelSettings,
}

impl HandleTable {
    pub fn new(settings: &ModelSettings) -> Self {
        Self {
            entries: FxHashMap::default(),
            settings: *settings,
        }
    }

    /// Explicit open: start `handle` with a fresh context and an empty graph.
    ///
    /// Returns true when a stale entry for the same handle was replaced.
    pub fn open(&mut self, handle: Handle) -> bool {
        let replaced = self
            .entries
            .insert(handle, ScopeEntry::new(&self.settings))
            .is_some();
        if replaced {
            tracing::debug!(handle, "open on a live handle, previous graph discarded");
        }
        replaced
    }

    /// Entry for `handle`, created on the fly if the handle was never opened
    /// under tracing (inherited across fork, duplicated, or opened earlier).
    pub fn ensure(&mut self, handle: Handle) -> &mut ScopeEntry {
        match self.entries.entry(handle) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(slot) => {
                tracing::debug!(handle, "I/O on unknown handle, opening implicitly");
                slot.insert(ScopeEntry::new(&self.settings))
            }
        }
    }

    /// Close `handle`, dropping its context and graph.
    pub fn close(&mut self, handle: Handle) -> Option<ScopeEntry> {
        let removed = self.entries.remove(&handle);
        match &removed {
            Some(entry) => tracing::debug!(
                handle,
                node_count = entry.graph().len(),
                "handle closed, graph discarded"
            ),
            None => tracing::debug!(handle, "close on unknown handle"),
        }
        removed
    }

    pub fn get(&self, handle: Handle) -> Option<&ScopeEntry> {
        self.entries.get(&handle)
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.entries.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Handle, &ScopeEntry)> {
        self.entries.iter().map(|(&h, e)| (h, e))
    }

    /// Table slots plus every entry's heap bytes.
    pub fn heap_bytes(&self) -> usize {
        let slot = std::mem::size_of::<(Handle, ScopeEntry)>();
        self.entries
            .values()
            .map(|entry| slot + entry.heap_bytes())
            .sum()
    }
}
