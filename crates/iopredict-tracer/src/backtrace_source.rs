//! Call-stack capture backed by the `backtrace` crate.

use iopredict_core::errors::TracerError;
use iopredict_core::hashing;
use iopredict_core::traits::CallStackSource;
use iopredict_core::types::CallStackId;

use crate::maps::LibraryRanges;

/// Hashes the innermost `depth` return addresses, each made relative to its
/// executable mapping so the same call site yields the same id in every run.
#[derive(Debug, Clone)]
pub struct BacktraceSource {
    ranges: LibraryRanges,
    seed: u64,
    frames: Vec<u64>,
}

impl BacktraceSource {
    pub fn new(ranges: LibraryRanges, seed: u64) -> Self {
        Self {
            ranges,
            seed,
            frames: Vec::new(),
        }
    }

    /// Source for the running process, reading its executable mappings.
    pub fn for_current_process(seed: u64) -> Result<Self, TracerError> {
        let ranges = LibraryRanges::current()?;
        tracing::debug!(ranges = ranges.len(), "executable ranges loaded");
        Ok(Self::new(ranges, seed))
    }

    /// Re-read the mappings, e.g. after a library was loaded.
    pub fn rebuild_ranges(&mut self) -> Result<(), TracerError> {
        self.ranges.rebuild()
    }

    pub fn ranges(&self) -> &LibraryRanges {
        &self.ranges
    }
}

impl CallStackSource for BacktraceSource {
    fn capture(&mut self, depth: u32) -> CallStackId {
        self.frames.clear();
        let depth = depth as usize;
        if depth > 0 {
            let ranges = &self.ranges;
            let frames = &mut self.frames;
            backtrace::trace(|frame| {
                frames.push(ranges.offset_for(frame.ip() as usize as u64));
                frames.len() < depth
            });
        }
        hashing::call_stack_id(&self.frames, self.seed)
    }
}
