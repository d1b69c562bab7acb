//! Executable address ranges of the process, used to turn return addresses
//! into offsets that stay stable across runs despite ASLR.

use std::path::{Path, PathBuf};

use iopredict_core::errors::TracerError;

pub const PROC_SELF_MAPS: &str = "/proc/self/maps";

/// One executable mapping `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressRange {
    pub start: u64,
    pub end: u64,
}

impl AddressRange {
    pub fn contains(&self, addr: u64) -> bool {
        self.start <= addr && addr < self.end
    }
}

/// Executable mappings sorted by start address.
#[derive(Debug, Clone, Default)]
pub struct LibraryRanges {
    ranges: Vec<AddressRange>,
    path: Option<PathBuf>,
}

impl LibraryRanges {
    /// Ranges of the current process.
    pub fn current() -> Result<Self, TracerError> {
        Self::load(Path::new(PROC_SELF_MAPS))
    }

    /// Read a maps file; [`rebuild`](Self::rebuild) re-reads the same path.
    pub fn load(path: &Path) -> Result<Self, TracerError> {
        let text = read_maps(path)?;
        let mut ranges = Self::parse(&text);
        ranges.path = Some(path.to_path_buf());
        Ok(ranges)
    }

    /// Parse `start-end perms offset dev inode [path]` lines, keeping the
    /// mappings with execute permission. Malformed lines are skipped.
    pub fn parse(text: &str) -> Self {
        let mut ranges: Vec<AddressRange> = text.lines().filter_map(parse_line).collect();
        ranges.sort_by_key(|r| r.start);
        Self { ranges, path: None }
    }

    /// Reload after the address space changed (e.g. `dlopen`).
    /// No-op for ranges parsed from text.
    pub fn rebuild(&mut self) -> Result<(), TracerError> {
        let Some(path) = self.path.clone() else {
            return Ok(());
        };
        self.ranges = Self::parse(&read_maps(&path)?).ranges;
        tracing::debug!(ranges = self.ranges.len(), "executable ranges rebuilt");
        Ok(())
    }

    /// `addr` relative to the start of its mapping, or 0 when it lies in none.
    pub fn offset_for(&self, addr: u64) -> u64 {
        let idx = self.ranges.partition_point(|r| r.start <= addr);
        match idx.checked_sub(1).map(|i| self.ranges[i]) {
            Some(range) if range.contains(addr) => addr - range.start,
            _ => 0,
        }
    }

    pub fn ranges(&self) -> &[AddressRange] {
        &self.ranges
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

fn read_maps(path: &Path) -> Result<String, TracerError> {
    std::fs::read_to_string(path).map_err(|source| TracerError::AddressMap {
        path: path.display().to_string(),
        source,
    })
}

fn parse_line(line: &str) -> Option<AddressRange> {
    let mut fields = line.split_whitespace();
    let span = fields.next()?;
    let perms = fields.next()?;
    if perms.as_bytes().get(2) != Some(&b'x') {
        return None;
    }
    let (start, end) = span.split_once('-')?;
    let start = u64::from_str_radix(start, 16).ok()?;
    let end = u64::from_str_radix(end, 16).ok()?;
    (start < end).then_some(AddressRange { start, end })
}
