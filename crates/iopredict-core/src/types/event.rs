//! Intercepted I/O events.

use serde::{Deserialize, Serialize};

use super::identifiers::Handle;

/// Kind of intercepted operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    Read,
    Write,
    Open,
    Close,
}

impl OpKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Open => "open",
            Self::Close => "close",
        }
    }
}

/// One intercepted I/O, as handed to the model by the interception layer.
///
/// `offset` and `thread_id` are carried for the debug log and future use;
/// the model does not interpret them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoEvent {
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub thread_id: i32,
    pub handle: Handle,
    pub offset: i64,
    /// Bytes transferred. Zero for open/close.
    pub length: u64,
    pub duration_ns: u64,
    pub op: OpKind,
}

impl IoEvent {
    /// A read of `length` bytes on `handle`, all other fields zero.
    pub fn read(handle: Handle, length: u64) -> Self {
        Self::new(handle, OpKind::Read, length)
    }

    /// A write of `length` bytes on `handle`, all other fields zero.
    pub fn write(handle: Handle, length: u64) -> Self {
        Self::new(handle, OpKind::Write, length)
    }

    pub fn open(handle: Handle) -> Self {
        Self::new(handle, OpKind::Open, 0)
    }

    pub fn close(handle: Handle) -> Self {
        Self::new(handle, OpKind::Close, 0)
    }

    fn new(handle: Handle, op: OpKind, length: u64) -> Self {
        Self {
            timestamp: 0,
            thread_id: 0,
            handle,
            offset: 0,
            length,
            duration_ns: 0,
            op,
        }
    }

    /// Builder-style setter for the I/O duration.
    pub fn with_duration(mut self, duration_ns: u64) -> Self {
        self.duration_ns = duration_ns;
        self
    }

    /// Builder-style setter for the event timestamp.
    pub fn at(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }
}
