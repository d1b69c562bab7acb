//! # iopredict-tracer
//!
//! Host side of the prediction model. An interception layer (LD_PRELOAD shim,
//! I/O library hook) forwards open/close/read/write notifications to a
//! [`Tracer`], which timestamps them, captures the call stack, updates the
//! model under a lock, and writes the report when the process terminates.

pub mod backtrace_source;
pub mod clock;
pub mod maps;
pub mod output;
pub mod tracer;

pub use backtrace_source::BacktraceSource;
pub use maps::{AddressRange, LibraryRanges};
pub use output::{OutputPaths, ProcessIdentity};
pub use tracer::Tracer;
