//! Identifier, event, and policy types shared across the workspace.

pub mod event;
pub mod identifiers;
pub mod policy;

pub use event::{IoEvent, OpKind};
pub use identifiers::{CallStackId, ContextHash, Handle};
pub use policy::{ColdStartGuard, Granularity, NodeSeed};
