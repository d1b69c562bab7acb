//! Seams between the model core and its host collaborators.

pub mod call_stack_source;

pub use call_stack_source::{CallStackSource, FixedCallStack};
