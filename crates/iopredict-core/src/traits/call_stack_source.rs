use crate::types::CallStackId;

/// Produces a stable identifier for the call site of the current I/O.
///
/// The same call site must map to the same id across calls (and, for
/// cross-run comparison, across runs). How the stack is captured and
/// normalized is up to the implementation.
pub trait CallStackSource {
    fn capture(&mut self, depth: u32) -> CallStackId;
}

impl<F> CallStackSource for F
where
    F: FnMut(u32) -> CallStackId,
{
    fn capture(&mut self, depth: u32) -> CallStackId {
        self(depth)
    }
}

/// Source that always reports the same call site.
///
/// Useful when the caller resolves the call stack itself and feeds it through
/// `PredictionModel::on_io_with_call_stack`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedCallStack(pub CallStackId);

impl CallStackSource for FixedCallStack {
    fn capture(&mut self, _depth: u32) -> CallStackId {
        self.0
    }
}
