//! Scoring of the previous I/O's predictions against the context that actually happened.

use serde::{Deserialize, Serialize};

use iopredict_core::types::{CallStackId, ColdStartGuard, ContextHash};

use crate::graph::Prediction;

/// Which heuristics predicted the current context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hits {
    pub mru: bool,
    pub mfu: bool,
}

/// Compare `pending` (made on the previous I/O) with `context`.
///
/// A heuristic hits when its prediction equals `context`. With no prediction
/// yet, a repeat of the exact previous call site also counts as a hit. The MFU
/// fallback requires the MFU prediction to be unset; the MRU fallback requires
/// whichever prediction `guard` names to be unset.
pub fn check(
    pending: Prediction,
    previous_call_stack: CallStackId,
    context: ContextHash,
    call_stack: CallStackId,
    guard: ColdStartGuard,
) -> Hits {
    let repeated_call_site = previous_call_stack == call_stack;
    let mru_guard = match guard {
        ColdStartGuard::OwnPrediction => pending.mru,
        ColdStartGuard::MfuPrediction => pending.mfu,
    };
    Hits {
        mru: pending.mru == context || (mru_guard.is_unset() && repeated_call_site),
        mfu: pending.mfu == context || (pending.mfu.is_unset() && repeated_call_site),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CTX: ContextHash = ContextHash(77);
    const SITE: CallStackId = CallStackId(9);

    #[test]
    fn exact_predictions_hit() {
        let pending = Prediction { mru: CTX, mfu: CTX };
        let hits = check(pending, CallStackId(1), CTX, SITE, ColdStartGuard::OwnPrediction);
        assert_eq!(hits, Hits { mru: true, mfu: true });
    }

    #[test]
    fn repeat_call_site_counts_only_without_prediction() {
        let cold = Prediction::default();
        let hits = check(cold, SITE, CTX, SITE, ColdStartGuard::OwnPrediction);
        assert_eq!(hits, Hits { mru: true, mfu: true });

        let warm = Prediction { mru: ContextHash(1), mfu: ContextHash(2) };
        let hits = check(warm, SITE, CTX, SITE, ColdStartGuard::OwnPrediction);
        assert_eq!(hits, Hits::default());
    }

    #[test]
    fn guards_are_independent_per_policy() {
        // MRU unset, MFU set: only the own-prediction guard lets MRU fall back.
        let pending = Prediction { mru: ContextHash::UNSET, mfu: ContextHash(5) };
        let own = check(pending, SITE, CTX, SITE, ColdStartGuard::OwnPrediction);
        assert_eq!(own, Hits { mru: true, mfu: false });
        let via_mfu = check(pending, SITE, CTX, SITE, ColdStartGuard::MfuPrediction);
        assert_eq!(via_mfu, Hits { mru: false, mfu: false });

        // MRU set, MFU unset: only the MFU guard lets MRU fall back.
        let pending = Prediction { mru: ContextHash(5), mfu: ContextHash::UNSET };
        let own = check(pending, SITE, CTX, SITE, ColdStartGuard::OwnPrediction);
        assert_eq!(own, Hits { mru: false, mfu: true });
        let via_mfu = check(pending, SITE, CTX, SITE, ColdStartGuard::MfuPrediction);
        assert_eq!(via_mfu, Hits { mru: true, mfu: true });
    }
}
