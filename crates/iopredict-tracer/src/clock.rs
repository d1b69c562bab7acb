//! Event timestamps and compact per-thread ids.

use std::cell::Cell;
use std::sync::atomic::{AtomicI32, Ordering};

static THREAD_COUNTER: AtomicI32 = AtomicI32::new(0);

thread_local! {
    static THREAD_ID: Cell<i32> = const { Cell::new(0) };
}

/// Small positive id of the calling thread, assigned on first use.
pub fn thread_id() -> i32 {
    THREAD_ID.with(|id| {
        if id.get() == 0 {
            id.set(THREAD_COUNTER.fetch_add(1, Ordering::Relaxed) + 1);
        }
        id.get()
    })
}

/// Wall-clock milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
}
