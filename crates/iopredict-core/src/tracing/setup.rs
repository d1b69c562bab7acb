//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::constants::env;

static INIT: Once = Once::new();

/// Initialize the iopredict tracing/logging system.
///
/// Reads the `IOPREDICT_LOG` environment variable for per-module log levels.
/// Format: `IOPREDICT_LOG=iopredict_model=debug,iopredict_tracer=info`
///
/// Falls back to `iopredict=info` if `IOPREDICT_LOG` is not set or is invalid.
/// Output goes to stderr so it never mixes with a traced application's stdout.
///
/// This function is idempotent: calling it multiple times is safe.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(env::LOG).unwrap_or_else(|_| EnvFilter::new("iopredict=info"));

        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
