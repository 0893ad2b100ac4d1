//! Logging setup: a `tracing-subscriber` fmt layer on stderr, filtered by
//! `DAHU_FIXTURES_LOG` (falling back to `RUST_LOG`, then `warn`).

use std::env;

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

pub const ENV_LOG: &str = "DAHU_FIXTURES_LOG";

static INIT: OnceCell<()> = OnceCell::new();

fn filter_directive() -> String {
    env::var(ENV_LOG)
        .ok()
        .or_else(|| env::var("RUST_LOG").ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "warn".to_string())
}

/// Install the global subscriber once; later calls (or a subscriber set elsewhere) are no-ops.
pub fn init_logging() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_new(filter_directive())
            .unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
