//! Log output setup.
//!
//! `RUST_LOG` wins when set; otherwise `log.level` from the configuration is
//! the global maximum level.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Filter used by [`init`]. An unparseable `level` falls back to `info`.
pub fn filter(level: &str) -> EnvFilter {
    let default = level.trim().parse::<LevelFilter>().unwrap_or(LevelFilter::INFO);
    EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy()
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(level: &str) {
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    let _ = tracing_subscriber::registry()
        .with(filter(level))
        .with(fmt_layer)
        .try_init();
}
