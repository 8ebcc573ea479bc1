//! Structured logging setup (ambient stack, SPEC_FULL §10).
//!
//! `RUST_LOG` controls verbosity the usual `tracing-subscriber` way;
//! absent that, the service defaults to `info` so a bare `alchemy_cli
//! serve` still logs request-level activity.

pub fn init() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}
