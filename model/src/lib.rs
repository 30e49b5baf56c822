//! Data model and batch pipeline for the airport fuel map.

use tracing_subscriber::EnvFilter;

pub mod airport;
pub mod archive;
pub mod cycle;
pub mod emit;
pub mod nasr;
pub mod parse;
pub mod publish;
pub mod query;

/// Install a global `tracing` subscriber.
///
/// The log level is taken from `RUST_LOG`, defaulting to `info`. Calling this more than once is
/// harmless, which lets tests call it freely.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
