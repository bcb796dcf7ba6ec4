//! Log output for the pages-deploy binary.
//!
//! Two audiences share stderr:
//!
//! - Operators see deploy events rendered by [`crate::events::TracingSink`]:
//!   the `==>` helper command echo, build and publish failures, missing
//!   dependencies. These are `info` and above and show with no `RUST_LOG`.
//! - Developers get `debug` lines from the `io` adapters (spawned commands,
//!   scan counts, config source) by raising the filter, e.g.
//!   `RUST_LOG=pages_deploy=debug`.
//!
//! Dependencies stay at `warn` unless `RUST_LOG` says otherwise. Nothing is
//! written to stdout, which `pages-deploy config` reserves for its TOML.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "warn,pages_deploy=info";

/// Install the global subscriber; call once at startup.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
