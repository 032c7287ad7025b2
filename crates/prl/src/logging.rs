//! Log output for compiler and transpiler events.
//!
//! The library crates only emit `tracing` events; nothing is printed until
//! a subscriber is installed.

use std::sync::OnceLock;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static INIT: OnceLock<()> = OnceLock::new();

/// Default filter when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "prl=info";

/// Initializes log output.
///
/// Safe to call multiple times - only the first call has effect. A
/// subscriber installed by the application beforehand is kept.
pub fn init() {
    INIT.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init();
    });
}
