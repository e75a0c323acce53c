//! Tracing subscriber setup for the binary.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "quill=info";

/// Installs the global subscriber. `RUST_LOG` takes precedence over
/// `filter`, which takes precedence over [`DEFAULT_FILTER`].
pub fn init(filter: Option<&str>, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter.unwrap_or(DEFAULT_FILTER)));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(false).json())
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(false).compact())
            .init();
    }
}
