//! Tracing initialization

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "pixform=debug,pixform_api=debug,pixform_processing=debug,pixform_storage=debug,tower_http=debug";

/// Install the global fmt subscriber, filtered by `RUST_LOG` when set.
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_telemetry() {
    let result = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if result.is_ok() {
        tracing::debug!("Tracing initialized");
    }
}
