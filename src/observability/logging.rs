//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for binaries and tests embedding the SDK
//! - Pick plain or JSON output
//! - Let `RUST_LOG` override the configured level

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(config: &ObservabilityConfig) -> EnvFilter {
    EnvFilter::new(format!("staking_sdk={}", config.log_level))
}

/// Install the global subscriber.
///
/// Fails if a global subscriber is already set, which lets hosts that
/// configure tracing themselves ignore the error.
pub fn init(config: &ObservabilityConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(config));
    let registry = tracing_subscriber::registry().with(filter);

    if config.json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer()).try_init()
    }
}
