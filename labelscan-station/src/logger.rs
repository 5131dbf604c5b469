//! Logging setup
//!
//! Console-only tracing subscriber. The interactive output of the station
//! goes to stdout; diagnostics go through tracing and default to `warn`
//! so they stay out of the operator's way.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the logging system
///
/// `RUST_LOG` overrides `level` when set. `json_format` switches to JSON
/// output for service deployments.
pub fn init_logger(level: &str, json_format: bool) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(env_filter);

    if json_format {
        registry
            .with(fmt::layer().json().with_target(true))
            .try_init()?;
    } else {
        registry
            .with(fmt::layer().with_target(false))
            .try_init()?;
    }

    Ok(())
}
