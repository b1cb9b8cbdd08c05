use std::io;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::config::CatalogConfig;
use crate::error::{CatalogError, Result};

/// Installs the global subscriber. `log::` records from the library are
/// bridged into it. `RUST_LOG` wins over the configured level.
pub fn init_logging(config: &CatalogConfig) -> Result<()> {
  let env_filter = build_env_filter(config)?;
  let layer = if config.log_json {
    fmt::layer()
      .json()
      .flatten_event(true)
      .with_target(true)
      .with_writer(io::stderr)
      .boxed()
  } else {
    fmt::layer().with_target(false).with_writer(io::stderr).boxed()
  };

  tracing_subscriber::registry()
    .with(env_filter)
    .with(layer)
    .try_init()
    .map_err(|err| CatalogError::Logger(err.to_string()))
}

fn build_env_filter(config: &CatalogConfig) -> Result<EnvFilter> {
  if let Ok(filter) = EnvFilter::try_from_default_env() {
    return Ok(filter);
  }
  let directive = config.log_level.as_deref().unwrap_or("info");
  EnvFilter::try_new(directive)
    .map_err(|err| CatalogError::Logger(format!("invalid log level '{directive}': {err}")))
}
