use tracing_subscriber::EnvFilter;

use crate::app::AppError;

const DEFAULT_DIRECTIVES: &str = "info";

/// Installs the process-wide subscriber. `RUST_LOG` overrides the default
/// filter.
pub fn init() -> Result<(), AppError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(AppError::logging_init)
}
