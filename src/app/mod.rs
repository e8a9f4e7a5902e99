mod config;
mod error;
mod logging;
mod runtime;
pub mod services;

pub use error::AppError;

pub fn run_station() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    logging::init()?;

    let config = config::StationConfig::from_env()?;

    tracing::info!(
        http_bind = %config.http_bind,
        db_path = %config.db_path,
        "station directory bootstrap initialized"
    );

    runtime::run_station(config)
}

pub fn run_demand() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    logging::init()?;

    let config = config::DemandConfig::from_env()?;

    tracing::info!(
        http_bind = %config.http_bind,
        "demand estimator bootstrap initialized"
    );

    runtime::run_demand(config)
}

pub fn run_pricing() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    logging::init()?;

    let config = config::PricingConfig::from_env()?;

    tracing::info!(
        http_bind = %config.http_bind,
        demand_url = %config.demand_url,
        demand_timeout_ms = config.demand_timeout_ms,
        "pricing bootstrap initialized"
    );

    runtime::run_pricing(config)
}
