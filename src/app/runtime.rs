use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use rusqlite::Connection;

use crate::adapters::demand_client::HttpDemandClient;
use crate::adapters::{demand_api, pricing_api, station_api};
use crate::app::config::{DemandConfig, PricingConfig, StationConfig};
use crate::app::error::AppError;
use crate::app::services::SqliteStationStore;

pub const SCHEMA_RETRY_ATTEMPTS: u32 = 5;
pub const SCHEMA_RETRY_INTERVAL: Duration = Duration::from_secs(5);

/// Tries to establish the schema up to `max_attempts` times, `interval`
/// apart. Exhaustion is not fatal: the service serves anyway and
/// station requests fail at the storage layer until the schema exists.
pub(crate) fn init_schema_with_retry(
    connection: &mut Connection,
    max_attempts: u32,
    interval: Duration,
) -> bool {
    for attempt in 1..=max_attempts {
        match crate::adapters::db::run_migrations(connection) {
            Ok(()) => {
                tracing::info!(attempt, "database schema established");
                return true;
            }
            Err(error) => {
                tracing::warn!(attempt, max_attempts, error = %error, "schema attempt failed");
                if attempt < max_attempts {
                    std::thread::sleep(interval);
                }
            }
        }
    }

    tracing::error!(max_attempts, "schema could not be established; serving anyway");
    false
}

pub fn run_station(config: StationConfig) -> Result<(), AppError> {
    if let Some(parent) = std::path::Path::new(&config.db_path).parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(AppError::database_init)?;
    }

    let mut connection =
        crate::adapters::db::open_connection(&config.db_path).map_err(AppError::database_init)?;
    init_schema_with_retry(&mut connection, SCHEMA_RETRY_ATTEMPTS, SCHEMA_RETRY_INTERVAL);

    let api_state = station_api::ApiState {
        stations: SqliteStationStore::new(Arc::new(Mutex::new(connection))),
    };

    tracing::info!(bind = %config.http_bind, "station directory server starting");

    actix_web::rt::System::new()
        .block_on(async move {
            HttpServer::new(move || {
                App::new()
                    .wrap(Cors::permissive())
                    .app_data(web::Data::new(api_state.clone()))
                    .configure(station_api::configure_routes)
            })
            .bind(&config.http_bind)?
            .run()
            .await
        })
        .map_err(AppError::runtime)
}

pub fn run_demand(config: DemandConfig) -> Result<(), AppError> {
    tracing::info!(bind = %config.http_bind, "demand estimator server starting");

    actix_web::rt::System::new()
        .block_on(async move {
            HttpServer::new(|| {
                App::new()
                    .wrap(Cors::permissive())
                    .configure(demand_api::configure_routes)
            })
            .bind(&config.http_bind)?
            .run()
            .await
        })
        .map_err(AppError::runtime)
}

pub fn run_pricing(config: PricingConfig) -> Result<(), AppError> {
    let demand_client = HttpDemandClient::new(
        &config.demand_url,
        Duration::from_millis(config.demand_timeout_ms),
    )
    .map_err(AppError::runtime)?;

    let state = pricing_api::PricingState {
        demand: Arc::new(demand_client),
    };

    tracing::info!(
        bind = %config.http_bind,
        demand_url = %config.demand_url,
        "pricing server starting"
    );

    actix_web::rt::System::new()
        .block_on(async move {
            HttpServer::new(move || {
                App::new()
                    .wrap(Cors::permissive())
                    .app_data(web::Data::new(state.clone()))
                    .configure(pricing_api::configure_routes)
            })
            .bind(&config.http_bind)?
            .run()
            .await
        })
        .map_err(AppError::runtime)
}
