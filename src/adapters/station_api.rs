use actix_web::{HttpRequest, HttpResponse, Responder, delete, get, post, put, web};
use serde::{Deserialize, Deserializer, Serialize};

use crate::app::services::{ServiceError, SqliteStationStore, StationRepository};
use crate::domain::models::{
    DEFAULT_POWER_KW, DEFAULT_STATUS, NewStationRecord, StationPatch, StationRecord,
};

pub const SERVICE_NAME: &str = "station-directory";

#[derive(Clone)]
pub struct ApiState {
    pub stations: SqliteStationStore,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct StationResponse {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub status: String,
    pub power_kw: f64,
    pub created_at: String,
}

impl From<StationRecord> for StationResponse {
    fn from(station: StationRecord) -> Self {
        Self {
            id: station.id,
            name: station.name,
            location: station.location,
            status: station.status,
            power_kw: station.power_kw,
            created_at: station.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateStationRequest {
    pub name: String,
    pub location: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default = "default_power_kw")]
    pub power_kw: f64,
}

fn default_status() -> String {
    DEFAULT_STATUS.to_string()
}

fn default_power_kw() -> f64 {
    DEFAULT_POWER_KW
}

/// Every field is optional, but an explicit JSON `null` is rejected: absence
/// means "keep the stored value", and no station column is nullable.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateStationRequest {
    #[serde(default, deserialize_with = "non_null")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "non_null")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "non_null")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "non_null")]
    pub power_kw: Option<f64>,
}

fn non_null<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl From<UpdateStationRequest> for StationPatch {
    fn from(request: UpdateStationRequest) -> Self {
        Self {
            name: request.name,
            location: request.location,
            status: request.status,
            power_kw: request.power_kw,
        }
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(service_info)
        .service(create_station_endpoint)
        .service(list_stations_endpoint)
        .service(get_station_endpoint)
        .service(update_station_endpoint)
        .service(delete_station_endpoint);
}

fn json_error_handler(
    error: actix_web::error::JsonPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(serde_json::json!({
        "error": format!("invalid request body: {error}")
    }));
    actix_web::error::InternalError::from_response(error, response).into()
}

#[get("/")]
async fn service_info() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": SERVICE_NAME,
    }))
}

#[post("/stations")]
async fn create_station_endpoint(
    state: web::Data<ApiState>,
    payload: web::Json<CreateStationRequest>,
) -> impl Responder {
    let request = payload.into_inner();
    let new_station = NewStationRecord {
        name: request.name,
        location: request.location,
        status: request.status,
        power_kw: request.power_kw,
    };

    match state.stations.create_station(&new_station) {
        Ok(station) => HttpResponse::Created().json(StationResponse::from(station)),
        Err(error) => service_error_response(error),
    }
}

#[get("/stations")]
async fn list_stations_endpoint(state: web::Data<ApiState>) -> impl Responder {
    match state.stations.list_stations() {
        Ok(stations) => {
            let mapped: Vec<StationResponse> =
                stations.into_iter().map(StationResponse::from).collect();
            HttpResponse::Ok().json(mapped)
        }
        Err(error) => service_error_response(error),
    }
}

#[get("/stations/{id}")]
async fn get_station_endpoint(state: web::Data<ApiState>, path: web::Path<i64>) -> impl Responder {
    match state.stations.get_station(path.into_inner()) {
        Ok(station) => HttpResponse::Ok().json(StationResponse::from(station)),
        Err(error) => service_error_response(error),
    }
}

#[put("/stations/{id}")]
async fn update_station_endpoint(
    state: web::Data<ApiState>,
    path: web::Path<i64>,
    payload: web::Json<UpdateStationRequest>,
) -> impl Responder {
    let patch = StationPatch::from(payload.into_inner());

    match state.stations.update_station(path.into_inner(), &patch) {
        Ok(station) => HttpResponse::Ok().json(StationResponse::from(station)),
        Err(error) => service_error_response(error),
    }
}

#[delete("/stations/{id}")]
async fn delete_station_endpoint(
    state: web::Data<ApiState>,
    path: web::Path<i64>,
) -> impl Responder {
    match state.stations.delete_station(path.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(error) => service_error_response(error),
    }
}

fn service_error_response(error: ServiceError) -> HttpResponse {
    match error {
        ServiceError::StationNotFound(_) => HttpResponse::NotFound().json(serde_json::json!({
            "error": error.to_string()
        })),
        ServiceError::DbLockPoisoned => {
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "database lock poisoned"
            }))
        }
        ServiceError::Database(error) => {
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("database operation failed: {error}")
            }))
        }
    }
}
