use actix_web::{HttpResponse, Responder, get, web};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::domain::demand::DemandScenario;

#[derive(Debug, Serialize, PartialEq)]
pub struct DemandResponse {
    pub demand_score: f64,
    pub demand_description: &'static str,
    pub timestamp: String,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(predict_demand_endpoint);
}

#[get("/predict/demand")]
async fn predict_demand_endpoint() -> impl Responder {
    let scenario = DemandScenario::pick_random(&mut rand::thread_rng());

    HttpResponse::Ok().json(DemandResponse {
        demand_score: scenario.score(),
        demand_description: scenario.description(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
