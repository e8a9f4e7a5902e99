use std::sync::Arc;

use actix_web::{HttpResponse, Responder, get, web};
use serde::Serialize;
use serde_json::Value;

use crate::adapters::demand_client::DemandFetcher;
use crate::domain::pricing::{FALLBACK_DEMAND_SCORE, price_per_kwh};

#[derive(Clone)]
pub struct PricingState {
    pub demand: Arc<dyn DemandFetcher>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct PricingResponse {
    pub price_per_kwh: f64,
    pub based_on_demand: Value,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(current_pricing_endpoint);
}

#[get("/pricing/current")]
async fn current_pricing_endpoint(state: web::Data<PricingState>) -> impl Responder {
    let payload = match state.demand.fetch_demand().await {
        Ok(payload) => payload,
        Err(error) => {
            tracing::warn!(error = %error, "demand fetch failed");
            return HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "error": format!("demand service unavailable: {error}")
            }));
        }
    };

    let demand_score = payload
        .get("demand_score")
        .and_then(Value::as_f64)
        .unwrap_or(FALLBACK_DEMAND_SCORE);

    HttpResponse::Ok().json(PricingResponse {
        price_per_kwh: price_per_kwh(demand_score),
        based_on_demand: payload,
    })
}
