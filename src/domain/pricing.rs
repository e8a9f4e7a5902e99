pub const BASE_PRICE_PER_KWH: f64 = 0.20;
pub const PEAK_SURCHARGE_MULTIPLIER: f64 = 0.50;

/// Score assumed when the demand payload carries no usable `demand_score`.
pub const FALLBACK_DEMAND_SCORE: f64 = 0.5;

/// price = base + demand_score * surcharge, rounded to 4 decimals.
pub fn price_per_kwh(demand_score: f64) -> f64 {
    round_to_4_decimals(BASE_PRICE_PER_KWH + demand_score * PEAK_SURCHARGE_MULTIPLIER)
}

fn round_to_4_decimals(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
