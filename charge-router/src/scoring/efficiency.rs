//! Absolute route efficiency on a 0-100 scale.
//!
//! Unlike the composite score this does not depend on the other candidates:
//! each factor saturates at a fixed bound.

use crate::domain::Station;

/// Route distance at or beyond which the distance factor is zero.
const DISTANCE_CEILING_KM: f64 = 100.0;
/// Charging power at or above which the power factor is full.
const FULL_POWER_KW: f64 = 150.0;
/// Price per kWh at or above which the cost factor is zero.
const PRICE_CEILING: f64 = 1.0;

const DISTANCE_SHARE: f64 = 0.5;
const POWER_SHARE: f64 = 0.3;
const COST_SHARE: f64 = 0.2;

/// Efficiency of driving `route_distance_km` to charge at `station`.
///
/// Each factor maps linearly onto 0-100 and is clamped there, so the result
/// is always in [0, 100] for a valid station and a non-negative distance.
pub fn route_efficiency(route_distance_km: f64, station: &Station) -> f64 {
    let distance = (100.0 * (1.0 - route_distance_km / DISTANCE_CEILING_KM)).clamp(0.0, 100.0);
    let power = (100.0 * station.power_kw / FULL_POWER_KW).clamp(0.0, 100.0);
    let cost = (100.0 * (1.0 - station.price_per_kwh / PRICE_CEILING)).clamp(0.0, 100.0);
    DISTANCE_SHARE * distance + POWER_SHARE * power + COST_SHARE * cost
}
