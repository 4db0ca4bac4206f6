//! Weather and disaster context for an analysis location

use serde::{Deserialize, Serialize};

use crate::types::GeoPoint;

/// Default search radius for nearby disaster events
pub const DEFAULT_DISASTER_RADIUS_KM: f64 = 100.0;

/// Current weather at the analysis location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherConditions {
    pub temperature_celsius: f64,
    pub humidity_percent: i32,
    pub condition: String,
    pub description: String,
    pub wind_speed_mps: f64,
}

/// An open disaster event with a point location, before distance filtering
#[derive(Debug, Clone, PartialEq)]
pub struct DisasterSite {
    pub title: String,
    pub category: String,
    pub date: String,
    pub location: GeoPoint,
}

/// A disaster event near the analysis location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisasterEvent {
    pub title: String,
    pub category: String,
    pub date: String,
    /// Rounded to 0.1 km
    pub distance_km: f64,
}

/// Keep sites strictly closer than `radius_km` to `origin`, preserving order.
pub fn events_within<I>(origin: &GeoPoint, sites: I, radius_km: f64) -> Vec<DisasterEvent>
where
    I: IntoIterator<Item = DisasterSite>,
{
    sites
        .into_iter()
        .filter_map(|site| {
            let distance = origin.approx_distance_km(&site.location);
            (distance < radius_km).then(|| DisasterEvent {
                title: site.title,
                category: site.category,
                date: site.date,
                distance_km: (distance * 10.0).round() / 10.0,
            })
        })
        .collect()
}
