//! Common types used across the platform

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Kilometres per degree used for the flat-earth distance approximation
pub const KM_PER_DEGREE: f64 = 111.0;

/// A point on the earth's surface in decimal degrees
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Validate)]
pub struct GeoPoint {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Approximate distance in km: Euclidean distance in degrees scaled by
    /// [`KM_PER_DEGREE`]. Good enough for "is this event nearby".
    pub fn approx_distance_km(&self, other: &GeoPoint) -> f64 {
        let dlat = self.latitude - other.latitude;
        let dlon = self.longitude - other.longitude;
        (dlat * dlat + dlon * dlon).sqrt() * KM_PER_DEGREE
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Inclusive date range for an analysis window
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The `days`-long window ending on `end`
    pub fn trailing_days(end: NaiveDate, days: u64) -> Self {
        let start = end
            .checked_sub_days(chrono::Days::new(days))
            .unwrap_or(NaiveDate::MIN);
        Self { start, end }
    }

    /// Number of days between start and end (negative if inverted)
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}
