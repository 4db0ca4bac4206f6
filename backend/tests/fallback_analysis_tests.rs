//! Rule-based risk classifier tests
//!
//! Tests for the fallback assessment including:
//! - Steady decline from 0.7 to 0.1 is critical with deforestation
//! - Threshold order (critical, high, medium, low)
//! - Fixed confidence and recommendations
//! - Deforestation flagged only for critical risk

use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use shared::{
    classify_risk, fallback_assessment, Observation, ObservationSeries, ObservationSource,
    RiskLevel, FALLBACK_CONFIDENCE, FALLBACK_RECOMMENDATIONS,
};

/// Evenly spaced series moving linearly from `first` to `last`
fn linear_series(first: f64, last: f64, points: usize) -> ObservationSeries {
    let start = NaiveDate::from_ymd_opt(2024, 10, 19).unwrap();
    let steps = (points.max(2) - 1) as f64;
    let observations = (0..points)
        .map(|i| {
            let target = first + (last - first) * i as f64 / steps;
            Observation::from_target_index(
                start + Days::new(30 * i as u64),
                target,
                0.3,
                0.2,
                ObservationSource::Simulated,
            )
        })
        .collect();
    ObservationSeries::new(ObservationSource::Simulated, observations).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_steady_decline_is_critical() {
        let series = linear_series(0.7, 0.1, 24);
        let assessment = fallback_assessment(&series);

        assert_eq!(assessment.risk_level, RiskLevel::Critical);
        assert!(assessment.deforestation_detected);
        assert_eq!(assessment.confidence, 0.75);
        assert_eq!(assessment.vegetation_health, "Degraded");
        assert_eq!(
            assessment.summary,
            "Vegetation analysis shows significant degradation with NDVI of 0.10. Trend: -0.60"
        );
    }

    #[test]
    fn test_stable_healthy_series_is_low() {
        let assessment = fallback_assessment(&linear_series(0.72, 0.7, 12));

        assert_eq!(assessment.risk_level, RiskLevel::Low);
        assert!(!assessment.deforestation_detected);
        assert_eq!(assessment.vegetation_health, "Healthy");
        assert!(assessment.summary.contains("stable conditions"));
    }

    /// Rules are checked in order; the first match wins
    #[test]
    fn test_threshold_order() {
        assert_eq!(classify_risk(0.29, 0.0), (RiskLevel::Critical, true));
        assert_eq!(classify_risk(0.8, -0.25), (RiskLevel::Critical, true));
        assert_eq!(classify_risk(0.35, 0.0), (RiskLevel::High, false));
        assert_eq!(classify_risk(0.8, -0.15), (RiskLevel::High, false));
        assert_eq!(classify_risk(0.45, 0.0), (RiskLevel::Medium, false));
        assert_eq!(classify_risk(0.5, 0.0), (RiskLevel::Low, false));
        assert_eq!(classify_risk(0.25, 0.5), (RiskLevel::Critical, true));
        assert_eq!(classify_risk(0.55, 0.0), (RiskLevel::Low, false));
        assert_eq!(classify_risk(0.45, -0.15), (RiskLevel::High, false));
    }

    /// Boundaries are exclusive
    #[test]
    fn test_threshold_boundaries() {
        assert_eq!(classify_risk(0.3, -0.2).0, RiskLevel::High);
        assert_eq!(classify_risk(0.4, -0.1).0, RiskLevel::Medium);
    }

    #[test]
    fn test_single_observation_has_zero_trend() {
        let series = linear_series(0.45, 0.45, 1);
        assert_eq!(series.trend(), 0.0);
        assert_eq!(fallback_assessment(&series).risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_fixed_recommendations() {
        let assessment = fallback_assessment(&linear_series(0.6, 0.5, 5));
        assert_eq!(assessment.recommendations, FALLBACK_RECOMMENDATIONS.to_vec());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn ndvi_strategy() -> impl Strategy<Value = f64> {
        -0.2f64..=0.95
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Deforestation is flagged exactly when the critical rule fires
        #[test]
        fn prop_deforestation_iff_critical(
            latest in ndvi_strategy(),
            trend in -1.0f64..=1.0,
        ) {
            let (level, deforestation) = classify_risk(latest, trend);
            prop_assert_eq!(deforestation, level == RiskLevel::Critical);
            prop_assert_eq!(deforestation, latest < 0.3 || trend < -0.2);
        }

        /// The classifier output does not depend on anything but the series
        #[test]
        fn prop_fallback_deterministic(
            first in ndvi_strategy(),
            last in ndvi_strategy(),
            points in 1usize..=36,
        ) {
            let series = linear_series(first, last, points);
            let a = fallback_assessment(&series);
            let b = fallback_assessment(&series);

            prop_assert_eq!(&a, &b);
            prop_assert_eq!(a.confidence, FALLBACK_CONFIDENCE);
            prop_assert_eq!(a.recommendations.len(), 3);
        }

        /// Lower NDVI never yields a lower risk for the same trend
        #[test]
        fn prop_risk_monotonic_in_ndvi(
            a in ndvi_strategy(),
            b in ndvi_strategy(),
            trend in -0.5f64..=0.5,
        ) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(classify_risk(low, trend).0 >= classify_risk(high, trend).0);
        }
    }
}
