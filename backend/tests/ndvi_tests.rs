//! NDVI calculator tests
//!
//! Tests for the vegetation index including:
//! - Degenerate and extreme band values
//! - Antisymmetry: ndvi(r, n) = -ndvi(n, r)
//! - Bounded output for non-negative reflectance
//! - Scene-metadata NDVI proxy clamping

use proptest::prelude::*;
use shared::{
    estimate_scene_ndvi, ndvi, validate_reflectance, VegetationHealth, SCENE_NDVI_MAX,
    SCENE_NDVI_MIN,
};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Textbook values
    #[test]
    fn test_known_values() {
        assert!(approx(ndvi(0.3, 0.5), 0.25));
        assert!(approx(ndvi(0.2, 0.6), 0.5));
        assert_eq!(ndvi(0.4, 0.4), 0.0);
    }

    /// Zero sum is defined as zero, not NaN
    #[test]
    fn test_zero_bands() {
        let value = ndvi(0.0, 0.0);
        assert_eq!(value, 0.0);
        assert!(!value.is_nan());
    }

    #[test]
    fn test_single_band_extremes() {
        assert_eq!(ndvi(0.0, 0.8), 1.0);
        assert_eq!(ndvi(0.8, 0.0), -1.0);
    }

    /// Health bands use strict lower bounds
    #[test]
    fn test_vegetation_health_bands() {
        assert_eq!(VegetationHealth::from_ndvi(0.61), VegetationHealth::Healthy);
        assert_eq!(VegetationHealth::from_ndvi(0.6), VegetationHealth::Moderate);
        assert_eq!(VegetationHealth::from_ndvi(0.41), VegetationHealth::Moderate);
        assert_eq!(VegetationHealth::from_ndvi(0.4), VegetationHealth::Degraded);
        assert_eq!(VegetationHealth::from_ndvi(-0.5), VegetationHealth::Degraded);
    }

    #[test]
    fn test_reflectance_validation() {
        assert!(validate_reflectance(0.0).is_ok());
        assert!(validate_reflectance(0.35).is_ok());
        assert!(validate_reflectance(-0.01).is_err());
        assert!(validate_reflectance(f64::NAN).is_err());
        assert!(validate_reflectance(f64::INFINITY).is_err());
    }

    /// Scene proxy: 0.3 + 0.4 * clear - 0.2 * cloud, clamped
    #[test]
    fn test_scene_proxy() {
        assert!(approx(estimate_scene_ndvi(0.5, 0.5), 0.4));
        assert!(approx(estimate_scene_ndvi(1.0, 0.0), 0.7));
        assert_eq!(estimate_scene_ndvi(0.0, 1.0), SCENE_NDVI_MIN);
        assert_eq!(estimate_scene_ndvi(3.0, 0.0), SCENE_NDVI_MAX);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn reflectance_strategy() -> impl Strategy<Value = f64> {
        0.0f64..=1.0
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Swapping the bands negates the index
        #[test]
        fn prop_ndvi_antisymmetric(
            red in reflectance_strategy(),
            nir in reflectance_strategy(),
        ) {
            prop_assert_eq!(ndvi(red, nir), -ndvi(nir, red));
        }

        /// Non-negative bands always give a finite index in [-1, 1]
        #[test]
        fn prop_ndvi_bounded(
            red in reflectance_strategy(),
            nir in reflectance_strategy(),
        ) {
            let value = ndvi(red, nir);
            prop_assert!(value.is_finite());
            prop_assert!((-1.0..=1.0).contains(&value));
        }

        /// Equal bands give zero
        #[test]
        fn prop_equal_bands_zero(band in reflectance_strategy()) {
            prop_assert_eq!(ndvi(band, band), 0.0);
        }

        /// A positive NIR with zero red is fully vegetated
        #[test]
        fn prop_zero_red_is_one(nir in 0.001f64..=1.0) {
            prop_assert_eq!(ndvi(0.0, nir), 1.0);
        }

        /// The scene proxy never leaves its clamp range
        #[test]
        fn prop_scene_proxy_clamped(
            clear in -1.0f64..=2.0,
            cloud in -1.0f64..=2.0,
        ) {
            let value = estimate_scene_ndvi(clear, cloud);
            prop_assert!((SCENE_NDVI_MIN..=SCENE_NDVI_MAX).contains(&value));
        }
    }
}
