//! Risk assessment models and the rule-based fallback classifier

use serde::{Deserialize, Deserializer, Serialize};

use super::observation::ObservationSeries;

/// Confidence reported by the rule-based classifier. Not calibrated.
pub const FALLBACK_CONFIDENCE: f64 = 0.75;

/// Latest NDVI below this is critical
pub const CRITICAL_NDVI: f64 = 0.3;
/// Trend below this is critical
pub const CRITICAL_TREND: f64 = -0.2;
/// Latest NDVI below this is high risk
pub const HIGH_NDVI: f64 = 0.4;
/// Trend below this is high risk
pub const HIGH_TREND: f64 = -0.1;
/// Latest NDVI below this is medium risk
pub const MEDIUM_NDVI: f64 = 0.5;

/// Recommendations attached to every rule-based assessment
pub const FALLBACK_RECOMMENDATIONS: [&str; 3] = [
    "Continue monitoring vegetation trends",
    "Verify findings with ground truth data",
    "Consider local environmental factors",
];

/// Risk category
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            "critical" => Ok(RiskLevel::Critical),
            other => Err(format!("unknown risk level `{}`", other)),
        }
    }
}

// Case-insensitive so that "High" from a model still validates.
impl<'de> Deserialize<'de> for RiskLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Vegetation health band of the latest NDVI value
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum VegetationHealth {
    Healthy,
    Moderate,
    Degraded,
}

impl VegetationHealth {
    /// "Healthy" above 0.6, "Moderate" above 0.4, otherwise "Degraded"
    pub fn from_ndvi(ndvi: f64) -> Self {
        if ndvi > 0.6 {
            VegetationHealth::Healthy
        } else if ndvi > 0.4 {
            VegetationHealth::Moderate
        } else {
            VegetationHealth::Degraded
        }
    }
}

impl std::fmt::Display for VegetationHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VegetationHealth::Healthy => write!(f, "Healthy"),
            VegetationHealth::Moderate => write!(f, "Moderate"),
            VegetationHealth::Degraded => write!(f, "Degraded"),
        }
    }
}

/// Risk assessment record, produced either by the AI model or by
/// [`fallback_assessment`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub summary: String,
    pub risk_level: RiskLevel,
    pub deforestation_detected: bool,
    pub vegetation_health: String,
    pub recommendations: Vec<String>,
    pub confidence: f64,
}

/// Classify from the latest NDVI and the overall trend.
///
/// Branches are checked in order and short-circuit; the bands overlap, so
/// the order is part of the rule. Returns the level and the deforestation
/// flag.
pub fn classify_risk(latest_ndvi: f64, trend: f64) -> (RiskLevel, bool) {
    if latest_ndvi < CRITICAL_NDVI || trend < CRITICAL_TREND {
        (RiskLevel::Critical, true)
    } else if latest_ndvi < HIGH_NDVI || trend < HIGH_TREND {
        (RiskLevel::High, false)
    } else if latest_ndvi < MEDIUM_NDVI {
        (RiskLevel::Medium, false)
    } else {
        (RiskLevel::Low, false)
    }
}

/// Rule-based assessment of a series
pub fn fallback_assessment(series: &ObservationSeries) -> RiskAssessment {
    let latest = series.latest().ndvi;
    let trend = series.trend();
    let (risk_level, deforestation_detected) = classify_risk(latest, trend);

    let condition = if deforestation_detected {
        "significant degradation"
    } else {
        "stable conditions"
    };

    RiskAssessment {
        summary: format!(
            "Vegetation analysis shows {} with NDVI of {:.2}. Trend: {:.2}",
            condition, latest, trend
        ),
        risk_level,
        deforestation_detected,
        vegetation_health: VegetationHealth::from_ndvi(latest).to_string(),
        recommendations: FALLBACK_RECOMMENDATIONS
            .iter()
            .map(|r| r.to_string())
            .collect(),
        confidence: FALLBACK_CONFIDENCE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_order() {
        assert_eq!(classify_risk(0.25, 0.3), (RiskLevel::Critical, true));
        assert_eq!(classify_risk(0.8, -0.25), (RiskLevel::Critical, true));
        assert_eq!(classify_risk(0.35, 0.0), (RiskLevel::High, false));
        assert_eq!(classify_risk(0.45, -0.15), (RiskLevel::High, false));
        assert_eq!(classify_risk(0.45, 0.0), (RiskLevel::Medium, false));
        assert_eq!(classify_risk(0.55, 0.0), (RiskLevel::Low, false));
    }

    #[test]
    fn test_boundaries_are_strict() {
        assert_eq!(classify_risk(0.3, 0.0).0, RiskLevel::High);
        assert_eq!(classify_risk(0.4, 0.0).0, RiskLevel::Medium);
        assert_eq!(classify_risk(0.5, 0.0).0, RiskLevel::Low);
        assert_eq!(classify_risk(0.6, -0.2).0, RiskLevel::High);
        assert_eq!(classify_risk(0.6, -0.1).0, RiskLevel::Low);
    }

    #[test]
    fn test_vegetation_health_bands() {
        assert_eq!(VegetationHealth::from_ndvi(0.61), VegetationHealth::Healthy);
        assert_eq!(VegetationHealth::from_ndvi(0.6), VegetationHealth::Moderate);
        assert_eq!(VegetationHealth::from_ndvi(0.41), VegetationHealth::Moderate);
        assert_eq!(VegetationHealth::from_ndvi(0.4), VegetationHealth::Degraded);
    }

    #[test]
    fn test_risk_level_parsing() {
        assert_eq!(" High ".parse::<RiskLevel>(), Ok(RiskLevel::High));
        assert_eq!("CRITICAL".parse::<RiskLevel>(), Ok(RiskLevel::Critical));
        assert!("severe".parse::<RiskLevel>().is_err());
    }

    #[test]
    fn test_assessment_serializes_camel_case() {
        let assessment = RiskAssessment {
            summary: "ok".to_string(),
            risk_level: RiskLevel::Medium,
            deforestation_detected: false,
            vegetation_health: "Moderate".to_string(),
            recommendations: vec![],
            confidence: 0.5,
        };
        let json = serde_json::to_value(&assessment).unwrap();
        assert_eq!(json["riskLevel"], "medium");
        assert_eq!(json["deforestationDetected"], false);
        assert_eq!(json["vegetationHealth"], "Moderate");
    }
}
