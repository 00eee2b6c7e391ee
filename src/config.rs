//! Static tables bundled into one injectable configuration

use serde::{Deserialize, Serialize};

use crate::skills::SkillModel;
use crate::workout::{EquipmentTiers, TimeTemplates};

/// Analyzer heuristics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyzerThresholds {
    /// This many identical scores (or more) rejects the assessment
    pub uniform_count: usize,
    /// Share of scores >= 8 that raises `high_confidence_pattern`
    pub high_pattern_ratio: f64,
    /// Share of scores <= 4 that raises `low_confidence_pattern`
    pub low_pattern_ratio: f64,
    /// Category trend band; changes within +/- this are stable
    pub trend_band: f64,
}

impl Default for AnalyzerThresholds {
    fn default() -> Self {
        Self {
            uniform_count: 9,
            high_pattern_ratio: 0.7,
            low_pattern_ratio: 0.7,
            trend_band: 0.2,
        }
    }
}

/// Every table the pipeline reads. `Default` is the built-in set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CoachConfig {
    pub skills: SkillModel,
    pub thresholds: AnalyzerThresholds,
    pub time_templates: TimeTemplates,
    pub equipment_tiers: EquipmentTiers,
}

impl CoachConfig {
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Failed to parse coach config: {}", e))
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = CoachConfig::from_json(r#"{"thresholds": {"uniform_count": 11, "high_pattern_ratio": 0.8, "low_pattern_ratio": 0.8, "trend_band": 0.5}}"#)
            .unwrap();
        assert_eq!(config.thresholds.uniform_count, 11);
        assert_eq!(config.skills, SkillModel::default());
        assert_eq!(config.time_templates.templates.len(), 4);
    }

    #[test]
    fn test_json_round_trip() {
        let config = CoachConfig::default();
        let back = CoachConfig::from_json(&config.to_json()).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        let err = CoachConfig::from_json("{not json").unwrap_err();
        assert!(err.starts_with("Failed to parse coach config"));
    }
}
