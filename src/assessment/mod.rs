//! Assessment module - self-rated skill snapshots and their analysis
//!
//! Features:
//! - One-pass normalization of raw scores (coerce or default)
//! - Validation listing every problem, plus plausibility heuristics
//! - Weighted category analysis, strengths and weaknesses
//! - Progress between two snapshots and training recommendations

pub mod analyzer;
pub mod normalize;
pub mod progress;

pub use analyzer::{AnalysisFailure, AnalysisResponse, AssessmentAnalysis, AssessmentAnalyzer};
pub use normalize::{coerce_or_default, validate, ValidatedScores, WarningFlag};
pub use progress::ProgressReport;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::AnalyzerThresholds;
use crate::error::ValidationError;
use crate::skills::SkillScores;

/// Who produced the ratings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentKind {
    #[default]
    SelfRated,
    Coach,
}

/// Assessment exactly as submitted. Scores may be numbers or numeric strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawAssessment {
    pub id: Option<String>,
    pub scores: BTreeMap<String, serde_json::Value>,
    pub taken_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    #[serde(default)]
    pub kind: AssessmentKind,
}

impl RawAssessment {
    pub fn with_score(mut self, code: &str, value: impl Into<serde_json::Value>) -> Self {
        self.scores.insert(code.to_string(), value.into());
        self
    }

    /// Scores with every gap filled by the neutral default. Never fails.
    pub fn scores_or_default(&self) -> SkillScores {
        coerce_or_default(&self.scores)
    }
}

/// Validated, immutable snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Assessment {
    pub id: Option<String>,
    pub scores: SkillScores,
    pub taken_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub kind: AssessmentKind,
}

impl Assessment {
    pub fn new(scores: SkillScores, taken_at: DateTime<Utc>) -> Self {
        Self { id: None, scores, taken_at, notes: None, kind: AssessmentKind::SelfRated }
    }

    /// Validate a raw submission. Missing timestamps are stamped with now.
    pub fn from_raw(
        raw: &RawAssessment,
        thresholds: &AnalyzerThresholds,
    ) -> Result<(Self, Vec<WarningFlag>), ValidationError> {
        let validated = validate(&raw.scores, thresholds)?;
        let assessment = Self {
            id: raw.id.clone(),
            scores: validated.scores,
            taken_at: raw.taken_at.unwrap_or_else(Utc::now),
            notes: raw.notes.clone(),
            kind: raw.kind,
        };
        Ok((assessment, validated.warnings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::SkillCode;

    #[test]
    fn test_from_raw_keeps_metadata() {
        let mut raw = RawAssessment {
            id: Some("a-1".into()),
            notes: Some("after fall ball".into()),
            kind: AssessmentKind::Coach,
            ..Default::default()
        };
        for (i, skill) in SkillCode::all().iter().enumerate() {
            raw = raw.with_score(skill.code(), (i % 7 + 2) as i64);
        }
        let (assessment, warnings) =
            Assessment::from_raw(&raw, &AnalyzerThresholds::default()).unwrap();
        assert_eq!(assessment.id.as_deref(), Some("a-1"));
        assert_eq!(assessment.kind, AssessmentKind::Coach);
        assert_eq!(assessment.scores.get(SkillCode::ReceivingGloveMove), 2);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_scores_or_default_fills_neutral() {
        let raw = RawAssessment::default().with_score("blocking_overall", 9);
        let scores = raw.scores_or_default();
        assert_eq!(scores.get(SkillCode::BlockingOverall), 9);
        assert_eq!(scores.get(SkillCode::ThrowingAccuracy), 5);
    }

    #[test]
    fn test_raw_kind_defaults_to_self_rated() {
        let raw: RawAssessment = serde_json::from_str(r#"{"scores": {}}"#).unwrap();
        assert_eq!(raw.kind, AssessmentKind::SelfRated);
        assert!(raw.id.is_none());
    }
}
