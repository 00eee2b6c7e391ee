//! Assessment analysis - weighted category scores, strengths and recommendations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::normalize::WarningFlag;
use super::progress::{self, ProgressReport};
use super::{Assessment, AssessmentKind, RawAssessment};
use crate::config::{AnalyzerThresholds, CoachConfig};
use crate::error::ValidationError;
use crate::skills::{Category, SkillCode, SkillModel, SkillScores};

/// Round to one decimal place
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One skill inside a category breakdown
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillBreakdown {
    pub skill: SkillCode,
    pub label: String,
    pub score: u8,
    pub weight: f64,
    pub proficiency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryAnalysis {
    pub category: Category,
    pub average: f64,
    pub proficiency: String,
    pub proficiency_description: String,
    pub improvement_potential: f64,
    pub importance_weight: f64,
    pub skills: Vec<SkillBreakdown>,
}

/// Per-category analysis plus the importance-weighted overall average
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryBreakdown {
    pub categories: Vec<CategoryAnalysis>,
    pub overall_average: f64,
    pub overall_proficiency: String,
}

impl CategoryBreakdown {
    pub fn get(&self, category: Category) -> Option<&CategoryAnalysis> {
        self.categories.iter().find(|c| c.category == category)
    }

    pub fn average(&self, category: Category) -> f64 {
        self.get(category).map(|c| c.average).unwrap_or(0.0)
    }

    /// Highest average. The earliest category in declared order wins ties,
    /// not the last one a stable descending sort would leave at the end.
    pub fn strongest(&self) -> Option<&CategoryAnalysis> {
        self.categories
            .iter()
            .fold(None, |best: Option<&CategoryAnalysis>, c| match best {
                Some(b) if b.average >= c.average => Some(b),
                _ => Some(c),
            })
    }

    /// Lowest average. The earliest category in declared order wins ties,
    /// so an all-equal assessment reports receiving as both strongest and weakest.
    pub fn weakest(&self) -> Option<&CategoryAnalysis> {
        self.categories
            .iter()
            .fold(None, |best: Option<&CategoryAnalysis>, c| match best {
                Some(b) if b.average <= c.average => Some(b),
                _ => Some(c),
            })
    }
}

/// A single skill and its raw score
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillRating {
    pub skill: SkillCode,
    pub category: Category,
    pub score: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StrengthsWeaknesses {
    pub strongest_category: Category,
    pub weakest_category: Category,
    pub top_strengths: Vec<SkillRating>,
    /// Lowest score first
    pub bottom_weaknesses: Vec<SkillRating>,
    /// Every skill below 4
    pub critical_areas: Vec<SkillRating>,
    /// Every skill between 6 and 8 inclusive
    pub balanced_areas: Vec<SkillRating>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FocusArea {
    pub category: Category,
    pub average: f64,
    pub time_share: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainingFrequency {
    pub sessions_per_week: u32,
    pub session_minutes: u32,
    pub advice: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PriorityLevel {
    High,
    Medium,
    Low,
}

impl PriorityLevel {
    fn from_score(score: f64) -> Self {
        if score >= 0.7 {
            PriorityLevel::High
        } else if score >= 0.4 {
            PriorityLevel::Medium
        } else {
            PriorityLevel::Low
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryPriority {
    pub category: Category,
    pub score: f64,
    pub level: PriorityLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendations {
    pub primary_focus: FocusArea,
    pub secondary_focuses: Vec<FocusArea>,
    pub training_frequency: TrainingFrequency,
    /// Highest priority first; categories at 8 or above are left out
    pub priorities: Vec<CategoryPriority>,
}

/// Full analysis of one valid assessment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssessmentAnalysis {
    pub assessment_id: Option<String>,
    pub kind: AssessmentKind,
    pub taken_at: DateTime<Utc>,
    pub breakdown: CategoryBreakdown,
    pub strengths: StrengthsWeaknesses,
    pub progress: Option<ProgressReport>,
    pub recommendations: Recommendations,
    pub warning_flags: Vec<WarningFlag>,
}

/// Rejected assessment. The whole analysis is abandoned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{error}")]
pub struct AnalysisFailure {
    pub assessment_id: Option<String>,
    pub error: ValidationError,
}

/// Serializable result envelope for hosts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResponse {
    pub success: bool,
    pub assessment_id: Option<String>,
    pub analysis: Option<AssessmentAnalysis>,
    pub error: Option<String>,
}

impl From<Result<AssessmentAnalysis, AnalysisFailure>> for AnalysisResponse {
    fn from(result: Result<AssessmentAnalysis, AnalysisFailure>) -> Self {
        match result {
            Ok(analysis) => Self {
                success: true,
                assessment_id: analysis.assessment_id.clone(),
                analysis: Some(analysis),
                error: None,
            },
            Err(failure) => Self {
                success: false,
                error: Some(failure.to_string()),
                assessment_id: failure.assessment_id,
                analysis: None,
            },
        }
    }
}

/// Skills assessment analyzer over injected scoring tables
pub struct AssessmentAnalyzer {
    model: SkillModel,
    thresholds: AnalyzerThresholds,
}

impl AssessmentAnalyzer {
    pub fn new(model: SkillModel, thresholds: AnalyzerThresholds) -> Self {
        Self { model, thresholds }
    }

    pub fn from_config(config: &CoachConfig) -> Self {
        Self::new(config.skills.clone(), config.thresholds.clone())
    }

    pub fn model(&self) -> &SkillModel {
        &self.model
    }

    /// Validate and analyze a submission, comparing against `previous` if given
    pub fn analyze(
        &self,
        raw: &RawAssessment,
        previous: Option<&Assessment>,
    ) -> Result<AssessmentAnalysis, AnalysisFailure> {
        let (assessment, warning_flags) =
            Assessment::from_raw(raw, &self.thresholds).map_err(|error| {
                warn!("Rejected assessment {:?}: {}", raw.id, error);
                AnalysisFailure { assessment_id: raw.id.clone(), error }
            })?;

        let analysis = self.analyze_assessment(&assessment, previous, warning_flags);
        info!(
            "Analyzed assessment {:?}: overall {:.1}, weakest {}",
            analysis.assessment_id,
            analysis.breakdown.overall_average,
            analysis.strengths.weakest_category
        );
        Ok(analysis)
    }

    /// Analyze an already validated snapshot
    pub fn analyze_assessment(
        &self,
        assessment: &Assessment,
        previous: Option<&Assessment>,
        warning_flags: Vec<WarningFlag>,
    ) -> AssessmentAnalysis {
        let breakdown = self.analyze_categories(&assessment.scores);
        let strengths = self.strengths_weaknesses(&assessment.scores, &breakdown);
        let recommendations = self.recommendations(&breakdown);
        let progress = previous.map(|prev| self.progress(prev, assessment));

        AssessmentAnalysis {
            assessment_id: assessment.id.clone(),
            kind: assessment.kind,
            taken_at: assessment.taken_at,
            breakdown,
            strengths,
            progress,
            recommendations,
            warning_flags,
        }
    }

    /// Weighted category averages and the importance-weighted overall average.
    /// Runs no plausibility checks, so default-filled scores analyze cleanly.
    pub fn analyze_categories(&self, scores: &SkillScores) -> CategoryBreakdown {
        let categories: Vec<CategoryAnalysis> = self
            .model
            .categories
            .iter()
            .map(|def| {
                let weight_total: f64 = def.skills.iter().map(|s| s.weight).sum();
                let weighted: f64 = def
                    .skills
                    .iter()
                    .map(|s| scores.get(s.skill) as f64 * s.weight)
                    .sum();
                let average = if weight_total > 0.0 {
                    round1(weighted / weight_total)
                } else {
                    0.0
                };

                let (proficiency, proficiency_description) = self.proficiency(average);
                let skills = def
                    .skills
                    .iter()
                    .map(|s| {
                        let score = scores.get(s.skill);
                        SkillBreakdown {
                            skill: s.skill,
                            label: s.skill.label().to_string(),
                            score,
                            weight: s.weight,
                            proficiency: self.proficiency(score as f64).0,
                        }
                    })
                    .collect();

                CategoryAnalysis {
                    category: def.category,
                    average,
                    proficiency,
                    proficiency_description,
                    improvement_potential: round1(10.0 - average),
                    importance_weight: def.importance_weight,
                    skills,
                }
            })
            .collect();

        let importance_total: f64 = categories.iter().map(|c| c.importance_weight).sum();
        let overall_average = if importance_total > 0.0 {
            round1(
                categories
                    .iter()
                    .map(|c| c.average * c.importance_weight)
                    .sum::<f64>()
                    / importance_total,
            )
        } else {
            0.0
        };

        CategoryBreakdown {
            categories,
            overall_average,
            overall_proficiency: self.proficiency(overall_average).0,
        }
    }

    fn proficiency(&self, score: f64) -> (String, String) {
        self.model
            .proficiency_for(score)
            .map(|p| (p.label.clone(), p.description.clone()))
            .unwrap_or_default()
    }

    pub fn strengths_weaknesses(
        &self,
        scores: &SkillScores,
        breakdown: &CategoryBreakdown,
    ) -> StrengthsWeaknesses {
        let rating = |(skill, score): (SkillCode, u8)| SkillRating {
            skill,
            category: skill.category(),
            score,
        };

        // Stable sort: equal scores keep declared skill order
        let mut ranked: Vec<SkillRating> = scores.iter().map(rating).collect();
        ranked.sort_by(|a, b| b.score.cmp(&a.score));

        let top_strengths = ranked.iter().take(3).cloned().collect();
        let bottom_weaknesses = ranked.iter().rev().take(3).cloned().collect();

        let critical_areas = scores.iter().filter(|(_, s)| *s < 4).map(rating).collect();
        let balanced_areas = scores
            .iter()
            .filter(|(_, s)| (6..=8).contains(s))
            .map(rating)
            .collect();

        StrengthsWeaknesses {
            strongest_category: breakdown
                .strongest()
                .map(|c| c.category)
                .unwrap_or(Category::Receiving),
            weakest_category: breakdown
                .weakest()
                .map(|c| c.category)
                .unwrap_or(Category::Receiving),
            top_strengths,
            bottom_weaknesses,
            critical_areas,
            balanced_areas,
        }
    }

    pub fn recommendations(&self, breakdown: &CategoryBreakdown) -> Recommendations {
        let focus = |c: &CategoryAnalysis, time_share: &str| FocusArea {
            category: c.category,
            average: c.average,
            time_share: time_share.to_string(),
            reason: format!(
                "{} averages {:.1} ({})",
                c.category.label(),
                c.average,
                c.proficiency
            ),
        };

        let weakest = breakdown.weakest();
        let primary_focus = match weakest {
            Some(c) => focus(c, "60% of training time"),
            None => FocusArea {
                category: Category::Receiving,
                average: 0.0,
                time_share: "60% of training time".to_string(),
                reason: "No categories to analyze".to_string(),
            },
        };

        let mut secondary: Vec<&CategoryAnalysis> = breakdown
            .categories
            .iter()
            .filter(|c| c.category != primary_focus.category && c.average < 6.0)
            .collect();
        secondary.sort_by(|a, b| {
            a.average
                .partial_cmp(&b.average)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let secondary_focuses = secondary
            .into_iter()
            .take(2)
            .map(|c| focus(c, "20% of training time"))
            .collect();

        let mut priorities: Vec<CategoryPriority> = breakdown
            .categories
            .iter()
            .filter(|c| c.average < 8.0)
            .map(|c| {
                let score = round2(
                    0.4 * (10.0 - c.average) / 10.0
                        + 0.4 * c.improvement_potential / 10.0
                        + 0.2 * c.importance_weight,
                );
                CategoryPriority {
                    category: c.category,
                    score,
                    level: PriorityLevel::from_score(score),
                }
            })
            .collect();
        priorities.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Recommendations {
            primary_focus,
            secondary_focuses,
            training_frequency: training_frequency(breakdown.overall_average),
            priorities,
        }
    }

    /// Progress from `previous` to `current`
    pub fn progress(&self, previous: &Assessment, current: &Assessment) -> ProgressReport {
        progress::compare(
            &self.analyze_categories(&previous.scores),
            &self.analyze_categories(&current.scores),
            &previous.scores,
            &current.scores,
            (current.taken_at - previous.taken_at).num_days(),
            self.thresholds.trend_band,
        )
    }
}

impl Default for AssessmentAnalyzer {
    fn default() -> Self {
        Self::new(SkillModel::default(), AnalyzerThresholds::default())
    }
}

fn training_frequency(overall_average: f64) -> TrainingFrequency {
    if overall_average < 4.0 {
        TrainingFrequency {
            sessions_per_week: 5,
            session_minutes: 45,
            advice: "Build fundamentals with frequent, focused sessions".to_string(),
        }
    } else if overall_average < 6.0 {
        TrainingFrequency {
            sessions_per_week: 4,
            session_minutes: 40,
            advice: "Sharpen weak areas while keeping strengths game-ready".to_string(),
        }
    } else {
        TrainingFrequency {
            sessions_per_week: 3,
            session_minutes: 30,
            advice: "Maintain skills with quality reps and video review".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_from(id: &str, values: [i64; 13]) -> RawAssessment {
        let scores = SkillCode::all()
            .iter()
            .zip(values)
            .map(|(skill, v)| (skill.code().to_string(), json!(v)))
            .collect();
        RawAssessment { id: Some(id.to_string()), scores, ..Default::default() }
    }

    fn scores_from(values: [u8; 13]) -> SkillScores {
        SkillScores::new(values)
    }

    //                receiving     throwing      blk education
    const VARIED: [i64; 13] = [6, 7, 5, 4, 8, 6, 7, 3, 5, 6, 7, 4, 5];

    #[test]
    fn test_valid_assessment_succeeds() {
        let analyzer = AssessmentAnalyzer::default();
        let analysis = analyzer.analyze(&raw_from("a1", VARIED), None).unwrap();
        assert_eq!(analysis.assessment_id.as_deref(), Some("a1"));
        assert_eq!(analysis.breakdown.categories.len(), 4);
        assert!(analysis.progress.is_none());
    }

    #[test]
    fn test_uniform_assessment_fails_with_echoed_id() {
        let analyzer = AssessmentAnalyzer::default();
        let raw = raw_from("a2", [7, 7, 7, 7, 7, 7, 7, 7, 7, 3, 4, 5, 6]);
        let response = AnalysisResponse::from(analyzer.analyze(&raw, None));
        assert!(!response.success);
        assert_eq!(response.assessment_id.as_deref(), Some("a2"));
        assert!(response.analysis.is_none());
        assert!(response.error.unwrap().contains("suspiciously uniform"));
    }

    #[test]
    fn test_success_response_envelope() {
        let analyzer = AssessmentAnalyzer::default();
        let response = AnalysisResponse::from(analyzer.analyze(&raw_from("a3", VARIED), None));
        assert!(response.success);
        assert!(response.error.is_none());
        assert_eq!(response.assessment_id.as_deref(), Some("a3"));
    }

    #[test]
    fn test_weighted_category_average() {
        let analyzer = AssessmentAnalyzer::default();
        let breakdown = analyzer.analyze_categories(&scores_from([
            6, 7, 5, 4, 8, 6, 7, 3, 5, 6, 7, 4, 5,
        ]));
        // (6*1.2 + 7*1.0 + 5*1.0 + 4*0.8) / 4.0 = 22.4 / 4.0 = 5.6
        assert_eq!(breakdown.average(Category::Receiving), 5.6);
        // (8*1.1 + 6*1.1 + 7*1.0 + 3*0.8) / 4.0 = 24.8 / 4.0 = 6.2
        assert_eq!(breakdown.average(Category::Throwing), 6.2);
        assert_eq!(breakdown.average(Category::Blocking), 5.0);
    }

    #[test]
    fn test_overall_matches_weighted_category_mean() {
        let analyzer = AssessmentAnalyzer::default();
        let breakdown = analyzer.analyze_categories(&scores_from([
            9, 2, 5, 4, 8, 6, 1, 3, 10, 6, 7, 4, 5,
        ]));
        let weight_total: f64 = breakdown.categories.iter().map(|c| c.importance_weight).sum();
        let expected: f64 = breakdown
            .categories
            .iter()
            .map(|c| c.average * c.importance_weight)
            .sum::<f64>()
            / weight_total;
        assert!((breakdown.overall_average - expected).abs() <= 0.1);
    }

    #[test]
    fn test_category_average_is_monotonic() {
        let analyzer = AssessmentAnalyzer::default();
        let base = scores_from([3, 4, 5, 6, 3, 4, 5, 6, 3, 4, 5, 6, 7]);
        for skill in SkillCode::all() {
            let before = analyzer.analyze_categories(&base).average(skill.category());
            let raised = base.with(*skill, (base.get(*skill) + 1).min(10));
            let after = analyzer.analyze_categories(&raised).average(skill.category());
            assert!(after >= before, "{} lowered {} average", skill, skill.category());
        }
    }

    #[test]
    fn test_default_fill_round_trip() {
        let analyzer = AssessmentAnalyzer::default();
        let scores = RawAssessment::default().scores_or_default();
        let breakdown = analyzer.analyze_categories(&scores);
        assert_eq!(breakdown.overall_average, 5.0);
        assert_eq!(breakdown.overall_proficiency, "Average");
    }

    #[test]
    fn test_strengths_and_weaknesses() {
        let analyzer = AssessmentAnalyzer::default();
        let scores = scores_from([9, 2, 5, 4, 8, 6, 1, 3, 10, 6, 7, 4, 5]);
        let breakdown = analyzer.analyze_categories(&scores);
        let sw = analyzer.strengths_weaknesses(&scores, &breakdown);

        assert_eq!(sw.strongest_category, Category::Blocking);
        let top: Vec<u8> = sw.top_strengths.iter().map(|r| r.score).collect();
        assert_eq!(top, vec![10, 9, 8]);
        let bottom: Vec<u8> = sw.bottom_weaknesses.iter().map(|r| r.score).collect();
        assert_eq!(bottom, vec![1, 2, 3]);
        let critical: Vec<SkillCode> = sw.critical_areas.iter().map(|r| r.skill).collect();
        assert_eq!(
            critical,
            vec![
                SkillCode::ReceivingStance,
                SkillCode::ThrowingAccuracy,
                SkillCode::ThrowingArmStrength
            ]
        );
        assert!(sw.balanced_areas.iter().all(|r| (6..=8).contains(&r.score)));
        assert_eq!(sw.balanced_areas.len(), 4);
    }

    #[test]
    fn test_category_ties_go_to_declared_order() {
        let analyzer = AssessmentAnalyzer::default();
        let scores = SkillScores::uniform(5);
        let breakdown = analyzer.analyze_categories(&scores);
        let sw = analyzer.strengths_weaknesses(&scores, &breakdown);
        assert_eq!(sw.strongest_category, Category::Receiving);
        assert_eq!(sw.weakest_category, Category::Receiving);
    }

    #[test]
    fn test_recommendations() {
        let analyzer = AssessmentAnalyzer::default();
        // receiving 5.6, throwing 6.2, blocking 5.0, education ~5.6
        let breakdown = analyzer.analyze_categories(&scores_from([
            6, 7, 5, 4, 8, 6, 7, 3, 5, 6, 7, 4, 5,
        ]));
        let recs = analyzer.recommendations(&breakdown);

        assert_eq!(recs.primary_focus.category, Category::Blocking);
        assert_eq!(recs.primary_focus.time_share, "60% of training time");
        let secondary: Vec<Category> = recs.secondary_focuses.iter().map(|f| f.category).collect();
        assert_eq!(secondary.len(), 2);
        assert!(!secondary.contains(&Category::Blocking));
        assert!(!secondary.contains(&Category::Throwing));

        assert_eq!(recs.training_frequency.sessions_per_week, 4);
        assert_eq!(recs.priorities[0].category, Category::Blocking);
        assert_eq!(recs.priorities.len(), 4);
    }

    #[test]
    fn test_priorities_skip_strong_categories() {
        let analyzer = AssessmentAnalyzer::default();
        let breakdown = analyzer.analyze_categories(&scores_from([
            9, 9, 9, 8, 3, 3, 3, 3, 9, 8, 9, 8, 9,
        ]));
        let recs = analyzer.recommendations(&breakdown);
        let categories: Vec<Category> = recs.priorities.iter().map(|p| p.category).collect();
        assert_eq!(categories, vec![Category::Throwing]);
        // 0.4 * 0.7 + 0.4 * 0.7 + 0.2 * 0.25 = 0.61
        assert_eq!(recs.priorities[0].score, 0.61);
        assert_eq!(recs.priorities[0].level, PriorityLevel::Medium);
    }

    #[test]
    fn test_training_frequency_tiers() {
        assert_eq!(training_frequency(3.9).sessions_per_week, 5);
        assert_eq!(training_frequency(5.9).sessions_per_week, 4);
        assert_eq!(training_frequency(6.0).sessions_per_week, 3);
    }

    #[test]
    fn test_progress_included_with_previous() {
        let analyzer = AssessmentAnalyzer::default();
        let earlier = Assessment::new(
            scores_from([5, 6, 5, 4, 6, 6, 5, 3, 4, 6, 5, 4, 5]),
            Utc::now() - chrono::Duration::days(30),
        );
        let analysis = analyzer.analyze(&raw_from("a4", VARIED), Some(&earlier)).unwrap();
        let progress = analysis.progress.unwrap();
        assert!(progress.elapsed_days >= 29);
        assert_eq!(progress.categories.len(), 4);
    }
}
