//! Progress between two assessment snapshots

use serde::{Deserialize, Serialize};

use super::analyzer::{round1, CategoryBreakdown};
use crate::skills::{Category, SkillCode, SkillScores};

/// Category-level direction of change
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
}

impl Trend {
    fn classify(change: f64, band: f64) -> Self {
        if change > band {
            Trend::Improving
        } else if change < -band {
            Trend::Declining
        } else {
            Trend::Stable
        }
    }
}

/// Skill-level change band
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SkillChange {
    SignificantImprovement,
    Improved,
    NoChange,
    SlightDecline,
    SignificantDecline,
}

impl SkillChange {
    fn classify(change: i32) -> Self {
        match change {
            c if c >= 2 => SkillChange::SignificantImprovement,
            1 => SkillChange::Improved,
            0 => SkillChange::NoChange,
            -1 => SkillChange::SlightDecline,
            _ => SkillChange::SignificantDecline,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SkillChange::SignificantImprovement => "significant improvement",
            SkillChange::Improved => "improved",
            SkillChange::NoChange => "no change",
            SkillChange::SlightDecline => "slight decline",
            SkillChange::SignificantDecline => "significant decline",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryProgress {
    pub category: Category,
    pub previous: f64,
    pub current: f64,
    pub change: f64,
    pub trend: Trend,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillProgress {
    pub skill: SkillCode,
    pub previous: u8,
    pub current: u8,
    pub change: i32,
    pub band: SkillChange,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgressReport {
    pub elapsed_days: i64,
    pub overall_improvement: f64,
    /// Overall change per day; 0 when no time has passed
    pub improvement_rate: f64,
    pub categories: Vec<CategoryProgress>,
    pub skills: Vec<SkillProgress>,
    pub most_improved: Option<Category>,
    pub least_improved: Option<Category>,
}

/// Diff two analyzed snapshots, previous → current
pub fn compare(
    previous: &CategoryBreakdown,
    current: &CategoryBreakdown,
    previous_scores: &SkillScores,
    current_scores: &SkillScores,
    elapsed_days: i64,
    trend_band: f64,
) -> ProgressReport {
    let categories: Vec<CategoryProgress> = current
        .categories
        .iter()
        .map(|c| {
            let before = previous.average(c.category);
            let change = round1(c.average - before);
            CategoryProgress {
                category: c.category,
                previous: before,
                current: c.average,
                change,
                trend: Trend::classify(change, trend_band),
            }
        })
        .collect();

    let skills = current_scores
        .iter()
        .map(|(skill, now)| {
            let before = previous_scores.get(skill);
            let change = now as i32 - before as i32;
            SkillProgress {
                skill,
                previous: before,
                current: now,
                change,
                band: SkillChange::classify(change),
            }
        })
        .collect();

    let overall_improvement = round1(current.overall_average - previous.overall_average);
    let improvement_rate = if elapsed_days > 0 {
        (overall_improvement / elapsed_days as f64 * 1000.0).round() / 1000.0
    } else {
        0.0
    };

    // Strict comparisons: the earliest category wins ties
    let mut most: Option<&CategoryProgress> = None;
    let mut least: Option<&CategoryProgress> = None;
    for c in &categories {
        if most.is_none_or(|m| c.change > m.change) {
            most = Some(c);
        }
        if least.is_none_or(|l| c.change < l.change) {
            least = Some(c);
        }
    }

    ProgressReport {
        elapsed_days,
        overall_improvement,
        improvement_rate,
        most_improved: most.map(|c| c.category),
        least_improved: least.map(|c| c.category),
        categories,
        skills,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::{Assessment, AssessmentAnalyzer};
    use chrono::{Duration, Utc};

    fn assessment(values: [u8; 13], days_ago: i64) -> Assessment {
        Assessment::new(SkillScores::new(values), Utc::now() - Duration::days(days_ago))
    }

    #[test]
    fn test_improvement_and_trends() {
        let analyzer = AssessmentAnalyzer::default();
        let before = assessment([4, 4, 4, 4, 6, 6, 6, 6, 5, 5, 5, 5, 5], 20);
        let after = assessment([6, 6, 6, 6, 6, 6, 6, 6, 4, 5, 5, 5, 5], 0);
        let report = analyzer.progress(&before, &after);

        let by = |category| report.categories.iter().find(|c| c.category == category).unwrap();
        assert_eq!(by(Category::Receiving).change, 2.0);
        assert_eq!(by(Category::Receiving).trend, Trend::Improving);
        assert_eq!(by(Category::Throwing).trend, Trend::Stable);
        assert_eq!(by(Category::Blocking).trend, Trend::Declining);

        assert_eq!(report.most_improved, Some(Category::Receiving));
        assert_eq!(report.least_improved, Some(Category::Blocking));
        assert!(report.overall_improvement > 0.0);
        assert!(report.improvement_rate > 0.0);
    }

    #[test]
    fn test_skill_bands() {
        assert_eq!(SkillChange::classify(3), SkillChange::SignificantImprovement);
        assert_eq!(SkillChange::classify(2), SkillChange::SignificantImprovement);
        assert_eq!(SkillChange::classify(1), SkillChange::Improved);
        assert_eq!(SkillChange::classify(0), SkillChange::NoChange);
        assert_eq!(SkillChange::classify(-1), SkillChange::SlightDecline);
        assert_eq!(SkillChange::classify(-2), SkillChange::SignificantDecline);
        assert_eq!(SkillChange::SlightDecline.label(), "slight decline");
    }

    #[test]
    fn test_trend_band_edges() {
        assert_eq!(Trend::classify(0.2, 0.2), Trend::Stable);
        assert_eq!(Trend::classify(0.3, 0.2), Trend::Improving);
        assert_eq!(Trend::classify(-0.2, 0.2), Trend::Stable);
        assert_eq!(Trend::classify(-0.3, 0.2), Trend::Declining);
    }

    #[test]
    fn test_progress_is_antisymmetric() {
        let analyzer = AssessmentAnalyzer::default();
        let a = assessment([3, 5, 7, 2, 8, 4, 6, 9, 1, 10, 5, 7, 3], 10);
        let b = assessment([6, 4, 8, 5, 7, 7, 3, 9, 6, 8, 2, 7, 9], 0);
        let forward = analyzer.progress(&a, &b);
        let backward = analyzer.progress(&b, &a);
        assert_eq!(forward.overall_improvement, -backward.overall_improvement);
        for (f, r) in forward.skills.iter().zip(&backward.skills) {
            assert_eq!(f.change, -r.change);
        }
    }

    #[test]
    fn test_zero_elapsed_days_has_zero_rate() {
        let analyzer = AssessmentAnalyzer::default();
        let now = Utc::now();
        let a = Assessment::new(SkillScores::uniform(4), now);
        let b = Assessment::new(SkillScores::uniform(6), now);
        let report = analyzer.progress(&a, &b);
        assert_eq!(report.elapsed_days, 0);
        assert_eq!(report.improvement_rate, 0.0);
        assert_eq!(report.overall_improvement, 2.0);
    }

    #[test]
    fn test_backdated_previous_has_zero_rate() {
        let analyzer = AssessmentAnalyzer::default();
        let a = assessment([5; 13], 0);
        let b = assessment([6; 13], 5);
        let report = analyzer.progress(&a, &b);
        assert!(report.elapsed_days < 0);
        assert_eq!(report.improvement_rate, 0.0);
    }
}
