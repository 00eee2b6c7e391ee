//! Workout module - practice plan generation
//!
//! Features:
//! - Time allocation templates snapped to the requested duration
//! - Equipment tier assessment
//! - Weakest-category focus with phased drill assembly
//! - Fallback plan when generation fails

pub mod allocation;
pub mod equipment;
pub mod generator;

pub use allocation::{TimeAllocation, TimeTemplates};
pub use equipment::{EquipmentTier, EquipmentTiers};
pub use generator::{
    fallback_plan, GenerationFailure, GenerationResponse, WorkoutGenerator, MAX_DURATION_MINUTES,
};

use serde::{Deserialize, Serialize};

use crate::drills::DrillCard;
use crate::skills::{Category, SkillScores};

/// Inferred experience, capping drill difficulty
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl ExperienceLevel {
    /// Both thresholds must hold for a tier
    pub fn infer(overall_average: f64, years_experience: u32) -> Self {
        if overall_average >= 8.0 && years_experience >= 5 {
            ExperienceLevel::Expert
        } else if overall_average >= 6.5 && years_experience >= 3 {
            ExperienceLevel::Advanced
        } else if overall_average >= 4.5 && years_experience >= 1 {
            ExperienceLevel::Intermediate
        } else {
            ExperienceLevel::Beginner
        }
    }

    pub fn max_difficulty(&self) -> u8 {
        match self {
            ExperienceLevel::Beginner => 2,
            ExperienceLevel::Intermediate => 3,
            ExperienceLevel::Advanced => 4,
            ExperienceLevel::Expert => 5,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "beginner",
            ExperienceLevel::Intermediate => "intermediate",
            ExperienceLevel::Advanced => "advanced",
            ExperienceLevel::Expert => "expert",
        }
    }
}

/// Who the plan is for
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub age: Option<u8>,
    pub years_experience: u32,
}

/// Optional overrides on top of the generated plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preferences {
    /// Main work targets this category instead of the weakest one
    pub focus_category: Option<Category>,
    pub include_video_review: bool,
    pub include_cooldown: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self { focus_category: None, include_video_review: true, include_cooldown: true }
    }
}

/// Everything the generator needs for one plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationRequest {
    pub profile: UserProfile,
    /// Latest valid assessment; `None` for a new user (all skills neutral)
    pub scores: Option<SkillScores>,
    pub equipment: Vec<String>,
    pub duration_minutes: u32,
    #[serde(default)]
    pub preferences: Preferences,
}

/// Unweighted per-category means used for drill selection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CategoryAverages {
    pub receiving: f64,
    pub throwing: f64,
    pub blocking: f64,
    pub education: f64,
}

impl CategoryAverages {
    /// Simple mean of each category's scores. Deliberately not the analyzer's
    /// weighted average: selection only needs a coarse ranking.
    pub fn from_scores(scores: &SkillScores) -> Self {
        let mean = |category: Category| {
            let values: Vec<f64> = category.skills().map(|s| scores.get(s) as f64).collect();
            if values.is_empty() {
                0.0
            } else {
                values.iter().sum::<f64>() / values.len() as f64
            }
        };
        Self {
            receiving: mean(Category::Receiving),
            throwing: mean(Category::Throwing),
            blocking: mean(Category::Blocking),
            education: mean(Category::Education),
        }
    }

    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Receiving => self.receiving,
            Category::Throwing => self.throwing,
            Category::Blocking => self.blocking,
            Category::Education => self.education,
        }
    }

    pub fn overall(&self) -> f64 {
        (self.receiving + self.throwing + self.blocking + self.education) / 4.0
    }

    /// Lowest average. Receiving is the incumbent and only a strictly lower
    /// value replaces it, so ties go to the earliest category.
    pub fn weakest(&self) -> Category {
        let mut weakest = Category::Receiving;
        for category in Category::all() {
            if self.get(*category) < self.get(weakest) {
                weakest = *category;
            }
        }
        weakest
    }

    /// Highest average, same tie-break as [`CategoryAverages::weakest`]
    pub fn strongest(&self) -> Category {
        let mut strongest = Category::Receiving;
        for category in Category::all() {
            if self.get(*category) > self.get(strongest) {
                strongest = *category;
            }
        }
        strongest
    }

    /// Every category except `excluded`, lowest average first
    pub fn ranked_excluding(&self, excluded: Category) -> Vec<Category> {
        let mut others: Vec<Category> = Category::all()
            .iter()
            .copied()
            .filter(|c| *c != excluded)
            .collect();
        others.sort_by(|a, b| {
            self.get(*a)
                .partial_cmp(&self.get(*b))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        others
    }
}

/// Named workout segment, in canonical execution order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    Warmup,
    MainWork,
    SecondaryWork,
    Education,
    VideoReview,
    Cooldown,
}

impl PhaseKind {
    pub fn all() -> &'static [PhaseKind] {
        &[
            PhaseKind::Warmup,
            PhaseKind::MainWork,
            PhaseKind::SecondaryWork,
            PhaseKind::Education,
            PhaseKind::VideoReview,
            PhaseKind::Cooldown,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            PhaseKind::Warmup => "warmup",
            PhaseKind::MainWork => "main_work",
            PhaseKind::SecondaryWork => "secondary_work",
            PhaseKind::Education => "education",
            PhaseKind::VideoReview => "video_review",
            PhaseKind::Cooldown => "cooldown",
        }
    }
}

impl std::fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Phase {
    pub kind: PhaseKind,
    pub title: String,
    pub drills: Vec<DrillCard>,
    pub total_duration: u32,
}

impl Phase {
    pub fn new(kind: PhaseKind, title: impl Into<String>, drills: Vec<DrillCard>) -> Self {
        let total_duration =
            drills.iter().fold(0u32, |total, d| total.saturating_add(d.duration_minutes));
        Self { kind, title: title.into(), drills, total_duration }
    }
}

/// Generated practice plan. Phases appear in canonical order; empty ones are omitted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkoutPlan {
    pub title: String,
    pub duration_minutes: u32,
    pub time_allocation: TimeAllocation,
    pub equipment_tier: EquipmentTier,
    pub experience_level: ExperienceLevel,
    pub focus_category: Category,
    pub strongest_category: Category,
    pub category_averages: CategoryAverages,
    pub phases: Vec<Phase>,
    pub is_fallback: bool,
}

impl WorkoutPlan {
    pub fn phase(&self, kind: PhaseKind) -> Option<&Phase> {
        self.phases.iter().find(|p| p.kind == kind)
    }

    pub fn total_drills(&self) -> usize {
        self.phases.iter().map(|p| p.drills.len()).sum()
    }

    pub fn planned_minutes(&self) -> u32 {
        self.phases.iter().fold(0, |total, p| total.saturating_add(p.total_duration))
    }
}
