//! Workout generator - phased practice plans from skill scores and equipment

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{
    CategoryAverages, EquipmentTier, EquipmentTiers, ExperienceLevel, GenerationRequest, Phase,
    PhaseKind, TimeAllocation, TimeTemplates, WorkoutPlan,
};
use crate::config::CoachConfig;
use crate::drills::{DrillCard, DrillCatalog, StaticDrillCatalog};
use crate::error::GenerationError;
use crate::skills::{Category, SkillScores};
use crate::tips::education_topic;

/// Minutes reserved for the education reflection block
const REFLECTION_MINUTES: u32 = 2;

/// Secondary work covers at most this many categories
const MAX_SECONDARY_CATEGORIES: usize = 3;

/// Fallback plan used when a request fails with no usable duration
const FALLBACK_DEFAULT_MINUTES: u32 = 15;

/// Longest plan a request may ask for, one day
pub const MAX_DURATION_MINUTES: u32 = 24 * 60;

/// Generation failed. `fallback` is always a displayable plan.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{error}")]
pub struct GenerationFailure {
    pub error: GenerationError,
    pub fallback: WorkoutPlan,
}

/// Serializable result envelope for hosts. A plan is always present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationResponse {
    pub success: bool,
    pub plan: WorkoutPlan,
    pub error: Option<String>,
}

impl From<Result<WorkoutPlan, GenerationFailure>> for GenerationResponse {
    fn from(result: Result<WorkoutPlan, GenerationFailure>) -> Self {
        match result {
            Ok(plan) => Self { success: true, plan, error: None },
            Err(failure) => Self {
                success: false,
                error: Some(failure.error.to_string()),
                plan: failure.fallback,
            },
        }
    }
}

/// Plan generator over injected templates, tiers and drill catalog
pub struct WorkoutGenerator<C: DrillCatalog = StaticDrillCatalog> {
    templates: TimeTemplates,
    tiers: EquipmentTiers,
    catalog: C,
}

impl WorkoutGenerator<StaticDrillCatalog> {
    pub fn new(config: &CoachConfig) -> Self {
        let catalog = StaticDrillCatalog::new(config.equipment_tiers.clone());
        Self::with_catalog(config, catalog)
    }
}

impl Default for WorkoutGenerator<StaticDrillCatalog> {
    fn default() -> Self {
        Self::new(&CoachConfig::default())
    }
}

impl<C: DrillCatalog> WorkoutGenerator<C> {
    pub fn with_catalog(config: &CoachConfig, catalog: C) -> Self {
        Self {
            templates: config.time_templates.clone(),
            tiers: config.equipment_tiers.clone(),
            catalog,
        }
    }

    /// Build a plan. On failure the error carries a fallback plan.
    pub fn generate(&self, request: &GenerationRequest) -> Result<WorkoutPlan, GenerationFailure> {
        match self.build(request) {
            Ok(plan) => {
                info!(
                    "Generated {} min plan: tier {}, level {}, focus {}, {} drills",
                    plan.duration_minutes,
                    plan.equipment_tier,
                    plan.experience_level.name(),
                    plan.focus_category,
                    plan.total_drills()
                );
                Ok(plan)
            }
            Err(error) => {
                warn!("Workout generation failed, using fallback: {}", error);
                Err(GenerationFailure {
                    error,
                    fallback: fallback_plan(request.duration_minutes),
                })
            }
        }
    }

    fn build(&self, request: &GenerationRequest) -> Result<WorkoutPlan, GenerationError> {
        let duration = request.duration_minutes;
        if duration == 0 || duration > MAX_DURATION_MINUTES {
            return Err(GenerationError::InvalidDuration(duration));
        }

        let scores = request.scores.unwrap_or_default();
        let averages = CategoryAverages::from_scores(&scores);
        let experience =
            ExperienceLevel::infer(averages.overall(), request.profile.years_experience);
        let tier = self.tiers.assess(&request.equipment);
        let allocation = self.templates.allocate(duration);
        let focus = request
            .preferences
            .focus_category
            .unwrap_or_else(|| averages.weakest());

        debug!(
            "Allocation for {} min: {:?}, tier {}, focus {}",
            duration, allocation, tier, focus
        );

        let prefs = &request.preferences;
        let phases: Vec<Phase> = [
            Some(warmup_phase(allocation.warmup)),
            Some(self.main_work_phase(focus, allocation.weakest_category, tier, experience)?),
            Some(self.secondary_work_phase(
                &averages.ranked_excluding(focus),
                allocation.other_categories,
                tier,
                experience,
            )),
            Some(education_phase(focus, allocation.education)),
            prefs
                .include_video_review
                .then(|| video_review_phase(allocation.video_review)),
            prefs
                .include_cooldown
                .then(|| cooldown_phase(allocation.cooldown)),
        ]
        .into_iter()
        .flatten()
        .filter(|phase| !phase.drills.is_empty())
        .collect();

        if phases.is_empty() {
            return Err(GenerationError::EmptyPlan);
        }

        Ok(WorkoutPlan {
            title: format!("{}-minute {} focus", duration, focus.label()),
            duration_minutes: duration,
            time_allocation: allocation,
            equipment_tier: tier,
            experience_level: experience,
            focus_category: focus,
            strongest_category: averages.strongest(),
            category_averages: averages,
            phases,
            is_fallback: false,
        })
    }

    fn main_work_phase(
        &self,
        category: Category,
        minutes: u32,
        tier: EquipmentTier,
        experience: ExperienceLevel,
    ) -> Result<Phase, GenerationError> {
        let title = format!("Main work: {}", category.label());
        if minutes == 0 {
            return Ok(Phase::new(PhaseKind::MainWork, title, Vec::new()));
        }

        let mut drills = self
            .catalog
            .drills_for_category(category, minutes, tier, experience);
        if drills.is_empty() {
            return Err(GenerationError::NoDrills(category));
        }
        fit_to_minutes(&mut drills, minutes);
        Ok(Phase::new(PhaseKind::MainWork, title, drills))
    }

    fn secondary_work_phase(
        &self,
        ranked: &[Category],
        minutes: u32,
        tier: EquipmentTier,
        experience: ExperienceLevel,
    ) -> Phase {
        let categories: Vec<Category> =
            ranked.iter().copied().take(MAX_SECONDARY_CATEGORIES).collect();
        let shares = split_minutes(minutes, categories.len());

        let drills = categories
            .iter()
            .zip(shares)
            .filter(|(_, share)| *share > 0)
            .filter_map(|(category, share)| {
                let drill = self
                    .catalog
                    .drills_for_category(*category, share, tier, experience)
                    .into_iter()
                    .next();
                if drill.is_none() {
                    debug!("No secondary drill for {}", category);
                }
                drill.map(|mut card| {
                    card.duration_minutes = share;
                    card
                })
            })
            .collect();

        Phase::new(PhaseKind::SecondaryWork, "Secondary work", drills)
    }
}

/// Rescale drill durations proportionally so they sum to `minutes`.
/// The last drill absorbs the rounding remainder.
fn fit_to_minutes(drills: &mut [DrillCard], minutes: u32) {
    let planned: u32 = drills.iter().map(|d| d.duration_minutes).sum();
    if planned == 0 || planned == minutes {
        return;
    }

    let last = drills.len().saturating_sub(1);
    let mut assigned = 0;
    for (i, drill) in drills.iter_mut().enumerate() {
        if i == last {
            drill.duration_minutes = minutes.saturating_sub(assigned).max(1);
        } else {
            let scaled = drill.duration_minutes as u64 * minutes as u64 / planned as u64;
            drill.duration_minutes = (scaled as u32).max(1);
            assigned += drill.duration_minutes;
        }
    }
}

/// Split `minutes` into `parts` near-equal shares, remainder to the first ones
fn split_minutes(minutes: u32, parts: usize) -> Vec<u32> {
    if parts == 0 {
        return Vec::new();
    }
    let parts_u32 = parts as u32;
    let base = minutes / parts_u32;
    let remainder = (minutes % parts_u32) as usize;
    (0..parts)
        .map(|i| base + u32::from(i < remainder))
        .collect()
}

fn fixed_card(
    code: &str,
    name: &str,
    category: Option<Category>,
    minutes: u32,
    instructions: &[&str],
    coaching_points: &[&str],
) -> DrillCard {
    DrillCard {
        code: code.to_string(),
        name: name.to_string(),
        category,
        duration_minutes: minutes,
        instructions: instructions.iter().map(|s| s.to_string()).collect(),
        coaching_points: coaching_points.iter().map(|s| s.to_string()).collect(),
    }
}

fn warmup_phase(minutes: u32) -> Phase {
    let shares = split_minutes(minutes, 2);
    let templates = [
        fixed_card(
            "warmup_dynamic_mobility",
            "Dynamic mobility",
            None,
            0,
            &[
                "Hip openers and deep squat holds",
                "Arm circles and band pull-aparts",
            ],
            &["Get the hips loose before any squatting work"],
        ),
        fixed_card(
            "warmup_catch_play",
            "Progressive catch play",
            None,
            0,
            &["Start at 30 feet and work back to 90", "Finish with quick-release throws"],
            &["Stay on line with your target"],
        ),
    ];

    let drills = templates
        .into_iter()
        .zip(shares)
        .filter(|(_, share)| *share > 0)
        .map(|(mut card, share)| {
            card.duration_minutes = share;
            card
        })
        .collect();
    Phase::new(PhaseKind::Warmup, "Warm-up", drills)
}

fn education_phase(category: Category, minutes: u32) -> Phase {
    let mut drills = Vec::new();
    if minutes == 0 {
        return Phase::new(PhaseKind::Education, "Education", drills);
    }

    let reflection = if minutes >= REFLECTION_MINUTES + 3 { REFLECTION_MINUTES } else { 0 };
    let content_minutes = minutes - reflection;

    let content = match education_topic(category) {
        Some(topic) => fixed_card(
            &format!("edu_topic_{}", category.name()),
            topic.title,
            Some(category),
            content_minutes,
            &[topic.summary],
            topic.discussion_points,
        ),
        None => fixed_card(
            &format!("edu_topic_{}", category.name()),
            &format!("{} study", category.label()),
            Some(category),
            content_minutes,
            &["Review today's focus area and how it shows up in games"],
            &[],
        ),
    };
    drills.push(content);

    if reflection > 0 {
        drills.push(fixed_card(
            "edu_reflection",
            "Reflection",
            Some(Category::Education),
            reflection,
            &["Write down one thing that clicked today and one thing to keep working on"],
            &["Be specific: name the drill and the rep"],
        ));
    }

    Phase::new(PhaseKind::Education, "Education", drills)
}

fn video_review_phase(minutes: u32) -> Phase {
    let drills = if minutes > 0 {
        vec![fixed_card(
            "video_review",
            "Video review",
            None,
            minutes,
            &[
                "Record a few reps of today's main drill",
                "Watch them back at half speed",
            ],
            &["Compare the glove and feet against the coaching points"],
        )]
    } else {
        Vec::new()
    };
    Phase::new(PhaseKind::VideoReview, "Video review", drills)
}

fn cooldown_phase(minutes: u32) -> Phase {
    let drills = if minutes > 0 {
        vec![fixed_card(
            "cooldown_stretch",
            "Cooldown stretch",
            None,
            minutes,
            &["Hip flexor, hamstring and shoulder stretches", "Easy breathing to finish"],
            &["Hold each stretch for 30 seconds"],
        )]
    } else {
        Vec::new()
    };
    Phase::new(PhaseKind::Cooldown, "Cooldown", drills)
}

/// Minimal warmup / main / cooldown plan, roughly 20/70/10 of `duration_minutes`
pub fn fallback_plan(duration_minutes: u32) -> WorkoutPlan {
    let duration = if duration_minutes == 0 {
        FALLBACK_DEFAULT_MINUTES
    } else {
        duration_minutes.min(MAX_DURATION_MINUTES)
    };
    let warmup = ((duration as f64 * 0.2).round() as u32).max(1);
    let cooldown = ((duration as f64 * 0.1).round() as u32).max(1);
    let main = duration.saturating_sub(warmup + cooldown).max(1);

    let phases = vec![
        Phase::new(
            PhaseKind::Warmup,
            "Warm-up",
            vec![fixed_card(
                "fallback_warmup",
                "Light warm-up",
                None,
                warmup,
                &["Jog, stretch and play easy catch"],
                &[],
            )],
        ),
        Phase::new(
            PhaseKind::MainWork,
            "Main work: fundamentals",
            vec![fixed_card(
                "fallback_fundamentals",
                "Catcher fundamentals",
                Some(Category::Receiving),
                main,
                &[
                    "Alternate stance holds, dry blocks and footwork shadows",
                    "Rest one minute between rounds",
                ],
                &["Quality over quantity"],
            )],
        ),
        Phase::new(
            PhaseKind::Cooldown,
            "Cooldown",
            vec![fixed_card(
                "fallback_cooldown",
                "Cooldown stretch",
                None,
                cooldown,
                &["Stretch hips, hamstrings and shoulders"],
                &[],
            )],
        ),
    ];

    let averages = CategoryAverages::from_scores(&SkillScores::default());
    WorkoutPlan {
        title: format!("Fallback practice ({} min)", duration),
        duration_minutes: duration,
        time_allocation: TimeAllocation::new(warmup, main, 0, 0, cooldown, 0),
        equipment_tier: EquipmentTier::Minimal,
        experience_level: ExperienceLevel::Beginner,
        focus_category: Category::Receiving,
        strongest_category: Category::Receiving,
        category_averages: averages,
        phases,
        is_fallback: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::SkillCode;
    use crate::workout::{Preferences, UserProfile};

    fn request(duration: u32, scores: Option<SkillScores>) -> GenerationRequest {
        GenerationRequest {
            profile: UserProfile { age: Some(16), years_experience: 2 },
            scores,
            equipment: vec!["catchers_mitt".into(), "baseballs".into()],
            duration_minutes: duration,
            preferences: Preferences::default(),
        }
    }

    fn phase_minutes(plan: &WorkoutPlan, kind: PhaseKind) -> Option<u32> {
        plan.phase(kind).map(|p| p.total_duration)
    }

    fn generator() -> WorkoutGenerator {
        WorkoutGenerator::default()
    }

    struct EmptyCatalog;

    impl DrillCatalog for EmptyCatalog {
        fn drills_for_category(
            &self,
            _category: Category,
            _duration_minutes: u32,
            _equipment: EquipmentTier,
            _experience: ExperienceLevel,
        ) -> Vec<DrillCard> {
            Vec::new()
        }
    }

    #[test]
    fn test_forty_five_minute_plan_phases() {
        let generator = generator();
        let plan = generator.generate(&request(45, Some(SkillScores::uniform(5)))).unwrap();

        assert_eq!(phase_minutes(&plan, PhaseKind::Warmup), Some(5));
        assert_eq!(phase_minutes(&plan, PhaseKind::MainWork), Some(20));
        assert_eq!(phase_minutes(&plan, PhaseKind::SecondaryWork), Some(12));
        assert_eq!(phase_minutes(&plan, PhaseKind::Education), Some(6));
        assert_eq!(phase_minutes(&plan, PhaseKind::VideoReview), Some(2));
        assert!(plan.phase(PhaseKind::Cooldown).is_none());
        assert_eq!(plan.planned_minutes(), 45);
        assert!(!plan.is_fallback);
    }

    #[test]
    fn test_phases_in_canonical_order() {
        let generator = generator();
        let plan = generator.generate(&request(60, None)).unwrap();
        let kinds: Vec<PhaseKind> = plan.phases.iter().map(|p| p.kind).collect();
        let mut sorted = kinds.clone();
        sorted.sort();
        assert_eq!(kinds, sorted);
        assert_eq!(kinds.len(), 6);
    }

    #[test]
    fn test_focus_skips_strong_blocking() {
        let generator = generator();
        let scores = SkillScores::uniform(3).with(SkillCode::BlockingOverall, 8);
        let plan = generator.generate(&request(30, Some(scores))).unwrap();
        assert_ne!(plan.focus_category, Category::Blocking);
        assert_eq!(plan.focus_category, Category::Receiving);
        assert_eq!(plan.strongest_category, Category::Blocking);

        let main = plan.phase(PhaseKind::MainWork).unwrap();
        assert!(main.drills.iter().all(|d| d.category == Some(Category::Receiving)));
    }

    #[test]
    fn test_new_user_defaults_to_neutral_scores() {
        let generator = generator();
        let plan = generator.generate(&request(30, None)).unwrap();
        assert_eq!(plan.category_averages.overall(), 5.0);
        assert_eq!(plan.focus_category, Category::Receiving);
        assert_eq!(plan.experience_level, ExperienceLevel::Intermediate);
        assert_eq!(plan.equipment_tier, EquipmentTier::Basic);
    }

    #[test]
    fn test_focus_preference_overrides_weakest() {
        let generator = generator();
        let mut req = request(30, Some(SkillScores::uniform(4)));
        req.preferences.focus_category = Some(Category::Throwing);
        let plan = generator.generate(&req).unwrap();
        assert_eq!(plan.focus_category, Category::Throwing);
        let main = plan.phase(PhaseKind::MainWork).unwrap();
        assert!(main.drills.iter().all(|d| d.category == Some(Category::Throwing)));
        let secondary = plan.phase(PhaseKind::SecondaryWork).unwrap();
        assert!(secondary.drills.iter().all(|d| d.category != Some(Category::Throwing)));
    }

    #[test]
    fn test_short_session_skips_reflection() {
        let generator = generator();
        let plan = generator.generate(&request(15, None)).unwrap();
        let education = plan.phase(PhaseKind::Education).unwrap();
        assert_eq!(education.drills.len(), 1);
        assert_eq!(education.total_duration, 2);
        assert!(plan.phase(PhaseKind::Cooldown).is_none());
        assert!(plan.phase(PhaseKind::VideoReview).is_none());
    }

    #[test]
    fn test_preferences_drop_optional_phases() {
        let generator = generator();
        let mut req = request(60, None);
        req.preferences.include_video_review = false;
        req.preferences.include_cooldown = false;
        let plan = generator.generate(&req).unwrap();
        assert!(plan.phase(PhaseKind::VideoReview).is_none());
        assert!(plan.phase(PhaseKind::Cooldown).is_none());
        assert_eq!(plan.planned_minutes(), 54);
    }

    #[test]
    fn test_long_session_scales_buckets() {
        let generator = generator();
        let plan = generator.generate(&request(90, None)).unwrap();
        assert_eq!(phase_minutes(&plan, PhaseKind::MainWork), Some(38));
        assert!(plan.time_allocation.total().abs_diff(90) <= TimeAllocation::BUCKETS as u32);
    }

    #[test]
    fn test_zero_duration_returns_fallback() {
        let generator = generator();
        let failure = generator.generate(&request(0, None)).unwrap_err();
        assert_eq!(failure.error, GenerationError::InvalidDuration(0));
        assert!(failure.fallback.is_fallback);
        assert_eq!(failure.fallback.planned_minutes(), 15);

        let response = GenerationResponse::from(Err(failure));
        assert!(!response.success);
        assert!(response.error.unwrap().contains("between 1 and 1440 minutes"));
    }

    #[test]
    fn test_oversized_duration_returns_capped_fallback() {
        let generator = generator();
        let failure = generator.generate(&request(u32::MAX, None)).unwrap_err();
        assert_eq!(failure.error, GenerationError::InvalidDuration(u32::MAX));
        assert_eq!(failure.fallback.planned_minutes(), MAX_DURATION_MINUTES);

        let session = crate::session::Session::new("long", &failure.fallback);
        assert_eq!(session.planned_minutes, MAX_DURATION_MINUTES);

        let plan = generator.generate(&request(MAX_DURATION_MINUTES, None)).unwrap();
        assert!(!plan.is_fallback);
        assert!(
            plan.time_allocation.total().abs_diff(MAX_DURATION_MINUTES)
                <= TimeAllocation::BUCKETS as u32
        );
    }

    #[test]
    fn test_empty_catalog_is_generation_error() {
        let generator = WorkoutGenerator::with_catalog(&CoachConfig::default(), EmptyCatalog);
        let failure = generator.generate(&request(30, None)).unwrap_err();
        assert_eq!(failure.error, GenerationError::NoDrills(Category::Receiving));
        assert_eq!(failure.fallback.duration_minutes, 30);
        assert_eq!(failure.fallback.planned_minutes(), 30);
    }

    #[test]
    fn test_fallback_proportions() {
        let plan = fallback_plan(60);
        assert_eq!(plan.phases.len(), 3);
        assert_eq!(phase_minutes(&plan, PhaseKind::Warmup), Some(12));
        assert_eq!(phase_minutes(&plan, PhaseKind::MainWork), Some(42));
        assert_eq!(phase_minutes(&plan, PhaseKind::Cooldown), Some(6));
        assert!(plan.title.starts_with("Fallback"));
    }

    #[test]
    fn test_fit_to_minutes_is_exact() {
        let card = |minutes| fixed_card("x", "x", None, minutes, &[], &[]);
        let mut drills = vec![card(5), card(4), card(8)];
        fit_to_minutes(&mut drills, 20);
        let total: u32 = drills.iter().map(|d| d.duration_minutes).sum();
        assert_eq!(total, 20);
        assert!(drills.iter().all(|d| d.duration_minutes >= 1));
    }

    #[test]
    fn test_split_minutes() {
        assert_eq!(split_minutes(12, 3), vec![4, 4, 4]);
        assert_eq!(split_minutes(8, 3), vec![3, 3, 2]);
        assert_eq!(split_minutes(5, 2), vec![3, 2]);
        assert!(split_minutes(5, 0).is_empty());
    }
}
