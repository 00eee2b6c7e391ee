//! Skill definitions - the 13 rated catcher skills and their categories

use serde::{Deserialize, Serialize};

/// Skill categories, in canonical declared order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Receiving,
    Throwing,
    Blocking,
    Education,
}

impl Category {
    pub fn name(&self) -> &'static str {
        match self {
            Category::Receiving => "receiving",
            Category::Throwing => "throwing",
            Category::Blocking => "blocking",
            Category::Education => "education",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Receiving => "Receiving",
            Category::Throwing => "Throwing",
            Category::Blocking => "Blocking",
            Category::Education => "Game Knowledge",
        }
    }

    /// All categories in canonical order. Ties are always broken by this order.
    pub fn all() -> &'static [Category] {
        &[
            Category::Receiving,
            Category::Throwing,
            Category::Blocking,
            Category::Education,
        ]
    }

    pub fn skills(&self) -> impl Iterator<Item = SkillCode> + '_ {
        SkillCode::all().iter().copied().filter(move |s| s.category() == *self)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Category {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::all()
            .iter()
            .copied()
            .find(|c| c.name() == s)
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

/// Leaf-level rated skill
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SkillCode {
    ReceivingGloveMove,
    ReceivingStance,
    ReceivingPresentation,
    ReceivingLowPitches,
    ThrowingFootwork,
    ThrowingExchange,
    ThrowingAccuracy,
    ThrowingArmStrength,
    BlockingOverall,
    EducationPitchCalling,
    EducationGameAwareness,
    EducationLeadership,
    EducationMentalGame,
}

impl SkillCode {
    pub const COUNT: usize = 13;

    pub fn all() -> &'static [SkillCode; SkillCode::COUNT] {
        &[
            SkillCode::ReceivingGloveMove,
            SkillCode::ReceivingStance,
            SkillCode::ReceivingPresentation,
            SkillCode::ReceivingLowPitches,
            SkillCode::ThrowingFootwork,
            SkillCode::ThrowingExchange,
            SkillCode::ThrowingAccuracy,
            SkillCode::ThrowingArmStrength,
            SkillCode::BlockingOverall,
            SkillCode::EducationPitchCalling,
            SkillCode::EducationGameAwareness,
            SkillCode::EducationLeadership,
            SkillCode::EducationMentalGame,
        ]
    }

    /// Position in [`SkillCode::all`], used to index score arrays
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn code(&self) -> &'static str {
        match self {
            SkillCode::ReceivingGloveMove => "receiving_glove_move",
            SkillCode::ReceivingStance => "receiving_stance",
            SkillCode::ReceivingPresentation => "receiving_presentation",
            SkillCode::ReceivingLowPitches => "receiving_low_pitches",
            SkillCode::ThrowingFootwork => "throwing_footwork",
            SkillCode::ThrowingExchange => "throwing_exchange",
            SkillCode::ThrowingAccuracy => "throwing_accuracy",
            SkillCode::ThrowingArmStrength => "throwing_arm_strength",
            SkillCode::BlockingOverall => "blocking_overall",
            SkillCode::EducationPitchCalling => "education_pitch_calling",
            SkillCode::EducationGameAwareness => "education_game_awareness",
            SkillCode::EducationLeadership => "education_leadership",
            SkillCode::EducationMentalGame => "education_mental_game",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SkillCode::ReceivingGloveMove => "Glove movement",
            SkillCode::ReceivingStance => "Receiving stance",
            SkillCode::ReceivingPresentation => "Pitch presentation",
            SkillCode::ReceivingLowPitches => "Receiving low pitches",
            SkillCode::ThrowingFootwork => "Throwing footwork",
            SkillCode::ThrowingExchange => "Transfer and exchange",
            SkillCode::ThrowingAccuracy => "Throwing accuracy",
            SkillCode::ThrowingArmStrength => "Arm strength",
            SkillCode::BlockingOverall => "Blocking",
            SkillCode::EducationPitchCalling => "Pitch calling",
            SkillCode::EducationGameAwareness => "Game awareness",
            SkillCode::EducationLeadership => "Leadership",
            SkillCode::EducationMentalGame => "Mental game",
        }
    }

    pub fn category(&self) -> Category {
        match self {
            SkillCode::ReceivingGloveMove
            | SkillCode::ReceivingStance
            | SkillCode::ReceivingPresentation
            | SkillCode::ReceivingLowPitches => Category::Receiving,
            SkillCode::ThrowingFootwork
            | SkillCode::ThrowingExchange
            | SkillCode::ThrowingAccuracy
            | SkillCode::ThrowingArmStrength => Category::Throwing,
            SkillCode::BlockingOverall => Category::Blocking,
            SkillCode::EducationPitchCalling
            | SkillCode::EducationGameAwareness
            | SkillCode::EducationLeadership
            | SkillCode::EducationMentalGame => Category::Education,
        }
    }

    pub fn from_code(code: &str) -> Option<SkillCode> {
        SkillCode::all().iter().copied().find(|s| s.code() == code)
    }
}

impl std::fmt::Display for SkillCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 10;
/// Neutral score used when a raw score is genuinely missing
pub const NEUTRAL_SCORE: u8 = 5;

/// Complete set of 13 scores, indexed by [`SkillCode::index`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillScores([u8; SkillCode::COUNT]);

impl SkillScores {
    pub fn new(values: [u8; SkillCode::COUNT]) -> Self {
        Self(values)
    }

    /// Every skill at the same score
    pub fn uniform(score: u8) -> Self {
        Self([score; SkillCode::COUNT])
    }

    pub fn get(&self, skill: SkillCode) -> u8 {
        self.0[skill.index()]
    }

    pub fn set(&mut self, skill: SkillCode, score: u8) {
        self.0[skill.index()] = score;
    }

    pub fn with(mut self, skill: SkillCode, score: u8) -> Self {
        self.set(skill, score);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (SkillCode, u8)> + '_ {
        SkillCode::all().iter().map(move |s| (*s, self.0[s.index()]))
    }

    pub fn values(&self) -> &[u8; SkillCode::COUNT] {
        &self.0
    }
}

impl Default for SkillScores {
    fn default() -> Self {
        Self::uniform(NEUTRAL_SCORE)
    }
}

impl Serialize for SkillScores {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(SkillCode::COUNT))?;
        for (skill, score) in self.iter() {
            map.serialize_entry(skill.code(), &score)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SkillScores {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;
        let map = std::collections::BTreeMap::<SkillCode, u8>::deserialize(deserializer)?;
        let mut scores = [0u8; SkillCode::COUNT];
        for skill in SkillCode::all() {
            scores[skill.index()] = *map
                .get(skill)
                .ok_or_else(|| D::Error::custom(format!("missing skill: {}", skill)))?;
        }
        Ok(Self(scores))
    }
}

/// A skill's weight inside its category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillWeight {
    pub skill: SkillCode,
    pub weight: f64,
}

/// Category definition with importance and per-skill weights
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryDef {
    pub category: Category,
    pub importance_weight: f64,
    pub skills: Vec<SkillWeight>,
}

/// Score band label
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProficiencyLevel {
    pub score: u8,
    pub label: String,
    pub description: String,
}

/// Scoring tables injected into the analyzer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillModel {
    pub categories: Vec<CategoryDef>,
    /// One entry per integer score 1..=10
    pub proficiency: Vec<ProficiencyLevel>,
}

impl SkillModel {
    pub fn category(&self, category: Category) -> Option<&CategoryDef> {
        self.categories.iter().find(|c| c.category == category)
    }

    /// Proficiency for a possibly fractional score, rounded and clamped to 1..=10
    pub fn proficiency_for(&self, score: f64) -> Option<&ProficiencyLevel> {
        let rounded = if score.is_finite() { score.round() } else { MIN_SCORE as f64 };
        let clamped = rounded.clamp(MIN_SCORE as f64, MAX_SCORE as f64) as u8;
        self.proficiency.iter().find(|p| p.score == clamped)
    }
}

const CATEGORY_TABLE: &[(Category, f64, &[(SkillCode, f64)])] = &[
    (
        Category::Receiving,
        0.35,
        &[
            (SkillCode::ReceivingGloveMove, 1.2),
            (SkillCode::ReceivingStance, 1.0),
            (SkillCode::ReceivingPresentation, 1.0),
            (SkillCode::ReceivingLowPitches, 0.8),
        ],
    ),
    (
        Category::Throwing,
        0.25,
        &[
            (SkillCode::ThrowingFootwork, 1.1),
            (SkillCode::ThrowingExchange, 1.1),
            (SkillCode::ThrowingAccuracy, 1.0),
            (SkillCode::ThrowingArmStrength, 0.8),
        ],
    ),
    (Category::Blocking, 0.20, &[(SkillCode::BlockingOverall, 1.0)]),
    (
        Category::Education,
        0.20,
        &[
            (SkillCode::EducationPitchCalling, 1.2),
            (SkillCode::EducationGameAwareness, 1.0),
            (SkillCode::EducationLeadership, 0.9),
            (SkillCode::EducationMentalGame, 0.9),
        ],
    ),
];

const PROFICIENCY_TABLE: &[(u8, &str, &str)] = &[
    (1, "Needs Major Work", "Fundamentals are not yet in place"),
    (2, "Needs Major Work", "Skill breaks down in most repetitions"),
    (3, "Below Average", "Inconsistent, needs focused daily work"),
    (4, "Below Average", "Basics are there but not game-ready"),
    (5, "Average", "Serviceable at the current level of play"),
    (6, "Average", "Reliable in routine situations"),
    (7, "Good", "Consistent, holds up under game pressure"),
    (8, "Good", "A clear strength against most competition"),
    (9, "Excellent", "Advanced execution with few lapses"),
    (10, "Excellent", "Elite, a model for other catchers"),
];

impl Default for SkillModel {
    fn default() -> Self {
        let categories = CATEGORY_TABLE
            .iter()
            .map(|(category, importance, skills)| CategoryDef {
                category: *category,
                importance_weight: *importance,
                skills: skills
                    .iter()
                    .map(|(skill, weight)| SkillWeight { skill: *skill, weight: *weight })
                    .collect(),
            })
            .collect();

        let proficiency = PROFICIENCY_TABLE
            .iter()
            .map(|(score, label, description)| ProficiencyLevel {
                score: *score,
                label: label.to_string(),
                description: description.to_string(),
            })
            .collect();

        Self { categories, proficiency }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thirteen_skills_in_four_categories() {
        assert_eq!(SkillCode::all().len(), 13);
        assert_eq!(Category::Receiving.skills().count(), 4);
        assert_eq!(Category::Throwing.skills().count(), 4);
        assert_eq!(Category::Blocking.skills().count(), 1);
        assert_eq!(Category::Education.skills().count(), 4);
    }

    #[test]
    fn test_index_matches_position() {
        for (i, skill) in SkillCode::all().iter().enumerate() {
            assert_eq!(skill.index(), i, "{} out of place", skill);
        }
    }

    #[test]
    fn test_code_round_trip() {
        for skill in SkillCode::all() {
            assert_eq!(SkillCode::from_code(skill.code()), Some(*skill));
        }
        assert_eq!(SkillCode::from_code("receiving_unknown"), None);
    }

    #[test]
    fn test_serde_name_matches_code() {
        let json = serde_json::to_string(&SkillCode::ReceivingGloveMove).unwrap();
        assert_eq!(json, "\"receiving_glove_move\"");
    }

    #[test]
    fn test_default_model_covers_every_skill_once() {
        let model = SkillModel::default();
        let mut seen: Vec<SkillCode> = model
            .categories
            .iter()
            .flat_map(|c| c.skills.iter().map(|s| s.skill))
            .collect();
        seen.sort();
        assert_eq!(seen, SkillCode::all().to_vec());
        for def in &model.categories {
            for sw in &def.skills {
                assert_eq!(sw.skill.category(), def.category);
            }
        }
    }

    #[test]
    fn test_proficiency_rounds_and_clamps() {
        let model = SkillModel::default();
        assert_eq!(model.proficiency_for(5.0).unwrap().label, "Average");
        assert_eq!(model.proficiency_for(6.6).unwrap().score, 7);
        assert_eq!(model.proficiency_for(0.2).unwrap().score, 1);
        assert_eq!(model.proficiency_for(42.0).unwrap().label, "Excellent");
        assert_eq!(model.proficiency_for(f64::NAN).unwrap().score, 1);
    }

    #[test]
    fn test_scores_serialize_as_map() {
        let scores = SkillScores::uniform(5).with(SkillCode::BlockingOverall, 8);
        let value = serde_json::to_value(scores).unwrap();
        assert_eq!(value["blocking_overall"], 8);
        assert_eq!(value["receiving_stance"], 5);
        let back: SkillScores = serde_json::from_value(value).unwrap();
        assert_eq!(back, scores);
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("throwing".parse::<Category>(), Ok(Category::Throwing));
        assert!("pitching".parse::<Category>().is_err());
    }
}
