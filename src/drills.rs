//! Drill definitions - static catalog of catcher drills

use serde::{Deserialize, Serialize};

use crate::skills::{Category, SkillCode};
use crate::workout::equipment::{EquipmentTier, EquipmentTiers};
use crate::workout::ExperienceLevel;

/// Static catalog entry
#[derive(Debug, Clone)]
pub struct Drill {
    pub code: &'static str,
    pub name: &'static str,
    pub category: Category,
    pub subcategory: Option<SkillCode>,
    pub difficulty: u8, // 1..=5
    pub duration_minutes: u32,
    pub equipment: &'static [&'static str],
    pub instructions: &'static [&'static str],
    pub coaching_points: &'static [&'static str],
    pub common_mistakes: &'static [&'static str],
}

impl Drill {
    pub fn card(&self) -> DrillCard {
        DrillCard {
            code: self.code.to_string(),
            name: self.name.to_string(),
            category: Some(self.category),
            duration_minutes: self.duration_minutes,
            instructions: self.instructions.iter().map(|s| s.to_string()).collect(),
            coaching_points: self.coaching_points.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// The drill fields a workout plan carries. Copied out of the catalog, never shared.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrillCard {
    pub code: String,
    pub name: String,
    pub category: Option<Category>,
    pub duration_minutes: u32,
    pub instructions: Vec<String>,
    pub coaching_points: Vec<String>,
}

/// Source of drills for plan generation
pub trait DrillCatalog {
    /// Drills for a category that fit `duration_minutes`, usable with the
    /// given equipment tier and suitable for the experience level
    fn drills_for_category(
        &self,
        category: Category,
        duration_minutes: u32,
        equipment: EquipmentTier,
        experience: ExperienceLevel,
    ) -> Vec<DrillCard>;
}

pub const DRILLS: &[Drill] = &[
    // Receiving
    Drill {
        code: "rcv_short_hop_glove",
        name: "Glove-only short hops",
        category: Category::Receiving,
        subcategory: Some(SkillCode::ReceivingGloveMove),
        difficulty: 1,
        duration_minutes: 5,
        equipment: &["catchers_mitt", "baseballs"],
        instructions: &[
            "Kneel in a relaxed receiving stance",
            "Partner tosses balls to all quadrants from 15 feet",
            "Catch with the glove only, throwing hand behind the back",
        ],
        coaching_points: &["Quiet glove before the catch", "Catch the ball out front"],
        common_mistakes: &["Stabbing at the ball", "Glove drifting out of the zone"],
    },
    Drill {
        code: "rcv_stance_holds",
        name: "Stance holds",
        category: Category::Receiving,
        subcategory: Some(SkillCode::ReceivingStance),
        difficulty: 1,
        duration_minutes: 4,
        equipment: &[],
        instructions: &[
            "Set up in a primary stance for 20 seconds",
            "Shift to the secondary stance with runners on for 20 seconds",
            "Repeat alternating stances",
        ],
        coaching_points: &["Weight on the balls of the feet", "Chest up, target out front"],
        common_mistakes: &["Sitting back on the heels"],
    },
    Drill {
        code: "rcv_frame_four_corners",
        name: "Four corners presentation",
        category: Category::Receiving,
        subcategory: Some(SkillCode::ReceivingPresentation),
        difficulty: 2,
        duration_minutes: 8,
        equipment: &["catchers_mitt", "baseballs"],
        instructions: &[
            "Partner throws to each corner of the zone",
            "Receive and stick the pitch for a full second",
            "Work each corner ten times",
        ],
        coaching_points: &["Beat the ball to the spot", "Stick it, do not pull it"],
        common_mistakes: &["Yanking borderline pitches into the zone"],
    },
    Drill {
        code: "rcv_machine_low_pitches",
        name: "Machine low pitch receiving",
        category: Category::Receiving,
        subcategory: Some(SkillCode::ReceivingLowPitches),
        difficulty: 3,
        duration_minutes: 10,
        equipment: &["catchers_mitt", "catchers_gear", "pitching_machine", "baseballs"],
        instructions: &[
            "Set the machine to the bottom of the zone",
            "Receive with a palm-up turn on every low pitch",
            "Finish with a round of mixed heights",
        ],
        coaching_points: &["Lead with the thumb under the ball", "Keep the elbow loose"],
        common_mistakes: &["Dropping the knee early", "Catching on the heel of the glove"],
    },
    Drill {
        code: "rcv_tennis_ball_reaction",
        name: "Tennis ball reaction catches",
        category: Category::Receiving,
        subcategory: Some(SkillCode::ReceivingGloveMove),
        difficulty: 4,
        duration_minutes: 6,
        equipment: &["catchers_mitt", "tennis_balls"],
        instructions: &[
            "Partner throws tennis balls with late movement from close range",
            "React and receive without moving the head",
        ],
        coaching_points: &["Track the ball deep into the glove"],
        common_mistakes: &["Head turning away on the catch"],
    },
    // Throwing
    Drill {
        code: "thr_footwork_shadow",
        name: "Shadow footwork to second",
        category: Category::Throwing,
        subcategory: Some(SkillCode::ThrowingFootwork),
        difficulty: 1,
        duration_minutes: 5,
        equipment: &[],
        instructions: &[
            "From the secondary stance, replace the feet without a ball",
            "Finish in a strong throwing position toward second",
        ],
        coaching_points: &["Short, quick steps", "Shoulders closed to the target"],
        common_mistakes: &["Drifting forward instead of staying gathered"],
    },
    Drill {
        code: "thr_quick_exchange",
        name: "Quick exchange reps",
        category: Category::Throwing,
        subcategory: Some(SkillCode::ThrowingExchange),
        difficulty: 2,
        duration_minutes: 6,
        equipment: &["catchers_mitt", "baseballs"],
        instructions: &[
            "Receive a toss and transfer to the throwing hand",
            "Find a four-seam grip before the ball reaches the ear",
            "Do three sets of ten",
        ],
        coaching_points: &["Transfer at the center of the chest", "Grip in one motion"],
        common_mistakes: &["Looking at the glove during the transfer"],
    },
    Drill {
        code: "thr_target_throws",
        name: "Target throws to the bag",
        category: Category::Throwing,
        subcategory: Some(SkillCode::ThrowingAccuracy),
        difficulty: 3,
        duration_minutes: 10,
        equipment: &["catchers_mitt", "catchers_gear", "home_plate", "baseballs"],
        instructions: &[
            "Throw from the plate to a target held over second base",
            "Track how many throws land within a glove length",
        ],
        coaching_points: &["Throw through the target", "Finish over the front leg"],
        common_mistakes: &["Rushing the arm ahead of the feet"],
    },
    Drill {
        code: "thr_long_toss",
        name: "Progressive long toss",
        category: Category::Throwing,
        subcategory: Some(SkillCode::ThrowingArmStrength),
        difficulty: 2,
        duration_minutes: 8,
        equipment: &["baseballs"],
        instructions: &[
            "Start at 60 feet and back up ten feet every five throws",
            "Come back in on a line to finish",
        ],
        coaching_points: &["Stay loose and smooth", "Use the legs"],
        common_mistakes: &["Overthrowing before the arm is warm"],
    },
    Drill {
        code: "thr_radar_pop_times",
        name: "Timed pop-time throws",
        category: Category::Throwing,
        subcategory: Some(SkillCode::ThrowingArmStrength),
        difficulty: 5,
        duration_minutes: 10,
        equipment: &["catchers_mitt", "catchers_gear", "home_plate", "baseballs", "radar_gun"],
        instructions: &[
            "Receive a pitch and throw to second at full intensity",
            "Record velocity and pop time for each rep",
        ],
        coaching_points: &["Quality over quantity, rest between reps"],
        common_mistakes: &["Sacrificing accuracy for velocity"],
    },
    // Blocking
    Drill {
        code: "blk_drop_and_hold",
        name: "Drop and hold",
        category: Category::Blocking,
        subcategory: Some(SkillCode::BlockingOverall),
        difficulty: 1,
        duration_minutes: 5,
        equipment: &[],
        instructions: &[
            "From the secondary stance, drop to both knees on command",
            "Hold the blocking position for three seconds",
        ],
        coaching_points: &["Glove covers the five-hole", "Chin tucked"],
        common_mistakes: &["Leaning back instead of forward"],
    },
    Drill {
        code: "blk_soft_ball_blocks",
        name: "Soft ball blocks",
        category: Category::Blocking,
        subcategory: Some(SkillCode::BlockingOverall),
        difficulty: 2,
        duration_minutes: 8,
        equipment: &["catchers_gear", "tennis_balls"],
        instructions: &[
            "Partner bounces tennis balls in front of the plate",
            "Block and keep each ball in front",
        ],
        coaching_points: &["Shoulders rounded to deaden the ball"],
        common_mistakes: &["Trying to catch the ball instead of blocking it"],
    },
    Drill {
        code: "blk_angle_blocks",
        name: "Angle blocks",
        category: Category::Blocking,
        subcategory: Some(SkillCode::BlockingOverall),
        difficulty: 3,
        duration_minutes: 8,
        equipment: &["catchers_mitt", "catchers_gear", "baseballs"],
        instructions: &[
            "Partner throws balls in the dirt to either side",
            "Angle the body so the ball deflects toward the plate",
        ],
        coaching_points: &["Get the body in front, not just the glove"],
        common_mistakes: &["Reaching with the glove"],
    },
    Drill {
        code: "blk_machine_blocks",
        name: "Machine blocking rounds",
        category: Category::Blocking,
        subcategory: Some(SkillCode::BlockingOverall),
        difficulty: 4,
        duration_minutes: 10,
        equipment: &["catchers_mitt", "catchers_gear", "pitching_machine", "baseballs"],
        instructions: &["Machine feeds random balls in the dirt", "Block, recover and find the ball"],
        coaching_points: &["Recover to a throwing position quickly"],
        common_mistakes: &["Closing the eyes on impact"],
    },
    // Education
    Drill {
        code: "edu_count_calling",
        name: "Count-based pitch calling",
        category: Category::Education,
        subcategory: Some(SkillCode::EducationPitchCalling),
        difficulty: 1,
        duration_minutes: 5,
        equipment: &[],
        instructions: &[
            "Go through every count from 0-0 to 3-2",
            "Name the pitch and location for each and say why",
        ],
        coaching_points: &["Pitch to the pitcher's strengths first"],
        common_mistakes: &["Calling the same sequence in every count"],
    },
    Drill {
        code: "edu_situation_quiz",
        name: "Situation quiz",
        category: Category::Education,
        subcategory: Some(SkillCode::EducationGameAwareness),
        difficulty: 2,
        duration_minutes: 6,
        equipment: &[],
        instructions: &[
            "Work through ten base-out situations",
            "Call out coverage, bunt defense and pickoff options",
        ],
        coaching_points: &["Know the situation before every pitch"],
        common_mistakes: &["Forgetting the number of outs"],
    },
    Drill {
        code: "edu_mound_visit_roleplay",
        name: "Mound visit role-play",
        category: Category::Education,
        subcategory: Some(SkillCode::EducationLeadership),
        difficulty: 2,
        duration_minutes: 5,
        equipment: &[],
        instructions: &[
            "Role-play three mound visits: tempo, mechanics, confidence",
            "Keep each visit under 30 seconds",
        ],
        coaching_points: &["One message per visit"],
        common_mistakes: &["Overloading the pitcher with information"],
    },
    Drill {
        code: "edu_video_scouting",
        name: "Hitter scouting from video",
        category: Category::Education,
        subcategory: Some(SkillCode::EducationMentalGame),
        difficulty: 4,
        duration_minutes: 10,
        equipment: &["video_camera"],
        instructions: &[
            "Watch at-bats from an upcoming opponent",
            "Write a plan of attack for three hitters",
        ],
        coaching_points: &["Look for holes in the swing, not just results"],
        common_mistakes: &["Scouting results instead of approach"],
    },
];

pub fn get_all_drills() -> &'static [Drill] {
    DRILLS
}

pub fn find_drill(code: &str) -> Option<&'static Drill> {
    DRILLS.iter().find(|d| d.code == code)
}

/// In-memory catalog over [`DRILLS`], filtering by equipment tier and difficulty
pub struct StaticDrillCatalog {
    tiers: EquipmentTiers,
}

impl StaticDrillCatalog {
    pub fn new(tiers: EquipmentTiers) -> Self {
        Self { tiers }
    }

    fn is_usable(&self, drill: &Drill, tier: EquipmentTier) -> bool {
        let available = self.tiers.equipment_for(tier);
        drill.equipment.iter().all(|item| available.iter().any(|a| a == item))
    }
}

impl Default for StaticDrillCatalog {
    fn default() -> Self {
        Self::new(EquipmentTiers::default())
    }
}

impl DrillCatalog for StaticDrillCatalog {
    fn drills_for_category(
        &self,
        category: Category,
        duration_minutes: u32,
        equipment: EquipmentTier,
        experience: ExperienceLevel,
    ) -> Vec<DrillCard> {
        let cap = experience.max_difficulty();
        let mut selected = Vec::new();
        let mut total = 0;

        for drill in DRILLS.iter().filter(|d| d.category == category) {
            if drill.difficulty > cap || !self.is_usable(drill, equipment) {
                continue;
            }
            // Always hand back at least one drill, even if it runs long
            if !selected.is_empty() && total + drill.duration_minutes > duration_minutes {
                continue;
            }
            total += drill.duration_minutes;
            selected.push(drill.card());
        }

        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_unique() {
        let mut codes: Vec<_> = DRILLS.iter().map(|d| d.code).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), DRILLS.len());
    }

    #[test]
    fn test_subcategory_belongs_to_category() {
        for drill in DRILLS {
            if let Some(skill) = drill.subcategory {
                assert_eq!(skill.category(), drill.category, "{}", drill.code);
            }
            assert!((1..=5).contains(&drill.difficulty), "{}", drill.code);
            assert!(!drill.instructions.is_empty(), "{}", drill.code);
        }
    }

    #[test]
    fn test_find_drill() {
        assert_eq!(find_drill("blk_drop_and_hold").unwrap().category, Category::Blocking);
        assert!(find_drill("nope").is_none());
    }

    #[test]
    fn test_every_category_has_equipment_free_beginner_drill() {
        let catalog = StaticDrillCatalog::default();
        for category in Category::all() {
            let drills = catalog.drills_for_category(
                *category,
                10,
                EquipmentTier::Minimal,
                ExperienceLevel::Beginner,
            );
            assert!(!drills.is_empty(), "{} has no fallback drill", category);
        }
    }

    #[test]
    fn test_difficulty_capped_by_experience() {
        let catalog = StaticDrillCatalog::default();
        let drills = catalog.drills_for_category(
            Category::Throwing,
            60,
            EquipmentTier::Premium,
            ExperienceLevel::Beginner,
        );
        for card in &drills {
            let drill = find_drill(&card.code).unwrap();
            assert!(drill.difficulty <= 2, "{} too hard for a beginner", card.code);
        }
        let expert = catalog.drills_for_category(
            Category::Throwing,
            60,
            EquipmentTier::Premium,
            ExperienceLevel::Expert,
        );
        assert!(expert.iter().any(|c| c.code == "thr_radar_pop_times"));
    }

    #[test]
    fn test_equipment_filtering() {
        let catalog = StaticDrillCatalog::default();
        let drills = catalog.drills_for_category(
            Category::Receiving,
            60,
            EquipmentTier::Basic,
            ExperienceLevel::Expert,
        );
        assert!(drills.iter().all(|c| c.code != "rcv_machine_low_pitches"));
        assert!(drills.iter().any(|c| c.code == "rcv_frame_four_corners"));
    }

    #[test]
    fn test_selection_fits_duration() {
        let catalog = StaticDrillCatalog::default();
        let drills = catalog.drills_for_category(
            Category::Receiving,
            10,
            EquipmentTier::Basic,
            ExperienceLevel::Intermediate,
        );
        let total: u32 = drills.iter().map(|d| d.duration_minutes).sum();
        assert!(total <= 10, "total {}", total);
        assert_eq!(drills.len(), 2);
    }

    #[test]
    fn test_at_least_one_drill_when_short_on_time() {
        let catalog = StaticDrillCatalog::default();
        let drills = catalog.drills_for_category(
            Category::Blocking,
            2,
            EquipmentTier::Minimal,
            ExperienceLevel::Beginner,
        );
        assert_eq!(drills.len(), 1);
        assert_eq!(drills[0].code, "blk_drop_and_hold");
    }
}
