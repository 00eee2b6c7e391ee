//! Tips module - catcher coaching tips and education topics

use rand::seq::{IteratorRandom, SliceRandom};

use crate::skills::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TipCategory {
    Receiving,
    Throwing,
    Blocking,
    GameCalling,
    Mindset,
    Conditioning,
}

impl TipCategory {
    pub fn emoji(&self) -> &'static str {
        match self {
            TipCategory::Receiving => "🧤",
            TipCategory::Throwing => "🎯",
            TipCategory::Blocking => "🛡",
            TipCategory::GameCalling => "📋",
            TipCategory::Mindset => "🧠",
            TipCategory::Conditioning => "💪",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TipCategory::Receiving => "Receiving",
            TipCategory::Throwing => "Throwing",
            TipCategory::Blocking => "Blocking",
            TipCategory::GameCalling => "Game calling",
            TipCategory::Mindset => "Mindset",
            TipCategory::Conditioning => "Conditioning",
        }
    }

    /// Tip category matching a skill category
    pub fn for_skill_category(category: Category) -> Self {
        match category {
            Category::Receiving => TipCategory::Receiving,
            Category::Throwing => TipCategory::Throwing,
            Category::Blocking => TipCategory::Blocking,
            Category::Education => TipCategory::GameCalling,
        }
    }
}

impl std::str::FromStr for TipCategory {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "receiving" => Ok(TipCategory::Receiving),
            "throwing" => Ok(TipCategory::Throwing),
            "blocking" => Ok(TipCategory::Blocking),
            "game_calling" | "education" => Ok(TipCategory::GameCalling),
            "mindset" => Ok(TipCategory::Mindset),
            "conditioning" => Ok(TipCategory::Conditioning),
            _ => Err(format!("Unknown tip category: {}", s)),
        }
    }
}

pub struct Tip {
    pub category: TipCategory,
    pub text: &'static str,
}

pub const TIPS: &[Tip] = &[
    // Receiving
    Tip {
        category: TipCategory::Receiving,
        text: "Beat the ball to the spot. A glove that arrives early can stay quiet; a late glove has to stab.",
    },
    Tip {
        category: TipCategory::Receiving,
        text: "Present strikes, don't steal them. Umpires notice a glove that yanks balls into the zone.",
    },
    Tip {
        category: TipCategory::Receiving,
        text: "Keep a soft elbow on low pitches and turn the thumb under the ball.",
    },
    // Throwing
    Tip {
        category: TipCategory::Throwing,
        text: "Quick feet beat a big arm. Most pop time is lost in the exchange and the footwork, not the throw.",
    },
    Tip {
        category: TipCategory::Throwing,
        text: "Find a four-seam grip on every transfer, even in catch play. It should be automatic by game day.",
    },
    Tip {
        category: TipCategory::Throwing,
        text: "Throw through the bag, not at it. Aim for the fielder's knee on the first-base side.",
    },
    // Blocking
    Tip {
        category: TipCategory::Blocking,
        text: "Block with the chest, not the glove. The glove only closes the gap between the knees.",
    },
    Tip {
        category: TipCategory::Blocking,
        text: "Round the shoulders and tuck the chin so the ball dies in front of you.",
    },
    Tip {
        category: TipCategory::Blocking,
        text: "Angle the body toward home plate on balls to the side so deflections stay in front.",
    },
    // Game calling
    Tip {
        category: TipCategory::GameCalling,
        text: "Call the game for your pitcher's best pitch today, not the scouting report from last month.",
    },
    Tip {
        category: TipCategory::GameCalling,
        text: "Know the count, the outs and the runners before every sign. Say them to yourself.",
    },
    Tip {
        category: TipCategory::GameCalling,
        text: "A mound visit carries one message. Tempo, mechanics or confidence: pick one.",
    },
    // Mindset
    Tip {
        category: TipCategory::Mindset,
        text: "Your last at-bat never comes behind the plate with you. The pitcher needs your full attention.",
    },
    Tip {
        category: TipCategory::Mindset,
        text: "Be the loudest voice on the field. Infielders play faster when the catcher runs the defense.",
    },
    Tip {
        category: TipCategory::Mindset,
        text: "A passed ball is one pitch. Reset with a deep breath and give the next sign with conviction.",
    },
    // Conditioning
    Tip {
        category: TipCategory::Conditioning,
        text: "Hip mobility is a catcher's currency. Stretch the hips and ankles daily, not only before games.",
    },
    Tip {
        category: TipCategory::Conditioning,
        text: "Build leg endurance with wall sits and squat holds; the ninth inning is won in the off-season.",
    },
    Tip {
        category: TipCategory::Conditioning,
        text: "Ice and rest the throwing arm after high-volume days. Long toss is work, not recovery.",
    },
];

/// Any tip; `None` only if the table is empty
pub fn get_random_tip() -> Option<&'static Tip> {
    TIPS.choose(&mut rand::thread_rng())
}

pub fn get_random_tip_by_category(category: TipCategory) -> Option<&'static Tip> {
    TIPS.iter()
        .filter(|t| t.category == category)
        .choose(&mut rand::thread_rng())
}

/// Tip for the skill category a plan focuses on
pub fn tip_for_focus(focus: Category) -> Option<&'static Tip> {
    get_random_tip_by_category(TipCategory::for_skill_category(focus))
}

pub fn format_tip(tip: &Tip) -> String {
    format!("{} {} tip: {}", tip.category.emoji(), tip.category.name(), tip.text)
}

/// Explanatory content for a workout's education phase
pub struct EducationTopic {
    pub category: Category,
    pub title: &'static str,
    pub summary: &'static str,
    pub discussion_points: &'static [&'static str],
}

pub const EDUCATION_TOPICS: &[EducationTopic] = &[
    EducationTopic {
        category: Category::Receiving,
        title: "Why receiving wins counts",
        summary: "How glove work turns borderline pitches into strikes over a season",
        discussion_points: &[
            "What the umpire sees on a quiet catch versus a late stab",
            "Which quadrant of the zone gives you the most trouble",
        ],
    },
    EducationTopic {
        category: Category::Throwing,
        title: "Anatomy of a pop time",
        summary: "Breaking the throw down into exchange, footwork and flight time",
        discussion_points: &[
            "Where your own pop time is lost",
            "When to throw and when to hold the ball",
        ],
    },
    EducationTopic {
        category: Category::Blocking,
        title: "Keeping runners honest",
        summary: "How blocking changes a pitcher's willingness to bury breaking balls",
        discussion_points: &[
            "Situations where a block matters more than a strike",
            "Reading the pitch out of the hand for early drops",
        ],
    },
    EducationTopic {
        category: Category::Education,
        title: "Calling a game",
        summary: "Sequencing pitches around the pitcher's strengths and the hitter's holes",
        discussion_points: &[
            "How to set up a hitter across an at-bat",
            "What you look for in a hitter's first swing",
        ],
    },
];

pub fn education_topic(category: Category) -> Option<&'static EducationTopic> {
    EDUCATION_TOPICS.iter().find(|t| t.category == category)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_CATEGORIES: [TipCategory; 6] = [
        TipCategory::Receiving,
        TipCategory::Throwing,
        TipCategory::Blocking,
        TipCategory::GameCalling,
        TipCategory::Mindset,
        TipCategory::Conditioning,
    ];

    #[test]
    fn test_tip_category_emoji_all_categories() {
        for category in ALL_CATEGORIES {
            assert!(!category.emoji().is_empty());
        }
    }

    #[test]
    fn test_tips_count() {
        assert_eq!(TIPS.len(), 18);
    }

    #[test]
    fn test_get_random_tip_never_panics() {
        for _ in 0..10 {
            let tip = get_random_tip().unwrap();
            assert!(!tip.text.is_empty());
        }
    }

    #[test]
    fn test_get_random_tip_by_category_returns_correct_category() {
        for category in ALL_CATEGORIES {
            let tip = get_random_tip_by_category(category);
            assert!(tip.is_some(), "Category {:?} should have tips", category);
            assert_eq!(tip.unwrap().category, category);
        }
    }

    #[test]
    fn test_tip_for_focus_follows_skill_category() {
        for category in Category::all() {
            let tip = tip_for_focus(*category).unwrap();
            assert_eq!(tip.category, TipCategory::for_skill_category(*category));
        }
        assert_eq!(
            tip_for_focus(Category::Education).unwrap().category,
            TipCategory::GameCalling
        );
    }

    #[test]
    fn test_format_tip_contains_parts() {
        let tip = &TIPS[0];
        let formatted = format_tip(tip);
        assert!(formatted.contains(tip.category.emoji()));
        assert!(formatted.contains(tip.category.name()));
        assert!(formatted.contains(tip.text));
    }

    #[test]
    fn test_tip_category_from_str() {
        assert_eq!("education".parse::<TipCategory>(), Ok(TipCategory::GameCalling));
        assert!("nutrition".parse::<TipCategory>().is_err());
    }

    #[test]
    fn test_every_skill_category_has_topic() {
        for category in Category::all() {
            let topic = education_topic(*category);
            assert!(topic.is_some(), "{} has no education topic", category);
            assert!(!topic.unwrap().discussion_points.is_empty());
        }
    }
}
