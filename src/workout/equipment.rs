//! Equipment tiers - nested requirement sets

use serde::{Deserialize, Serialize};

/// How much training equipment a catcher has, lowest to highest
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentTier {
    Minimal,
    Basic,
    Intermediate,
    Advanced,
    Premium,
}

impl EquipmentTier {
    pub fn name(&self) -> &'static str {
        match self {
            EquipmentTier::Minimal => "minimal",
            EquipmentTier::Basic => "basic",
            EquipmentTier::Intermediate => "intermediate",
            EquipmentTier::Advanced => "advanced",
            EquipmentTier::Premium => "premium",
        }
    }
}

impl std::fmt::Display for EquipmentTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Requirement set per tier. Each tier lists only what it adds to the one below.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EquipmentTiers {
    pub basic: Vec<String>,
    pub intermediate: Vec<String>,
    pub advanced: Vec<String>,
    pub premium: Vec<String>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for EquipmentTiers {
    fn default() -> Self {
        Self {
            basic: owned(&["catchers_mitt", "baseballs"]),
            intermediate: owned(&["catchers_gear", "home_plate"]),
            advanced: owned(&["pitching_machine", "tennis_balls"]),
            premium: owned(&["radar_gun", "video_camera"]),
        }
    }
}

impl EquipmentTiers {
    /// Full requirement set for a tier, including every lower tier
    pub fn equipment_for(&self, tier: EquipmentTier) -> Vec<&str> {
        let mut layers: Vec<&Vec<String>> = Vec::new();
        if tier >= EquipmentTier::Basic {
            layers.push(&self.basic);
        }
        if tier >= EquipmentTier::Intermediate {
            layers.push(&self.intermediate);
        }
        if tier >= EquipmentTier::Advanced {
            layers.push(&self.advanced);
        }
        if tier >= EquipmentTier::Premium {
            layers.push(&self.premium);
        }
        layers.iter().flat_map(|l| l.iter().map(String::as_str)).collect()
    }

    /// Highest tier whose full requirement set is available, checked premium first
    pub fn assess<S: AsRef<str>>(&self, available: &[S]) -> EquipmentTier {
        const CHECK_ORDER: [EquipmentTier; 4] = [
            EquipmentTier::Premium,
            EquipmentTier::Advanced,
            EquipmentTier::Intermediate,
            EquipmentTier::Basic,
        ];

        for tier in CHECK_ORDER {
            let required = self.equipment_for(tier);
            if required
                .iter()
                .all(|item| available.iter().any(|a| a.as_ref() == *item))
            {
                return tier;
            }
        }
        EquipmentTier::Minimal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_equipment_is_minimal() {
        let tiers = EquipmentTiers::default();
        let none: [&str; 0] = [];
        assert_eq!(tiers.assess(&none), EquipmentTier::Minimal);
    }

    #[test]
    fn test_basic_tier() {
        let tiers = EquipmentTiers::default();
        assert_eq!(tiers.assess(&["baseballs", "catchers_mitt"]), EquipmentTier::Basic);
    }

    #[test]
    fn test_missing_lower_tier_item_blocks_higher_tier() {
        let tiers = EquipmentTiers::default();
        // Premium extras without the basic kit
        let kit = ["radar_gun", "video_camera", "pitching_machine", "tennis_balls"];
        assert_eq!(tiers.assess(&kit), EquipmentTier::Minimal);
    }

    #[test]
    fn test_premium_tier() {
        let tiers = EquipmentTiers::default();
        let kit = tiers.equipment_for(EquipmentTier::Premium);
        assert_eq!(kit.len(), 8);
        assert_eq!(tiers.assess(&kit), EquipmentTier::Premium);
    }

    #[test]
    fn test_superset_never_lowers_tier() {
        let tiers = EquipmentTiers::default();
        let all = tiers.equipment_for(EquipmentTier::Premium);
        // Grow the kit one item at a time; the tier must never drop
        let mut kit: Vec<&str> = Vec::new();
        let mut last = tiers.assess(&kit);
        for item in all.iter().rev().chain(["bucket"].iter()) {
            kit.push(*item);
            let tier = tiers.assess(&kit);
            assert!(tier >= last, "{:?} dropped to {:?} after adding {}", last, tier, item);
            last = tier;
        }
        assert_eq!(last, EquipmentTier::Premium);
    }
}
