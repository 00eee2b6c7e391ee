//! Time allocation templates - minutes per workout bucket

use serde::{Deserialize, Serialize};

/// Minutes assigned to each bucket of a workout
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TimeAllocation {
    pub warmup: u32,
    pub weakest_category: u32,
    pub other_categories: u32,
    pub education: u32,
    pub cooldown: u32,
    pub video_review: u32,
}

impl TimeAllocation {
    pub const BUCKETS: usize = 6;

    pub const fn new(
        warmup: u32,
        weakest_category: u32,
        other_categories: u32,
        education: u32,
        cooldown: u32,
        video_review: u32,
    ) -> Self {
        Self { warmup, weakest_category, other_categories, education, cooldown, video_review }
    }

    pub fn total(&self) -> u32 {
        [
            self.weakest_category,
            self.other_categories,
            self.education,
            self.cooldown,
            self.video_review,
        ]
        .iter()
        .fold(self.warmup, |total, m| total.saturating_add(*m))
    }

    /// Multiply every bucket by `factor`, rounding each one independently.
    /// The scaled total can drift from `total * factor` by up to one minute per bucket.
    pub fn scaled(&self, factor: f64) -> Self {
        let scale = |minutes: u32| (minutes as f64 * factor).round().max(0.0) as u32;
        Self {
            warmup: scale(self.warmup),
            weakest_category: scale(self.weakest_category),
            other_categories: scale(self.other_categories),
            education: scale(self.education),
            cooldown: scale(self.cooldown),
            video_review: scale(self.video_review),
        }
    }
}

/// A template keyed by its nominal duration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeTemplate {
    pub duration: u32,
    pub allocation: TimeAllocation,
}

/// Fixed templates, ascending by duration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeTemplates {
    pub templates: Vec<TimeTemplate>,
}

impl Default for TimeTemplates {
    fn default() -> Self {
        let template = |duration, allocation| TimeTemplate { duration, allocation };
        Self {
            templates: vec![
                template(15, TimeAllocation::new(3, 7, 3, 2, 0, 0)),
                template(30, TimeAllocation::new(5, 12, 8, 3, 2, 0)),
                template(45, TimeAllocation::new(5, 20, 12, 6, 0, 2)),
                template(60, TimeAllocation::new(7, 25, 15, 7, 3, 3)),
            ],
        }
    }
}

impl TimeTemplates {
    fn largest(&self) -> Option<&TimeTemplate> {
        self.templates.iter().max_by_key(|t| t.duration)
    }

    /// Template whose duration is nearest to `duration`.
    ///
    /// Scans in ascending order and only replaces the incumbent on a strictly
    /// smaller distance, so an exact tie (37 is 7 from both 30 and 45) goes to
    /// the shorter template.
    pub fn nearest(&self, duration: u32) -> Option<&TimeTemplate> {
        let mut best: Option<&TimeTemplate> = None;
        for template in &self.templates {
            let distance = template.duration.abs_diff(duration);
            match best {
                Some(current) if current.duration.abs_diff(duration) <= distance => {}
                _ => best = Some(template),
            }
        }
        best
    }

    /// Allocation for a requested duration. Above the largest template the
    /// largest one is scaled linearly by `duration / largest`.
    pub fn allocate(&self, duration: u32) -> TimeAllocation {
        match self.largest() {
            Some(largest) if duration > largest.duration => largest
                .allocation
                .scaled(duration as f64 / largest.duration as f64),
            _ => self
                .nearest(duration)
                .map(|t| t.allocation)
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_templates_sum_exactly() {
        let templates = TimeTemplates::default();
        for duration in [15, 30, 45, 60] {
            let allocation = templates.allocate(duration);
            assert_eq!(allocation.total(), duration, "template {}", duration);
        }
    }

    #[test]
    fn test_forty_five_minute_template() {
        let allocation = TimeTemplates::default().allocate(45);
        assert_eq!(allocation, TimeAllocation::new(5, 20, 12, 6, 0, 2));
    }

    #[test]
    fn test_snaps_to_nearest() {
        let templates = TimeTemplates::default();
        assert_eq!(templates.nearest(22).unwrap().duration, 15);
        assert_eq!(templates.nearest(24).unwrap().duration, 30);
        assert_eq!(templates.nearest(1).unwrap().duration, 15);
        assert_eq!(templates.nearest(55).unwrap().duration, 60);
    }

    #[test]
    fn test_ties_go_to_shorter_template() {
        let templates = TimeTemplates::default();
        assert_eq!(templates.nearest(37).unwrap().duration, 30);
        assert_eq!(templates.nearest(38).unwrap().duration, 45);
        assert_eq!(templates.nearest(0).unwrap().duration, 15);
    }

    #[test]
    fn test_long_sessions_scale_within_rounding_drift() {
        let allocation = TimeTemplates::default().allocate(90);
        assert_eq!(allocation.weakest_category, 38); // 25 * 1.5 = 37.5
        let drift = allocation.total().abs_diff(90);
        assert!(drift <= TimeAllocation::BUCKETS as u32, "drift {}", drift);
    }

    #[test]
    fn test_empty_templates_allocate_nothing() {
        let templates = TimeTemplates { templates: vec![] };
        assert_eq!(templates.allocate(30).total(), 0);
    }
}
