//! Session module - walking a user through a generated plan
//!
//! Features:
//! - Session value object with an explicit phase/drill cursor
//! - Executor transitions: start, complete/skip drill, pause/resume, finish
//! - Typed event bus with per-listener failure isolation
//! - Completion report with badges and suggestions

pub mod clock;
pub mod events;
pub mod executor;
pub mod report;

pub use clock::{Clock, ManualClock, SystemClock};
pub use events::{EventBus, SessionEvent, Topic};
pub use executor::{SessionExecutor, SessionSnapshot, StateOutcome};
pub use report::{Badge, CompletionReport, SessionStats};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::drills::DrillCard;
use crate::workout::{PhaseKind, WorkoutPlan};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Idle,
    InProgress,
    Paused,
    Completed,
}

impl SessionStatus {
    pub fn name(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "idle",
            SessionStatus::InProgress => "in_progress",
            SessionStatus::Paused => "paused",
            SessionStatus::Completed => "completed",
        }
    }
}

/// How a drill felt, as reported by the user
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DrillFeedback {
    /// 1..=5
    pub rating: Option<u8>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrillCompletion {
    pub drill_code: String,
    pub drill_name: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_minutes: i64,
    pub feedback: Option<DrillFeedback>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrillSkip {
    pub drill_code: String,
    pub drill_name: String,
    pub reason: String,
    /// Drill performed in place of the skipped one
    pub alternative: Option<String>,
    pub skipped_at: DateTime<Utc>,
}

/// Execution record for one plan phase
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhaseProgress {
    pub kind: PhaseKind,
    pub title: String,
    pub drills: Vec<DrillCard>,
    pub planned_minutes: u32,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub completed_drills: Vec<DrillCompletion>,
    pub skipped_drills: Vec<DrillSkip>,
}

impl PhaseProgress {
    fn from_plan(phase: &crate::workout::Phase) -> Self {
        Self {
            kind: phase.kind,
            title: phase.title.clone(),
            drills: phase.drills.clone(),
            planned_minutes: phase.total_duration,
            started_at: None,
            completed_at: None,
            completed_drills: Vec::new(),
            skipped_drills: Vec::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Minutes from start to completion, or to `now` while running
    pub fn duration_minutes(&self, now: DateTime<Utc>) -> i64 {
        match self.started_at {
            Some(start) => (self.completed_at.unwrap_or(now) - start).num_minutes(),
            None => 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PauseEvent {
    pub paused_at: DateTime<Utc>,
    pub resumed_at: Option<DateTime<Utc>>,
    pub phase: Option<PhaseKind>,
    pub drill_code: Option<String>,
    /// Seconds, set on resume
    pub pause_duration: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoRecord {
    pub label: String,
    pub recorded_at: DateTime<Utc>,
    pub phase: Option<PhaseKind>,
    pub drill_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionFeedback {
    pub submitted_at: DateTime<Utc>,
    /// 1..=5
    pub rating: Option<u8>,
    pub notes: String,
}

/// Position of the active drill
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Cursor {
    pub phase_index: usize,
    pub drill_index: usize,
    pub drill_started_at: DateTime<Utc>,
}

/// Execution state of one plan. Pure data; [`SessionExecutor`] moves it along.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub id: String,
    pub plan_title: String,
    pub planned_minutes: u32,
    pub status: SessionStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Plan phases in canonical order
    pub phases: Vec<PhaseProgress>,
    pub cursor: Option<Cursor>,
    pub pauses: Vec<PauseEvent>,
    pub videos: Vec<VideoRecord>,
    pub feedback: Vec<SessionFeedback>,
    pub ended_early: bool,
    pub report: Option<CompletionReport>,
}

impl Session {
    /// Idle session over `plan`. Phases follow the canonical order; kinds the
    /// plan does not contain are left out.
    pub fn new(id: impl Into<String>, plan: &WorkoutPlan) -> Self {
        let phases = PhaseKind::all()
            .iter()
            .filter_map(|kind| plan.phase(*kind))
            .map(PhaseProgress::from_plan)
            .collect();

        Self {
            id: id.into(),
            plan_title: plan.title.clone(),
            planned_minutes: plan.planned_minutes(),
            status: SessionStatus::Idle,
            started_at: None,
            completed_at: None,
            phases,
            cursor: None,
            pauses: Vec::new(),
            videos: Vec::new(),
            feedback: Vec::new(),
            ended_early: false,
            report: None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.status, SessionStatus::InProgress | SessionStatus::Paused)
    }

    pub fn current_phase(&self) -> Option<&PhaseProgress> {
        self.cursor.and_then(|c| self.phases.get(c.phase_index))
    }

    pub fn current_drill(&self) -> Option<&DrillCard> {
        self.cursor
            .and_then(|c| self.phases.get(c.phase_index)?.drills.get(c.drill_index))
    }

    pub fn planned_drills(&self) -> usize {
        self.phases.iter().map(|p| p.drills.len()).sum()
    }

    pub fn completed_drills(&self) -> usize {
        self.phases.iter().map(|p| p.completed_drills.len()).sum()
    }

    pub fn skipped_drills(&self) -> usize {
        self.phases.iter().map(|p| p.skipped_drills.len()).sum()
    }

    pub fn completed_phases(&self) -> usize {
        self.phases.iter().filter(|p| p.is_complete()).count()
    }

    /// (completed phases + completed share of the current phase) / phases, in percent
    pub fn progress_percent(&self) -> f64 {
        if self.phases.is_empty() {
            return if self.status == SessionStatus::Completed { 100.0 } else { 0.0 };
        }

        let current = self
            .current_phase()
            .filter(|p| !p.is_complete())
            .map(|p| p.completed_drills.len() as f64 / p.drills.len().max(1) as f64)
            .unwrap_or(0.0);

        let percent = (self.completed_phases() as f64 + current) / self.phases.len() as f64 * 100.0;
        (percent.clamp(0.0, 100.0) * 10.0).round() / 10.0
    }

    /// Total time spent paused, counting an open pause up to `now`
    pub fn paused_duration(&self, now: DateTime<Utc>) -> Duration {
        self.pauses
            .iter()
            .map(|p| p.resumed_at.unwrap_or(now) - p.paused_at)
            .fold(Duration::zero(), |acc, d| acc + d)
    }

    /// Wall-clock minutes since start, excluding pauses
    pub fn active_minutes(&self, now: DateTime<Utc>) -> i64 {
        match self.started_at {
            Some(start) => {
                let end = self.completed_at.unwrap_or(now);
                ((end - start) - self.paused_duration(end)).num_minutes()
            }
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workout::{fallback_plan, Phase};

    fn card(code: &str) -> DrillCard {
        DrillCard {
            code: code.to_string(),
            name: code.to_string(),
            category: None,
            duration_minutes: 5,
            instructions: vec![],
            coaching_points: vec![],
        }
    }

    #[test]
    fn test_new_session_uses_canonical_order() {
        let mut plan = fallback_plan(30);
        plan.phases = vec![
            Phase::new(PhaseKind::Cooldown, "Cooldown", vec![card("c")]),
            Phase::new(PhaseKind::Warmup, "Warm-up", vec![card("w")]),
            Phase::new(PhaseKind::Education, "Education", vec![card("e")]),
        ];
        let session = Session::new("s1", &plan);
        let kinds: Vec<PhaseKind> = session.phases.iter().map(|p| p.kind).collect();
        assert_eq!(kinds, vec![PhaseKind::Warmup, PhaseKind::Education, PhaseKind::Cooldown]);
        assert_eq!(session.status, SessionStatus::Idle);
        assert_eq!(session.planned_drills(), 3);
        assert_eq!(session.progress_percent(), 0.0);
    }

    #[test]
    fn test_idle_session_has_no_cursor() {
        let session = Session::new("s2", &fallback_plan(30));
        assert!(session.current_drill().is_none());
        assert!(!session.is_active());
        assert_eq!(session.active_minutes(Utc::now()), 0);
    }
}
