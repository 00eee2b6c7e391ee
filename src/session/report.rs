//! End-of-session summary, achievement badges and improvement suggestions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Session;
use crate::workout::PhaseKind;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionStats {
    pub drills_completed: usize,
    pub drills_skipped: usize,
    pub planned_drills: usize,
    pub phases_completed: usize,
    pub total_phases: usize,
    pub videos_recorded: usize,
    pub planned_minutes: u32,
    /// Excludes pauses
    pub actual_minutes: i64,
    pub paused_minutes: i64,
    /// completed / planned drills, percent; 100 for a plan with no drills
    pub completion_rate: f64,
    /// planned / actual minutes, percent; `None` until a full minute has passed
    pub efficiency: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Badge {
    pub name: String,
    pub description: String,
}

impl Badge {
    fn new(name: &str, description: &str) -> Self {
        Self { name: name.to_string(), description: description.to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhaseSummary {
    pub kind: PhaseKind,
    pub completed: bool,
    pub drills_completed: usize,
    pub drills_skipped: usize,
    pub duration_minutes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionReport {
    pub session_id: String,
    pub completed_at: DateTime<Utc>,
    pub ended_early: bool,
    pub stats: SessionStats,
    pub phases: Vec<PhaseSummary>,
    pub achievements: Vec<Badge>,
    pub suggestions: Vec<String>,
}

impl CompletionReport {
    pub fn build(session: &Session, now: DateTime<Utc>) -> Self {
        let stats = stats(session, now);
        let phases = session
            .phases
            .iter()
            .map(|p| PhaseSummary {
                kind: p.kind,
                completed: p.is_complete(),
                drills_completed: p.completed_drills.len(),
                drills_skipped: p.skipped_drills.len(),
                duration_minutes: p.duration_minutes(now),
            })
            .collect();

        Self {
            session_id: session.id.clone(),
            completed_at: session.completed_at.unwrap_or(now),
            ended_early: session.ended_early,
            achievements: achievements(&stats),
            suggestions: suggestions(&stats),
            stats,
            phases,
        }
    }

    pub fn has_badge(&self, name: &str) -> bool {
        self.achievements.iter().any(|b| b.name == name)
    }
}

fn stats(session: &Session, now: DateTime<Utc>) -> SessionStats {
    let planned_drills = session.planned_drills();
    let drills_completed = session.completed_drills();
    let completion_rate = if planned_drills == 0 {
        100.0
    } else {
        (drills_completed as f64 / planned_drills as f64 * 1000.0).round() / 10.0
    };

    let actual_minutes = session.active_minutes(now);
    let efficiency = (actual_minutes > 0).then(|| {
        (session.planned_minutes as f64 / actual_minutes as f64 * 1000.0).round() / 10.0
    });

    SessionStats {
        drills_completed,
        drills_skipped: session.skipped_drills(),
        planned_drills,
        phases_completed: session.completed_phases(),
        total_phases: session.phases.len(),
        videos_recorded: session.videos.len(),
        planned_minutes: session.planned_minutes,
        actual_minutes,
        paused_minutes: session.paused_duration(session.completed_at.unwrap_or(now)).num_minutes(),
        completion_rate,
        efficiency,
    }
}

fn achievements(stats: &SessionStats) -> Vec<Badge> {
    let mut badges = Vec::new();
    if stats.completion_rate >= 90.0 {
        badges.push(Badge::new("Session Master", "Completed at least 90% of the planned drills"));
    }
    if stats.drills_skipped == 0 {
        badges.push(Badge::new("No Quit Attitude", "Finished without skipping a drill"));
    }
    if stats.videos_recorded >= 1 {
        badges.push(Badge::new("Progress Tracker", "Recorded video for review"));
    }
    if stats.actual_minutes >= stats.planned_minutes as i64 {
        badges.push(Badge::new("Time Committed", "Put in the full planned time"));
    }
    badges
}

fn suggestions(stats: &SessionStats) -> Vec<String> {
    let mut out = Vec::new();
    if stats.completion_rate < 70.0 {
        out.push(
            "Try a shorter or easier session next time to build momentum".to_string(),
        );
    }
    if stats.drills_skipped > 2 {
        out.push(format!(
            "{} drills were skipped; note which ones felt wrong so the next plan can adjust",
            stats.drills_skipped
        ));
    }
    if let Some(efficiency) = stats.efficiency
        && efficiency < 80.0
    {
        out.push(
            "Session ran well past the plan; keep rest between drills short".to_string(),
        );
    }
    out
}
