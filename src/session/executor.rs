//! Session executor - state transitions over a [`Session`]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::clock::{Clock, SystemClock};
use super::events::{EventBus, SessionEvent, Topic};
use super::report::CompletionReport;
use super::{
    Cursor, DrillCompletion, DrillFeedback, DrillSkip, PauseEvent, Session, SessionFeedback,
    SessionStatus, VideoRecord,
};
use crate::drills::DrillCard;
use crate::error::{ListenerError, SessionError};
use crate::workout::PhaseKind;

/// Result of pause/resume. A refused request is an expected outcome, not an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StateOutcome {
    pub success: bool,
    pub message: String,
}

impl StateOutcome {
    fn ok(message: &str) -> Self {
        Self { success: true, message: message.to_string() }
    }

    fn refused(error: SessionError) -> Self {
        Self { success: false, message: error.to_string() }
    }
}

/// Point-in-time view of a session for display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub status: SessionStatus,
    pub current_phase: Option<PhaseKind>,
    pub current_drill: Option<DrillCard>,
    pub phase_number: usize,
    pub total_phases: usize,
    pub drill_number: usize,
    pub phase_drills: usize,
    pub progress_percent: f64,
    pub elapsed_minutes: i64,
    pub paused_minutes: i64,
    pub drills_completed: usize,
    pub drills_skipped: usize,
}

/// Drives sessions through their lifecycle. Holds no session state itself, so
/// one executor can move any number of sessions.
#[derive(Debug, Default)]
pub struct SessionExecutor<K: Clock = SystemClock> {
    clock: K,
    events: EventBus,
}

impl SessionExecutor<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<K: Clock> SessionExecutor<K> {
    pub fn with_clock(clock: K) -> Self {
        Self { clock, events: EventBus::new() }
    }

    pub fn clock(&self) -> &K {
        &self.clock
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn subscribe<F>(&mut self, topic: Topic, listener: F)
    where
        F: Fn(&SessionEvent) -> Result<(), ListenerError> + 'static,
    {
        self.events.subscribe(topic, listener);
    }

    /// Enter the first phase and its first drill. Phases without drills
    /// complete on entry, so a plan with no drills finishes immediately.
    pub fn start(&self, session: &mut Session) -> Result<(), SessionError> {
        if session.status != SessionStatus::Idle {
            return Err(SessionError::AlreadyStarted);
        }
        if session.phases.is_empty() {
            return Err(SessionError::EmptyPlan);
        }

        let now = self.clock.now();
        session.status = SessionStatus::InProgress;
        session.started_at = Some(now);
        info!(
            "Session {} started: {} phases, {} drills",
            session.id,
            session.phases.len(),
            session.planned_drills()
        );
        self.emit(SessionEvent::SessionStarted {
            session_id: session.id.clone(),
            total_phases: session.phases.len(),
        });

        self.enter_phase(session, 0, now);
        Ok(())
    }

    pub fn complete_drill(
        &self,
        session: &mut Session,
        feedback: Option<DrillFeedback>,
    ) -> Result<(), SessionError> {
        let cursor = self.active_cursor(session)?;
        let now = self.clock.now();
        let (kind, drill) = drill_at(session, cursor)?;

        let duration_minutes = (now - cursor.drill_started_at).num_minutes();
        debug!("Drill {} completed in {} min", drill.code, duration_minutes);
        let event = SessionEvent::DrillCompleted {
            phase: kind,
            drill_code: drill.code.clone(),
            duration_minutes,
        };
        let feedback = feedback.map(|mut f| {
            f.rating = f.rating.map(|r| r.clamp(1, 5));
            f
        });
        session.phases[cursor.phase_index]
            .completed_drills
            .push(DrillCompletion {
                drill_code: drill.code,
                drill_name: drill.name,
                started_at: cursor.drill_started_at,
                completed_at: now,
                duration_minutes,
                feedback,
            });
        self.emit(event);

        self.advance_drill(session, cursor, now);
        Ok(())
    }

    /// Skip the active drill. `alternative` names a drill done in its place.
    pub fn skip_drill(
        &self,
        session: &mut Session,
        reason: impl Into<String>,
        alternative: Option<String>,
    ) -> Result<(), SessionError> {
        let cursor = self.active_cursor(session)?;
        let now = self.clock.now();
        let (kind, drill) = drill_at(session, cursor)?;
        let reason = reason.into();

        debug!("Drill {} skipped: {}", drill.code, reason);
        let event = SessionEvent::DrillSkipped {
            phase: kind,
            drill_code: drill.code.clone(),
            reason: reason.clone(),
        };
        session.phases[cursor.phase_index]
            .skipped_drills
            .push(DrillSkip {
                drill_code: drill.code,
                drill_name: drill.name,
                reason,
                alternative,
                skipped_at: now,
            });
        self.emit(event);

        self.advance_drill(session, cursor, now);
        Ok(())
    }

    pub fn pause(&self, session: &mut Session) -> StateOutcome {
        match session.status {
            SessionStatus::InProgress => {}
            SessionStatus::Paused => return StateOutcome::refused(SessionError::Paused),
            _ => return StateOutcome::refused(SessionError::NoActiveSession),
        }

        let now = self.clock.now();
        let phase = session.current_phase().map(|p| p.kind);
        let drill_code = session.current_drill().map(|d| d.code.clone());
        session.pauses.push(PauseEvent {
            paused_at: now,
            resumed_at: None,
            phase,
            drill_code: drill_code.clone(),
            pause_duration: None,
        });
        session.status = SessionStatus::Paused;

        info!("Session {} paused", session.id);
        self.emit(SessionEvent::SessionPaused { phase, drill_code });
        StateOutcome::ok("Session paused")
    }

    pub fn resume(&self, session: &mut Session) -> StateOutcome {
        if session.status != SessionStatus::Paused {
            return StateOutcome::refused(SessionError::NotPaused);
        }

        let now = self.clock.now();
        let pause_seconds = close_pause(session, now);
        // Drill timer stays frozen while paused
        if let Some(cursor) = session.cursor.as_mut() {
            cursor.drill_started_at += chrono::Duration::seconds(pause_seconds);
        }
        session.status = SessionStatus::InProgress;

        info!("Session {} resumed after {}s", session.id, pause_seconds);
        self.emit(SessionEvent::SessionResumed { pause_seconds });
        StateOutcome::ok("Session resumed")
    }

    /// Finish now. Remaining drills count as not done.
    pub fn complete_session(&self, session: &mut Session) -> Result<CompletionReport, SessionError> {
        if !session.is_active() {
            return Err(SessionError::NoActiveSession);
        }
        let now = self.clock.now();
        session.ended_early = true;
        Ok(self.finish(session, now))
    }

    pub fn record_video(
        &self,
        session: &mut Session,
        label: impl Into<String>,
    ) -> Result<(), SessionError> {
        if !session.is_active() {
            return Err(SessionError::NoActiveSession);
        }
        let video = VideoRecord {
            label: label.into(),
            recorded_at: self.clock.now(),
            phase: session.current_phase().map(|p| p.kind),
            drill_code: session.current_drill().map(|d| d.code.clone()),
        };
        debug!("Session {} recorded video {}", session.id, video.label);
        session.videos.push(video);
        Ok(())
    }

    /// Session-level feedback. A completed session is final and refuses it.
    pub fn add_feedback(
        &self,
        session: &mut Session,
        rating: Option<u8>,
        notes: impl Into<String>,
    ) -> Result<(), SessionError> {
        match session.status {
            SessionStatus::Idle => return Err(SessionError::NoActiveSession),
            SessionStatus::Completed => return Err(SessionError::Finalized),
            SessionStatus::InProgress | SessionStatus::Paused => {}
        }
        session.feedback.push(SessionFeedback {
            submitted_at: self.clock.now(),
            rating: rating.map(|r| r.clamp(1, 5)),
            notes: notes.into(),
        });
        Ok(())
    }

    pub fn status(&self, session: &Session) -> SessionSnapshot {
        let now = self.clock.now();
        let phase = session.current_phase();
        SessionSnapshot {
            session_id: session.id.clone(),
            status: session.status,
            current_phase: phase.map(|p| p.kind),
            current_drill: session.current_drill().cloned(),
            phase_number: session.cursor.map(|c| c.phase_index + 1).unwrap_or(0),
            total_phases: session.phases.len(),
            drill_number: session.cursor.map(|c| c.drill_index + 1).unwrap_or(0),
            phase_drills: phase.map(|p| p.drills.len()).unwrap_or(0),
            progress_percent: session.progress_percent(),
            elapsed_minutes: session.active_minutes(now),
            paused_minutes: session
                .paused_duration(session.completed_at.unwrap_or(now))
                .num_minutes(),
            drills_completed: session.completed_drills(),
            drills_skipped: session.skipped_drills(),
        }
    }

    fn active_cursor(&self, session: &Session) -> Result<Cursor, SessionError> {
        match session.status {
            SessionStatus::InProgress => session.cursor.ok_or(SessionError::NoActiveDrill),
            SessionStatus::Paused => Err(SessionError::Paused),
            SessionStatus::Idle | SessionStatus::Completed => Err(SessionError::NoActiveSession),
        }
    }

    fn advance_drill(&self, session: &mut Session, cursor: Cursor, now: DateTime<Utc>) {
        let next = cursor.drill_index + 1;
        let phase = &session.phases[cursor.phase_index];

        if let Some(drill) = phase.drills.get(next) {
            let event = SessionEvent::DrillStarted {
                phase: phase.kind,
                drill_code: drill.code.clone(),
                index: next,
            };
            session.cursor = Some(Cursor {
                phase_index: cursor.phase_index,
                drill_index: next,
                drill_started_at: now,
            });
            self.emit(event);
            self.emit_progress(session);
        } else {
            self.complete_phase(session, cursor.phase_index, now);
            self.enter_phase(session, cursor.phase_index + 1, now);
        }
    }

    /// Enter `index`, completing drill-less phases on the way.
    /// Running past the last phase finishes the session.
    fn enter_phase(&self, session: &mut Session, mut index: usize, now: DateTime<Utc>) {
        session.cursor = None;
        while let Some(phase) = session.phases.get_mut(index) {
            phase.started_at = Some(now);
            let kind = phase.kind;
            let total_drills = phase.drills.len();
            let first = phase.drills.first().map(|d| d.code.clone());

            debug!("Session {} entering phase {}", session.id, kind);
            self.emit(SessionEvent::PhaseStarted { phase: kind, index, total_drills });

            if let Some(drill_code) = first {
                session.cursor = Some(Cursor {
                    phase_index: index,
                    drill_index: 0,
                    drill_started_at: now,
                });
                self.emit(SessionEvent::DrillStarted { phase: kind, drill_code, index: 0 });
                self.emit_progress(session);
                return;
            }

            self.complete_phase(session, index, now);
            index += 1;
        }

        self.finish(session, now);
    }

    fn complete_phase(&self, session: &mut Session, index: usize, now: DateTime<Utc>) {
        if let Some(phase) = session.phases.get_mut(index) {
            phase.completed_at = Some(now);
            let event = SessionEvent::PhaseCompleted {
                phase: phase.kind,
                completed_drills: phase.completed_drills.len(),
                skipped_drills: phase.skipped_drills.len(),
            };
            self.emit(event);
            self.emit_progress(session);
        }
    }

    fn finish(&self, session: &mut Session, now: DateTime<Utc>) -> CompletionReport {
        if session.status == SessionStatus::Paused {
            close_pause(session, now);
        }
        session.status = SessionStatus::Completed;
        session.completed_at = Some(now);
        session.cursor = None;

        let report = CompletionReport::build(session, now);
        session.report = Some(report.clone());

        info!(
            "Session {} completed: {}/{} drills, {:.1}% complete{}",
            session.id,
            report.stats.drills_completed,
            report.stats.planned_drills,
            report.stats.completion_rate,
            if session.ended_early { " (ended early)" } else { "" }
        );
        self.emit(SessionEvent::SessionCompleted {
            session_id: session.id.clone(),
            completion_rate: report.stats.completion_rate,
            ended_early: session.ended_early,
        });
        report
    }

    fn emit_progress(&self, session: &Session) {
        self.emit(SessionEvent::ProgressUpdated { percent: session.progress_percent() });
    }

    fn emit(&self, event: SessionEvent) {
        self.events.publish(&event);
    }
}

fn drill_at(session: &Session, cursor: Cursor) -> Result<(PhaseKind, DrillCard), SessionError> {
    let phase = session
        .phases
        .get(cursor.phase_index)
        .ok_or(SessionError::NoActiveDrill)?;
    let drill = phase
        .drills
        .get(cursor.drill_index)
        .ok_or(SessionError::NoActiveDrill)?;
    Ok((phase.kind, drill.clone()))
}

/// Close the open pause, returning its length in seconds
fn close_pause(session: &mut Session, now: DateTime<Utc>) -> i64 {
    match session.pauses.last_mut() {
        Some(pause) if pause.resumed_at.is_none() => {
            let seconds = (now - pause.paused_at).num_seconds();
            pause.resumed_at = Some(now);
            pause.pause_duration = Some(seconds);
            seconds
        }
        _ => 0,
    }
}
