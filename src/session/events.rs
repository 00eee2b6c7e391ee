//! Typed session events and a listener bus that isolates listener failures

use std::panic::{self, AssertUnwindSafe};

use serde::Serialize;
use tracing::{error, warn};

use crate::error::ListenerError;
use crate::workout::PhaseKind;

/// Subscription key, one per event variant
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    SessionStarted,
    PhaseStarted,
    DrillStarted,
    DrillCompleted,
    DrillSkipped,
    PhaseCompleted,
    SessionPaused,
    SessionResumed,
    ProgressUpdated,
    SessionCompleted,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    SessionStarted {
        session_id: String,
        total_phases: usize,
    },
    PhaseStarted {
        phase: PhaseKind,
        index: usize,
        total_drills: usize,
    },
    DrillStarted {
        phase: PhaseKind,
        drill_code: String,
        index: usize,
    },
    DrillCompleted {
        phase: PhaseKind,
        drill_code: String,
        duration_minutes: i64,
    },
    DrillSkipped {
        phase: PhaseKind,
        drill_code: String,
        reason: String,
    },
    PhaseCompleted {
        phase: PhaseKind,
        completed_drills: usize,
        skipped_drills: usize,
    },
    SessionPaused {
        phase: Option<PhaseKind>,
        drill_code: Option<String>,
    },
    SessionResumed {
        pause_seconds: i64,
    },
    ProgressUpdated {
        percent: f64,
    },
    SessionCompleted {
        session_id: String,
        completion_rate: f64,
        ended_early: bool,
    },
}

impl SessionEvent {
    pub fn topic(&self) -> Topic {
        match self {
            SessionEvent::SessionStarted { .. } => Topic::SessionStarted,
            SessionEvent::PhaseStarted { .. } => Topic::PhaseStarted,
            SessionEvent::DrillStarted { .. } => Topic::DrillStarted,
            SessionEvent::DrillCompleted { .. } => Topic::DrillCompleted,
            SessionEvent::DrillSkipped { .. } => Topic::DrillSkipped,
            SessionEvent::PhaseCompleted { .. } => Topic::PhaseCompleted,
            SessionEvent::SessionPaused { .. } => Topic::SessionPaused,
            SessionEvent::SessionResumed { .. } => Topic::SessionResumed,
            SessionEvent::ProgressUpdated { .. } => Topic::ProgressUpdated,
            SessionEvent::SessionCompleted { .. } => Topic::SessionCompleted,
        }
    }
}

pub type Listener = Box<dyn Fn(&SessionEvent) -> Result<(), ListenerError>>;

/// Synchronous observer list. Listeners run in registration order; a listener
/// that errors or panics is logged and never affects the others.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(Option<Topic>, Listener)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, topic: Topic, listener: F)
    where
        F: Fn(&SessionEvent) -> Result<(), ListenerError> + 'static,
    {
        self.listeners.push((Some(topic), Box::new(listener)));
    }

    /// Receive every event
    pub fn subscribe_all<F>(&mut self, listener: F)
    where
        F: Fn(&SessionEvent) -> Result<(), ListenerError> + 'static,
    {
        self.listeners.push((None, Box::new(listener)));
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Deliver `event`, returning how many listeners failed
    pub fn publish(&self, event: &SessionEvent) -> usize {
        let topic = event.topic();
        let mut failures = 0;

        for (filter, listener) in &self.listeners {
            if filter.is_some_and(|t| t != topic) {
                continue;
            }
            match panic::catch_unwind(AssertUnwindSafe(|| listener(event))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    failures += 1;
                    warn!("Listener for {:?} failed: {}", topic, e);
                }
                Err(_) => {
                    failures += 1;
                    error!("Listener for {:?} panicked", topic);
                }
            }
        }

        failures
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn progress(percent: f64) -> SessionEvent {
        SessionEvent::ProgressUpdated { percent }
    }

    #[test]
    fn test_topic_filtering() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();

        let log = seen.clone();
        bus.subscribe(Topic::SessionResumed, move |e| {
            log.borrow_mut().push(e.topic());
            Ok(())
        });

        bus.publish(&progress(10.0));
        bus.publish(&SessionEvent::SessionResumed { pause_seconds: 4 });
        assert_eq!(*seen.borrow(), vec![Topic::SessionResumed]);
    }

    #[test]
    fn test_failing_listeners_are_isolated() {
        let seen = Rc::new(RefCell::new(0));
        let mut bus = EventBus::new();

        bus.subscribe_all(|_| Err(ListenerError::new("display offline")));
        bus.subscribe_all(|_| panic!("listener bug"));
        let count = seen.clone();
        bus.subscribe_all(move |_| {
            *count.borrow_mut() += 1;
            Ok(())
        });

        assert_eq!(bus.publish(&progress(50.0)), 2);
        assert_eq!(*seen.borrow(), 1);
        assert_eq!(bus.len(), 3);
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let json = serde_json::to_value(progress(25.0)).unwrap();
        assert_eq!(json["event"], "progress_updated");
        assert_eq!(json["percent"], 25.0);
    }
}
