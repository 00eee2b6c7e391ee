//! Error taxonomy for the analyze → generate → execute pipeline

use serde::Serialize;

use crate::skills::Category;

/// One specific problem with a submitted assessment
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationProblem {
    #[error("missing score for {code}")]
    Missing { code: String },

    #[error("{code} is not a whole number: {raw}")]
    NotNumeric { code: String, raw: String },

    #[error("{code} must be between 1 and 10, got {value}")]
    OutOfRange { code: String, value: i64 },

    #[error("scores look suspiciously uniform: {count} of 13 are {value}")]
    SuspiciouslyUniform { value: u8, count: usize },

    #[error("every score sits at an extreme (1 or 10), please rate each skill individually")]
    ExtremesOnly,
}

/// Malformed, incomplete or implausible assessment input. Lists every problem.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid assessment: {}", join_problems(.problems))]
pub struct ValidationError {
    pub problems: Vec<ValidationProblem>,
}

fn join_problems(problems: &[ValidationProblem]) -> String {
    problems
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failure while assembling a workout plan
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerationError {
    #[error("duration must be between 1 and 1440 minutes, got {0}")]
    InvalidDuration(u32),

    #[error("no drills available for {0}")]
    NoDrills(Category),

    #[error("generated plan has no phases")]
    EmptyPlan,
}

/// Operation attempted with no active target or in the wrong state
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("No active session")]
    NoActiveSession,

    #[error("No active drill")]
    NoActiveDrill,

    #[error("Session already started")]
    AlreadyStarted,

    #[error("Session is not paused")]
    NotPaused,

    #[error("Session is not in progress")]
    NotInProgress,

    #[error("Session is paused")]
    Paused,

    #[error("Workout plan has no phases")]
    EmptyPlan,

    #[error("Session is already complete")]
    Finalized,
}

/// A host callback failed. Never propagates into the executor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("listener failed: {0}")]
pub struct ListenerError(pub String);

impl ListenerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_lists_every_problem() {
        let err = ValidationError {
            problems: vec![
                ValidationProblem::Missing { code: "blocking_overall".into() },
                ValidationProblem::OutOfRange { code: "throwing_accuracy".into(), value: 12 },
            ],
        };
        let message = err.to_string();
        assert!(message.contains("missing score for blocking_overall"));
        assert!(message.contains("throwing_accuracy must be between 1 and 10, got 12"));
    }

    #[test]
    fn test_uniform_message() {
        let problem = ValidationProblem::SuspiciouslyUniform { value: 7, count: 11 };
        assert!(problem.to_string().contains("suspiciously uniform"));
    }

    #[test]
    fn test_session_error_messages_are_short() {
        assert_eq!(SessionError::NoActiveSession.to_string(), "No active session");
        assert_eq!(SessionError::NoActiveDrill.to_string(), "No active drill");
    }
}
