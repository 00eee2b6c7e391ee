//! backstop - Catcher training coach
//!
//! Skills assessment → weakest-area practice plan → guided session

pub mod assessment;
pub mod config;
pub mod drills;
pub mod error;
pub mod session;
pub mod skills;
pub mod tips;
pub mod workout;

pub use assessment::{Assessment, AssessmentAnalyzer, RawAssessment};
pub use config::CoachConfig;
pub use session::{Session, SessionExecutor};
pub use skills::{Category, SkillCode, SkillScores};
pub use workout::{GenerationRequest, WorkoutGenerator, WorkoutPlan};
