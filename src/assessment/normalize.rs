//! Raw score normalization - the single place the default policy lives

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::AnalyzerThresholds;
use crate::error::{ValidationError, ValidationProblem};
use crate::skills::{SkillCode, SkillScores, MAX_SCORE, MIN_SCORE, NEUTRAL_SCORE};

/// Non-fatal pattern flags attached to a valid assessment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WarningFlag {
    HighConfidencePattern,
    LowConfidencePattern,
}

/// Scores that passed validation, with any warnings
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedScores {
    pub scores: SkillScores,
    pub warnings: Vec<WarningFlag>,
}

/// What a raw value turned out to be
#[derive(Debug, Clone, PartialEq)]
enum RawScore {
    Whole(i64),
    NotNumeric(String),
    Missing,
}

fn read_score(value: Option<&Value>) -> RawScore {
    match value {
        None | Some(Value::Null) => RawScore::Missing,
        Some(Value::Number(n)) => {
            if let Some(v) = n.as_i64() {
                RawScore::Whole(v)
            } else {
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                        RawScore::Whole(f as i64)
                    }
                    _ => RawScore::NotNumeric(n.to_string()),
                }
            }
        }
        Some(Value::String(s)) => match s.trim().parse::<i64>() {
            Ok(v) => RawScore::Whole(v),
            Err(_) => RawScore::NotNumeric(s.clone()),
        },
        Some(other) => RawScore::NotNumeric(other.to_string()),
    }
}

/// Coerce every skill to a score, substituting the neutral 5 for anything
/// missing or unreadable and clamping out-of-range values. Never fails.
pub fn coerce_or_default(raw: &BTreeMap<String, Value>) -> SkillScores {
    let mut scores = SkillScores::uniform(NEUTRAL_SCORE);
    for skill in SkillCode::all() {
        if let RawScore::Whole(v) = read_score(raw.get(skill.code())) {
            scores.set(*skill, v.clamp(MIN_SCORE as i64, MAX_SCORE as i64) as u8);
        }
    }
    scores
}

/// Strict validation. Reports every missing, unreadable and out-of-range
/// score, then rejects implausible patterns.
pub fn validate(
    raw: &BTreeMap<String, Value>,
    thresholds: &AnalyzerThresholds,
) -> Result<ValidatedScores, ValidationError> {
    let mut problems = Vec::new();
    let mut scores = SkillScores::uniform(NEUTRAL_SCORE);

    for skill in SkillCode::all() {
        let code = skill.code().to_string();
        match read_score(raw.get(skill.code())) {
            RawScore::Missing => problems.push(ValidationProblem::Missing { code }),
            RawScore::NotNumeric(raw) => {
                problems.push(ValidationProblem::NotNumeric { code, raw })
            }
            RawScore::Whole(value) if !(MIN_SCORE as i64..=MAX_SCORE as i64).contains(&value) => {
                problems.push(ValidationProblem::OutOfRange { code, value })
            }
            RawScore::Whole(value) => scores.set(*skill, value as u8),
        }
    }

    for key in raw.keys() {
        if SkillCode::from_code(key).is_none() {
            debug!("Ignoring unknown skill code in assessment: {}", key);
        }
    }

    if !problems.is_empty() {
        return Err(ValidationError { problems });
    }

    problems.extend(plausibility_problems(&scores, thresholds));
    if !problems.is_empty() {
        return Err(ValidationError { problems });
    }

    Ok(ValidatedScores { warnings: warning_flags(&scores, thresholds), scores })
}

fn plausibility_problems(
    scores: &SkillScores,
    thresholds: &AnalyzerThresholds,
) -> Vec<ValidationProblem> {
    let mut problems = Vec::new();

    let mut counts: HashMap<u8, usize> = HashMap::new();
    for score in scores.values() {
        *counts.entry(*score).or_insert(0) += 1;
    }
    // Lowest value wins a frequency tie so the message is deterministic
    let most_common = counts
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
        .map(|(value, count)| (*value, *count));

    if let Some((value, count)) = most_common
        && count >= thresholds.uniform_count
    {
        problems.push(ValidationProblem::SuspiciouslyUniform { value, count });
    }

    if scores.values().iter().all(|s| *s == MIN_SCORE || *s == MAX_SCORE) {
        problems.push(ValidationProblem::ExtremesOnly);
    }

    problems
}

fn warning_flags(scores: &SkillScores, thresholds: &AnalyzerThresholds) -> Vec<WarningFlag> {
    let total = scores.values().len() as f64;
    let high = scores.values().iter().filter(|s| **s >= 8).count() as f64;
    let low = scores.values().iter().filter(|s| **s <= 4).count() as f64;

    let mut flags = Vec::new();
    if high / total > thresholds.high_pattern_ratio {
        flags.push(WarningFlag::HighConfidencePattern);
    }
    if low / total > thresholds.low_pattern_ratio {
        flags.push(WarningFlag::LowConfidencePattern);
    }
    flags
}
