// src/lint/cron.rs

//! Cron schedule syntax checks.
//!
//! Accepted forms:
//! - five fields: `minute hour day-of-month month day-of-week`
//! - six fields: a leading `second` field followed by the five above
//! - descriptors: `@yearly`, `@annually`, `@monthly`, `@weekly`, `@daily`,
//!   `@midnight`, `@hourly`
//! - the bare words `hourly`, `daily`, `weekly`, `monthly`
//!
//! Each field is a comma-separated list of `*`, `N`, `N-M`, optionally
//! followed by `/STEP`. Months and weekdays also take three-letter names, and
//! day-of-month / day-of-week accept `?`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CronError {
    #[error("empty schedule")]
    Empty,

    #[error("expected 5 or 6 fields, found {0}")]
    FieldCount(usize),

    #[error("unrecognized descriptor: {0}")]
    UnknownDescriptor(String),

    #[error("invalid value '{value}' in {field} field")]
    InvalidValue { field: &'static str, value: String },

    #[error("value {value} out of range [{min}, {max}] in {field} field")]
    OutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error("invalid step '{step}' in {field} field")]
    InvalidStep { field: &'static str, step: String },

    #[error("range {start}-{end} is reversed in {field} field")]
    ReversedRange {
        field: &'static str,
        start: u32,
        end: u32,
    },
}

struct FieldSpec {
    name: &'static str,
    min: u32,
    max: u32,
    names: &'static [&'static str],
    allows_question: bool,
}

const MONTH_NAMES: &[&str] = &[
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];
const DAY_NAMES: &[&str] = &["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

const SECOND: FieldSpec = FieldSpec {
    name: "second",
    min: 0,
    max: 59,
    names: &[],
    allows_question: false,
};
const MINUTE: FieldSpec = FieldSpec {
    name: "minute",
    min: 0,
    max: 59,
    names: &[],
    allows_question: false,
};
const HOUR: FieldSpec = FieldSpec {
    name: "hour",
    min: 0,
    max: 23,
    names: &[],
    allows_question: false,
};
const DAY_OF_MONTH: FieldSpec = FieldSpec {
    name: "day-of-month",
    min: 1,
    max: 31,
    names: &[],
    allows_question: true,
};
const MONTH: FieldSpec = FieldSpec {
    name: "month",
    min: 1,
    max: 12,
    names: MONTH_NAMES,
    allows_question: false,
};
const DAY_OF_WEEK: FieldSpec = FieldSpec {
    name: "day-of-week",
    min: 0,
    max: 6,
    names: DAY_NAMES,
    allows_question: true,
};

const FIVE_FIELDS: &[&FieldSpec] = &[&MINUTE, &HOUR, &DAY_OF_MONTH, &MONTH, &DAY_OF_WEEK];
const SIX_FIELDS: &[&FieldSpec] = &[&SECOND, &MINUTE, &HOUR, &DAY_OF_MONTH, &MONTH, &DAY_OF_WEEK];

const DESCRIPTORS: &[&str] = &[
    "@yearly",
    "@annually",
    "@monthly",
    "@weekly",
    "@daily",
    "@midnight",
    "@hourly",
];

const SHORTHANDS: &[&str] = &["hourly", "daily", "weekly", "monthly"];

/// Check that `schedule` is a valid cron expression.
pub fn parse_schedule(schedule: &str) -> Result<(), CronError> {
    let schedule = schedule.trim();
    if schedule.is_empty() {
        return Err(CronError::Empty);
    }

    if SHORTHANDS.contains(&schedule) {
        return Ok(());
    }

    if schedule.starts_with('@') {
        return if DESCRIPTORS.contains(&schedule) {
            Ok(())
        } else {
            Err(CronError::UnknownDescriptor(schedule.to_string()))
        };
    }

    let fields: Vec<&str> = schedule.split_whitespace().collect();
    let specs: &[&FieldSpec] = match fields.len() {
        5 => FIVE_FIELDS,
        6 => SIX_FIELDS,
        n => return Err(CronError::FieldCount(n)),
    };

    for (field, spec) in fields.iter().zip(specs) {
        parse_field(field, spec)?;
    }

    Ok(())
}

fn parse_field(field: &str, spec: &FieldSpec) -> Result<(), CronError> {
    if spec.allows_question && field == "?" {
        return Ok(());
    }

    for part in field.split(',') {
        parse_range(part, spec)?;
    }

    Ok(())
}

fn parse_range(part: &str, spec: &FieldSpec) -> Result<(), CronError> {
    let (range, step) = match part.split_once('/') {
        Some((range, step)) => (range, Some(step)),
        None => (part, None),
    };

    if let Some(step) = step {
        match step.parse::<u32>() {
            Ok(s) if s >= 1 => {}
            _ => {
                return Err(CronError::InvalidStep {
                    field: spec.name,
                    step: step.to_string(),
                });
            }
        }
    }

    if range == "*" {
        return Ok(());
    }

    match range.split_once('-') {
        Some((start, end)) => {
            let start = parse_value(start, spec)?;
            let end = parse_value(end, spec)?;
            if start > end {
                return Err(CronError::ReversedRange {
                    field: spec.name,
                    start,
                    end,
                });
            }
        }
        None => {
            parse_value(range, spec)?;
        }
    }

    Ok(())
}

fn parse_value(raw: &str, spec: &FieldSpec) -> Result<u32, CronError> {
    let upper = raw.to_ascii_uppercase();
    if let Some(pos) = spec.names.iter().position(|n| *n == upper) {
        // Month names are 1-based, weekday names 0-based.
        return Ok(pos as u32 + spec.min);
    }

    let value: u32 = raw.parse().map_err(|_| CronError::InvalidValue {
        field: spec.name,
        value: raw.to_string(),
    })?;

    if value < spec.min || value > spec.max {
        return Err(CronError::OutOfRange {
            field: spec.name,
            value,
            min: spec.min,
            max: spec.max,
        });
    }

    Ok(value)
}
