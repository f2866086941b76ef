//! Schedule document: the JSON list of designated off days per month.
//!
//! ```json
//! { "months": [ { "month": 1, "days": "1,2,3,7,8" }, { "month": 2, "days": "22*,23,24+" } ] }
//! ```
//!
//! Day tokens may carry annotation markers (`*`, `+`) which are stripped
//! before parsing. Unknown top-level keys are ignored.

use chrono::NaiveDate;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid month '{0}'")]
    InvalidMonth(String),

    #[error("invalid day '{token}' in month {month}")]
    InvalidDay { month: u32, token: String },

    #[error("{year}-{month:02}-{day:02} is not a calendar date")]
    InvalidDate { year: i32, month: u32, day: u32 },
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleDocument {
    pub months: Vec<MonthEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonthEntry {
    pub month: MonthValue,
    pub days: String,
}

/// Month numbers show up both as JSON integers and as numeric strings
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MonthValue {
    Number(i64),
    Text(String),
}

impl MonthValue {
    pub fn number(&self) -> Result<u32, ScheduleError> {
        let parsed = match self {
            MonthValue::Number(n) => u32::try_from(*n).ok(),
            MonthValue::Text(s) => s.trim().parse::<u32>().ok(),
        };
        match parsed {
            Some(m) if (1..=12).contains(&m) => Ok(m),
            _ => Err(ScheduleError::InvalidMonth(match self {
                MonthValue::Number(n) => n.to_string(),
                MonthValue::Text(s) => s.clone(),
            })),
        }
    }
}

impl MonthEntry {
    /// Day-of-month numbers listed for this month, annotations stripped.
    /// Empty tokens (trailing commas, an empty list) are skipped.
    pub fn day_numbers(&self, annotation_chars: &str) -> Result<Vec<u32>, ScheduleError> {
        let month = self.month.number()?;
        let cleaned: String = self
            .days
            .chars()
            .filter(|c| !annotation_chars.contains(*c))
            .collect();

        cleaned
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| {
                token.parse::<u32>().map_err(|_| ScheduleError::InvalidDay {
                    month,
                    token: token.to_string(),
                })
            })
            .collect()
    }
}

impl ScheduleDocument {
    pub fn from_json(raw: &str) -> Result<Self, ScheduleError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self, ScheduleError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ScheduleError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Every off day of the document resolved against `year`, in document order.
    /// Fails on the first bad token; nothing is returned partially.
    pub fn off_days(&self, year: i32, annotation_chars: &str) -> Result<Vec<NaiveDate>, ScheduleError> {
        let mut dates = Vec::new();
        for entry in &self.months {
            let month = entry.month.number()?;
            for day in entry.day_numbers(annotation_chars)? {
                let date = NaiveDate::from_ymd_opt(year, month, day)
                    .ok_or(ScheduleError::InvalidDate { year, month, day })?;
                dates.push(date);
            }
        }
        Ok(dates)
    }
}
