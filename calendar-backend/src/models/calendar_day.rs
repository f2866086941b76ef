use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Classification of a calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayType {
    WorkDay,
    OffDay,
}

impl DayType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayType::WorkDay => "work_day",
            DayType::OffDay => "off_day",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "work_day" | "work" => Some(DayType::WorkDay),
            "off_day" | "off" => Some(DayType::OffDay),
            _ => None,
        }
    }
}

impl Default for DayType {
    fn default() -> Self {
        DayType::WorkDay
    }
}

/// One date of the calendar with its work/off classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub id: i64,
    pub date: NaiveDate,
    pub day_type: DayType,
}

/// Optional `?year=&month=` filter for the day listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListDaysQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// Day listing with per-type totals
#[derive(Debug, Serialize)]
pub struct ListDaysResponse {
    pub days: Vec<CalendarDay>,
    pub total: usize,
    pub work_days: usize,
    pub off_days: usize,
}

impl ListDaysResponse {
    pub fn new(days: Vec<CalendarDay>) -> Self {
        let off_days = days.iter().filter(|d| d.day_type == DayType::OffDay).count();
        Self {
            total: days.len(),
            work_days: days.len() - off_days,
            off_days,
            days,
        }
    }
}
