use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Free-text note attached to a calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub day_id: Option<i64>,
    /// Date of the referenced day, joined in on read
    pub date: Option<NaiveDate>,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of create and update requests.
///
/// The target day is given either by `day_id` or by `date`; `day_id` wins
/// when both are present. Neither leaves the note unattached.
#[derive(Debug, Clone, Deserialize)]
pub struct NoteRequest {
    pub day_id: Option<i64>,
    pub date: Option<NaiveDate>,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ListNotesResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<super::CalendarDay>,
    pub notes: Vec<Note>,
    pub total: usize,
}
