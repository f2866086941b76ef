mod calendar_day;
mod note;

pub use calendar_day::{CalendarDay, DayType, ListDaysQuery, ListDaysResponse};
pub use note::{ListNotesResponse, Note, NoteRequest};
