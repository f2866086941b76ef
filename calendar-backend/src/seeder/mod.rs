//! Calendar seeding: builds one year of calendar days from a schedule document.

mod fill;
mod schedule;

pub use fill::{CalendarSeeder, CalendarStore, OffDayMode, SeedConfig, SeedReport};
pub use schedule::{MonthEntry, MonthValue, ScheduleDocument, ScheduleError};
