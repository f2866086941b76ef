//! Calendar day database operations

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};

use crate::db::sqlite::parse_date;
use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::models::{CalendarDay, DayType};

const DAY_COLUMNS: &str = "id, date, day_type";

fn row_to_calendar_day(row: &Row) -> rusqlite::Result<CalendarDay> {
    let date_str: String = row.get(1)?;
    let day_type_str: String = row.get(2)?;

    let day_type = DayType::from_str(&day_type_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            format!("unknown day type '{}'", day_type_str).into(),
        )
    })?;

    Ok(CalendarDay {
        id: row.get(0)?,
        date: parse_date(1, &date_str)?,
        day_type,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

impl Database {
    /// Insert a day; a second insert for the same date is rejected
    pub fn create_calendar_day(&self, date: NaiveDate, day_type: DayType) -> AppResult<CalendarDay> {
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO calendar_days (date, day_type) VALUES (?1, ?2)",
            params![date.to_string(), day_type.as_str()],
        )
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::DuplicateDate(date)
            } else {
                AppError::Database(e)
            }
        })?;

        Ok(CalendarDay {
            id: conn.last_insert_rowid(),
            date,
            day_type,
        })
    }

    pub fn get_calendar_day(&self, id: i64) -> AppResult<Option<CalendarDay>> {
        let conn = self.conn()?;
        let day = conn
            .query_row(
                &format!("SELECT {} FROM calendar_days WHERE id = ?1", DAY_COLUMNS),
                params![id],
                row_to_calendar_day,
            )
            .optional()?;
        Ok(day)
    }

    pub fn get_calendar_day_by_date(&self, date: NaiveDate) -> AppResult<Option<CalendarDay>> {
        let conn = self.conn()?;
        let day = conn
            .query_row(
                &format!("SELECT {} FROM calendar_days WHERE date = ?1", DAY_COLUMNS),
                params![date.to_string()],
                row_to_calendar_day,
            )
            .optional()?;
        Ok(day)
    }

    /// All days, oldest first
    pub fn list_calendar_days(&self) -> AppResult<Vec<CalendarDay>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM calendar_days ORDER BY date ASC",
            DAY_COLUMNS
        ))?;
        let days = stmt
            .query_map([], row_to_calendar_day)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(days)
    }

    /// Days between `from` and `to` inclusive, oldest first
    pub fn list_calendar_days_in_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<CalendarDay>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM calendar_days WHERE date >= ?1 AND date <= ?2 ORDER BY date ASC",
            DAY_COLUMNS
        ))?;
        let days = stmt
            .query_map(params![from.to_string(), to.to_string()], row_to_calendar_day)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(days)
    }

    /// Change the classification of an existing day. Returns false if the id is unknown.
    pub fn set_calendar_day_type(&self, id: i64, day_type: DayType) -> AppResult<bool> {
        let conn = self.conn()?;
        let count = conn.execute(
            "UPDATE calendar_days SET day_type = ?1 WHERE id = ?2",
            params![day_type.as_str(), id],
        )?;
        Ok(count > 0)
    }

    /// Delete a day together with every note that references it
    pub fn delete_calendar_day(&self, id: i64) -> AppResult<bool> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let notes_removed = tx.execute("DELETE FROM notes WHERE day_id = ?1", params![id])?;
        let count = tx.execute("DELETE FROM calendar_days WHERE id = ?1", params![id])?;
        tx.commit()?;

        if count > 0 {
            log::info!("Deleted calendar day {} and {} note(s)", id, notes_removed);
        }
        Ok(count > 0)
    }

    pub fn count_calendar_days(&self) -> AppResult<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM calendar_days", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::test_db;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_create_and_lookup() {
        let (_dir, db) = test_db();
        let day = db.create_calendar_day(ymd(2023, 1, 2), DayType::OffDay).unwrap();

        assert_eq!(db.get_calendar_day(day.id).unwrap(), Some(day.clone()));
        assert_eq!(db.get_calendar_day_by_date(ymd(2023, 1, 2)).unwrap(), Some(day));
        assert_eq!(db.get_calendar_day_by_date(ymd(2023, 1, 3)).unwrap(), None);
        assert_eq!(db.get_calendar_day(999).unwrap(), None);
    }

    #[test]
    fn test_duplicate_date_rejected() {
        let (_dir, db) = test_db();
        db.create_calendar_day(ymd(2023, 5, 1), DayType::OffDay).unwrap();

        let err = db.create_calendar_day(ymd(2023, 5, 1), DayType::WorkDay).unwrap_err();
        assert!(matches!(err, AppError::DuplicateDate(d) if d == ymd(2023, 5, 1)));
        assert_eq!(db.count_calendar_days().unwrap(), 1);
    }

    #[test]
    fn test_list_is_ordered_by_date() {
        let (_dir, db) = test_db();
        db.create_calendar_day(ymd(2023, 3, 8), DayType::OffDay).unwrap();
        db.create_calendar_day(ymd(2022, 12, 31), DayType::WorkDay).unwrap();
        db.create_calendar_day(ymd(2023, 1, 1), DayType::OffDay).unwrap();

        let dates: Vec<NaiveDate> = db.list_calendar_days().unwrap().into_iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![ymd(2022, 12, 31), ymd(2023, 1, 1), ymd(2023, 3, 8)]);
    }

    #[test]
    fn test_list_in_range_is_inclusive() {
        let (_dir, db) = test_db();
        for day in 1..=5 {
            db.create_calendar_day(ymd(2023, 2, day), DayType::WorkDay).unwrap();
        }

        let days = db.list_calendar_days_in_range(ymd(2023, 2, 2), ymd(2023, 2, 4)).unwrap();
        assert_eq!(days.len(), 3);
        assert_eq!(days[0].date, ymd(2023, 2, 2));
        assert_eq!(days[2].date, ymd(2023, 2, 4));
    }

    #[test]
    fn test_set_day_type() {
        let (_dir, db) = test_db();
        let day = db.create_calendar_day(ymd(2023, 6, 12), DayType::WorkDay).unwrap();

        assert!(db.set_calendar_day_type(day.id, DayType::OffDay).unwrap());
        assert_eq!(db.get_calendar_day(day.id).unwrap().unwrap().day_type, DayType::OffDay);
        assert!(!db.set_calendar_day_type(day.id + 100, DayType::OffDay).unwrap());
    }

    #[test]
    fn test_delete_cascades_to_notes() {
        let (_dir, db) = test_db();
        let day = db.create_calendar_day(ymd(2023, 1, 9), DayType::WorkDay).unwrap();
        let other = db.create_calendar_day(ymd(2023, 1, 10), DayType::WorkDay).unwrap();
        let first = db.create_note(Some(day.id), "standup").unwrap();
        let second = db.create_note(Some(day.id), "retro").unwrap();
        let kept = db.create_note(Some(other.id), "planning").unwrap();

        assert!(db.delete_calendar_day(day.id).unwrap());

        assert_eq!(db.get_calendar_day(day.id).unwrap(), None);
        assert_eq!(db.get_note(first.id).unwrap(), None);
        assert_eq!(db.get_note(second.id).unwrap(), None);
        assert!(db.get_note(kept.id).unwrap().is_some());
        assert!(!db.delete_calendar_day(day.id).unwrap());
    }
}
