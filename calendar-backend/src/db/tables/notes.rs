//! Note database operations

use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};

use crate::db::sqlite::{parse_date, parse_timestamp};
use crate::db::Database;
use crate::error::AppResult;
use crate::models::Note;

const NOTE_SELECT: &str = "SELECT n.id, n.day_id, c.date, n.text, n.created_at, n.updated_at
     FROM notes n
     LEFT JOIN calendar_days c ON c.id = n.day_id";

fn row_to_note(row: &Row) -> rusqlite::Result<Note> {
    let date_str: Option<String> = row.get(2)?;
    let created_at_str: String = row.get(4)?;
    let updated_at_str: String = row.get(5)?;

    Ok(Note {
        id: row.get(0)?,
        day_id: row.get(1)?,
        date: date_str.as_deref().map(|s| parse_date(2, s)).transpose()?,
        text: row.get(3)?,
        created_at: parse_timestamp(4, &created_at_str)?,
        updated_at: parse_timestamp(5, &updated_at_str)?,
    })
}

impl Database {
    pub fn create_note(&self, day_id: Option<i64>, text: &str) -> AppResult<Note> {
        let conn = self.conn()?;
        let now = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO notes (day_id, text, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
            params![day_id, text, &now],
        )?;
        let id = conn.last_insert_rowid();

        let note = conn.query_row(
            &format!("{} WHERE n.id = ?1", NOTE_SELECT),
            params![id],
            row_to_note,
        )?;
        Ok(note)
    }

    pub fn get_note(&self, id: i64) -> AppResult<Option<Note>> {
        let conn = self.conn()?;
        let note = conn
            .query_row(
                &format!("{} WHERE n.id = ?1", NOTE_SELECT),
                params![id],
                row_to_note,
            )
            .optional()?;
        Ok(note)
    }

    pub fn list_notes(&self) -> AppResult<Vec<Note>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("{} ORDER BY n.id ASC", NOTE_SELECT))?;
        let notes = stmt
            .query_map([], row_to_note)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(notes)
    }

    /// Notes attached to one day, in creation order
    pub fn list_notes_for_day(&self, day_id: i64) -> AppResult<Vec<Note>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE n.day_id = ?1 ORDER BY n.id ASC",
            NOTE_SELECT
        ))?;
        let notes = stmt
            .query_map(params![day_id], row_to_note)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(notes)
    }

    /// Replace a note's day and text; `created_at` is left untouched
    pub fn update_note(&self, id: i64, day_id: Option<i64>, text: &str) -> AppResult<Option<Note>> {
        let conn = self.conn()?;
        let now = Utc::now().to_rfc3339();

        let count = conn.execute(
            "UPDATE notes SET day_id = ?1, text = ?2, updated_at = ?3 WHERE id = ?4",
            params![day_id, text, &now, id],
        )?;
        drop(conn);

        if count == 0 {
            return Ok(None);
        }
        self.get_note(id)
    }

    /// Delete a note, returning it so callers know which day it belonged to
    pub fn delete_note(&self, id: i64) -> AppResult<Option<Note>> {
        let Some(note) = self.get_note(id)? else {
            return Ok(None);
        };

        let conn = self.conn()?;
        conn.execute("DELETE FROM notes WHERE id = ?1", params![id])?;
        Ok(Some(note))
    }
}
