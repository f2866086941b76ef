//! Notes REST API.
//!
//! Mutations answer with `303 See Other` pointing at the notes of the day the
//! note belongs to (or at the full list for unattached notes).

use actix_web::{web, HttpResponse};

use super::see_other;
use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::models::{ListNotesResponse, Note, NoteRequest};
use crate::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/notes")
            .route(web::get().to(list_notes))
            .route(web::post().to(create_note)),
    )
    .service(
        web::resource("/api/notes/{id}")
            .route(web::get().to(get_note))
            .route(web::put().to(update_note))
            .route(web::delete().to(delete_note)),
    )
    .service(web::resource("/api/days/{day_id}/notes").route(web::get().to(list_day_notes)));
}

/// Where a client lands after changing `note`
fn notes_location(note: &Note) -> String {
    match note.day_id {
        Some(day_id) => format!("/api/days/{}/notes", day_id),
        None => "/api/notes".to_string(),
    }
}

/// Resolve the request's target day to an id; `day_id` takes precedence over `date`
fn resolve_day(db: &Database, req: &NoteRequest) -> AppResult<Option<i64>> {
    if let Some(day_id) = req.day_id {
        return match db.get_calendar_day(day_id)? {
            Some(day) => Ok(Some(day.id)),
            None => Err(AppError::validation(format!("Calendar day {} does not exist", day_id))),
        };
    }

    if let Some(date) = req.date {
        return match db.get_calendar_day_by_date(date)? {
            Some(day) => Ok(Some(day.id)),
            None => Err(AppError::validation(format!("No calendar day for {}", date))),
        };
    }

    Ok(None)
}

fn validate_text(req: &NoteRequest) -> AppResult<&str> {
    if req.text.trim().is_empty() {
        return Err(AppError::validation("Note text is required"));
    }
    Ok(&req.text)
}

async fn list_notes(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let notes = state.db.list_notes()?;

    Ok(HttpResponse::Ok().json(ListNotesResponse {
        day: None,
        total: notes.len(),
        notes,
    }))
}

/// Notes of one day; an unknown day is a 404, not an empty list
async fn list_day_notes(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let day_id = path.into_inner();

    let day = state
        .db
        .get_calendar_day(day_id)?
        .ok_or_else(|| AppError::not_found(format!("Calendar day {}", day_id)))?;
    let notes = state.db.list_notes_for_day(day.id)?;

    Ok(HttpResponse::Ok().json(ListNotesResponse {
        day: Some(day),
        total: notes.len(),
        notes,
    }))
}

async fn get_note(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    match state.db.get_note(id)? {
        Some(note) => Ok(HttpResponse::Ok().json(note)),
        None => Err(AppError::not_found(format!("Note {}", id))),
    }
}

async fn create_note(
    state: web::Data<AppState>,
    body: web::Json<NoteRequest>,
) -> AppResult<HttpResponse> {
    let request = body.into_inner();
    let text = validate_text(&request)?;
    let day_id = resolve_day(&state.db, &request)?;

    let note = state.db.create_note(day_id, text)?;
    log::info!("Created note {} (day {:?})", note.id, note.day_id);

    Ok(see_other(&notes_location(&note), &note))
}

async fn update_note(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<NoteRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let request = body.into_inner();
    let text = validate_text(&request)?;
    let day_id = resolve_day(&state.db, &request)?;

    let note = state
        .db
        .update_note(id, day_id, text)?
        .ok_or_else(|| AppError::not_found(format!("Note {}", id)))?;
    log::info!("Updated note {}", note.id);

    Ok(see_other(&notes_location(&note), &note))
}

async fn delete_note(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let note = state
        .db
        .delete_note(id)?
        .ok_or_else(|| AppError::not_found(format!("Note {}", id)))?;
    log::info!("Deleted note {}", note.id);

    Ok(see_other(&notes_location(&note), &note))
}
