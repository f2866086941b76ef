//! Calendar day listing (the home view), detail and delete.

use actix_web::http::header;
use actix_web::{web, HttpResponse};
use chrono::NaiveDate;

use crate::error::{AppError, AppResult};
use crate::models::{ListDaysQuery, ListDaysResponse};
use crate::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(home)))
        .service(web::resource("/api/days").route(web::get().to(list_days)))
        .service(
            web::resource("/api/days/{id}")
                .route(web::get().to(get_day))
                .route(web::delete().to(delete_day)),
        );
}

async fn home() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, "/api/days"))
        .finish()
}

/// First and last date of a year, or of one month of it
fn date_bounds(year: i32, month: Option<u32>) -> Option<(NaiveDate, NaiveDate)> {
    match month {
        Some(m) => {
            let first = NaiveDate::from_ymd_opt(year, m, 1)?;
            let next = if m == 12 {
                NaiveDate::from_ymd_opt(year + 1, 1, 1)?
            } else {
                NaiveDate::from_ymd_opt(year, m + 1, 1)?
            };
            Some((first, next.pred_opt()?))
        }
        None => Some((
            NaiveDate::from_ymd_opt(year, 1, 1)?,
            NaiveDate::from_ymd_opt(year, 12, 31)?,
        )),
    }
}

/// List days in ascending date order, optionally narrowed to a year or month
async fn list_days(
    state: web::Data<AppState>,
    query: web::Query<ListDaysQuery>,
) -> AppResult<HttpResponse> {
    let days = match (query.year, query.month) {
        (None, None) => state.db.list_calendar_days()?,
        (None, Some(_)) => {
            return Err(AppError::validation("month filter requires a year"));
        }
        (Some(year), month) => {
            let (from, to) = date_bounds(year, month).ok_or_else(|| {
                AppError::validation(format!("invalid year/month filter: {:?}/{:?}", year, month))
            })?;
            state.db.list_calendar_days_in_range(from, to)?
        }
    };

    Ok(HttpResponse::Ok().json(ListDaysResponse::new(days)))
}

async fn get_day(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    match state.db.get_calendar_day(id)? {
        Some(day) => Ok(HttpResponse::Ok().json(day)),
        None => Err(AppError::not_found(format!("Calendar day {}", id))),
    }
}

/// Delete a day and, with it, all of its notes
async fn delete_day(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    if !state.db.delete_calendar_day(id)? {
        return Err(AppError::not_found(format!("Calendar day {}", id)));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "id": id
    })))
}
