//! Administrative calendar fill endpoints.

use actix_web::{web, HttpResponse};

use super::see_other;
use crate::error::AppResult;
use crate::seeder::CalendarSeeder;
use crate::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/calendar")
            .route("/fill", web::post().to(fill_calendar))
            .route("/backfill", web::post().to(backfill_calendar)),
    );
}

/// Seed the target year from the configured schedule, then send the client to the day listing
async fn fill_calendar(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let seeder = CalendarSeeder::new(&*state.db, &state.config.seed);
    let report = seeder.seed_from_file(&state.config.schedule_path)?;

    Ok(see_other("/api/days", &report))
}

/// Only the backfill pass; safe to repeat
async fn backfill_calendar(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let seeder = CalendarSeeder::new(&*state.db, &state.config.seed);
    let report = seeder.backfill_report()?;

    Ok(see_other("/api/days", &report))
}
