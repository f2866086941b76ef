use actix_web::{web, HttpResponse};

use crate::error::AppResult;
use crate::AppState;

/// Version from Cargo.toml, available at compile time
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/health").route(web::get().to(health_check)));
}

async fn health_check(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let calendar_days = state.db.count_calendar_days()?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "version": VERSION,
        "uptime_secs": state.started_at.elapsed().as_secs(),
        "calendar_days": calendar_days,
        "target_year": state.config.seed.target_year,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::test_support::test_state;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn test_health_reports_version() {
        let (_dir, state) = test_state();
        let app = test::init_service(App::new().app_data(state).configure(config)).await;

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], VERSION);
        assert_eq!(body["calendar_days"], 0);
        assert_eq!(body["target_year"], 2023);
    }
}
