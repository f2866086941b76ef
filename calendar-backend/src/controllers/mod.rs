pub mod calendar_days;
pub mod health;
pub mod notes;
pub mod seed;

use actix_web::http::header;
use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::error::AppError;

/// Route extractor failures (bad JSON bodies, path ids, query strings) through
/// `AppError` so they get the same `{ "error": ... }` body as handler errors
pub fn extractor_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::validation(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::validation(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|_err, req| AppError::not_found(req.path().to_string()).into()),
    );
}

/// `303 See Other` pointing at `location`, carrying the affected resource
pub(crate) fn see_other<T: Serialize>(location: &str, body: &T) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .json(body)
}
