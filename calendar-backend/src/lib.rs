//! Work/off-day calendar with per-day notes, served as a JSON API.

use actix_web::web;
use std::sync::Arc;
use std::time::Instant;

pub mod config;
pub mod controllers;
pub mod db;
pub mod error;
pub mod models;
pub mod seeder;

use config::Config;
use db::Database;

pub struct AppState {
    pub db: Arc<Database>,
    pub config: Config,
    /// Server start time for uptime calculation
    pub started_at: Instant,
}

impl AppState {
    pub fn new(db: Arc<Database>, config: Config) -> Self {
        Self {
            db,
            config,
            started_at: Instant::now(),
        }
    }
}

/// Register every controller's routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(controllers::extractor_config)
        .configure(controllers::health::config)
        .configure(controllers::calendar_days::config)
        .configure(controllers::notes::config)
        .configure(controllers::seed::config);
}
