//! One-shot calendar fill against the configured database.
//!
//! Uses the same environment as the server (`DATABASE_URL`,
//! `CALENDAR_SCHEDULE_PATH`, `CALENDAR_TARGET_YEAR`, ...). Pass
//! `--backfill-only` to skip the schedule and only create missing days.

use dotenv::dotenv;
use std::process::ExitCode;

use calendar_backend::config::Config;
use calendar_backend::db::Database;
use calendar_backend::error::AppResult;
use calendar_backend::seeder::{CalendarSeeder, SeedReport};

fn run(backfill_only: bool) -> AppResult<SeedReport> {
    let config = Config::from_env()?;
    let db = Database::with_pool_size(&config.database_url, config.database_pool_size)?;
    let seeder = CalendarSeeder::new(&db, &config.seed);

    if backfill_only {
        seeder.backfill_report()
    } else {
        seeder.seed_from_file(&config.schedule_path)
    }
}

fn main() -> ExitCode {
    dotenv().ok();
    env_logger::init();

    let backfill_only = std::env::args().skip(1).any(|arg| arg == "--backfill-only");

    match run(backfill_only) {
        Ok(report) => {
            match serde_json::to_string_pretty(&report) {
                Ok(json) => println!("{}", json),
                Err(e) => log::warn!("Failed to render report: {}", e),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Calendar fill failed: {}", e);
            eprintln!("Calendar fill failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
