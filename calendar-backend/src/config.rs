use std::env;
use std::path::PathBuf;

use crate::error::{AppError, AppResult};
use crate::models::DayType;
use crate::seeder::{OffDayMode, SeedConfig};

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const PORT: &str = "PORT";
    pub const DATABASE_URL: &str = "DATABASE_URL";
    pub const DATABASE_POOL_SIZE: &str = "DATABASE_POOL_SIZE";
    /// JSON schedule document read by the calendar fill
    pub const SCHEDULE_PATH: &str = "CALENDAR_SCHEDULE_PATH";
    pub const TARGET_YEAR: &str = "CALENDAR_TARGET_YEAR";
    /// `work_day` or `off_day`; classification given to backfilled days
    pub const DEFAULT_DAY_TYPE: &str = "CALENDAR_DEFAULT_DAY_TYPE";
    /// `upsert` or `strict`
    pub const OFF_DAY_MODE: &str = "CALENDAR_OFF_DAY_MODE";
    /// Characters stripped from day tokens before parsing (e.g. `22*`, `24+`)
    pub const ANNOTATION_CHARS: &str = "CALENDAR_ANNOTATION_CHARS";
}

/// Default values
pub mod defaults {
    pub const PORT: u16 = 8080;
    pub const DATABASE_URL: &str = "./.db/calendar.db";
    pub const DATABASE_POOL_SIZE: u32 = 4;
    pub const SCHEDULE_FILE: &str = "calendar_2023.json";
    pub const TARGET_YEAR: i32 = 2023;
    pub const ANNOTATION_CHARS: &str = "*+";
}

/// Returns the absolute path to the calendar-backend directory.
pub fn backend_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Bundled schedule document (calendar-backend/config/)
pub fn bundled_schedule_path() -> PathBuf {
    backend_dir().join("config").join(defaults::SCHEDULE_FILE)
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub database_pool_size: u32,
    pub schedule_path: PathBuf,
    pub seed: SeedConfig,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup; `from_env` passes the process environment
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_or(&lookup, env_vars::PORT, defaults::PORT)?;
        let database_pool_size =
            parse_or(&lookup, env_vars::DATABASE_POOL_SIZE, defaults::DATABASE_POOL_SIZE)?;
        if database_pool_size == 0 {
            return Err(AppError::Config(format!(
                "{} must be at least 1",
                env_vars::DATABASE_POOL_SIZE
            )));
        }

        let default_day_type = match lookup(env_vars::DEFAULT_DAY_TYPE) {
            Some(raw) => DayType::from_str(&raw).ok_or_else(|| {
                AppError::Config(format!(
                    "{} must be work_day or off_day, got '{}'",
                    env_vars::DEFAULT_DAY_TYPE,
                    raw
                ))
            })?,
            None => DayType::default(),
        };

        let off_day_mode = match lookup(env_vars::OFF_DAY_MODE) {
            Some(raw) => OffDayMode::from_str(&raw).ok_or_else(|| {
                AppError::Config(format!(
                    "{} must be upsert or strict, got '{}'",
                    env_vars::OFF_DAY_MODE,
                    raw
                ))
            })?,
            None => OffDayMode::default(),
        };

        let seed = SeedConfig {
            target_year: parse_or(&lookup, env_vars::TARGET_YEAR, defaults::TARGET_YEAR)?,
            default_day_type,
            off_day_mode,
            annotation_chars: lookup(env_vars::ANNOTATION_CHARS)
                .unwrap_or_else(|| defaults::ANNOTATION_CHARS.to_string()),
        };

        Ok(Self {
            port,
            database_url: lookup(env_vars::DATABASE_URL)
                .unwrap_or_else(|| defaults::DATABASE_URL.to_string()),
            database_pool_size,
            schedule_path: lookup(env_vars::SCHEDULE_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(bundled_schedule_path),
            seed,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> AppResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{} is invalid ('{}'): {}", key, raw, e))),
        None => Ok(default),
    }
}
