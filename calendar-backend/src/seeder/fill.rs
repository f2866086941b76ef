//! Calendar fill: mark the schedule's off days, then backfill the rest of the year.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::path::Path;

use super::schedule::ScheduleDocument;
use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::models::{CalendarDay, DayType};

/// How the off-day pass treats a date that already has a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OffDayMode {
    /// Get-or-create; an existing day is reclassified as off
    Upsert,
    /// Always insert; an existing day aborts the run with `DuplicateDate`
    Strict,
}

impl OffDayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OffDayMode::Upsert => "upsert",
            OffDayMode::Strict => "strict",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "upsert" => Some(OffDayMode::Upsert),
            "strict" => Some(OffDayMode::Strict),
            _ => None,
        }
    }
}

impl Default for OffDayMode {
    fn default() -> Self {
        OffDayMode::Upsert
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedConfig {
    pub target_year: i32,
    pub default_day_type: DayType,
    pub off_day_mode: OffDayMode,
    pub annotation_chars: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            target_year: crate::config::defaults::TARGET_YEAR,
            default_day_type: DayType::default(),
            off_day_mode: OffDayMode::default(),
            annotation_chars: crate::config::defaults::ANNOTATION_CHARS.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub year: i32,
    pub off_days_created: usize,
    pub off_days_updated: usize,
    pub off_days_unchanged: usize,
    pub days_backfilled: usize,
}

/// The store operations the seeder needs
pub trait CalendarStore {
    fn find_day(&self, date: NaiveDate) -> AppResult<Option<CalendarDay>>;
    fn insert_day(&self, date: NaiveDate, day_type: DayType) -> AppResult<CalendarDay>;
    fn reclassify_day(&self, id: i64, day_type: DayType) -> AppResult<()>;
}

impl CalendarStore for Database {
    fn find_day(&self, date: NaiveDate) -> AppResult<Option<CalendarDay>> {
        self.get_calendar_day_by_date(date)
    }

    fn insert_day(&self, date: NaiveDate, day_type: DayType) -> AppResult<CalendarDay> {
        self.create_calendar_day(date, day_type)
    }

    fn reclassify_day(&self, id: i64, day_type: DayType) -> AppResult<()> {
        if self.set_calendar_day_type(id, day_type)? {
            Ok(())
        } else {
            Err(AppError::not_found(format!("Calendar day {}", id)))
        }
    }
}

pub struct CalendarSeeder<'a, S: CalendarStore> {
    store: &'a S,
    config: &'a SeedConfig,
}

impl<'a, S: CalendarStore> CalendarSeeder<'a, S> {
    pub fn new(store: &'a S, config: &'a SeedConfig) -> Self {
        Self { store, config }
    }

    /// Read the schedule at `path` and seed from it
    pub fn seed_from_file(&self, path: &Path) -> AppResult<SeedReport> {
        log::info!("[SEED] Loading schedule from {}", path.display());
        let schedule = ScheduleDocument::load(path)?;
        self.seed(&schedule)
    }

    /// Full run: off-day pass, then backfill.
    ///
    /// The schedule is resolved to dates before anything is written, so a bad
    /// token leaves the store untouched.
    pub fn seed(&self, schedule: &ScheduleDocument) -> AppResult<SeedReport> {
        let year = self.config.target_year;
        let off_days = schedule.off_days(year, &self.config.annotation_chars)?;

        let mut report = SeedReport {
            year,
            ..SeedReport::default()
        };
        self.mark_off_days(&off_days, &mut report)?;
        report.days_backfilled = self.backfill()?;

        log::info!(
            "[SEED] {}: {} off days created, {} reclassified, {} already off, {} days backfilled as {}",
            year,
            report.off_days_created,
            report.off_days_updated,
            report.off_days_unchanged,
            report.days_backfilled,
            self.config.default_day_type.as_str()
        );
        Ok(report)
    }

    fn mark_off_days(&self, dates: &[NaiveDate], report: &mut SeedReport) -> AppResult<()> {
        for &date in dates {
            match self.config.off_day_mode {
                OffDayMode::Strict => {
                    self.store.insert_day(date, DayType::OffDay)?;
                    report.off_days_created += 1;
                }
                OffDayMode::Upsert => match self.store.find_day(date)? {
                    Some(day) if day.day_type == DayType::OffDay => {
                        report.off_days_unchanged += 1;
                    }
                    Some(day) => {
                        log::debug!("[SEED] Reclassifying {} as off day", date);
                        self.store.reclassify_day(day.id, DayType::OffDay)?;
                        report.off_days_updated += 1;
                    }
                    None => {
                        self.store.insert_day(date, DayType::OffDay)?;
                        report.off_days_created += 1;
                    }
                },
            }
        }
        Ok(())
    }

    /// Backfill on its own, reported in the same shape as a full run
    pub fn backfill_report(&self) -> AppResult<SeedReport> {
        let report = SeedReport {
            year: self.config.target_year,
            days_backfilled: self.backfill()?,
            ..SeedReport::default()
        };
        log::info!("[SEED] Backfilled {} days for {}", report.days_backfilled, report.year);
        Ok(report)
    }

    /// Create a default-typed record for every date of the target year that has none.
    /// Returns how many were created; a second run returns 0.
    pub fn backfill(&self) -> AppResult<usize> {
        let year = self.config.target_year;
        let mut date = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| AppError::validation(format!("year {} is out of range", year)))?;

        let mut created = 0;
        loop {
            if self.store.find_day(date)?.is_none() {
                self.store.insert_day(date, self.config.default_day_type)?;
                created += 1;
            }
            match date.succ_opt() {
                Some(next) if next.year() == year => date = next,
                _ => break,
            }
        }
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::test_db;
    use std::cell::RefCell;
    use std::collections::BTreeMap;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn schedule(raw: &str) -> ScheduleDocument {
        ScheduleDocument::from_json(raw).unwrap()
    }

    /// In-memory store that, like the first version of the fill routine, happily
    /// keeps several rows per date
    #[derive(Default)]
    struct VecStore {
        rows: RefCell<Vec<CalendarDay>>,
    }

    impl CalendarStore for VecStore {
        fn find_day(&self, date: NaiveDate) -> AppResult<Option<CalendarDay>> {
            Ok(self.rows.borrow().iter().find(|d| d.date == date).cloned())
        }

        fn insert_day(&self, date: NaiveDate, day_type: DayType) -> AppResult<CalendarDay> {
            let mut rows = self.rows.borrow_mut();
            let day = CalendarDay {
                id: rows.len() as i64 + 1,
                date,
                day_type,
            };
            rows.push(day.clone());
            Ok(day)
        }

        fn reclassify_day(&self, id: i64, day_type: DayType) -> AppResult<()> {
            let mut rows = self.rows.borrow_mut();
            let day = rows
                .iter_mut()
                .find(|d| d.id == id)
                .ok_or_else(|| AppError::not_found(format!("Calendar day {}", id)))?;
            day.day_type = day_type;
            Ok(())
        }
    }

    impl VecStore {
        fn rows_per_date(&self) -> BTreeMap<NaiveDate, usize> {
            let mut counts = BTreeMap::new();
            for day in self.rows.borrow().iter() {
                *counts.entry(day.date).or_insert(0) += 1;
            }
            counts
        }
    }

    #[test]
    fn test_january_example() {
        let (_dir, db) = test_db();
        let config = SeedConfig::default();
        let seeder = CalendarSeeder::new(&db, &config);

        let report = seeder
            .seed(&schedule(r#"{"months":[{"month":1,"days":"1,2*,8"}]}"#))
            .unwrap();

        assert_eq!(report.off_days_created, 3);
        assert_eq!(report.days_backfilled, 362);

        let day_type = |d| db.get_calendar_day_by_date(ymd(2023, 1, d)).unwrap().unwrap().day_type;
        assert_eq!(day_type(1), DayType::OffDay);
        assert_eq!(day_type(2), DayType::OffDay);
        assert_eq!(day_type(8), DayType::OffDay);
        assert_eq!(day_type(3), DayType::WorkDay);

        let january = db
            .list_calendar_days_in_range(ymd(2023, 1, 1), ymd(2023, 1, 31))
            .unwrap();
        assert_eq!(january.len(), 31);
        assert_eq!(db.count_calendar_days().unwrap(), 365);
    }

    #[test]
    fn test_every_date_once_and_unlisted_are_work_days() {
        let (_dir, db) = test_db();
        let config = SeedConfig::default();
        let doc = ScheduleDocument::load(&crate::config::bundled_schedule_path()).unwrap();
        let off_days = doc.off_days(2023, "*+").unwrap();

        CalendarSeeder::new(&db, &config).seed(&doc).unwrap();

        let days = db.list_calendar_days().unwrap();
        assert_eq!(days.len(), 365);
        for pair in days.windows(2) {
            assert_eq!(pair[0].date.succ_opt(), Some(pair[1].date));
        }
        for day in &days {
            let expected = if off_days.contains(&day.date) {
                DayType::OffDay
            } else {
                DayType::WorkDay
            };
            assert_eq!(day.day_type, expected, "{}", day.date);
        }
    }

    #[test]
    fn test_backfill_is_idempotent() {
        let (_dir, db) = test_db();
        let config = SeedConfig::default();
        let seeder = CalendarSeeder::new(&db, &config);

        seeder
            .seed(&schedule(r#"{"months":[{"month":5,"days":"1,8+,9"}]}"#))
            .unwrap();
        let before = db.list_calendar_days().unwrap();

        assert_eq!(seeder.backfill().unwrap(), 0);
        assert_eq!(db.list_calendar_days().unwrap(), before);
    }

    #[test]
    fn test_backfill_report_only_counts_backfill() {
        let (_dir, db) = test_db();
        let config = SeedConfig::default();
        let seeder = CalendarSeeder::new(&db, &config);

        let report = seeder.backfill_report().unwrap();
        assert_eq!(
            report,
            SeedReport {
                year: 2023,
                days_backfilled: 365,
                ..SeedReport::default()
            }
        );
        assert_eq!(seeder.backfill_report().unwrap().days_backfilled, 0);
    }

    #[test]
    fn test_leap_year_backfill() {
        let (_dir, db) = test_db();
        let config = SeedConfig {
            target_year: 2024,
            ..SeedConfig::default()
        };
        assert_eq!(CalendarSeeder::new(&db, &config).backfill().unwrap(), 366);
        assert!(db.get_calendar_day_by_date(ymd(2024, 2, 29)).unwrap().is_some());
        assert!(db.get_calendar_day_by_date(ymd(2025, 1, 1)).unwrap().is_none());
    }

    #[test]
    fn test_upsert_reseed_leaves_store_unchanged() {
        let (_dir, db) = test_db();
        let config = SeedConfig::default();
        let seeder = CalendarSeeder::new(&db, &config);
        let doc = schedule(r#"{"months":[{"month":3,"days":"7*,8"}]}"#);

        seeder.seed(&doc).unwrap();
        let before = db.list_calendar_days().unwrap();

        let report = seeder.seed(&doc).unwrap();
        assert_eq!(report.off_days_created, 0);
        assert_eq!(report.off_days_unchanged, 2);
        assert_eq!(report.days_backfilled, 0);
        assert_eq!(db.list_calendar_days().unwrap(), before);
    }

    #[test]
    fn test_upsert_reclassifies_existing_work_day() {
        let (_dir, db) = test_db();
        let config = SeedConfig::default();
        let seeder = CalendarSeeder::new(&db, &config);
        seeder.backfill().unwrap();

        let report = seeder
            .seed(&schedule(r#"{"months":[{"month":6,"days":"12"}]}"#))
            .unwrap();

        assert_eq!(report.off_days_updated, 1);
        assert_eq!(
            db.get_calendar_day_by_date(ymd(2023, 6, 12)).unwrap().unwrap().day_type,
            DayType::OffDay
        );
        assert_eq!(db.count_calendar_days().unwrap(), 365);
    }

    #[test]
    fn test_strict_reseed_reports_duplicate() {
        let (_dir, db) = test_db();
        let config = SeedConfig {
            off_day_mode: OffDayMode::Strict,
            ..SeedConfig::default()
        };
        let seeder = CalendarSeeder::new(&db, &config);
        let doc = schedule(r#"{"months":[{"month":1,"days":"1,7"}]}"#);

        seeder.seed(&doc).unwrap();
        let err = seeder.seed(&doc).unwrap_err();
        assert!(matches!(err, AppError::DuplicateDate(d) if d == ymd(2023, 1, 1)));
        assert_eq!(db.count_calendar_days().unwrap(), 365);
    }

    #[test]
    fn test_strict_mode_on_permissive_store_duplicates_rows() {
        let store = VecStore::default();
        let config = SeedConfig {
            off_day_mode: OffDayMode::Strict,
            ..SeedConfig::default()
        };
        let seeder = CalendarSeeder::new(&store, &config);
        let doc = schedule(r#"{"months":[{"month":1,"days":"1,2"}]}"#);

        seeder.seed(&doc).unwrap();
        seeder.seed(&doc).unwrap();

        let counts = store.rows_per_date();
        assert_eq!(counts[&ymd(2023, 1, 1)], 2);
        assert_eq!(counts[&ymd(2023, 1, 3)], 1);
    }

    #[test]
    fn test_default_day_type_is_configurable() {
        let store = VecStore::default();
        let config = SeedConfig {
            target_year: 2023,
            default_day_type: DayType::OffDay,
            ..SeedConfig::default()
        };
        CalendarSeeder::new(&store, &config).backfill().unwrap();
        assert!(store.rows.borrow().iter().all(|d| d.day_type == DayType::OffDay));
    }

    #[test]
    fn test_parse_failure_writes_nothing() {
        let (_dir, db) = test_db();
        let config = SeedConfig::default();
        let err = CalendarSeeder::new(&db, &config)
            .seed(&schedule(r#"{"months":[{"month":1,"days":"1,2"},{"month":2,"days":"3,x"}]}"#))
            .unwrap_err();

        assert!(matches!(err, AppError::Schedule(_)));
        assert_eq!(db.count_calendar_days().unwrap(), 0);
    }

    #[test]
    fn test_missing_schedule_file() {
        let (dir, db) = test_db();
        let config = SeedConfig::default();
        let err = CalendarSeeder::new(&db, &config)
            .seed_from_file(&dir.path().join("calendar_2023.json"))
            .unwrap_err();
        assert!(matches!(err, AppError::Schedule(_)));
    }
}
