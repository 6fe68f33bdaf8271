use super::{open_log_file, retention_sweep::sweep_outdated_log_files, ActiveFile, Config};
use crate::{util::ErrorCode, DatePattern, DeferredNow, Periodicity, Retention, RollingError};
use chrono::{DateTime, Local, NaiveDateTime, Utc, Weekday};
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

// Writes to a fixed file, and renames it at the first log line after a period boundary.
//
// The renamed file gets the name `scheduled_path`, which is the fixed file's name with the
// date pattern appended, formatted for the period that the file's content belongs to.
#[derive(Debug)]
pub(super) struct ScheduledRotator {
    file: PathBuf,
    date_pattern: DatePattern,
    periodicity: Periodicity,
    first_day_of_week: Weekday,
    retention: Retention,
    scheduled_path: PathBuf,
    // None: check with the next log line
    o_next_check: Option<NaiveDateTime>,
    o_active: Option<ActiveFile>,
}
impl ScheduledRotator {
    pub(super) fn try_new(
        file: PathBuf,
        date_pattern: DatePattern,
        periodicity: Periodicity,
        first_day_of_week: Weekday,
        retention: Retention,
        config: &Config,
        now: &mut DeferredNow,
    ) -> Result<Self, RollingError> {
        // an existing file that we continue belongs to the period of its last modification
        let reference = if config.append {
            last_modification(&file, config.use_utc)
        } else {
            None
        }
        .unwrap_or_else(|| now.wall_clock(config.use_utc));
        let scheduled_path = dated_path(&file, &date_pattern, &reference);
        let active = open_log_file(config, &file, config.append, now)?;
        Ok(Self {
            file,
            date_pattern,
            periodicity,
            first_day_of_week,
            retention,
            scheduled_path,
            o_next_check: None,
            o_active: Some(active),
        })
    }

    pub(super) fn active_file(&self) -> Option<&ActiveFile> {
        self.o_active.as_ref()
    }

    pub(super) fn active_file_mut(&mut self) -> Option<&mut ActiveFile> {
        self.o_active.as_mut()
    }

    pub(super) fn write(
        &mut self,
        buf: &[u8],
        config: &Config,
        now: &mut DeferredNow,
    ) -> std::io::Result<()> {
        let wall_clock = now.wall_clock(config.use_utc);
        let mut rolled_over = false;
        if self.o_next_check.is_none_or(|next_check| wall_clock >= next_check) {
            self.o_next_check = self
                .periodicity
                .next_boundary(&wall_clock, self.first_day_of_week);
            rolled_over = self.roll_over(&wall_clock, config, now);
        }

        // a base file that could not be reopened is retried with every log line
        if self.o_active.is_none() && !rolled_over {
            self.reopen(config, now);
        }
        match self.o_active {
            Some(ref mut active) => active.write_all(buf),
            // the failure to open the file was reported already
            None => Ok(()),
        }
    }

    // Returns true if the file was rolled over.
    fn roll_over(
        &mut self,
        wall_clock: &NaiveDateTime,
        config: &Config,
        now: &mut DeferredNow,
    ) -> bool {
        let dated = dated_path(&self.file, &self.date_pattern, wall_clock);
        if dated == self.scheduled_path {
            return false;
        }

        if let Some(active) = self.o_active.take() {
            active.close(&config.error_channel);
        }

        if self.scheduled_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.scheduled_path) {
                config.error_channel.report_err(
                    ErrorCode::Delete,
                    &format!("cannot delete {}", self.scheduled_path.display()),
                    &e,
                );
            }
        }
        if let Err(e) = std::fs::rename(&self.file, &self.scheduled_path) {
            config.error_channel.report_err(
                ErrorCode::Rename,
                &format!(
                    "cannot rename {} to {}",
                    self.file.display(),
                    self.scheduled_path.display()
                ),
                &e,
            );
        }

        self.reopen(config, now);
        self.scheduled_path = dated;

        // retention is measured against the system clock, not against the record's timestamp
        sweep_outdated_log_files(
            &directory_of(&self.file),
            &self.file.file_name().unwrap_or_default().to_string_lossy(),
            &self.date_pattern,
            self.retention,
            &config.error_channel,
        );
        true
    }

    fn reopen(&mut self, config: &Config, now: &mut DeferredNow) {
        match open_log_file(config, &self.file, config.append, now) {
            Ok(active) => self.o_active = Some(active),
            Err(e) => config.error_channel.report_err(
                ErrorCode::Open,
                &format!("cannot open log file {}", self.file.display()),
                &e,
            ),
        }
    }
}

fn dated_path(file: &Path, date_pattern: &DatePattern, timestamp: &NaiveDateTime) -> PathBuf {
    let mut s: OsString = file.as_os_str().to_owned();
    s.push(date_pattern.format(timestamp));
    PathBuf::from(s)
}

fn directory_of(file: &Path) -> PathBuf {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

// Wall-clock time of the last modification of a non-empty file.
fn last_modification(file: &Path, use_utc: bool) -> Option<NaiveDateTime> {
    let metadata = std::fs::metadata(file).ok()?;
    if metadata.len() == 0 {
        return None;
    }
    let modified = metadata.modified().ok()?;
    Some(if use_utc {
        DateTime::<Utc>::from(modified).naive_utc()
    } else {
        DateTime::<Local>::from(modified).naive_local()
    })
}

#[cfg(test)]
mod test {
    use super::ScheduledRotator;
    use crate::{
        writers::rolling_file_writer::config::Config, DatePattern, DeferredNow, ErrorChannel,
        Periodicity, Retention,
    };
    use chrono::{Local, TimeZone, Weekday};
    use std::path::Path;

    fn at(day: u32, hour: u32) -> DeferredNow {
        DeferredNow::new_from_datetime(Local.with_ymd_and_hms(2021, 6, day, hour, 0, 0).unwrap())
    }

    fn set_mtime(path: &Path, day: u32, hour: u32) {
        let ts = Local.with_ymd_and_hms(2021, 6, day, hour, 0, 0).unwrap();
        filetime::set_file_mtime(
            path,
            filetime::FileTime::from_system_time(std::time::SystemTime::from(ts)),
        )
        .unwrap();
    }

    fn rotator(file: &Path, config: &Config, now: &mut DeferredNow) -> ScheduledRotator {
        let date_pattern = DatePattern::try_new(".%Y-%m-%d").unwrap();
        ScheduledRotator::try_new(
            file.to_path_buf(),
            date_pattern,
            Periodicity::Day,
            Weekday::Mon,
            Retention::Forever,
            config,
            now,
        )
        .unwrap()
    }

    #[test]
    fn test_hourly_records_stay_in_one_file() {
        let dir = temp_dir::TempDir::new().unwrap();
        let file = dir.path().join("same.log");
        let config = Config::default();
        let mut rotator = rotator(&file, &config, &mut at(14, 1));
        for hour in 1..24 {
            rotator.write(b"x\n", &config, &mut at(14, hour)).unwrap();
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
        assert_eq!(std::fs::metadata(&file).unwrap().len(), 46);
    }

    #[test]
    fn test_existing_file_is_rolled_over_at_first_write() {
        let dir = temp_dir::TempDir::new().unwrap();
        let file = dir.path().join("old.log");
        std::fs::write(&file, "from yesterday\n").unwrap();
        set_mtime(&file, 13, 18);

        let config = Config {
            error_channel: ErrorChannel::DevNull,
            ..Config::default()
        };
        let mut rotator = rotator(&file, &config, &mut at(14, 9));
        rotator.write(b"today\n", &config, &mut at(14, 9)).unwrap();

        assert_eq!(
            std::fs::read_to_string(dir.path().join("old.log.2021-06-13")).unwrap(),
            "from yesterday\n"
        );
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "today\n");
    }

    #[test]
    fn test_truncate_instead_of_append() {
        let dir = temp_dir::TempDir::new().unwrap();
        let file = dir.path().join("trunc.log");
        std::fs::write(&file, "from yesterday\n").unwrap();
        set_mtime(&file, 13, 18);

        let config = Config {
            append: false,
            ..Config::default()
        };
        let mut rotator = rotator(&file, &config, &mut at(14, 9));
        rotator.write(b"today\n", &config, &mut at(14, 9)).unwrap();

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "today\n");
    }

    #[test]
    fn test_existing_target_is_replaced() {
        let dir = temp_dir::TempDir::new().unwrap();
        let file = dir.path().join("lw.log");
        std::fs::write(dir.path().join("lw.log.2021-06-14"), "stale\n").unwrap();

        let config = Config::default();
        let mut rotator = rotator(&file, &config, &mut at(14, 9));
        rotator.write(b"14\n", &config, &mut at(14, 9)).unwrap();
        rotator.write(b"15\n", &config, &mut at(15, 9)).unwrap();

        assert_eq!(
            std::fs::read_to_string(dir.path().join("lw.log.2021-06-14")).unwrap(),
            "14\n"
        );
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "15\n");
    }

    #[test]
    fn test_failed_reopen_is_retried_with_every_write() {
        use crate::{ErrorCode, ErrorHandler};
        use std::sync::{Arc, Mutex};

        #[derive(Default)]
        struct Codes(Mutex<Vec<ErrorCode>>);
        impl ErrorHandler for Codes {
            fn report(&self, code: ErrorCode, _msg: &str, _: Option<&dyn std::error::Error>) {
                self.0.lock().unwrap().push(code);
            }
        }

        let dir = temp_dir::TempDir::new().unwrap();
        let folder = dir.path().join("logs");
        let file = folder.join("app.log");
        let codes = Arc::new(Codes::default());
        let config = Config {
            error_channel: ErrorChannel::Handler(codes.clone()),
            ..Config::default()
        };
        let mut rotator = rotator(&file, &config, &mut at(14, 9));
        rotator.write(b"14\n", &config, &mut at(14, 9)).unwrap();

        // the folder is replaced by a file, so neither rename nor reopen can succeed
        std::fs::remove_dir_all(&folder).unwrap();
        std::fs::write(&folder, "in the way\n").unwrap();
        rotator.write(b"15a\n", &config, &mut at(15, 9)).unwrap();
        assert!(rotator.active_file().is_none());
        rotator.write(b"15b\n", &config, &mut at(15, 10)).unwrap();
        assert_eq!(
            *codes.0.lock().unwrap(),
            vec![ErrorCode::Rename, ErrorCode::Open, ErrorCode::Open]
        );

        std::fs::remove_file(&folder).unwrap();
        rotator.write(b"15c\n", &config, &mut at(15, 11)).unwrap();
        assert_eq!(rotator.active_file().unwrap().path(), file);
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "15c\n");
        assert_eq!(codes.0.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_reopen_follows_append_setting() {
        let dir = temp_dir::TempDir::new().unwrap();
        let file = dir.path().join("tr.log");
        // the rename fails, so the base file is reopened with its old content
        let target = dir.path().join("tr.log.2021-06-14");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("keep"), "").unwrap();

        let config = Config {
            append: false,
            error_channel: ErrorChannel::DevNull,
            ..Config::default()
        };
        let mut rotator = rotator(&file, &config, &mut at(14, 9));
        rotator.write(b"14\n", &config, &mut at(14, 9)).unwrap();
        rotator.write(b"15\n", &config, &mut at(15, 9)).unwrap();
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "15\n");
    }
}
