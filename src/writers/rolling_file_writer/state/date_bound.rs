use super::{open_log_file, ActiveFile, Config};
use crate::{util::ErrorCode, DeferredNow, FilePattern, RollingError};
use std::{collections::HashMap, path::PathBuf};

// Writes each log line into the file of the day of the log line's timestamp.
//
// A day that was already assigned a file continues in that file, so that late log lines
// are not scattered over new files.
#[derive(Debug)]
pub(super) struct DateBoundRotator {
    pattern: FilePattern,
    unique: u32,
    bucket: String,
    // one entry per day seen by this writer; never pruned
    assigned: HashMap<String, PathBuf>,
    active: ActiveFile,
}
impl DateBoundRotator {
    pub(super) fn try_new(
        pattern: FilePattern,
        config: &Config,
        now: &mut DeferredNow,
    ) -> Result<Self, RollingError> {
        let bucket = FilePattern::date_text(&now.wall_clock(config.use_utc));
        let (path, unique) = pattern.resolve_collision_free(&bucket, 0, None)?;
        let active = open_log_file(config, &path, true, now)?;
        let mut assigned = HashMap::new();
        assigned.insert(bucket.clone(), path);
        Ok(Self {
            pattern,
            unique,
            bucket,
            assigned,
            active,
        })
    }

    pub(super) fn active_file(&self) -> Option<&ActiveFile> {
        Some(&self.active)
    }

    pub(super) fn active_file_mut(&mut self) -> Option<&mut ActiveFile> {
        Some(&mut self.active)
    }

    pub(super) fn write(
        &mut self,
        buf: &[u8],
        config: &Config,
        now: &mut DeferredNow,
    ) -> std::io::Result<()> {
        let bucket = FilePattern::date_text(&now.wall_clock(config.use_utc));
        if bucket != self.bucket {
            self.switch_to(bucket, config, now);
        }
        self.active.write_all(buf)?;
        self.active.flush()
    }

    // If the file for the new bucket cannot be opened, the log line goes into the current file,
    // and the next log line tries again.
    fn switch_to(&mut self, bucket: String, config: &Config, now: &mut DeferredNow) {
        let (path, unique) = match self.assigned.get(&bucket) {
            Some(path) => (path.clone(), self.unique),
            None => match self.pattern.resolve_collision_free(
                &bucket,
                self.unique,
                Some(self.active.path()),
            ) {
                Ok(resolved) => resolved,
                Err(e) => {
                    config.error_channel.report_err(
                        ErrorCode::Open,
                        &format!("cannot find a free file name for {}", self.pattern),
                        &e,
                    );
                    return;
                }
            },
        };

        if path != self.active.path() {
            match open_log_file(config, &path, true, now) {
                Ok(new_active) => {
                    std::mem::replace(&mut self.active, new_active).close(&config.error_channel);
                }
                Err(e) => {
                    config.error_channel.report_err(
                        ErrorCode::Open,
                        &format!("cannot open log file {}", path.display()),
                        &e,
                    );
                    return;
                }
            }
        }
        self.unique = unique;
        self.assigned.insert(bucket.clone(), path);
        self.bucket = bucket;
    }
}
