use super::{open_log_file, ActiveFile, Config};
use crate::{util::ErrorCode, DeferredNow, FilePattern, RollingError};
use chrono::{Local, Utc};
use std::path::Path;

const RETIRED_TS_FORMAT: &str = "%Y-%m-%d_%H-%M-%S%.3f";

// Rotates when the active file would grow beyond the bound.
#[derive(Debug)]
pub(super) struct SizeBoundRotator {
    pattern: FilePattern,
    bound: u64,
    rename_retired_files: bool,
    // date text of the first log line, used for all files
    date_text: String,
    unique: u32,
    o_active: Option<ActiveFile>,
}
impl SizeBoundRotator {
    pub(super) fn try_new(
        pattern: FilePattern,
        bound: u64,
        rename_retired_files: bool,
        config: &Config,
        now: &mut DeferredNow,
    ) -> Result<Self, RollingError> {
        let date_text = FilePattern::date_text(&now.wall_clock(config.use_utc));
        let (path, unique) = pattern.resolve_collision_free(&date_text, 0, None)?;
        let active = open_log_file(config, &path, false, now)?;
        Ok(Self {
            pattern,
            bound,
            rename_retired_files,
            date_text,
            unique,
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
        let rotation_necessary = self.o_active.as_ref().is_none_or(|active| {
            active.has_records && active.size + buf.len() as u64 > self.bound
        });
        if rotation_necessary {
            self.rotate(config, now);
        }
        match self.o_active {
            Some(ref mut active) => active.write_all(buf),
            // the failure to open a file was reported already
            None => Ok(()),
        }
    }

    // Opens a new file; only if that succeeds, the previous file is closed and retired.
    fn rotate(&mut self, config: &Config, now: &mut DeferredNow) {
        let start = if self.o_active.is_some() {
            self.unique.saturating_add(1)
        } else {
            self.unique
        };
        let (new_active, old_unique) = match self
            .pattern
            .resolve_collision_free(&self.date_text, start, None)
            .map_err(|e| (e, None))
            .and_then(|(path, unique)| {
                open_log_file(config, &path, false, now)
                    .map(|active| (active, unique))
                    .map_err(|e| (RollingError::Io(e), Some(path)))
            }) {
            Ok((active, unique)) => (active, std::mem::replace(&mut self.unique, unique)),
            Err((e, o_path)) => {
                let msg = match o_path {
                    Some(path) => format!("cannot open log file {}", path.display()),
                    None => format!("cannot find a free file name for {}", self.pattern),
                };
                config
                    .error_channel
                    .report_err(ErrorCode::Open, &msg, &e);
                return;
            }
        };

        if let Some(old) = self.o_active.replace(new_active) {
            let old_path = old.path().to_path_buf();
            old.close(&config.error_channel);
            if self.rename_retired_files {
                self.retire(&old_path, old_unique, config);
            }
        }
    }

    // The retired name is the pattern with an appendix that carries the time of retirement,
    // filled with the unique value of the retired file.
    fn retire(&self, path: &Path, unique: u32, config: &Config) {
        let retired_at = if config.use_utc {
            Utc::now().naive_utc()
        } else {
            Local::now().naive_local()
        };
        let retired_pattern = self.pattern.with_appendix(&format!(
            "_retired_{}",
            retired_at.format(RETIRED_TS_FORMAT)
        ));
        match retired_pattern.resolve_collision_free(&self.date_text, unique, None) {
            Ok((retired_path, _)) => {
                if let Err(e) = std::fs::rename(path, &retired_path) {
                    config.error_channel.report_err(
                        ErrorCode::Rename,
                        &format!(
                            "cannot rename {} to {}",
                            path.display(),
                            retired_path.display()
                        ),
                        &e,
                    );
                }
            }
            Err(e) => config.error_channel.report_err(
                ErrorCode::Rename,
                &format!("cannot find a name for retiring {}", path.display()),
                &e,
            ),
        }
    }
}

#[cfg(test)]
mod test {
    use super::SizeBoundRotator;
    use crate::{
        writers::rolling_file_writer::config::Config, DeferredNow, ErrorChannel, FilePattern,
    };

    fn config() -> Config {
        Config {
            error_channel: ErrorChannel::DevNull,
            ..Config::default()
        }
    }

    #[test]
    fn test_rotation_before_overflow() {
        let dir = temp_dir::TempDir::new().unwrap();
        let pattern =
            FilePattern::try_new(dir.path().join("s_%d_%u").to_string_lossy()).unwrap();
        let config = config();
        let mut now = DeferredNow::new();
        let mut rotator =
            SizeBoundRotator::try_new(pattern, 100, false, &config, &mut now).unwrap();
        let first = rotator.active_file().unwrap().path().to_path_buf();

        // a single record larger than the bound goes into the empty file
        rotator.write(&[b'x'; 150], &config, &mut now).unwrap();
        assert_eq!(rotator.active_file().unwrap().path(), first);

        rotator.write(&[b'y'; 10], &config, &mut now).unwrap();
        let second = rotator.active_file().unwrap().path().to_path_buf();
        assert_ne!(second, first);
        assert_eq!(std::fs::metadata(&first).unwrap().len(), 150);
        assert_eq!(rotator.unique, 1);
    }

    #[test]
    fn test_retired_file_gets_renamed() {
        let dir = temp_dir::TempDir::new().unwrap();
        let pattern =
            FilePattern::try_new(dir.path().join("r_%d_%u").to_string_lossy()).unwrap();
        let config = config();
        let mut now = DeferredNow::new();
        let mut rotator = SizeBoundRotator::try_new(pattern, 64, true, &config, &mut now).unwrap();
        let first = rotator.active_file().unwrap().path().to_path_buf();
        rotator.write(&[b'a'; 40], &config, &mut now).unwrap();
        rotator.write(&[b'b'; 40], &config, &mut now).unwrap();

        assert!(!first.exists());
        let retired: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .filter(|name| name.contains("_retired_"))
            .collect();
        assert_eq!(retired.len(), 1);
        assert!(retired[0].starts_with(&*first.file_name().unwrap().to_string_lossy()));
    }
}
