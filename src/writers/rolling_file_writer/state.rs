mod date_bound;
mod retention_sweep;
mod scheduled;
mod size_bound;

pub use retention_sweep::sweep_outdated_log_files;

use super::config::{Config, RotationConfig};
use crate::{util::ErrorCode, DeferredNow, ErrorChannel, RollingError};
use date_bound::DateBoundRotator;
use scheduled::ScheduledRotator;
use size_bound::SizeBoundRotator;
use std::{
    fs::OpenOptions,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

// The file a rotator currently writes to.
pub(super) struct ActiveFile {
    path: PathBuf,
    writer: Box<dyn Write + Send>,
    // bytes in the file, including those that existed when it was opened
    size: u64,
    has_records: bool,
}
impl ActiveFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn write_all(&mut self, buf: &[u8]) -> std::io::Result<()> {
        self.writer.write_all(buf)?;
        self.size += buf.len() as u64;
        self.has_records = true;
        Ok(())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }

    // Flushes and releases the file handle.
    fn close(mut self, error_channel: &ErrorChannel) {
        if let Err(e) = self.writer.flush() {
            error_channel.report_err(
                ErrorCode::Flush,
                &format!("cannot flush {}", self.path.display()),
                &e,
            );
        }
    }
}
impl std::fmt::Debug for ActiveFile {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        f.debug_struct("ActiveFile")
            .field("path", &self.path)
            .field("size", &self.size)
            .field("has_records", &self.has_records)
            .finish_non_exhaustive()
    }
}

// Opens (and creates, if necessary) a log file, including its parent folders.
// A head is written if the file is empty.
pub(super) fn open_log_file(
    config: &Config,
    path: &Path,
    append: bool,
    now: &mut DeferredNow,
) -> Result<ActiveFile, std::io::Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let logfile = OpenOptions::new()
        .write(true)
        .create(true)
        .append(append)
        .truncate(!append)
        .open(path)?;
    let mut size = logfile.metadata()?.len();

    let mut writer: Box<dyn Write + Send> = if let Some(capacity) = config.o_buffer_capacity {
        Box::new(BufWriter::with_capacity(capacity, logfile))
    } else {
        Box::new(logfile)
    };

    if size == 0 {
        if let Some(head) = config.o_head {
            let mut head_buf = Vec::<u8>::with_capacity(200);
            // a failing head must not make the file unusable
            match head(&mut head_buf, path, now) {
                Ok(()) => {
                    writer.write_all(&head_buf)?;
                    size = head_buf.len() as u64;
                }
                Err(e) => config.error_channel.report_err(
                    ErrorCode::Format,
                    &format!("head function failed for {}", path.display()),
                    &e,
                ),
            }
        }
    }

    if config.print_message {
        println!("Log is written to {}", path.display());
    }

    Ok(ActiveFile {
        path: path.to_path_buf(),
        writer,
        size,
        has_records: false,
    })
}

#[derive(Debug)]
enum Rotator {
    Size(SizeBoundRotator),
    Date(DateBoundRotator),
    Schedule(ScheduledRotator),
}

enum Inner {
    Initial(RotationConfig),
    Active(Rotator),
}
impl std::fmt::Debug for Inner {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        match self {
            Self::Initial(rotation_config) => {
                f.write_fmt(format_args!("Initial({rotation_config:?})"))
            }
            Self::Active(rotator) => f.write_fmt(format_args!("Active({rotator:?})")),
        }
    }
}

// The mutable state of a RollingFileWriter.
#[derive(Debug)]
pub(super) struct State {
    config: Config,
    inner: Inner,
}
impl State {
    pub(super) fn new(config: Config, rotation_config: RotationConfig) -> Self {
        Self {
            config,
            inner: Inner::Initial(rotation_config),
        }
    }

    pub(super) fn config(&self) -> &Config {
        &self.config
    }

    // The first file is opened with the first log line, so that its timestamp
    // determines the date placeholder.
    fn initialize(
        &self,
        rotation_config: &RotationConfig,
        now: &mut DeferredNow,
    ) -> Result<Rotator, RollingError> {
        Ok(match rotation_config {
            RotationConfig::Size {
                pattern,
                bound,
                rename_retired_files,
            } => Rotator::Size(SizeBoundRotator::try_new(
                pattern.clone(),
                *bound,
                *rename_retired_files,
                &self.config,
                now,
            )?),
            RotationConfig::Date { pattern } => Rotator::Date(DateBoundRotator::try_new(
                pattern.clone(),
                &self.config,
                now,
            )?),
            RotationConfig::Schedule {
                file,
                date_pattern,
                periodicity,
                first_day_of_week,
                retention,
            } => Rotator::Schedule(ScheduledRotator::try_new(
                file.clone(),
                date_pattern.clone(),
                *periodicity,
                *first_day_of_week,
                *retention,
                &self.config,
                now,
            )?),
        })
    }

    pub(super) fn write_buffer(
        &mut self,
        buf: &[u8],
        now: &mut DeferredNow,
    ) -> std::io::Result<()> {
        if let Inner::Initial(ref rotation_config) = self.inner {
            match self.initialize(rotation_config, now) {
                Ok(rotator) => self.inner = Inner::Active(rotator),
                Err(e) => {
                    // the next log line tries again
                    self.config.error_channel.report_err(
                        ErrorCode::Open,
                        "cannot open the first log file, the log line is dropped",
                        &e,
                    );
                    return Ok(());
                }
            }
        }

        if let Inner::Active(ref mut rotator) = self.inner {
            match rotator {
                Rotator::Size(r) => r.write(buf, &self.config, now)?,
                Rotator::Date(r) => r.write(buf, &self.config, now)?,
                Rotator::Schedule(r) => r.write(buf, &self.config, now)?,
            }
        }
        Ok(())
    }

    pub(super) fn current_path(&self) -> Option<PathBuf> {
        match self.inner {
            Inner::Initial(_) => None,
            Inner::Active(ref rotator) => match rotator {
                Rotator::Size(r) => r.active_file(),
                Rotator::Date(r) => r.active_file(),
                Rotator::Schedule(r) => r.active_file(),
            }
            .map(|active| active.path().to_path_buf()),
        }
    }

    fn active_file_mut(&mut self) -> Option<&mut ActiveFile> {
        match self.inner {
            Inner::Initial(_) => None,
            Inner::Active(ref mut rotator) => match rotator {
                Rotator::Size(r) => r.active_file_mut(),
                Rotator::Date(r) => r.active_file_mut(),
                Rotator::Schedule(r) => r.active_file_mut(),
            },
        }
    }

    pub(super) fn flush(&mut self) -> std::io::Result<()> {
        match self.active_file_mut() {
            Some(active) => active.flush(),
            None => Ok(()),
        }
    }

    pub(super) fn shutdown(&mut self) {
        let error_channel = self.config.error_channel.clone();
        if let Some(active) = self.active_file_mut() {
            active.flush().unwrap_or_else(|e| {
                error_channel.report_err(ErrorCode::Flush, "flushing on shutdown failed", &e);
            });
        }
    }
}
