mod builder;
mod config;
mod state;
mod state_handle;

pub use self::builder::RollingFileWriterBuilder;
pub use self::state::sweep_outdated_log_files;

use self::{state::State, state_handle::StateHandle};
use crate::{writers::LogWriter, DeferredNow, RollingError};
use log::Record;
use std::path::PathBuf;

const WINDOWS_LINE_ENDING: &[u8] = b"\r\n";
const UNIX_LINE_ENDING: &[u8] = b"\n";

/// A writer that distributes the log lines over a series of files,
/// according to its [`Rotation`](crate::Rotation).
///
/// Instances are created with [`RollingFileWriter::builder`].
///
/// The writer opens its first file when the first log line arrives.
/// All decisions about rotation are taken synchronously in the logging thread,
/// while the writer's lock is held; there are no background threads.
///
/// Problems with the file system do not make the log calls fail;
/// they are reported through the configured [`ErrorChannel`](crate::ErrorChannel),
/// and the writer continues with the file it has, or retries opening a file with the
/// next log line.
#[derive(Debug)]
pub struct RollingFileWriter {
    state_handle: StateHandle,
    max_log_level: log::LevelFilter,
}
impl RollingFileWriter {
    fn new(state_handle: StateHandle, max_log_level: log::LevelFilter) -> Self {
        Self {
            state_handle,
            max_log_level,
        }
    }

    /// Instantiates a builder for `RollingFileWriter`.
    #[must_use]
    pub fn builder() -> RollingFileWriterBuilder {
        RollingFileWriterBuilder::new()
    }

    /// Returns the path of the file that is currently written to,
    /// or `None` if no file was opened yet.
    ///
    /// # Errors
    ///
    /// [`RollingError::Poison`] if the internal lock is poisoned.
    pub fn current_path(&self) -> Result<Option<PathBuf>, RollingError> {
        self.state_handle.current_path()
    }
}

impl LogWriter for RollingFileWriter {
    #[inline]
    fn write(&self, now: &mut DeferredNow, record: &Record) -> std::io::Result<()> {
        if record.level() <= self.max_log_level {
            self.state_handle.write(now, record);
        }
        Ok(())
    }

    #[inline]
    fn flush(&self) -> std::io::Result<()> {
        self.state_handle.flush()
    }

    #[inline]
    fn max_log_level(&self) -> log::LevelFilter {
        self.max_log_level
    }

    fn shutdown(&self) {
        self.state_handle.shutdown();
    }
}

impl Drop for RollingFileWriter {
    fn drop(&mut self) {
        self.state_handle.shutdown();
    }
}

#[cfg(test)]
mod test {
    use crate::{writers::LogWriter, DeferredNow, ErrorChannel, Rotation};
    use chrono::{Local, TimeZone};
    use log::Level;

    fn write_line(w: &dyn LogWriter, ts: (i32, u32, u32, u32), msg: &str) {
        let mut now = DeferredNow::new_from_datetime(
            Local
                .with_ymd_and_hms(ts.0, ts.1, ts.2, ts.3, 0, 0)
                .unwrap(),
        );
        w.write(
            &mut now,
            &log::Record::builder()
                .args(format_args!("{msg}"))
                .level(Level::Info)
                .module_path(Some("rfw"))
                .build(),
        )
        .unwrap();
    }

    #[test]
    fn test_current_path_is_set_lazily() {
        let dir = temp_dir::TempDir::new().unwrap();
        let writer = super::RollingFileWriter::builder()
            .rotate(Rotation::Date {
                pattern: dir.path().join("lazy_%d_%u.log").to_string_lossy().to_string(),
            })
            .error_channel(ErrorChannel::DevNull)
            .try_build()
            .unwrap();
        assert_eq!(writer.current_path().unwrap(), None);

        write_line(&writer, (2021, 6, 14, 9), "first");
        assert_eq!(
            writer.current_path().unwrap(),
            Some(dir.path().join("lazy_2021-06-14_0.log"))
        );
    }

    #[test]
    fn test_level_filter() {
        let dir = temp_dir::TempDir::new().unwrap();
        let writer = super::RollingFileWriter::builder()
            .rotate(Rotation::Date {
                pattern: dir.path().join("lvl_%d_%u").to_string_lossy().to_string(),
            })
            .max_level(log::LevelFilter::Warn)
            .try_build()
            .unwrap();
        write_line(&writer, (2021, 6, 14, 9), "ignored");
        // info records are dropped before any file is opened
        assert_eq!(writer.current_path().unwrap(), None);
        assert_eq!(writer.max_log_level(), log::LevelFilter::Warn);
    }

    #[test]
    fn test_windows_line_ending() {
        let dir = temp_dir::TempDir::new().unwrap();
        let writer = super::RollingFileWriter::builder()
            .rotate(Rotation::Date {
                pattern: dir.path().join("crlf_%d_%u").to_string_lossy().to_string(),
            })
            .use_windows_line_ending()
            .try_build()
            .unwrap();
        write_line(&writer, (2021, 6, 14, 9), "a");
        write_line(&writer, (2021, 6, 14, 10), "b");
        let content =
            std::fs::read_to_string(dir.path().join("crlf_2021-06-14_0")).unwrap();
        assert_eq!(content, "INFO [rfw] a\r\nINFO [rfw] b\r\n");
    }
}
